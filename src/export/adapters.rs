//! CSV exporters driven by [`QueryConnector`]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::core::{unique_file_name, ResysError, ResysResult};
use crate::export::query::{IncidenceQuery, QueryRow};
use crate::ontology::Ontology;
use crate::smells::SmellKind;

/// Consumes the rows of one query and produces a result.
pub trait ProcessingAdapter {
    type Output;

    fn query(&self) -> IncidenceQuery;

    fn process(&mut self, row: &QueryRow) -> ResysResult<()>;

    fn conclude(self) -> ResysResult<Self::Output>
    where
        Self: Sized;
}

/// Runs adapters against one ontology
pub struct QueryConnector<'a> {
    ontology: &'a Ontology,
}

impl<'a> QueryConnector<'a> {
    pub fn new(ontology: &'a Ontology) -> Self {
        Self { ontology }
    }

    pub fn adapt<A: ProcessingAdapter>(&self, mut adapter: A) -> ResysResult<A::Output> {
        let query = adapter.query();
        let rows = query.evaluate(self.ontology);
        debug!("{:?}: {} rows", query, rows.len());

        for row in &rows {
            adapter.process(row)?;
        }
        adapter.conclude()
    }
}

/// A CSV file written by an exporter
#[derive(Debug, Clone, Serialize)]
pub struct CsvReport {
    pub file_name: String,
    pub path: PathBuf,
    /// Data lines, header excluded
    pub rows: usize,
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn write_csv(dir: &Path, prefix: &str, header: &str, lines: &[Vec<String>]) -> ResysResult<CsvReport> {
    let file_name = unique_file_name(prefix, "csv");
    let path = dir.join(&file_name);

    let mut content = String::from(header);
    for line in lines {
        content.push('\n');
        let fields: Vec<String> = line.iter().map(|field| csv_field(field)).collect();
        content.push_str(&fields.join(","));
    }

    fs::write(&path, content)
        .map_err(|e| ResysError::export(format!("cannot write {}: {}", path.display(), e)))?;
    info!("Exported {} rows to {}", lines.len(), path.display());

    Ok(CsvReport {
        file_name,
        path,
        rows: lines.len(),
    })
}

fn required<T>(value: Option<T>, name: &str) -> ResysResult<T> {
    value.ok_or_else(|| ResysError::export(format!("query row has no '{}' binding", name)))
}

/// Lists who introduced smells of one kind, newest commits first.
pub struct RefactoringsByCommittersExporter {
    kind: SmellKind,
    output_dir: PathBuf,
    lines: Vec<Vec<String>>,
}

impl RefactoringsByCommittersExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::for_kind(output_dir, SmellKind::LongMethod)
    }

    pub fn for_kind(output_dir: impl Into<PathBuf>, kind: SmellKind) -> Self {
        Self {
            kind,
            output_dir: output_dir.into(),
            lines: Vec::new(),
        }
    }
}

impl ProcessingAdapter for RefactoringsByCommittersExporter {
    type Output = CsvReport;

    fn query(&self) -> IncidenceQuery {
        IncidenceQuery::SmellsByCommitter(self.kind)
    }

    fn process(&mut self, row: &QueryRow) -> ResysResult<()> {
        self.lines.push(vec![
            required(row.local_name("committer"), "committer")?.to_string(),
            required(row.local_name("codesmell"), "codesmell")?.to_string(),
            required(row.literal("datetime"), "datetime")?.as_str().to_string(),
            required(row.literal("location"), "location")?.as_str().to_string(),
        ]);
        Ok(())
    }

    fn conclude(self) -> ResysResult<CsvReport> {
        write_csv(
            &self.output_dir,
            "refactoringsbycommitter",
            "committer,smell,datetime,location",
            &self.lines,
        )
    }
}

/// Month (first day) -> refactoring -> count
type IncidenceTable = BTreeMap<NaiveDate, BTreeMap<String, usize>>;

/// Reads the `yyyy-MM` prefix of a datetime literal.
fn month_of(datetime: &str) -> ResysResult<NaiveDate> {
    let prefix = datetime.get(..7).unwrap_or(datetime);
    NaiveDate::parse_from_str(&format!("{}-01", prefix), "%Y-%m-%d")
        .map_err(|e| ResysError::export(format!("unreadable datetime '{}': {}", datetime, e)))
}

/// Counts refactoring recommendations per month.
pub struct IncidenceOfRefactoringsExporter {
    output_dir: PathBuf,
    incidence: IncidenceTable,
}

impl IncidenceOfRefactoringsExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            incidence: IncidenceTable::new(),
        }
    }

    fn count(&mut self, row: &QueryRow) -> ResysResult<()> {
        let datetime = required(row.literal("datetime"), "datetime")?;
        let refactoring = required(row.local_name("refactoring"), "refactoring")?;
        let month = month_of(datetime.as_str())?;

        *self
            .incidence
            .entry(month)
            .or_default()
            .entry(refactoring.to_string())
            .or_insert(0) += 1;
        Ok(())
    }

    fn write(self) -> ResysResult<CsvReport> {
        let lines: Vec<Vec<String>> = self
            .incidence
            .iter()
            .flat_map(|(month, counts)| {
                counts.iter().map(move |(refactoring, qt)| {
                    vec![
                        month.format("%Y-%m").to_string(),
                        refactoring.clone(),
                        qt.to_string(),
                    ]
                })
            })
            .collect();
        write_csv(&self.output_dir, "incidence", "date,refactoring,qt", &lines)
    }
}

impl ProcessingAdapter for IncidenceOfRefactoringsExporter {
    type Output = CsvReport;

    fn query(&self) -> IncidenceQuery {
        IncidenceQuery::IncidenceOfRefactorings
    }

    fn process(&mut self, row: &QueryRow) -> ResysResult<()> {
        self.count(row)
    }

    fn conclude(self) -> ResysResult<CsvReport> {
        self.write()
    }
}

/// Incidence of refactorings recommended under an effort context only.
pub struct EffortContextualizedIncidenceExporter {
    inner: IncidenceOfRefactoringsExporter,
}

impl EffortContextualizedIncidenceExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: IncidenceOfRefactoringsExporter::new(output_dir),
        }
    }
}

impl ProcessingAdapter for EffortContextualizedIncidenceExporter {
    type Output = CsvReport;

    fn query(&self) -> IncidenceQuery {
        IncidenceQuery::EffortContextualizedIncidence
    }

    fn process(&mut self, row: &QueryRow) -> ResysResult<()> {
        self.inner.count(row)
    }

    fn conclude(self) -> ResysResult<CsvReport> {
        self.inner.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::query::fixtures::{augmented, iri, repo};
    use crate::ontology::model::{Axiom, Literal};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_committers_csv() {
        let dir = TempDir::new().unwrap();
        let onto = augmented();
        let report = QueryConnector::new(&onto)
            .adapt(RefactoringsByCommittersExporter::new(dir.path()))
            .unwrap();

        assert!(report.file_name.starts_with("refactoringsbycommitter_"));
        assert_eq!(report.rows, 2);
        assert_eq!(
            fs::read_to_string(&report.path).unwrap(),
            "committer,smell,datetime,location\n\
             bob,s3,2017-02-05 14:30:00,src/C.java\n\
             alice,s1,2017-01-10 09:00:00,src/A.java"
        );
    }

    #[test]
    fn test_incidence_csv() {
        let dir = TempDir::new().unwrap();
        let onto = augmented();
        let report = QueryConnector::new(&onto)
            .adapt(IncidenceOfRefactoringsExporter::new(dir.path()))
            .unwrap();

        assert!(report.file_name.starts_with("incidence_"));
        assert_eq!(
            fs::read_to_string(&report.path).unwrap(),
            "date,refactoring,qt\n\
             2017-01,ExtractClass,1\n\
             2017-01,ExtractMethod,1\n\
             2017-01,MoveMethod,1\n\
             2017-02,ExtractMethod,1"
        );
    }

    #[test]
    fn test_effort_contextualized_csv() {
        let dir = TempDir::new().unwrap();
        let onto = augmented();
        let report = QueryConnector::new(&onto)
            .adapt(EffortContextualizedIncidenceExporter::new(dir.path()))
            .unwrap();
        assert_eq!(
            fs::read_to_string(&report.path).unwrap(),
            "date,refactoring,qt\n2017-02,ExtractMethod,1"
        );
    }

    #[test]
    fn test_same_month_counts_accumulate() {
        let dir = TempDir::new().unwrap();
        let mut onto = augmented();
        onto.add_axiom(Axiom::DataPropertyAssertion {
            property: repo("datetime"),
            subject: iri("c2"),
            value: Literal::plain("2017-01-20 08:00:00"),
        });
        let report = QueryConnector::new(&onto)
            .adapt(IncidenceOfRefactoringsExporter::new(dir.path()))
            .unwrap();
        let content = fs::read_to_string(&report.path).unwrap();
        assert!(content.contains("2017-01,ExtractMethod,2"));
    }

    #[test]
    fn test_unreadable_datetime_aborts() {
        let dir = TempDir::new().unwrap();
        let mut onto = augmented();
        onto.add_axiom(Axiom::DataPropertyAssertion {
            property: repo("datetime"),
            subject: iri("c1"),
            value: Literal::plain("yesterday"),
        });
        let err = QueryConnector::new(&onto)
            .adapt(IncidenceOfRefactoringsExporter::new(dir.path()))
            .unwrap_err();
        assert_eq!(err.kind(), "ExportError");
    }

    #[test]
    fn test_csv_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
