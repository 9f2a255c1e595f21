/*!
# Effort correlation table

Parses the correlation dataset produced by effort/commit analysis:

```text
date,correlation,commits
2017-03-01,0.91,c1|c2
2017-03-02,0.40,c3
```

The header line is discarded. Lines that do not split into exactly three
fields are skipped. A retained line with an unreadable date or value aborts
the parse. Each commit id in the `|`-separated column becomes its own entry
sharing the line's date and value. Columns are date, correlation, commits.
*/

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::core::{read_text_file, ResysError, ResysResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One (date, commit) cell of the table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationRecord {
    pub date: NaiveDate,
    pub commit: String,
    pub correlation: f64,
}

/// (date, commit) -> correlation, with a commit index for membership queries
#[derive(Debug, Clone, Default)]
pub struct CorrelationTable {
    records: Vec<CorrelationRecord>,
    positions: HashMap<(NaiveDate, String), usize>,
    commits: HashMap<String, Vec<usize>>,
}

impl CorrelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses a dataset file.
    pub fn load(path: &Path) -> ResysResult<CorrelationTable> {
        info!("Attempting to read correlation dataset at {}", path.display());
        let content = read_text_file(path).map_err(|e| ResysError::DatasetParse {
            line: 0,
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> ResysResult<CorrelationTable> {
        let mut table = CorrelationTable::new();
        let mut skipped = 0;

        for (index, line) in content.lines().enumerate().skip(1) {
            let line_number = index + 1;
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != 3 {
                skipped += 1;
                debug!("Skipping dataset line {}: {} fields", line_number, fields.len());
                continue;
            }

            let date = NaiveDate::parse_from_str(fields[0], DATE_FORMAT).map_err(|e| {
                ResysError::DatasetParse {
                    line: line_number,
                    message: format!("invalid date '{}': {}", fields[0], e),
                }
            })?;
            let correlation: f64 = fields[1].parse().map_err(|e| ResysError::DatasetParse {
                line: line_number,
                message: format!("invalid correlation '{}': {}", fields[1], e),
            })?;

            for commit in fields[2].split('|') {
                table.insert(date, commit.to_string(), correlation);
            }
        }

        info!(
            "Correlation table: {} entries, {} commits ({} lines skipped)",
            table.len(),
            table.commits.len(),
            skipped
        );
        Ok(table)
    }

    /// Inserts or replaces the value of a (date, commit) cell.
    pub fn insert(&mut self, date: NaiveDate, commit: String, correlation: f64) {
        let key = (date, commit);
        if let Some(&position) = self.positions.get(&key) {
            self.records[position].correlation = correlation;
            return;
        }

        let position = self.records.len();
        self.commits.entry(key.1.clone()).or_default().push(position);
        self.records.push(CorrelationRecord {
            date,
            commit: key.1.clone(),
            correlation,
        });
        self.positions.insert(key, position);
    }

    pub fn get(&self, date: NaiveDate, commit: &str) -> Option<f64> {
        self.positions
            .get(&(date, commit.to_string()))
            .map(|&position| self.records[position].correlation)
    }

    pub fn contains_commit(&self, commit: &str) -> bool {
        self.commits.contains_key(commit)
    }

    /// New table with the entries whose value is at least `min_correlation`
    pub fn at_least(&self, min_correlation: f64) -> CorrelationTable {
        let mut table = CorrelationTable::new();
        for record in self.records.iter().filter(|r| r.correlation >= min_correlation) {
            table.insert(record.date, record.commit.clone(), record.correlation);
        }
        debug!(
            "Correlation threshold {} keeps {} of {} entries",
            min_correlation,
            table.len(),
            self.len()
        );
        table
    }

    pub fn records(&self) -> &[CorrelationRecord] {
        &self.records
    }

    /// Distinct dates, ascending
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records
            .iter()
            .map(|r| r.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct commit ids, sorted
    pub fn commits(&self) -> Vec<&str> {
        let mut commits: Vec<&str> = self.commits.keys().map(String::as_str).collect();
        commits.sort_unstable();
        commits
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DATASET: &str = "date,correlation,commits\n\
                           2017-03-01,0.9,c1|c2\n\
                           2017-03-02,0.4,c3\n";

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_parse_splits_commits() {
        let table = CorrelationTable::parse(DATASET).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(date("2017-03-01"), "c1"), Some(0.9));
        assert_eq!(table.get(date("2017-03-01"), "c2"), Some(0.9));
        assert_eq!(table.commits(), vec!["c1", "c2", "c3"]);
        assert_eq!(table.dates(), vec![date("2017-03-01"), date("2017-03-02")]);
    }

    #[test]
    fn test_threshold_filter() {
        let table = CorrelationTable::parse(DATASET).unwrap().at_least(0.9);
        assert!(table.contains_commit("c1"));
        assert!(table.contains_commit("c2"));
        assert!(!table.contains_commit("c3"));
    }

    #[test]
    fn test_wrong_field_count_is_skipped() {
        let content = "header\n2017-03-01,c1\n2017-03-01,c1,0.5,extra\n2017-03-02,0.7,c2\n";
        let table = CorrelationTable::parse(content).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.contains_commit("c2"));
    }

    #[test]
    fn test_bad_value_aborts_with_line_number() {
        let content = "header\n2017-03-01,0.5,c1\n2017-03-02,high,c2\n";
        match CorrelationTable::parse(content) {
            Err(ResysError::DatasetParse { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_bad_date_aborts() {
        let content = "header\n03/01/2017,0.5,c1\n";
        assert!(matches!(
            CorrelationTable::parse(content),
            Err(ResysError::DatasetParse { line: 2, .. })
        ));
    }

    #[test]
    fn test_repeated_key_keeps_last_value() {
        let content = "header\n2017-03-01,0.2,c1\n2017-03-01,0.8,c1\n";
        let table = CorrelationTable::parse(content).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(date("2017-03-01"), "c1"), Some(0.8));
    }

    #[test]
    fn test_crlf_and_header_only() {
        let table = CorrelationTable::parse("date,correlation,commits\r\n2017-03-01,0.5,c1\r\n").unwrap();
        assert_eq!(table.get(date("2017-03-01"), "c1"), Some(0.5));
        assert!(CorrelationTable::parse("date,correlation,commits\n").unwrap().is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "\u{feff}{}", DATASET).unwrap();
        let table = CorrelationTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 3);
    }
}
