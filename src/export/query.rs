//! Fixed graph patterns over an augmented OCEAN ontology
//!
//! Each [`IncidenceQuery`] walks committer -> commit -> introduced smell and
//! yields one [`QueryRow`] per match, ordered by the commit datetime.

use std::collections::{BTreeMap, HashSet};

use crate::ontology::model::Literal;
use crate::ontology::vocabulary::{self, terms};
use crate::ontology::{Iri, Ontology};
use crate::smells::SmellKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IncidenceQuery {
    /// (committer, codesmell, datetime, location) for smells of one kind, newest first
    SmellsByCommitter(SmellKind),
    /// Adds `refactoring`, oldest first
    IncidenceOfRefactorings,
    /// As above, for smells recommended under an effort context only
    EffortContextualizedIncidence,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Resource(Iri),
    Literal(Literal),
}

/// Named bindings of one match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRow {
    bindings: BTreeMap<&'static str, Binding>,
}

impl QueryRow {
    pub fn bind(mut self, name: &'static str, value: Binding) -> Self {
        self.bindings.insert(name, value);
        self
    }

    pub fn resource(&self, name: &str) -> Option<&Iri> {
        match self.bindings.get(name) {
            Some(Binding::Resource(iri)) => Some(iri),
            _ => None,
        }
    }

    pub fn literal(&self, name: &str) -> Option<&Literal> {
        match self.bindings.get(name) {
            Some(Binding::Literal(literal)) => Some(literal),
            _ => None,
        }
    }

    /// Fragment of a bound resource
    pub fn local_name(&self, name: &str) -> Option<&str> {
        self.resource(name).map(Iri::fragment)
    }
}

impl IncidenceQuery {
    fn wants_refactorings(&self) -> bool {
        !matches!(self, IncidenceQuery::SmellsByCommitter(_))
    }

    pub fn evaluate(&self, ontology: &Ontology) -> Vec<QueryRow> {
        let contextualized = match self {
            IncidenceQuery::EffortContextualizedIncidence => Some(contextualized_smells(ontology)),
            _ => None,
        };
        let smell_class = match self {
            IncidenceQuery::SmellsByCommitter(kind) => Some(vocabulary::smells(kind.onto_type())),
            _ => None,
        };

        let mut rows = Vec::new();
        for (committer, commit) in ontology.object_links(terms::HAS_COMMITED) {
            for datetime in ontology.data_values(commit, terms::DATETIME) {
                for smell in ontology.object_values(commit, terms::HAS_INTRODUCED) {
                    if let Some(class) = &smell_class {
                        if !ontology.types_of(smell).contains(class) {
                            continue;
                        }
                    }
                    if let Some(allowed) = &contextualized {
                        if !allowed.contains(smell) {
                            continue;
                        }
                    }

                    for location in ontology.data_values(smell, terms::FOUND_IN) {
                        let row = QueryRow::default()
                            .bind("committer", Binding::Resource(committer.clone()))
                            .bind("codesmell", Binding::Resource(smell.clone()))
                            .bind("datetime", Binding::Literal(datetime.clone()))
                            .bind("location", Binding::Literal(location.clone()));

                        if !self.wants_refactorings() {
                            rows.push(row);
                            continue;
                        }
                        for refactoring in ontology.object_values(smell, terms::REFACTORED_BY) {
                            rows.push(
                                row.clone()
                                    .bind("refactoring", Binding::Resource(refactoring.clone())),
                            );
                        }
                    }
                }
            }
        }

        let datetime_of = |row: &QueryRow| {
            row.literal("datetime")
                .map(|literal| literal.as_str().to_string())
                .unwrap_or_default()
        };
        match self {
            IncidenceQuery::SmellsByCommitter(_) => {
                rows.sort_by_cached_key(|row| std::cmp::Reverse(datetime_of(row)))
            }
            _ => rows.sort_by_cached_key(datetime_of),
        }
        rows
    }
}

/// Smells some Recommendation with an effort context was made for
fn contextualized_smells(ontology: &Ontology) -> HashSet<&Iri> {
    let with_effort: HashSet<&Iri> = ontology
        .object_links(terms::CONTEXTUALIZED_BY)
        .map(|(recommendation, _)| recommendation)
        .collect();

    ontology
        .object_links(terms::HAS_RECOMMENDED_FOR)
        .filter(|(recommendation, _)| with_effort.contains(recommendation))
        .map(|(_, smell)| smell)
        .collect()
}
