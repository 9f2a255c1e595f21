/*!
# Smell loader

Reads code smell instances out of an OCEAN ontology, either all of them or
only those introduced by commits listed in a correlation table.
*/

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{debug, info};

use crate::correlation::CorrelationTable;
use crate::ontology::vocabulary::terms;
use crate::ontology::{Iri, Ontology, StructuralReasoner};
use crate::smells::SmellKind;

/// Where a smell came from, as far as the ontology tells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub commit: Option<String>,
    pub timestamp: Option<String>,
    pub location: Option<String>,
}

/// A code smell individual of the OCEAN ontology
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmellInstance {
    pub iri: Iri,
    pub kind: SmellKind,
    pub provenance: Provenance,
}

pub type SmellsByKind = BTreeMap<SmellKind, Vec<SmellInstance>>;

/// Counts instances over all kinds
pub fn total_smells(smells: &SmellsByKind) -> usize {
    smells.values().map(Vec::len).sum()
}

pub struct SmellLoader<'a> {
    ontology: &'a Ontology,
    /// smell -> commit that introduced it
    introduced_by: HashMap<&'a Iri, &'a Iri>,
}

impl<'a> SmellLoader<'a> {
    pub fn new(ontology: &'a Ontology) -> Self {
        let mut introduced_by = HashMap::new();
        for (commit, smell) in ontology.object_links(terms::HAS_INTRODUCED) {
            introduced_by.entry(smell).or_insert(commit);
        }
        Self {
            ontology,
            introduced_by,
        }
    }

    /// Every instance of every class whose name is a known smell kind.
    pub fn load_all(&self) -> SmellsByKind {
        let reasoner = StructuralReasoner::new(self.ontology);
        let mut smells = SmellsByKind::new();

        for class in self.ontology.classes_in_signature() {
            let kind = SmellKind::from_onto_type(class.fragment());
            if !kind.is_known() {
                continue;
            }

            let instances = reasoner.instances(class, false);
            debug!("{} instances of {}", instances.len(), class);
            let commit_of = |smell: &Iri| self.introduced_by.get(smell).copied();
            smells.entry(kind).or_default().extend(instances.into_iter().map(|smell| {
                let commit = commit_of(&smell);
                self.instance(smell, kind, commit)
            }));
        }

        info!("Loaded {} smells of {} kinds", total_smells(&smells), smells.len());
        smells
    }

    /// Smells introduced by commits that appear in `table`.
    pub fn load_filtered(&self, table: &CorrelationTable) -> SmellsByKind {
        let reasoner = StructuralReasoner::new(self.ontology);
        let mut smells = SmellsByKind::new();

        let commit_classes = self
            .ontology
            .classes_in_signature()
            .filter(|class| class.has_fragment(terms::COMMIT));
        for class in commit_classes {
            for commit in reasoner.instances(class, false) {
                if !table.contains_commit(commit.fragment()) {
                    continue;
                }
                for smell in self.ontology.object_values(&commit, terms::HAS_INTRODUCED) {
                    for smell_type in self.ontology.types_of(smell) {
                        let kind = SmellKind::from_onto_type(smell_type.fragment());
                        if kind.is_known() {
                            smells
                                .entry(kind)
                                .or_default()
                                .push(self.instance(smell.clone(), kind, Some(&commit)));
                        }
                    }
                }
            }
        }

        info!(
            "Loaded {} smells introduced by correlated commits",
            total_smells(&smells)
        );
        smells
    }

    fn instance(&self, iri: Iri, kind: SmellKind, commit: Option<&Iri>) -> SmellInstance {
        let timestamp = commit
            .and_then(|commit| self.ontology.data_values(commit, terms::DATETIME).next())
            .map(|literal| literal.as_str().to_string());
        let location = self
            .ontology
            .data_values(&iri, terms::FOUND_IN)
            .next()
            .map(|literal| literal.as_str().to_string());

        SmellInstance {
            provenance: Provenance {
                commit: commit.map(|commit| commit.fragment().to_string()),
                timestamp,
                location,
            },
            iri,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::model::{Axiom, Literal};
    use crate::ontology::vocabulary::{ocean, smells};
    use pretty_assertions::assert_eq;

    fn iri(local: &str) -> Iri {
        Iri::new(format!("http://example.org/ocean#{}", local))
    }

    fn repo(local: &str) -> Iri {
        Iri::new(format!("http://www.semanticweb.org/resys/ontologies/2016/1/repositories#{}", local))
    }

    fn sample() -> Ontology {
        let mut onto = Ontology::new(Some(Iri::new("http://example.org/ocean")));
        onto.add_axioms([
            Axiom::SubClassOf { sub: smells("GodClass"), sup: smells("Codesmell") },
            Axiom::SubClassOf { sub: smells("LongMethod"), sup: smells("Codesmell") },
            Axiom::ClassAssertion { class: smells("GodClass"), individual: iri("s1") },
            Axiom::ClassAssertion { class: smells("LongMethod"), individual: iri("s2") },
            Axiom::ClassAssertion { class: smells("LongMethod"), individual: iri("s3") },
            Axiom::ClassAssertion { class: smells("GodClass"), individual: iri("s3") },
            Axiom::ClassAssertion { class: repo("Commit"), individual: iri("c1") },
            Axiom::ClassAssertion { class: repo("Commit"), individual: iri("c2") },
            Axiom::ObjectPropertyAssertion { property: ocean("hasIntroduced"), subject: iri("c1"), object: iri("s1") },
            Axiom::ObjectPropertyAssertion { property: ocean("hasIntroduced"), subject: iri("c2"), object: iri("s2") },
            Axiom::DataPropertyAssertion { property: repo("datetime"), subject: iri("c1"), value: Literal::plain("2017-03-01 10:00:00") },
            Axiom::DataPropertyAssertion { property: ocean("foundIn"), subject: iri("s1"), value: Literal::plain("src/A.java") },
        ]);
        onto
    }

    #[test]
    fn test_load_all() {
        let onto = sample();
        let smells = SmellLoader::new(&onto).load_all();

        let god: Vec<&Iri> = smells[&SmellKind::GodClass].iter().map(|s| &s.iri).collect();
        let long: Vec<&Iri> = smells[&SmellKind::LongMethod].iter().map(|s| &s.iri).collect();
        assert_eq!(god, vec![&iri("s1"), &iri("s3")]);
        assert_eq!(long, vec![&iri("s2"), &iri("s3")]);
        assert_eq!(total_smells(&smells), 4);

        let s1 = &smells[&SmellKind::GodClass][0];
        assert_eq!(
            s1.provenance,
            Provenance {
                commit: Some("c1".to_string()),
                timestamp: Some("2017-03-01 10:00:00".to_string()),
                location: Some("src/A.java".to_string()),
            }
        );
    }

    #[test]
    fn test_load_filtered_by_commit() {
        let onto = sample();
        let table = CorrelationTable::parse("h\n2017-03-01,0.9,c1\n").unwrap();
        let smells = SmellLoader::new(&onto).load_filtered(&table);

        assert_eq!(smells.len(), 1);
        assert_eq!(smells[&SmellKind::GodClass][0].iri, iri("s1"));
        assert_eq!(smells[&SmellKind::GodClass][0].provenance.commit.as_deref(), Some("c1"));
    }

    #[test]
    fn test_load_filtered_lists_multi_kind_smell_under_each_kind() {
        let mut onto = sample();
        onto.add_axiom(Axiom::ObjectPropertyAssertion {
            property: ocean("hasIntroduced"),
            subject: iri("c2"),
            object: iri("s3"),
        });
        let table = CorrelationTable::parse("h\n2017-03-02,0.8,c2\n").unwrap();
        let smells = SmellLoader::new(&onto).load_filtered(&table);

        let god: Vec<&Iri> = smells[&SmellKind::GodClass].iter().map(|s| &s.iri).collect();
        let long: Vec<&Iri> = smells[&SmellKind::LongMethod].iter().map(|s| &s.iri).collect();
        assert_eq!(god, vec![&iri("s3")]);
        assert_eq!(long, vec![&iri("s2"), &iri("s3")]);
        assert_eq!(total_smells(&smells), 3);
        assert!(smells
            .values()
            .flatten()
            .all(|smell| smell.provenance.commit.as_deref() == Some("c2")));
    }

    #[test]
    fn test_empty_table_loads_nothing() {
        let onto = sample();
        let smells = SmellLoader::new(&onto).load_filtered(&CorrelationTable::new());
        assert!(smells.is_empty());
    }
}
