//! Writes a recommendation result into the target OCEAN ontology

use chrono::Local;
use tracing::{debug, info};

use crate::core::{generate_uid, ResysResult};
use crate::engine::{EffortContext, RecommendationResult};
use crate::ontology::model::{Axiom, EntityKind, Literal, Ontology};
use crate::ontology::vocabulary::{self, terms, OSORE_IRI};
use crate::ontology::Iri;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What one write added to the ontology
#[derive(Debug, Clone, PartialEq)]
pub struct WriteSummary {
    /// `refactoredBy` assertions, one per (smell, refactoring) pair
    pub refactoring_links: usize,
    /// `hasRecommendedFor` assertions
    pub recommended_for_links: usize,
    pub recommendation: Iri,
    pub effort: Option<Iri>,
}

/// Adds recommendation axioms to an ontology; does not save it.
pub struct RecommendationWriter<'o> {
    ontology: &'o mut Ontology,
}

impl<'o> RecommendationWriter<'o> {
    pub fn new(ontology: &'o mut Ontology) -> Self {
        Self { ontology }
    }

    pub fn apply(mut self, result: RecommendationResult) -> WriteSummary {
        self.ontology.add_import(Iri::new(OSORE_IRI));
        self.declare_properties();

        let recommendation = self.add_recommendation();
        let effort = result
            .effort()
            .map(|effort| self.add_effort_context(&recommendation, effort));

        let refactored_by = vocabulary::ocean(terms::REFACTORED_BY);
        let recommended_for = vocabulary::ocean(terms::HAS_RECOMMENDED_FOR);
        let mut refactoring_links = 0;
        let mut recommended_for_links = 0;

        for entry in result {
            if entry.refactorings.is_empty() {
                continue;
            }
            for descriptor in entry.refactorings.iter() {
                self.ontology.add_axiom(Axiom::ObjectPropertyAssertion {
                    property: refactored_by.clone(),
                    subject: entry.smell.iri.clone(),
                    object: descriptor.iri.clone(),
                });
                refactoring_links += 1;
            }
            if self.ontology.add_axiom(Axiom::ObjectPropertyAssertion {
                property: recommended_for.clone(),
                subject: recommendation.clone(),
                object: entry.smell.iri.clone(),
            }) {
                recommended_for_links += 1;
            }
        }

        debug!(
            "Recommendation {}: {} refactoredBy, {} hasRecommendedFor",
            recommendation, refactoring_links, recommended_for_links
        );
        WriteSummary {
            refactoring_links,
            recommended_for_links,
            recommendation,
            effort,
        }
    }

    fn declare_properties(&mut self) {
        let properties = [
            (
                vocabulary::ocean(terms::REFACTORED_BY),
                vocabulary::smells(terms::CODESMELL),
                vocabulary::osore(terms::REFACTORING),
            ),
            (
                vocabulary::ocean(terms::HAS_RECOMMENDED_FOR),
                vocabulary::osore(terms::RECOMMENDATION),
                vocabulary::smells(terms::CODESMELL),
            ),
        ];

        for (property, domain, range) in properties {
            self.ontology.add_axioms([
                Axiom::Declaration {
                    kind: EntityKind::ObjectProperty,
                    iri: property.clone(),
                },
                Axiom::PropertyDomain {
                    property: property.clone(),
                    domain,
                },
                Axiom::PropertyRange { property, range },
            ]);
        }
    }

    fn add_recommendation(&mut self) -> Iri {
        let recommendation = vocabulary::osore(&generate_uid());
        let datetime = Local::now().format(DATETIME_FORMAT).to_string();

        self.ontology.add_axioms([
            Axiom::Declaration {
                kind: EntityKind::NamedIndividual,
                iri: recommendation.clone(),
            },
            Axiom::ClassAssertion {
                class: vocabulary::osore(terms::RECOMMENDATION),
                individual: recommendation.clone(),
            },
            Axiom::DataPropertyAssertion {
                property: vocabulary::osore(terms::DATETIME),
                subject: recommendation.clone(),
                value: Literal::string(datetime),
            },
        ]);
        recommendation
    }

    fn add_effort_context(&mut self, recommendation: &Iri, effort: &EffortContext) -> Iri {
        let individual = vocabulary::osore(&effort.id);

        self.ontology.add_axioms([
            Axiom::Declaration {
                kind: EntityKind::NamedIndividual,
                iri: individual.clone(),
            },
            Axiom::ClassAssertion {
                class: vocabulary::osore(terms::EFFORT),
                individual: individual.clone(),
            },
            Axiom::DataPropertyAssertion {
                property: vocabulary::osore(terms::CORRELATION),
                subject: individual.clone(),
                value: Literal::double(effort.min_correlation),
            },
            Axiom::ObjectPropertyAssertion {
                property: vocabulary::osore(terms::CONTEXTUALIZED_BY),
                subject: recommendation.clone(),
                object: individual.clone(),
            },
        ]);
        individual
    }
}

/// Writes `result` into `ontology` and saves it to its document path.
///
/// Returns the number of `refactoredBy` links written.
pub fn save(result: RecommendationResult, ontology: &mut Ontology) -> ResysResult<usize> {
    let summary = RecommendationWriter::new(ontology).apply(result);
    ontology.save()?;
    info!("{} refactorings recommended!", summary.refactoring_links);
    Ok(summary.refactoring_links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RefactoringCatalog;
    use crate::engine::RecommendationEngine;
    use crate::smells::{Provenance, SmellInstance, SmellKind, SmellsByKind};

    fn catalog() -> RefactoringCatalog {
        let mut osore = Ontology::default();
        for name in ["ExtractClass", "MoveMethod"] {
            osore.add_axioms([
                Axiom::ClassAssertion {
                    class: vocabulary::osore("Refactoring"),
                    individual: vocabulary::osore(name),
                },
                Axiom::DataPropertyAssertion {
                    property: vocabulary::osore("applicableTo"),
                    subject: vocabulary::osore(name),
                    value: Literal::plain("GodClass"),
                },
            ]);
        }
        RefactoringCatalog::from_ontology(&osore)
    }

    fn smells(kind: SmellKind, names: &[&str]) -> SmellsByKind {
        let mut smells = SmellsByKind::new();
        smells.insert(
            kind,
            names
                .iter()
                .map(|name| SmellInstance {
                    iri: Iri::new(format!("http://example.org/ocean#{}", name)),
                    kind,
                    provenance: Provenance::default(),
                })
                .collect(),
        );
        smells
    }

    #[test]
    fn test_write_counts() {
        let catalog = catalog();
        let result = RecommendationEngine::new(&catalog)
            .recommend(smells(SmellKind::GodClass, &["s1", "s2", "s3"]));

        let mut onto = Ontology::new(Some(Iri::new("http://example.org/ocean")));
        let summary = RecommendationWriter::new(&mut onto).apply(result);

        assert_eq!(summary.refactoring_links, 6);
        assert_eq!(summary.recommended_for_links, 3);
        assert_eq!(onto.object_links(terms::REFACTORED_BY).count(), 6);
        assert_eq!(onto.object_links(terms::HAS_RECOMMENDED_FOR).count(), 3);
        assert_eq!(onto.imports(), &[Iri::new(OSORE_IRI)]);
        assert!(onto.is_declared(&vocabulary::ocean("refactoredBy"), EntityKind::ObjectProperty));
        assert_eq!(
            onto.types_of(&summary.recommendation),
            &[vocabulary::osore("Recommendation")]
        );
        assert!(summary.effort.is_none());
    }

    #[test]
    fn test_empty_lists_write_nothing_for_the_smell() {
        let catalog = catalog();
        let result = RecommendationEngine::new(&catalog)
            .recommend(smells(SmellKind::DataClass, &["d1"]));

        let mut onto = Ontology::default();
        let summary = RecommendationWriter::new(&mut onto).apply(result);
        assert_eq!(summary.refactoring_links, 0);
        assert_eq!(summary.recommended_for_links, 0);
        // рекомендация создаётся даже без связей
        assert_eq!(onto.data_values(&summary.recommendation, "datetime").count(), 1);
    }

    #[test]
    fn test_effort_context_is_written() {
        let catalog = catalog();
        let result = RecommendationEngine::new(&catalog)
            .recommend_with_effort(smells(SmellKind::GodClass, &["s1"]), 0.9);

        let mut onto = Ontology::default();
        let summary = RecommendationWriter::new(&mut onto).apply(result);
        let effort = summary.effort.unwrap();

        assert_eq!(onto.types_of(&effort), &[vocabulary::osore("Effort")]);
        let correlation: Vec<f64> = onto
            .data_values(&effort, "correlation")
            .filter_map(Literal::as_f64)
            .collect();
        assert_eq!(correlation, vec![0.9]);
        assert_eq!(
            onto.object_values(&summary.recommendation, "contextualizedBy").collect::<Vec<_>>(),
            vec![&effort]
        );
    }

    #[test]
    fn test_save_without_document_fails() {
        let catalog = catalog();
        let result = RecommendationEngine::new(&catalog)
            .recommend(smells(SmellKind::GodClass, &["s1"]));
        let err = save(result, &mut Ontology::default()).unwrap_err();
        assert_eq!(err.kind(), "PersistenceError");
    }
}
