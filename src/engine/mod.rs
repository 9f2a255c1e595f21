/*!
# Recommendation engine

Joins loaded smells with the refactoring catalog. Every smell instance gets
the catalog list of its kind (possibly the shared empty list). Nothing is
ranked, filtered or deduplicated, and the ontology is not touched.
*/

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

use crate::catalog::{RefactoringCatalog, RefactoringList};
use crate::core::generate_uid;
use crate::smells::{SmellInstance, SmellsByKind};

/// Minimal correlation a filtered run was made with
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffortContext {
    pub min_correlation: f64,
    pub id: String,
    pub created_at: DateTime<Local>,
}

impl EffortContext {
    pub fn new(min_correlation: f64) -> Self {
        Self {
            min_correlation,
            id: generate_uid(),
            created_at: Local::now(),
        }
    }
}

/// One smell and the refactorings recommended for it
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub smell: SmellInstance,
    pub refactorings: RefactoringList,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RecommendationResult {
    recommendations: Vec<Recommendation>,
    effort: Option<EffortContext>,
}

impl RecommendationResult {
    pub fn len(&self) -> usize {
        self.recommendations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recommendation> {
        self.recommendations.iter()
    }

    /// First entry for a smell individual, whatever its kind
    pub fn get(&self, smell: &crate::ontology::Iri) -> Option<&Recommendation> {
        self.recommendations.iter().find(|r| &r.smell.iri == smell)
    }

    pub fn effort(&self) -> Option<&EffortContext> {
        self.effort.as_ref()
    }

    /// Total (smell, refactoring) pairs
    pub fn link_count(&self) -> usize {
        self.recommendations.iter().map(|r| r.refactorings.len()).sum()
    }
}

impl IntoIterator for RecommendationResult {
    type Item = Recommendation;
    type IntoIter = std::vec::IntoIter<Recommendation>;

    fn into_iter(self) -> Self::IntoIter {
        self.recommendations.into_iter()
    }
}

pub struct RecommendationEngine<'c> {
    catalog: &'c RefactoringCatalog,
}

impl<'c> RecommendationEngine<'c> {
    pub fn new(catalog: &'c RefactoringCatalog) -> Self {
        Self { catalog }
    }

    /// Kinds in enumeration order, instances in loader order.
    pub fn recommend(&self, smells: SmellsByKind) -> RecommendationResult {
        let mut recommendations = Vec::new();
        for (kind, instances) in smells {
            let refactorings = self.catalog.refactorings_for(kind);
            recommendations.extend(instances.into_iter().map(|smell| Recommendation {
                smell,
                refactorings: refactorings.clone(),
            }));
        }

        let result = RecommendationResult {
            recommendations,
            effort: None,
        };
        info!(
            "{} refactorings recommended for {} smells",
            result.link_count(),
            result.len()
        );
        result
    }

    /// Same join, tagged with an effort context for `min_correlation`.
    pub fn recommend_with_effort(&self, smells: SmellsByKind, min_correlation: f64) -> RecommendationResult {
        let mut result = self.recommend(smells);
        result.effort = Some(EffortContext::new(min_correlation));
        result
    }
}
