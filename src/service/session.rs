//! One recommendation run over one uploaded OCEAN ontology

use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::RefactoringCatalog;
use crate::config::OntologyPaths;
use crate::core::ResysResult;
use crate::correlation::CorrelationTable;
use crate::engine::RecommendationEngine;
use crate::ontology::Ontology;
use crate::persistence;
use crate::smells::SmellLoader;

/// Correlation gate of a filtered run
#[derive(Debug, Clone, Copy)]
pub struct EffortFilter<'t> {
    pub table: &'t CorrelationTable,
    pub min_correlation: f64,
}

/// Artifacts of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    /// File name of the augmented ontology in the output directory
    pub onto: String,
    /// File name of the zip package in the output directory
    pub zip: String,
    /// `refactoredBy` links written
    pub refactorings: usize,
}

/// Owns the ontology of a single run. Sessions share nothing but the catalog.
pub struct RecommendationSession<'c> {
    catalog: &'c RefactoringCatalog,
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl<'c> RecommendationSession<'c> {
    pub fn new(catalog: &'c RefactoringCatalog, paths: &OntologyPaths) -> Self {
        Self {
            catalog,
            input_dir: paths.input_path.clone(),
            output_dir: paths.output_path.clone(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Replicates `ocean`, recommends refactorings into the replica and
    /// packages it.
    ///
    /// The replica is mutated only after smells are loaded and joined. A
    /// replica that does not parse is removed again.
    pub fn run(self, ocean: &str, filter: Option<EffortFilter<'_>>) -> ResysResult<SessionReport> {
        let onto = persistence::replicate(&self.input_dir, &self.output_dir, ocean)?;
        let onto_path = self.output_dir.join(&onto);
        info!("Reading smells from: {}", onto_path.display());
        let mut ontology = match Ontology::load(&onto_path) {
            Ok(ontology) => ontology,
            Err(e) => {
                persistence::discard(&self.output_dir, &onto);
                return Err(e);
            }
        };

        let engine = RecommendationEngine::new(self.catalog);
        let result = {
            let loader = SmellLoader::new(&ontology);
            match filter {
                Some(filter) => {
                    let correlated = filter.table.at_least(filter.min_correlation);
                    engine.recommend_with_effort(
                        loader.load_filtered(&correlated),
                        filter.min_correlation,
                    )
                }
                None => engine.recommend(loader.load_all()),
            }
        };

        let refactorings = persistence::save(result, &mut ontology)?;
        let zip = persistence::package(&self.output_dir, &onto)?;

        Ok(SessionReport {
            onto,
            zip,
            refactorings,
        })
    }
}
