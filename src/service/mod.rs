/*!
# RESYS service

Facade over the recommendation pipeline. The refactoring catalog is loaded
once when the service is created and shared by every run; each call builds
its own [`RecommendationSession`] and owns its ontology.

```ignore
let service = ResysService::new(ResysConfig::load("resys.toml")?)?;
let outcome = service.recommend("ocean_project.owl")?;
println!("{}", serde_json::to_string(&outcome)?);
```
*/

pub mod session;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::catalog::RefactoringCatalog;
use crate::config::ResysConfig;
use crate::core::ResysResult;
use crate::correlation::CorrelationTable;
use crate::export::{
    CsvReport, EffortContextualizedIncidenceExporter, IncidenceOfRefactoringsExporter, ProcessingAdapter,
    QueryConnector, RefactoringsByCommittersExporter,
};
use crate::ontology::Ontology;
use crate::smells::SmellKind;

pub use session::{EffortFilter, RecommendationSession, SessionReport};

pub const VERSION: &str = "1.0";

/// Result of a recommendation run, as reported to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationOutcome {
    pub onto: String,
    pub zip: String,
    pub millis: u128,
    #[serde(skip)]
    pub refactorings: usize,
}

/// Result of an export run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportOutcome {
    pub csv: String,
    pub millis: u128,
}

pub struct ResysService {
    config: ResysConfig,
    catalog: Arc<RefactoringCatalog>,
}

impl ResysService {
    /// Loads the catalog from `osore.owl` in the configured OSORE directory.
    pub fn new(config: ResysConfig) -> ResysResult<Self> {
        let catalog = RefactoringCatalog::load(&config.osore_file())?;
        info!("Refactorings loaded: {} (smell, refactoring) pairs", catalog.len());
        Ok(Self::with_catalog(config, Arc::new(catalog)))
    }

    pub fn with_catalog(config: ResysConfig, catalog: Arc<RefactoringCatalog>) -> Self {
        Self { config, catalog }
    }

    pub fn version(&self) -> &'static str {
        VERSION
    }

    /// Labels of the smells refactorings can be recommended for
    pub fn smells(&self) -> Vec<&'static str> {
        SmellKind::all_labels()
    }

    pub fn catalog(&self) -> &Arc<RefactoringCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &ResysConfig {
        &self.config
    }

    /// Recommends refactorings for every smell of the uploaded ontology `ocean`.
    pub fn recommend(&self, ocean: &str) -> ResysResult<RecommendationOutcome> {
        let started = Instant::now();
        let report = self.session().run(ocean, None)?;
        Ok(Self::outcome(report, started))
    }

    /// Recommends only for smells introduced by commits whose effort
    /// correlation in `dataset` is at least `min_correlation`.
    pub fn recommend_by_effort_correlation(
        &self,
        ocean: &str,
        dataset: &str,
        min_correlation: f64,
    ) -> ResysResult<RecommendationOutcome> {
        let started = Instant::now();
        let table = CorrelationTable::load(&self.config.datasets.input_path.join(dataset))?;
        let filter = EffortFilter {
            table: &table,
            min_correlation,
        };
        let report = self.session().run(ocean, Some(filter))?;
        Ok(Self::outcome(report, started))
    }

    /// Long Method smells per committer
    pub fn export_refactorings_by_committers(&self, ocean: &str) -> ResysResult<ExportOutcome> {
        self.export(ocean, RefactoringsByCommittersExporter::new(self.csv_dir()))
    }

    pub fn export_refactorings_by_committers_of(
        &self,
        ocean: &str,
        kind: SmellKind,
    ) -> ResysResult<ExportOutcome> {
        self.export(ocean, RefactoringsByCommittersExporter::for_kind(self.csv_dir(), kind))
    }

    pub fn export_incidence_of_refactorings(&self, ocean: &str) -> ResysResult<ExportOutcome> {
        self.export(ocean, IncidenceOfRefactoringsExporter::new(self.csv_dir()))
    }

    pub fn export_effort_contextualized_incidence(&self, ocean: &str) -> ResysResult<ExportOutcome> {
        self.export(ocean, EffortContextualizedIncidenceExporter::new(self.csv_dir()))
    }

    fn session(&self) -> RecommendationSession<'_> {
        RecommendationSession::new(&self.catalog, &self.config.ontologies)
    }

    fn csv_dir(&self) -> PathBuf {
        self.config.datasets.output_path.clone()
    }

    /// Runs an exporter over an augmented ontology in the output directory.
    fn export<A>(&self, ocean: &str, adapter: A) -> ResysResult<ExportOutcome>
    where
        A: ProcessingAdapter<Output = CsvReport>,
    {
        let started = Instant::now();
        let ontology = Ontology::load(&self.config.ontologies.output_path.join(ocean))?;
        let report = QueryConnector::new(&ontology).adapt(adapter)?;

        Ok(ExportOutcome {
            csv: report.file_name,
            millis: started.elapsed().as_millis(),
        })
    }

    fn outcome(report: SessionReport, started: Instant) -> RecommendationOutcome {
        RecommendationOutcome {
            onto: report.onto,
            zip: report.zip,
            millis: started.elapsed().as_millis(),
            refactorings: report.refactorings,
        }
    }
}
