/*!
# RESYS Refactoring Recommender v1.0

Recommends refactorings for code smells mined from software repositories.
Smells arrive as an OCEAN ontology (committers, commits, introduced smells),
refactoring techniques come from the OSORE ontology. The recommender joins
both by smell kind and writes the result back as ontology assertions.

## Pipeline

```text
ocean.owl ──replicate──> ocean_<uid>.owl ──load──> SmellLoader ──┐
                                                                  ├─> RecommendationEngine
osore.owl ──load once──> RefactoringCatalog (Arc) ───────────────┘          │
                                                                             v
correlation.csv ──> CorrelationTable (optional filter)       persistence::save + package
                                                                             │
                                                   ocean_<uid>.owl, ocean_<uid>.zip
```

## Modules

- [`ontology`] - OWL store, structural reasoner, RDF/XML reader and writer
- [`smells`] - smell kinds and the smell loader
- [`catalog`] - smell kind to refactorings mapping built from OSORE
- [`correlation`] - effort correlation dataset
- [`engine`] - the join of smells and refactorings
- [`persistence`] - writing recommendations, replication and zip packaging
- [`export`] - CSV incidence reports over augmented ontologies
- [`service`] - the facade used by the CLI
- [`config`] - directory configuration (TOML / YAML)

## Usage

```bash
resys catalog --config resys.toml
resys recommend ocean_project.owl --config resys.toml
resys recommend ocean_project.owl --dataset correlation.csv --min-correlation 0.9
resys export incidence ocean_1f0c....owl --format json
```

### Library
```ignore
use resys::{ResysConfig, ResysService};

let service = ResysService::new(ResysConfig::load("resys.toml")?)?;
let outcome = service.recommend("ocean_project.owl")?;
println!("{} -> {}", outcome.onto, outcome.zip);
```
*/

pub mod catalog;
pub mod cli_common;
pub mod config;
pub mod core;
pub mod correlation;
pub mod engine;
pub mod export;
pub mod ontology;
pub mod persistence;
pub mod service;
pub mod smells;

pub use catalog::{RefactoringCatalog, RefactoringDescriptor, RefactoringList};
pub use config::ResysConfig;
pub use core::{ResysError, ResysResult};
pub use correlation::CorrelationTable;
pub use engine::{RecommendationEngine, RecommendationResult};
pub use ontology::{Iri, Ontology};
pub use service::{ExportOutcome, RecommendationOutcome, ResysService};
pub use smells::{SmellInstance, SmellKind, SmellLoader, SmellsByKind};
