/*!
# Code smells

Smell kinds and the loader that reads smell instances from an OCEAN ontology.
*/

pub mod kind;
pub mod loader;

pub use kind::SmellKind;
pub use loader::{total_smells, Provenance, SmellInstance, SmellLoader, SmellsByKind};
