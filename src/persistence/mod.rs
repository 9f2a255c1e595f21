/*!
# Persistence

Writing recommendations back into OCEAN ontologies, replicating uploaded
inputs and packaging the result with the ontologies it imports.
*/

pub mod archive;
pub mod writer;

pub use archive::{discard, package, replicate, COMPANION_ONTOLOGIES};
pub use writer::{save, RecommendationWriter, WriteSummary};
