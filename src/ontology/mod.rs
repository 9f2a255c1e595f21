/*!
# Ontology store

Minimal OWL knowledge base for the OCEAN and OSORE ontologies: IRIs, an axiom
model with the lookups the engine needs, a structural reasoner, and RDF/XML
load and save.

```ignore
let mut ocean = Ontology::load(Path::new("ontos/ocean_a.owl"))?;
let smells = StructuralReasoner::new(&ocean).instances(&smells("Codesmell"), false);
ocean.save()?;
```
*/

pub mod iri;
pub mod model;
pub mod rdfxml;
pub mod reasoner;
pub mod vocabulary;

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::core::{read_text_file, ResysError, ResysResult};

pub use iri::Iri;
pub use model::{Axiom, EntityKind, Literal, Node, Object, Ontology, Triple};
pub use reasoner::StructuralReasoner;

impl Ontology {
    /// Loads an RDF/XML document. Imports are recorded but not followed.
    pub fn load(path: &Path) -> ResysResult<Ontology> {
        let location = path.display().to_string();
        let content = read_text_file(path).map_err(|e| ResysError::ontology_access(&location, e))?;

        let base = format!("file://{}", path.display());
        let mut ontology = rdfxml::parse_ontology(&content, &location, &base)?;
        ontology.set_document_path(path);

        info!(
            "Loaded ontology {} ({} axioms)",
            ontology.iri().map(Iri::as_str).unwrap_or(location.as_str()),
            ontology.axiom_count()
        );
        Ok(ontology)
    }

    /// Writes the ontology back to the document it was loaded from.
    pub fn save(&self) -> ResysResult<()> {
        let path = self
            .document_path()
            .ok_or_else(|| ResysError::persistence("ontology has no document location"))?
            .to_path_buf();
        self.save_as(&path)
    }

    /// Serializes the ontology as RDF/XML to `path`.
    pub fn save_as(&self, path: &Path) -> ResysResult<()> {
        let bytes = rdfxml::to_rdf_xml(self)?;
        fs::write(path, bytes).map_err(|e| {
            ResysError::persistence(format!("cannot write {}: {}", path.display(), e))
        })?;
        debug!("Saved ontology to {}", path.display());
        Ok(())
    }
}
