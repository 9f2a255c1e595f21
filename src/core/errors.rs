/*!
# Error System for RESYS

Typed failures of a recommendation run. Row-level problems (unknown smell tags,
missing template literals, malformed dataset lines) never reach this type:
they are skipped where they are found. Whole-input problems abort the run with
one of the variants below.
*/

use thiserror::Error;

/// Result of any library operation
pub type ResysResult<T> = Result<T, ResysError>;

/// Failures surfaced to callers of the recommendation engine
#[derive(Error, Debug)]
pub enum ResysError {
    /// The refactoring knowledge base (OSORE) could not be opened or parsed
    #[error("Failed to load refactoring catalog from {location}: {message}")]
    CatalogLoad { location: String, message: String },

    /// A retained line of the effort correlation dataset is malformed
    #[error("Failed to parse correlation dataset at line {line}: {message}")]
    DatasetParse { line: usize, message: String },

    /// The augmented ontology could not be written, serialized or packaged
    #[error("Failed to persist recommendations: {0}")]
    Persistence(String),

    /// Any knowledge base could not be opened, read or parsed
    #[error("Failed to access ontology {location}: {message}")]
    OntologyAccess { location: String, message: String },

    /// An incidence export could not read a row or write its CSV file
    #[error("Failed to export query results: {0}")]
    Export(String),
}

impl ResysError {
    pub fn ontology_access(location: impl Into<String>, message: impl ToString) -> Self {
        ResysError::OntologyAccess {
            location: location.into(),
            message: message.to_string(),
        }
    }

    pub fn persistence(message: impl ToString) -> Self {
        ResysError::Persistence(message.to_string())
    }

    pub fn export(message: impl ToString) -> Self {
        ResysError::Export(message.to_string())
    }

    /// Re-labels an ontology access failure as a catalog failure.
    pub fn into_catalog_error(self) -> Self {
        match self {
            ResysError::OntologyAccess { location, message } => {
                ResysError::CatalogLoad { location, message }
            }
            other => other,
        }
    }

    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ResysError::CatalogLoad { .. } => "CatalogLoadError",
            ResysError::DatasetParse { .. } => "DatasetParseError",
            ResysError::Persistence(_) => "PersistenceError",
            ResysError::OntologyAccess { .. } => "OntologyAccessError",
            ResysError::Export(_) => "ExportError",
        }
    }
}
