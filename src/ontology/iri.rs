//! IRI handle used for every ontology entity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Internationalized resource identifier of a class, property or individual.
///
/// Individuals are compared by IRI only, so an `Iri` doubles as the stable
/// handle of a smell instance or a refactoring individual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// `<namespace>#<local>`; a trailing `#` or `/` on the namespace is kept.
    pub fn in_namespace(namespace: &str, local: &str) -> Self {
        if namespace.ends_with('#') || namespace.ends_with('/') {
            Self(format!("{}{}", namespace, local))
        } else {
            Self(format!("{}#{}", namespace, local))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local part after `#`, or after the last `/` when there is no `#`.
    pub fn fragment(&self) -> &str {
        &self.0[self.split_point()..]
    }

    /// Everything up to and including the `#` (or last `/`).
    pub fn namespace(&self) -> &str {
        &self.0[..self.split_point()]
    }

    pub fn has_fragment(&self, fragment: &str) -> bool {
        self.fragment() == fragment
    }

    fn split_point(&self) -> usize {
        if let Some(pos) = self.0.rfind('#') {
            return pos + 1;
        }
        self.0.rfind('/').map(|pos| pos + 1).unwrap_or(0)
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Iri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Iri {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
