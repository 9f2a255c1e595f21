/*!
# Smell kinds

Closed set of code smells that refactorings can be recommended for. Ontology
type names are resolved through a static lookup table; anything unrecognised
maps to [`SmellKind::Unknown`].
*/

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SmellKind {
    LongMethod,
    BrainMethod,
    GodClass,
    DataClass,
    BrainClass,
    FeatureEnvy,
    RefuseParentBequest,
    Unknown,
}

/// Ontology type name -> kind
static BY_ONTO_TYPE: Lazy<HashMap<&'static str, SmellKind>> = Lazy::new(|| {
    SmellKind::KNOWN
        .iter()
        .map(|kind| (kind.onto_type(), *kind))
        .collect()
});

impl SmellKind {
    /// Every kind except `Unknown`, in declaration order
    pub const KNOWN: [SmellKind; 7] = [
        SmellKind::LongMethod,
        SmellKind::BrainMethod,
        SmellKind::GodClass,
        SmellKind::DataClass,
        SmellKind::BrainClass,
        SmellKind::FeatureEnvy,
        SmellKind::RefuseParentBequest,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SmellKind::LongMethod => "Long Method",
            SmellKind::BrainMethod => "Brain Method",
            SmellKind::GodClass => "God Class",
            SmellKind::DataClass => "Data Class",
            SmellKind::BrainClass => "Brain Class",
            SmellKind::FeatureEnvy => "Feature Envy",
            SmellKind::RefuseParentBequest => "Refuse Parent Bequest",
            SmellKind::Unknown => "Unknown",
        }
    }

    /// Canonical class name in the code smells ontology
    pub fn onto_type(&self) -> &'static str {
        match self {
            SmellKind::LongMethod => "LongMethod",
            SmellKind::BrainMethod => "BrainMethod",
            SmellKind::GodClass => "GodClass",
            SmellKind::DataClass => "DataClass",
            SmellKind::BrainClass => "BrainClass",
            SmellKind::FeatureEnvy => "FeatureEnvy",
            SmellKind::RefuseParentBequest => "RefuseParentBequest",
            SmellKind::Unknown => "Unknown",
        }
    }

    /// Exact, case-sensitive lookup; never fails.
    pub fn from_onto_type(onto_type: &str) -> SmellKind {
        BY_ONTO_TYPE
            .get(onto_type)
            .copied()
            .unwrap_or(SmellKind::Unknown)
    }

    pub fn is_known(&self) -> bool {
        *self != SmellKind::Unknown
    }

    /// Labels of the seven known kinds
    pub fn all_labels() -> Vec<&'static str> {
        Self::KNOWN.iter().map(SmellKind::label).collect()
    }
}

impl fmt::Display for SmellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_types() {
        for kind in SmellKind::KNOWN {
            assert_eq!(SmellKind::from_onto_type(kind.onto_type()), kind);
        }
    }

    #[test]
    fn test_lookup_is_exact() {
        assert_eq!(SmellKind::from_onto_type("longmethod"), SmellKind::Unknown);
        assert_eq!(SmellKind::from_onto_type("Long Method"), SmellKind::Unknown);
        assert_eq!(SmellKind::from_onto_type(""), SmellKind::Unknown);
        assert_eq!(SmellKind::from_onto_type("Unknown"), SmellKind::Unknown);
    }

    #[test]
    fn test_labels() {
        let labels = SmellKind::all_labels();
        assert_eq!(labels.len(), 7);
        assert_eq!(labels[0], "Long Method");
        assert!(!labels.contains(&"Unknown"));
        assert_eq!(SmellKind::RefuseParentBequest.to_string(), "Refuse Parent Bequest");
    }
}
