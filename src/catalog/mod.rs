/*!
# Refactoring catalog

Builds the smell kind -> refactoring mapping from the OSORE ontology.

Every individual of a class named `Refactoring` becomes a
[`RefactoringDescriptor`]; its `applicableTo` values decide which smell kinds
it is listed under. The catalog is immutable once built and is shared between
runs behind an `Arc`.
*/

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::core::ResysResult;
use crate::ontology::vocabulary::terms;
use crate::ontology::{Iri, Ontology, StructuralReasoner};
use crate::smells::SmellKind;

/// Code sample before and after applying a refactoring
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Template {
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefactoringDescriptor {
    /// Local name of the OSORE individual, e.g. `ExtractMethod`
    pub acronym: String,
    pub name: String,
    pub description: String,
    pub template: Template,
    pub iri: Iri,
}

/// Shared, read-only list of descriptors
pub type RefactoringList = Arc<[Arc<RefactoringDescriptor>]>;

#[derive(Debug, Clone)]
pub struct RefactoringCatalog {
    by_smell: BTreeMap<SmellKind, RefactoringList>,
    empty: RefactoringList,
}

impl Default for RefactoringCatalog {
    fn default() -> Self {
        Self {
            by_smell: BTreeMap::new(),
            empty: Arc::from(Vec::new()),
        }
    }
}

impl RefactoringCatalog {
    /// Loads `osore.owl` (or any ontology with refactoring individuals).
    pub fn load(path: &Path) -> ResysResult<RefactoringCatalog> {
        info!("Attempting to read OSORE at: {}", path.display());
        let osore = Ontology::load(path).map_err(|e| e.into_catalog_error())?;
        Ok(Self::from_ontology(&osore))
    }

    pub fn from_ontology(osore: &Ontology) -> RefactoringCatalog {
        let reasoner = StructuralReasoner::new(osore);
        let mut by_smell: BTreeMap<SmellKind, Vec<Arc<RefactoringDescriptor>>> = BTreeMap::new();

        let refactoring_classes = osore
            .classes_in_signature()
            .filter(|class| class.has_fragment(terms::REFACTORING));
        for class in refactoring_classes {
            for individual in reasoner.instances(class, false) {
                let descriptor = Arc::new(describe(osore, &individual));
                for tag in osore.data_values(&individual, terms::APPLICABLE_TO) {
                    let kind = SmellKind::from_onto_type(tag.as_str());
                    if !kind.is_known() {
                        debug!(
                            "Dropping tag '{}' of refactoring {}: not a known smell",
                            tag.as_str(),
                            descriptor.acronym
                        );
                        continue;
                    }
                    by_smell.entry(kind).or_default().push(Arc::clone(&descriptor));
                }
            }
        }

        let catalog = Self {
            by_smell: by_smell
                .into_iter()
                .map(|(kind, list)| (kind, RefactoringList::from(list)))
                .collect(),
            ..Self::default()
        };
        catalog.log_summary();
        catalog
    }

    /// Refactorings applicable to `kind`, if any are known
    pub fn get(&self, kind: SmellKind) -> Option<&RefactoringList> {
        self.by_smell.get(&kind)
    }

    /// Like [`get`](Self::get), but an unknown kind yields the shared empty list.
    pub fn refactorings_for(&self, kind: SmellKind) -> RefactoringList {
        Arc::clone(self.by_smell.get(&kind).unwrap_or(&self.empty))
    }

    pub fn kinds(&self) -> impl Iterator<Item = SmellKind> + '_ {
        self.by_smell.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.by_smell.is_empty()
    }

    /// Number of (kind, refactoring) pairs
    pub fn len(&self) -> usize {
        self.by_smell.values().map(|list| list.len()).sum()
    }

    /// kind -> acronyms, for display
    pub fn acronyms_by_smell(&self) -> BTreeMap<SmellKind, Vec<String>> {
        self.by_smell
            .iter()
            .map(|(kind, list)| {
                (
                    *kind,
                    list.iter().map(|d| d.acronym.clone()).collect(),
                )
            })
            .collect()
    }

    pub fn log_summary(&self) {
        for (kind, acronyms) in self.acronyms_by_smell() {
            info!("{} --> [{}]", kind.label(), acronyms.join(", "));
        }
    }
}

fn first_literal(osore: &Ontology, individual: &Iri, fragment: &str) -> String {
    osore
        .data_values(individual, fragment)
        .next()
        .map(|literal| literal.as_str().to_string())
        .unwrap_or_default()
}

fn describe(osore: &Ontology, individual: &Iri) -> RefactoringDescriptor {
    let template = osore
        .object_values(individual, terms::HAS_TEMPLATE)
        .next()
        .map(|template| Template {
            before: first_literal(osore, template, terms::BEFORE),
            after: first_literal(osore, template, terms::AFTER),
        })
        .unwrap_or_default();

    RefactoringDescriptor {
        acronym: individual.fragment().to_string(),
        name: first_literal(osore, individual, terms::NAME),
        description: first_literal(osore, individual, terms::DESCRIPTION),
        template,
        iri: individual.clone(),
    }
}
