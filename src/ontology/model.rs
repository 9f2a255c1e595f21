/*!
# Ontology model

In-memory knowledge base: an ordered set of axioms plus the indexes the
recommendation engine needs (signature, class membership, outgoing property
assertions of an individual, subclass edges). Document order of first mention
is preserved everywhere so that traversals are deterministic.

Triples with no axiom counterpart (annotations, OWL vocabulary, anything on a
blank node) are kept verbatim as passthrough triples and written back on save.
*/

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::iri::Iri;
use super::vocabulary;

/// Typed or plain literal value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Option<Iri>,
}

impl Literal {
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
        }
    }

    pub fn typed(lexical: impl Into<String>, datatype: Iri) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Some(datatype),
        }
    }

    pub fn string(lexical: impl Into<String>) -> Self {
        Self::typed(lexical, vocabulary::xsd("string"))
    }

    pub fn double(value: f64) -> Self {
        Self::typed(value.to_string(), vocabulary::xsd("double"))
    }

    pub fn as_str(&self) -> &str {
        &self.lexical
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.lexical.trim().parse().ok()
    }
}

/// Subject or object node of a triple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Iri(Iri),
    Blank(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Object {
    Node(Node),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Node,
    pub predicate: Iri,
    pub object: Object,
}

/// Kind of a declared entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Class,
    ObjectProperty,
    DataProperty,
    AnnotationProperty,
    NamedIndividual,
}

/// Logical axioms understood by the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axiom {
    Declaration { kind: EntityKind, iri: Iri },
    SubClassOf { sub: Iri, sup: Iri },
    ClassAssertion { class: Iri, individual: Iri },
    DataPropertyAssertion { property: Iri, subject: Iri, value: Literal },
    ObjectPropertyAssertion { property: Iri, subject: Iri, object: Iri },
    PropertyDomain { property: Iri, domain: Iri },
    PropertyRange { property: Iri, range: Iri },
}

/// Insertion-ordered set of IRIs
#[derive(Debug, Clone, Default)]
struct OrderedIris {
    items: Vec<Iri>,
    seen: HashSet<Iri>,
}

impl OrderedIris {
    fn insert(&mut self, iri: &Iri) -> bool {
        if self.seen.contains(iri) {
            return false;
        }
        self.seen.insert(iri.clone());
        self.items.push(iri.clone());
        true
    }

    fn contains(&self, iri: &Iri) -> bool {
        self.seen.contains(iri)
    }
}

/// A loaded (or freshly created) ontology document.
///
/// One `Ontology` value backs exactly one recommendation run; it is never
/// shared between concurrently running sessions.
#[derive(Debug, Clone, Default)]
pub struct Ontology {
    iri: Option<Iri>,
    document: Option<PathBuf>,
    imports: Vec<Iri>,
    axioms: Vec<Axiom>,
    axiom_set: HashSet<Axiom>,

    classes: OrderedIris,
    individuals: OrderedIris,
    declarations: HashMap<Iri, Vec<EntityKind>>,
    types: HashMap<Iri, Vec<Iri>>,
    members: HashMap<Iri, Vec<Iri>>,
    sub_classes: HashMap<Iri, Vec<Iri>>,
    data_assertions: HashMap<Iri, Vec<usize>>,
    object_assertions: HashMap<Iri, Vec<usize>>,

    passthrough: Vec<Triple>,
    passthrough_set: HashSet<Triple>,
}

impl Ontology {
    pub fn new(iri: Option<Iri>) -> Self {
        Self {
            iri,
            ..Self::default()
        }
    }

    pub fn iri(&self) -> Option<&Iri> {
        self.iri.as_ref()
    }

    pub fn set_iri(&mut self, iri: Iri) {
        self.iri = Some(iri);
    }

    /// Physical location the ontology was loaded from / will be saved to
    pub fn document_path(&self) -> Option<&Path> {
        self.document.as_deref()
    }

    pub fn set_document_path(&mut self, path: impl Into<PathBuf>) {
        self.document = Some(path.into());
    }

    pub fn imports(&self) -> &[Iri] {
        &self.imports
    }

    /// Declares an import dependency; returns false if it was already present.
    pub fn add_import(&mut self, iri: Iri) -> bool {
        if self.imports.contains(&iri) {
            return false;
        }
        self.imports.push(iri);
        true
    }

    pub fn axioms(&self) -> &[Axiom] {
        &self.axioms
    }

    pub fn axiom_count(&self) -> usize {
        self.axioms.len()
    }

    pub fn contains_axiom(&self, axiom: &Axiom) -> bool {
        self.axiom_set.contains(axiom)
    }

    /// Classes mentioned anywhere in the ontology, in order of first mention
    pub fn classes_in_signature(&self) -> impl Iterator<Item = &Iri> {
        self.classes.items.iter()
    }

    /// Individuals mentioned anywhere in the ontology, in order of first mention
    pub fn individuals_in_signature(&self) -> impl Iterator<Item = &Iri> {
        self.individuals.items.iter()
    }

    pub fn contains_class(&self, iri: &Iri) -> bool {
        self.classes.contains(iri)
    }

    pub fn contains_individual(&self, iri: &Iri) -> bool {
        self.individuals.contains(iri)
    }

    pub fn is_declared(&self, iri: &Iri, kind: EntityKind) -> bool {
        self.declarations
            .get(iri)
            .map(|kinds| kinds.contains(&kind))
            .unwrap_or(false)
    }

    /// Entities declared with the given kind, in declaration order
    pub fn declared(&self, kind: EntityKind) -> Vec<&Iri> {
        self.axioms
            .iter()
            .filter_map(|axiom| match axiom {
                Axiom::Declaration { kind: k, iri } if *k == kind => Some(iri),
                _ => None,
            })
            .collect()
    }

    /// Asserted types of an individual
    pub fn types_of(&self, individual: &Iri) -> &[Iri] {
        self.types.get(individual).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Individuals asserted to be members of `class` (no inference)
    pub fn asserted_instances(&self, class: &Iri) -> &[Iri] {
        self.members.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Direct asserted subclasses of `class`
    pub fn direct_subclasses(&self, class: &Iri) -> &[Iri] {
        self.sub_classes.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Outgoing data property assertions of an individual: `(property, value)`
    pub fn data_property_assertions<'a>(
        &'a self,
        individual: &Iri,
    ) -> impl Iterator<Item = (&'a Iri, &'a Literal)> + 'a {
        self.indexed(&self.data_assertions, individual)
            .filter_map(|axiom| match axiom {
                Axiom::DataPropertyAssertion { property, value, .. } => Some((property, value)),
                _ => None,
            })
    }

    /// Outgoing object property assertions of an individual: `(property, object)`
    pub fn object_property_assertions<'a>(
        &'a self,
        individual: &Iri,
    ) -> impl Iterator<Item = (&'a Iri, &'a Iri)> + 'a {
        self.indexed(&self.object_assertions, individual)
            .filter_map(|axiom| match axiom {
                Axiom::ObjectPropertyAssertion {
                    property, object, ..
                } => Some((property, object)),
                _ => None,
            })
    }

    /// Literal values of the data properties of `individual` whose IRI fragment is `fragment`
    pub fn data_values<'a>(
        &'a self,
        individual: &Iri,
        fragment: &'a str,
    ) -> impl Iterator<Item = &'a Literal> + 'a {
        self.data_property_assertions(individual)
            .filter(move |(property, _)| property.has_fragment(fragment))
            .map(|(_, value)| value)
    }

    /// Targets of the object properties of `individual` whose IRI fragment is `fragment`
    pub fn object_values<'a>(
        &'a self,
        individual: &Iri,
        fragment: &'a str,
    ) -> impl Iterator<Item = &'a Iri> + 'a {
        self.object_property_assertions(individual)
            .filter(move |(property, _)| property.has_fragment(fragment))
            .map(|(_, object)| object)
    }

    /// All object property assertions of a property (matched by fragment): `(subject, object)`
    pub fn object_links<'a>(&'a self, fragment: &'a str) -> impl Iterator<Item = (&'a Iri, &'a Iri)> + 'a {
        self.axioms.iter().filter_map(move |axiom| match axiom {
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } if property.has_fragment(fragment) => Some((subject, object)),
            _ => None,
        })
    }

    /// Adds an axiom and updates the indexes; returns false for duplicates.
    pub fn add_axiom(&mut self, axiom: Axiom) -> bool {
        if self.axiom_set.contains(&axiom) {
            return false;
        }

        let index = self.axioms.len();
        match &axiom {
            Axiom::Declaration { kind, iri } => {
                self.declarations.entry(iri.clone()).or_default().push(*kind);
                match kind {
                    EntityKind::Class => {
                        self.classes.insert(iri);
                    }
                    EntityKind::NamedIndividual => {
                        self.individuals.insert(iri);
                    }
                    _ => {}
                }
            }
            Axiom::SubClassOf { sub, sup } => {
                self.classes.insert(sub);
                self.classes.insert(sup);
                self.sub_classes.entry(sup.clone()).or_default().push(sub.clone());
            }
            Axiom::ClassAssertion { class, individual } => {
                self.classes.insert(class);
                self.individuals.insert(individual);
                self.types.entry(individual.clone()).or_default().push(class.clone());
                self.members.entry(class.clone()).or_default().push(individual.clone());
            }
            Axiom::DataPropertyAssertion { subject, .. } => {
                self.individuals.insert(subject);
                self.data_assertions.entry(subject.clone()).or_default().push(index);
            }
            Axiom::ObjectPropertyAssertion { subject, object, .. } => {
                self.individuals.insert(subject);
                self.individuals.insert(object);
                self.object_assertions.entry(subject.clone()).or_default().push(index);
            }
            Axiom::PropertyDomain { .. } | Axiom::PropertyRange { .. } => {}
        }

        self.axiom_set.insert(axiom.clone());
        self.axioms.push(axiom);
        true
    }

    /// Adds several axioms; returns how many were new.
    pub fn add_axioms(&mut self, axioms: impl IntoIterator<Item = Axiom>) -> usize {
        axioms
            .into_iter()
            .map(|axiom| self.add_axiom(axiom))
            .filter(|added| *added)
            .count()
    }

    /// Triples carried through unchanged, in document order
    pub fn passthrough(&self) -> &[Triple] {
        &self.passthrough
    }

    /// Keeps a triple the axiom model does not represent; returns false for duplicates.
    pub fn add_passthrough(&mut self, triple: Triple) -> bool {
        if !self.passthrough_set.insert(triple.clone()) {
            return false;
        }
        self.passthrough.push(triple);
        true
    }

    fn indexed<'a>(
        &'a self,
        index: &'a HashMap<Iri, Vec<usize>>,
        individual: &Iri,
    ) -> impl Iterator<Item = &'a Axiom> + 'a {
        index
            .get(individual)
            .into_iter()
            .flatten()
            .map(move |i| &self.axioms[*i])
    }
}
