/*!
# RDF/XML storage format

Reading goes through triples: [`reader::parse_triples`] yields the raw graph,
[`build_ontology`] turns the triples it understands into axioms and keeps the
rest (annotations, OWL class expressions, blank nodes) as passthrough triples.
*/

pub mod reader;
pub mod writer;

use std::collections::HashSet;

use tracing::debug;

use crate::core::ResysResult;
use crate::ontology::iri::Iri;
use crate::ontology::model::{Axiom, EntityKind, Ontology};
use crate::ontology::vocabulary::{self, is_builtin};

pub use crate::ontology::model::{Node, Object, Triple};
pub use reader::parse_triples;
pub use writer::to_rdf_xml;

/// Parses an RDF/XML document held in memory.
pub fn parse_ontology(content: &str, location: &str, default_base: &str) -> ResysResult<Ontology> {
    let triples = parse_triples(content, location, default_base)?;
    let ontology = build_ontology(triples);
    debug!(
        "Parsed {}: {} axioms, {} passthrough triples, {} imports",
        location,
        ontology.axiom_count(),
        ontology.passthrough().len(),
        ontology.imports().len()
    );
    Ok(ontology)
}

/// Maps a triple graph onto the axiom model.
pub fn build_ontology(triples: Vec<Triple>) -> Ontology {
    let rdf_type = vocabulary::rdf("type");

    let annotation_properties: HashSet<Iri> = triples
        .iter()
        .filter_map(|triple| match (&triple.subject, &triple.object) {
            (Node::Iri(subject), Object::Node(Node::Iri(class)))
                if triple.predicate == rdf_type
                    && *class == vocabulary::owl("AnnotationProperty") =>
            {
                Some(subject.clone())
            }
            _ => None,
        })
        .collect();

    let mut ontology = Ontology::default();
    for triple in triples {
        if !absorb(&mut ontology, &triple, &annotation_properties) {
            ontology.add_passthrough(triple);
        }
    }
    ontology
}

/// Adds what `triple` states to the model; false when it has no axiom form.
fn absorb(ontology: &mut Ontology, triple: &Triple, annotation_properties: &HashSet<Iri>) -> bool {
    let Node::Iri(subject) = &triple.subject else {
        return false;
    };
    let predicate = &triple.predicate;

    if *predicate == vocabulary::rdf("type") {
        return match &triple.object {
            Object::Node(Node::Iri(class)) => add_typing(ontology, subject, class),
            _ => false,
        };
    }

    if *predicate == vocabulary::owl("imports") {
        if let Object::Node(Node::Iri(import)) = &triple.object {
            ontology.add_import(import.clone());
            return true;
        }
        return false;
    }

    let axiom = match &triple.object {
        Object::Node(Node::Iri(object))
            if *predicate == vocabulary::rdfs("subClassOf") && !is_builtin(object) =>
        {
            Axiom::SubClassOf {
                sub: subject.clone(),
                sup: object.clone(),
            }
        }
        Object::Node(Node::Iri(domain)) if *predicate == vocabulary::rdfs("domain") => {
            Axiom::PropertyDomain {
                property: subject.clone(),
                domain: domain.clone(),
            }
        }
        Object::Node(Node::Iri(range)) if *predicate == vocabulary::rdfs("range") => {
            Axiom::PropertyRange {
                property: subject.clone(),
                range: range.clone(),
            }
        }
        _ if is_builtin(predicate) || annotation_properties.contains(predicate) => return false,
        Object::Literal(value) => Axiom::DataPropertyAssertion {
            property: predicate.clone(),
            subject: subject.clone(),
            value: value.clone(),
        },
        Object::Node(Node::Iri(object)) => Axiom::ObjectPropertyAssertion {
            property: predicate.clone(),
            subject: subject.clone(),
            object: object.clone(),
        },
        Object::Node(Node::Blank(_)) => return false,
    };
    ontology.add_axiom(axiom);
    true
}

fn add_typing(ontology: &mut Ontology, subject: &Iri, class: &Iri) -> bool {
    if *class == vocabulary::owl("Ontology") {
        return match ontology.iri() {
            None => {
                ontology.set_iri(subject.clone());
                true
            }
            Some(iri) => iri == subject,
        };
    }

    let declaration = |kind| Axiom::Declaration {
        kind,
        iri: subject.clone(),
    };
    if *class == vocabulary::rdfs("Class") {
        // declared for lookups, the rdfs typing itself is written back as is
        ontology.add_axiom(declaration(EntityKind::Class));
        return false;
    }
    let axiom = if *class == vocabulary::owl("Class") {
        declaration(EntityKind::Class)
    } else if *class == vocabulary::owl("ObjectProperty") {
        declaration(EntityKind::ObjectProperty)
    } else if *class == vocabulary::owl("DatatypeProperty") {
        declaration(EntityKind::DataProperty)
    } else if *class == vocabulary::owl("AnnotationProperty") {
        declaration(EntityKind::AnnotationProperty)
    } else if *class == vocabulary::owl("NamedIndividual") {
        declaration(EntityKind::NamedIndividual)
    } else if is_builtin(class) {
        return false;
    } else {
        Axiom::ClassAssertion {
            class: class.clone(),
            individual: subject.clone(),
        }
    };
    ontology.add_axiom(axiom);
    true
}
