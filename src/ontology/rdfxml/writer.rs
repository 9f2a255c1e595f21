//! RDF/XML writer
//!
//! Serializes an [`Ontology`] as Protégé-style RDF/XML: header and ontology
//! element, then property frames, class frames and individual frames, then
//! one frame per subject of the passthrough triples.

use std::collections::{HashMap, HashSet};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::core::{ResysError, ResysResult};
use crate::ontology::iri::Iri;
use crate::ontology::model::{Axiom, EntityKind, Literal, Node, Object, Ontology, Triple};
use crate::ontology::vocabulary;
use crate::ontology::vocabulary::KNOWN_PREFIXES;

/// Prefix table of the document being written
#[derive(Debug, Default)]
struct Prefixes {
    bindings: Vec<(String, String)>,
    generated: usize,
}

impl Prefixes {
    fn with_known() -> Self {
        Self {
            bindings: KNOWN_PREFIXES
                .iter()
                .map(|(prefix, ns)| (prefix.to_string(), ns.to_string()))
                .collect(),
            generated: 0,
        }
    }

    fn register(&mut self, iri: &Iri) -> ResysResult<()> {
        let local = iri.fragment();
        if !is_ncname(local) {
            return Err(ResysError::persistence(format!(
                "cannot serialize property IRI {} as an XML element name",
                iri
            )));
        }
        let namespace = iri.namespace();
        if !self.bindings.iter().any(|(_, ns)| ns == namespace) {
            self.generated += 1;
            self.bindings
                .push((format!("ns{}", self.generated), namespace.to_string()));
        }
        Ok(())
    }

    /// Element name for a typed node, if the class IRI can be written as one.
    fn type_element(&self, class: &Iri) -> Option<String> {
        if !is_ncname(class.fragment()) {
            return None;
        }
        self.qname(class).ok()
    }

    fn qname(&self, iri: &Iri) -> ResysResult<String> {
        let namespace = iri.namespace();
        self.bindings
            .iter()
            .find(|(_, ns)| ns == namespace)
            .map(|(prefix, _)| format!("{}:{}", prefix, iri.fragment()))
            .ok_or_else(|| ResysError::persistence(format!("no prefix bound for {}", iri)))
    }
}

fn is_ncname(local: &str) -> bool {
    let mut chars = local.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> ResysResult<()> {
    writer.write_event(event).map_err(ResysError::persistence)
}

fn empty_with_resource(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    resource: &Iri,
) -> ResysResult<()> {
    let mut element = BytesStart::new(name);
    element.push_attribute(("rdf:resource", resource.as_str()));
    emit(writer, Event::Empty(element))
}

fn empty_with_node_id(writer: &mut Writer<Vec<u8>>, name: &str, node_id: &str) -> ResysResult<()> {
    let mut element = BytesStart::new(name);
    element.push_attribute(("rdf:nodeID", node_id));
    emit(writer, Event::Empty(element))
}

fn literal_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Literal) -> ResysResult<()> {
    let mut element = BytesStart::new(name);
    if let Some(datatype) = &value.datatype {
        element.push_attribute(("rdf:datatype", datatype.as_str()));
    }
    if value.lexical.is_empty() {
        return emit(writer, Event::Empty(element));
    }
    emit(writer, Event::Start(element))?;
    emit(writer, Event::Text(BytesText::new(&value.lexical)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

/// Serializes the ontology to an RDF/XML byte buffer.
pub fn to_rdf_xml(ontology: &Ontology) -> ResysResult<Vec<u8>> {
    let mut prefixes = Prefixes::with_known();
    for axiom in ontology.axioms() {
        match axiom {
            Axiom::DataPropertyAssertion { property, .. }
            | Axiom::ObjectPropertyAssertion { property, .. } => prefixes.register(property)?,
            _ => {}
        }
    }
    let rdf_type = vocabulary::rdf("type");
    for triple in ontology.passthrough() {
        prefixes.register(&triple.predicate)?;
        if let Object::Node(Node::Iri(class)) = &triple.object {
            if triple.predicate == rdf_type && is_ncname(class.fragment()) {
                prefixes.register(class)?;
            }
        }
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("rdf:RDF");
    let base = ontology.iri().map(|iri| iri.as_str().to_string());
    if let Some(base) = &base {
        root.push_attribute(("xmlns", format!("{}#", base).as_str()));
        root.push_attribute(("xml:base", base.as_str()));
    }
    for (prefix, namespace) in &prefixes.bindings {
        root.push_attribute((format!("xmlns:{}", prefix).as_str(), namespace.as_str()));
    }
    emit(&mut writer, Event::Start(root))?;

    write_header(&mut writer, ontology)?;
    write_properties(&mut writer, ontology)?;
    write_classes(&mut writer, ontology)?;
    write_individuals(&mut writer, ontology, &prefixes)?;
    write_passthrough(&mut writer, ontology, &prefixes)?;

    emit(&mut writer, Event::End(BytesEnd::new("rdf:RDF")))?;
    Ok(writer.into_inner())
}

fn write_header(writer: &mut Writer<Vec<u8>>, ontology: &Ontology) -> ResysResult<()> {
    let mut element = BytesStart::new("owl:Ontology");
    element.push_attribute(("rdf:about", ontology.iri().map(Iri::as_str).unwrap_or("")));

    if ontology.imports().is_empty() {
        return emit(writer, Event::Empty(element));
    }
    emit(writer, Event::Start(element))?;
    for import in ontology.imports() {
        empty_with_resource(writer, "owl:imports", import)?;
    }
    emit(writer, Event::End(BytesEnd::new("owl:Ontology")))
}

/// Writes `<name rdf:about=...>` with the given children, or an empty element.
fn write_frame(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    about: &Iri,
    children: &[(&str, &Iri)],
) -> ResysResult<()> {
    let mut element = BytesStart::new(name);
    element.push_attribute(("rdf:about", about.as_str()));
    if children.is_empty() {
        return emit(writer, Event::Empty(element));
    }
    emit(writer, Event::Start(element))?;
    for (child, resource) in children {
        empty_with_resource(writer, child, resource)?;
    }
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn write_properties(writer: &mut Writer<Vec<u8>>, ontology: &Ontology) -> ResysResult<()> {
    let mut properties: Vec<&Iri> = Vec::new();
    let mut seen = HashSet::new();
    for kind in [
        EntityKind::ObjectProperty,
        EntityKind::DataProperty,
        EntityKind::AnnotationProperty,
    ] {
        for iri in ontology.declared(kind) {
            if seen.insert(iri) {
                properties.push(iri);
            }
        }
    }
    for axiom in ontology.axioms() {
        if let Axiom::PropertyDomain { property, .. } | Axiom::PropertyRange { property, .. } = axiom {
            if seen.insert(property) {
                properties.push(property);
            }
        }
    }

    for property in properties {
        let name = if ontology.is_declared(property, EntityKind::ObjectProperty) {
            "owl:ObjectProperty"
        } else if ontology.is_declared(property, EntityKind::DataProperty) {
            "owl:DatatypeProperty"
        } else if ontology.is_declared(property, EntityKind::AnnotationProperty) {
            "owl:AnnotationProperty"
        } else {
            "rdf:Description"
        };

        let children: Vec<(&str, &Iri)> = ontology
            .axioms()
            .iter()
            .filter_map(|axiom| match axiom {
                Axiom::PropertyDomain { property: p, domain } if p == property => {
                    Some(("rdfs:domain", domain))
                }
                Axiom::PropertyRange { property: p, range } if p == property => {
                    Some(("rdfs:range", range))
                }
                _ => None,
            })
            .collect();

        write_frame(writer, name, property, &children)?;
    }
    Ok(())
}

fn write_classes(writer: &mut Writer<Vec<u8>>, ontology: &Ontology) -> ResysResult<()> {
    for class in ontology.classes_in_signature() {
        let declared = ontology.is_declared(class, EntityKind::Class);
        let supers: Vec<(&str, &Iri)> = ontology
            .axioms()
            .iter()
            .filter_map(|axiom| match axiom {
                Axiom::SubClassOf { sub, sup } if sub == class => Some(("rdfs:subClassOf", sup)),
                _ => None,
            })
            .collect();

        if !declared && supers.is_empty() {
            continue;
        }
        let name = if declared { "owl:Class" } else { "rdf:Description" };
        write_frame(writer, name, class, &supers)?;
    }
    Ok(())
}

fn write_individuals(
    writer: &mut Writer<Vec<u8>>,
    ontology: &Ontology,
    prefixes: &Prefixes,
) -> ResysResult<()> {
    for individual in ontology.individuals_in_signature() {
        let declared = ontology.is_declared(individual, EntityKind::NamedIndividual);
        let types = ontology.types_of(individual);
        let mut data = ontology.data_property_assertions(individual).peekable();
        let mut links = ontology.object_property_assertions(individual).peekable();

        if !declared && types.is_empty() && data.peek().is_none() && links.peek().is_none() {
            continue;
        }

        let name = if declared { "owl:NamedIndividual" } else { "rdf:Description" };
        let mut element = BytesStart::new(name);
        element.push_attribute(("rdf:about", individual.as_str()));
        emit(writer, Event::Start(element))?;

        for class in types {
            empty_with_resource(writer, "rdf:type", class)?;
        }
        for (property, value) in data {
            literal_element(writer, &prefixes.qname(property)?, value)?;
        }
        for (property, object) in links {
            empty_with_resource(writer, &prefixes.qname(property)?, object)?;
        }

        emit(writer, Event::End(BytesEnd::new(name)))?;
    }
    Ok(())
}

/// `rdf:nodeID` labels for the blank nodes of the document, in order of first mention
fn blank_labels(triples: &[Triple]) -> HashMap<&str, String> {
    let mut labels = HashMap::new();
    let blanks = triples.iter().flat_map(|triple| {
        let object = match &triple.object {
            Object::Node(node) => Some(node),
            Object::Literal(_) => None,
        };
        std::iter::once(&triple.subject).chain(object)
    });
    for node in blanks {
        if let Node::Blank(id) = node {
            let next = labels.len() + 1;
            labels.entry(id.as_str()).or_insert_with(|| format!("genid{}", next));
        }
    }
    labels
}

fn write_passthrough(
    writer: &mut Writer<Vec<u8>>,
    ontology: &Ontology,
    prefixes: &Prefixes,
) -> ResysResult<()> {
    let triples = ontology.passthrough();
    let labels = blank_labels(triples);
    let node_id = |id: &str| labels.get(id).cloned().unwrap_or_else(|| id.to_string());

    let mut subjects: Vec<&Node> = Vec::new();
    let mut frames: HashMap<&Node, Vec<&Triple>> = HashMap::new();
    for triple in triples {
        frames
            .entry(&triple.subject)
            .or_insert_with(|| {
                subjects.push(&triple.subject);
                Vec::new()
            })
            .push(triple);
    }

    let rdf_type = vocabulary::rdf("type");
    for subject in subjects {
        let statements = &frames[subject];
        let typed = statements.iter().enumerate().find_map(|(i, triple)| match &triple.object {
            Object::Node(Node::Iri(class)) if triple.predicate == rdf_type => {
                prefixes.type_element(class).map(|name| (i, name))
            }
            _ => None,
        });
        let (skip, name) = match typed {
            Some((i, name)) => (Some(i), name),
            None => (None, "rdf:Description".to_string()),
        };

        let mut element = BytesStart::new(name.as_str());
        match subject {
            Node::Iri(iri) => element.push_attribute(("rdf:about", iri.as_str())),
            Node::Blank(id) => {
                element.push_attribute(("rdf:nodeID", node_id(id.as_str()).as_str()))
            }
        }

        let children: Vec<&Triple> = statements
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .map(|(_, triple)| *triple)
            .collect();
        if children.is_empty() {
            emit(writer, Event::Empty(element))?;
            continue;
        }

        emit(writer, Event::Start(element))?;
        for triple in children {
            let property = prefixes.qname(&triple.predicate)?;
            match &triple.object {
                Object::Literal(value) => literal_element(writer, &property, value)?,
                Object::Node(Node::Iri(object)) => empty_with_resource(writer, &property, object)?,
                Object::Node(Node::Blank(id)) => {
                    empty_with_node_id(writer, &property, &node_id(id.as_str()))?
                }
            }
        }
        emit(writer, Event::End(BytesEnd::new(name.as_str())))?;
    }
    Ok(())
}
