//! RDF/XML reader
//!
//! Streams the document with `quick_xml` and produces RDF triples. Supported:
//! namespace prefixes and default namespace, `xml:base`, DOCTYPE entity
//! declarations (as written by Protégé), typed node elements, `rdf:about`,
//! `rdf:ID`, `rdf:nodeID`, `rdf:resource`, `rdf:datatype`, property
//! attributes, nested node elements and `rdf:parseType="Resource"`.
//! `parseType="Literal"` and `"Collection"` subtrees are skipped.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::{Captures, Regex};

use crate::core::{ResysError, ResysResult};
use crate::ontology::iri::Iri;
use crate::ontology::model::{Literal, Node, Object, Triple};
use crate::ontology::vocabulary::{self, RDF, XML};

static ENTITY_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<!ENTITY\s+([A-Za-z_][\w.-]*)\s+["']([^"']*)["']\s*>"#)
        .expect("entity declaration pattern is valid")
});

static ENTITY_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&([A-Za-z_][\w.-]*);").expect("entity reference pattern is valid"));

/// Attribute names RDF/XML allows without the `rdf:` prefix
const BARE_RDF_ATTRIBUTES: &[&str] = &["about", "resource", "ID", "nodeID", "datatype", "parseType"];

#[derive(Debug, Clone, Default)]
struct Scope {
    prefixes: HashMap<String, String>,
    default_namespace: Option<String>,
    base: Option<String>,
}

#[derive(Debug)]
enum Frame {
    Root,
    Node {
        subject: Node,
    },
    Property {
        subject: Node,
        predicate: Iri,
        datatype: Option<Iri>,
        text: String,
        object: Option<Node>,
    },
    Skip,
}

/// What the element being opened is nested in
enum Parent {
    Document,
    Root,
    Node(Node),
    Property,
    Skip,
}

struct RdfXmlParser<'a> {
    location: &'a str,
    default_base: String,
    entities: HashMap<String, String>,
    scopes: Vec<Scope>,
    frames: Vec<Frame>,
    triples: Vec<Triple>,
    blank_counter: usize,
}

/// Parses an RDF/XML document into triples, in document order.
///
/// `location` is only used in error messages; `default_base` resolves
/// relative references when the document carries no `xml:base`.
pub fn parse_triples(content: &str, location: &str, default_base: &str) -> ResysResult<Vec<Triple>> {
    let mut reader = Reader::from_str(content);
    let mut parser = RdfXmlParser::new(location, default_base);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::DocType(e)) => {
                parser.declare_entities(&String::from_utf8_lossy(&e));
            }
            Ok(Event::Start(e)) => {
                parser.start_element(&e)?;
            }
            Ok(Event::Empty(e)) => {
                parser.start_element(&e)?;
                parser.end_element()?;
            }
            Ok(Event::End(_)) => {
                parser.end_element()?;
            }
            Ok(Event::Text(e)) => {
                let text = parser.decode(&String::from_utf8_lossy(&e))?;
                parser.text(&text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                parser.text(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ResysError::ontology_access(
                    location,
                    format!("XML error at position {}: {}", reader.buffer_position(), e),
                ));
            }
        }
        buf.clear();
    }

    if !parser.frames.is_empty() {
        return Err(ResysError::ontology_access(location, "unexpected end of document"));
    }

    Ok(parser.triples)
}

impl<'a> RdfXmlParser<'a> {
    fn new(location: &'a str, default_base: &str) -> Self {
        Self {
            location,
            default_base: default_base.to_string(),
            entities: HashMap::new(),
            scopes: Vec::new(),
            frames: Vec::new(),
            triples: Vec::new(),
            blank_counter: 0,
        }
    }

    fn declare_entities(&mut self, doctype: &str) {
        for caps in ENTITY_DECLARATION.captures_iter(doctype) {
            self.entities.insert(caps[1].to_string(), caps[2].to_string());
        }
    }

    /// Expands DOCTYPE entities, then the predefined XML escapes.
    fn decode(&self, raw: &str) -> ResysResult<String> {
        let expanded = if self.entities.is_empty() {
            std::borrow::Cow::Borrowed(raw)
        } else {
            ENTITY_REFERENCE.replace_all(raw, |caps: &Captures| {
                self.entities
                    .get(&caps[1])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
        };

        quick_xml::escape::unescape(&expanded)
            .map(|text| text.into_owned())
            .map_err(|e| ResysError::ontology_access(self.location, e))
    }

    fn read_attributes(&self, element: &BytesStart) -> ResysResult<Vec<(String, String)>> {
        let mut attributes = Vec::new();
        for attr in element.attributes() {
            let attr = attr.map_err(|e| ResysError::ontology_access(self.location, e))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = self.decode(&String::from_utf8_lossy(&attr.value))?;
            attributes.push((key, value));
        }
        Ok(attributes)
    }

    fn start_element(&mut self, element: &BytesStart) -> ResysResult<()> {
        let qname = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        let attributes = self.read_attributes(element)?;

        // Новая область видимости пространств имён
        let mut scope = self.scopes.last().cloned().unwrap_or_default();
        for (key, value) in &attributes {
            if key == "xmlns" {
                scope.default_namespace = Some(value.clone());
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                scope.prefixes.insert(prefix.to_string(), value.clone());
            } else if key == "xml:base" {
                let base = self.resolve_reference(value);
                scope.base = Some(base);
            }
        }
        self.scopes.push(scope);

        let element_iri = self.resolve_qname(&qname)?;

        let mut rdf_attributes = HashMap::new();
        let mut property_attributes = Vec::new();
        for (key, value) in attributes {
            if key == "xmlns" || key.starts_with("xmlns:") || key.starts_with("xml:") {
                continue;
            }
            if !key.contains(':') {
                if BARE_RDF_ATTRIBUTES.contains(&key.as_str()) {
                    rdf_attributes.insert(key, value);
                }
                continue;
            }
            let attribute_iri = self.resolve_qname(&key)?;
            if attribute_iri.namespace() == RDF {
                rdf_attributes.insert(attribute_iri.fragment().to_string(), value);
            } else {
                property_attributes.push((attribute_iri, value));
            }
        }

        let parent = match self.frames.last() {
            None => Parent::Document,
            Some(Frame::Root) => Parent::Root,
            Some(Frame::Node { subject }) => Parent::Node(subject.clone()),
            Some(Frame::Property { .. }) => Parent::Property,
            Some(Frame::Skip) => Parent::Skip,
        };

        let frame = match parent {
            Parent::Document if element_iri == vocabulary::rdf("RDF") => Frame::Root,
            Parent::Document | Parent::Root => {
                self.node_element(element_iri, &rdf_attributes, property_attributes)
            }
            Parent::Property => {
                let frame = self.node_element(element_iri, &rdf_attributes, property_attributes);
                if let Frame::Node { subject } = &frame {
                    let nested = subject.clone();
                    if let Some(Frame::Property { object, .. }) = self.frames.last_mut() {
                        object.get_or_insert(nested);
                    }
                }
                frame
            }
            Parent::Node(subject) => {
                self.property_element(subject, element_iri, &rdf_attributes, property_attributes)
            }
            Parent::Skip => Frame::Skip,
        };

        self.frames.push(frame);
        Ok(())
    }

    fn end_element(&mut self) -> ResysResult<()> {
        let frame = self
            .frames
            .pop()
            .ok_or_else(|| ResysError::ontology_access(self.location, "unbalanced end tag"))?;
        self.scopes.pop();

        if let Frame::Property {
            subject,
            predicate,
            datatype,
            text,
            object,
        } = frame
        {
            let object = match object {
                Some(node) => Object::Node(node),
                None => Object::Literal(Literal {
                    lexical: text,
                    datatype,
                }),
            };
            self.triples.push(Triple {
                subject,
                predicate,
                object,
            });
        }
        Ok(())
    }

    fn text(&mut self, content: &str) {
        if let Some(Frame::Property { text, .. }) = self.frames.last_mut() {
            text.push_str(content);
        }
    }

    fn node_element(
        &mut self,
        element: Iri,
        rdf_attributes: &HashMap<String, String>,
        property_attributes: Vec<(Iri, String)>,
    ) -> Frame {
        let subject = if let Some(about) = rdf_attributes.get("about") {
            Node::Iri(Iri::new(self.resolve_reference(about)))
        } else if let Some(id) = rdf_attributes.get("ID") {
            Node::Iri(Iri::new(self.resolve_reference(&format!("#{}", id))))
        } else if let Some(node_id) = rdf_attributes.get("nodeID") {
            Node::Blank(node_id.clone())
        } else {
            self.fresh_blank()
        };

        if element != vocabulary::rdf("Description") {
            self.push_link(subject.clone(), vocabulary::rdf("type"), Node::Iri(element));
        }
        if let Some(class) = rdf_attributes.get("type") {
            let class = Iri::new(self.resolve_reference(class));
            self.push_link(subject.clone(), vocabulary::rdf("type"), Node::Iri(class));
        }
        for (property, value) in property_attributes {
            self.push_literal(subject.clone(), property, Literal::plain(value));
        }

        Frame::Node { subject }
    }

    fn property_element(
        &mut self,
        subject: Node,
        predicate: Iri,
        rdf_attributes: &HashMap<String, String>,
        property_attributes: Vec<(Iri, String)>,
    ) -> Frame {
        match rdf_attributes.get("parseType").map(String::as_str) {
            Some("Resource") => {
                let blank = self.fresh_blank();
                self.push_link(subject, predicate, blank.clone());
                return Frame::Node { subject: blank };
            }
            Some(_) => return Frame::Skip,
            None => {}
        }

        let mut object = if let Some(resource) = rdf_attributes.get("resource") {
            Some(Node::Iri(Iri::new(self.resolve_reference(resource))))
        } else {
            rdf_attributes
                .get("nodeID")
                .map(|node_id| Node::Blank(node_id.clone()))
        };

        if !property_attributes.is_empty() {
            let target = object.get_or_insert_with(|| self.fresh_blank()).clone();
            for (property, value) in property_attributes {
                self.push_literal(target.clone(), property, Literal::plain(value));
            }
        }

        let datatype = rdf_attributes
            .get("datatype")
            .map(|datatype| Iri::new(self.resolve_reference(datatype)));

        Frame::Property {
            subject,
            predicate,
            datatype,
            text: String::new(),
            object,
        }
    }

    fn push_link(&mut self, subject: Node, predicate: Iri, object: Node) {
        self.triples.push(Triple {
            subject,
            predicate,
            object: Object::Node(object),
        });
    }

    fn push_literal(&mut self, subject: Node, predicate: Iri, literal: Literal) {
        self.triples.push(Triple {
            subject,
            predicate,
            object: Object::Literal(literal),
        });
    }

    /// Anonymous node label; `_:` keeps it apart from any `rdf:nodeID` in the document.
    fn fresh_blank(&mut self) -> Node {
        self.blank_counter += 1;
        Node::Blank(format!("_:{}", self.blank_counter))
    }

    fn resolve_qname(&self, qname: &str) -> ResysResult<Iri> {
        let scope = self.scopes.last();
        match qname.split_once(':') {
            Some(("xml", local)) => Ok(Iri::new(format!("{}#{}", XML, local))),
            Some((prefix, local)) => scope
                .and_then(|scope| scope.prefixes.get(prefix))
                .map(|namespace| Iri::new(format!("{}{}", namespace, local)))
                .ok_or_else(|| {
                    ResysError::ontology_access(
                        self.location,
                        format!("undeclared namespace prefix '{}'", prefix),
                    )
                }),
            None => scope
                .and_then(|scope| scope.default_namespace.as_ref())
                .map(|namespace| Iri::new(format!("{}{}", namespace, qname)))
                .ok_or_else(|| {
                    ResysError::ontology_access(
                        self.location,
                        format!("element '{}' has no namespace", qname),
                    )
                }),
        }
    }

    fn current_base(&self) -> &str {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.base.as_deref())
            .unwrap_or(&self.default_base)
    }

    /// Resolves an IRI reference against the current base.
    fn resolve_reference(&self, reference: &str) -> String {
        if is_absolute(reference) {
            return reference.to_string();
        }

        let base = self.current_base();
        let without_fragment = base.split('#').next().unwrap_or(base);
        if reference.is_empty() {
            without_fragment.to_string()
        } else if reference.starts_with('#') {
            format!("{}{}", without_fragment, reference)
        } else {
            let directory = without_fragment
                .rfind('/')
                .map(|pos| &without_fragment[..=pos])
                .unwrap_or(without_fragment);
            format!("{}{}", directory, reference)
        }
    }
}

fn is_absolute(reference: &str) -> bool {
    match reference.find(':') {
        Some(pos) if pos > 0 => !reference[..pos].contains(['/', '#', '?']),
        _ => false,
    }
}
