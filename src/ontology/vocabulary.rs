//! Namespaces and term names of the RESYS ontologies
//!
//! OCEAN is split over several ontologies (repositories, codesmells, metrics
//! and the mined `ocean` instance data); OSORE holds refactoring techniques.
//! Reading code matches terms by IRI fragment so that differently versioned
//! namespaces keep working; writing code always uses the full IRIs below.

use super::iri::Iri;

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

pub const ONTOS_IRI: &str = "http://www.semanticweb.org/resys/ontologies";
pub const REPOSITORIES_IRI: &str = "http://www.semanticweb.org/resys/ontologies/2016/1/repositories";
pub const SMELLS_IRI: &str = "http://www.semanticweb.org/resys/ontologies/2016/1/codesmells";
pub const METRICS_IRI: &str = "http://www.semanticweb.org/resys/ontologies/2016/1/metrics";
pub const OCEAN_IRI: &str = "http://www.semanticweb.org/resys/ontologies/2016/2/ocean";
pub const OSORE_IRI: &str = "http://www.semanticweb.org/resys/ontologies/2017/4/osore";

/// Preferred prefixes used when serializing
pub const KNOWN_PREFIXES: &[(&str, &str)] = &[
    ("rdf", RDF),
    ("rdfs", RDFS),
    ("owl", OWL),
    ("xsd", XSD),
    ("repo", "http://www.semanticweb.org/resys/ontologies/2016/1/repositories#"),
    ("smells", "http://www.semanticweb.org/resys/ontologies/2016/1/codesmells#"),
    ("metrics", "http://www.semanticweb.org/resys/ontologies/2016/1/metrics#"),
    ("ocean", "http://www.semanticweb.org/resys/ontologies/2016/2/ocean#"),
    ("osore", "http://www.semanticweb.org/resys/ontologies/2017/4/osore#"),
];

/// Fragment names of classes and properties the engine reads
pub mod terms {
    pub const REFACTORING: &str = "Refactoring";
    pub const COMMIT: &str = "Commit";
    pub const CODESMELL: &str = "Codesmell";
    pub const RECOMMENDATION: &str = "Recommendation";
    pub const EFFORT: &str = "Effort";

    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const HAS_TEMPLATE: &str = "hasTemplate";
    pub const BEFORE: &str = "before";
    pub const AFTER: &str = "after";
    pub const APPLICABLE_TO: &str = "applicableTo";

    pub const HAS_COMMITED: &str = "hasCommited";
    pub const HAS_INTRODUCED: &str = "hasIntroduced";
    pub const DATETIME: &str = "datetime";
    pub const FOUND_IN: &str = "foundIn";

    pub const REFACTORED_BY: &str = "refactoredBy";
    pub const HAS_RECOMMENDED_FOR: &str = "hasRecommendedFor";
    pub const CONTEXTUALIZED_BY: &str = "contextualizedBy";
    pub const CORRELATION: &str = "correlation";
}

pub fn rdf(local: &str) -> Iri {
    Iri::in_namespace(RDF, local)
}

pub fn rdfs(local: &str) -> Iri {
    Iri::in_namespace(RDFS, local)
}

pub fn owl(local: &str) -> Iri {
    Iri::in_namespace(OWL, local)
}

pub fn xsd(local: &str) -> Iri {
    Iri::in_namespace(XSD, local)
}

pub fn ocean(local: &str) -> Iri {
    Iri::in_namespace(OCEAN_IRI, local)
}

pub fn osore(local: &str) -> Iri {
    Iri::in_namespace(OSORE_IRI, local)
}

pub fn smells(local: &str) -> Iri {
    Iri::in_namespace(SMELLS_IRI, local)
}

/// True for IRIs of the RDF, RDFS, OWL and XSD built-in vocabularies
pub fn is_builtin(iri: &Iri) -> bool {
    let ns = iri.namespace();
    ns == RDF || ns == RDFS || ns == OWL || ns == XSD
}
