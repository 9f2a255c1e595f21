/*!
# Integration Tests for RESYS

End-to-end runs of the service over small OCEAN and OSORE documents written
to a temporary directory tree.
*/

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use resys::catalog::RefactoringCatalog;
use resys::config::ResysConfig;
use resys::ontology::vocabulary::OSORE_IRI;
use resys::ontology::rdfxml::{Node, Object, Triple};
use resys::ontology::{Iri, Literal, Ontology};
use resys::service::ResysService;
use resys::smells::SmellKind;

const OSORE: &str = r##"<?xml version="1.0"?>
<!DOCTYPE rdf:RDF [
    <!ENTITY osore "http://www.semanticweb.org/resys/ontologies/2017/4/osore#" >
]>
<rdf:RDF xmlns="http://www.semanticweb.org/resys/ontologies/2017/4/osore#"
     xml:base="http://www.semanticweb.org/resys/ontologies/2017/4/osore"
     xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
     xmlns:owl="http://www.w3.org/2002/07/owl#">
    <owl:Ontology rdf:about="http://www.semanticweb.org/resys/ontologies/2017/4/osore"/>
    <owl:Class rdf:about="&osore;Refactoring"/>
    <owl:NamedIndividual rdf:about="&osore;ExtractMethod">
        <rdf:type rdf:resource="&osore;Refactoring"/>
        <name>Extract Method</name>
        <applicableTo>LongMethod</applicableTo>
        <applicableTo>GodClass</applicableTo>
    </owl:NamedIndividual>
    <owl:NamedIndividual rdf:about="&osore;ExtractClass">
        <rdf:type rdf:resource="&osore;Refactoring"/>
        <name>Extract Class</name>
        <applicableTo>GodClass</applicableTo>
        <applicableTo>DataClass</applicableTo>
    </owl:NamedIndividual>
    <owl:NamedIndividual rdf:about="&osore;MoveMethod">
        <rdf:type rdf:resource="&osore;Refactoring"/>
        <name>Move Method</name>
        <applicableTo>FeatureEnvy</applicableTo>
    </owl:NamedIndividual>
</rdf:RDF>"##;

/// alice: c1 (2017-01-10) -> s1 LongMethod, s2 GodClass; c2 (2017-01-22) -> s3 DataClass
/// bob:   c3 (2017-02-05) -> s4 LongMethod, s5 SpaghettiCode, s6 BrainMethod
const OCEAN: &str = r##"<?xml version="1.0"?>
<!DOCTYPE rdf:RDF [
    <!ENTITY p "http://example.org/project#" >
    <!ENTITY repo "http://www.semanticweb.org/resys/ontologies/2016/1/repositories#" >
    <!ENTITY smells "http://www.semanticweb.org/resys/ontologies/2016/1/codesmells#" >
]>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
     xmlns:owl="http://www.w3.org/2002/07/owl#"
     xmlns:repo="http://www.semanticweb.org/resys/ontologies/2016/1/repositories#"
     xmlns:ocean="http://www.semanticweb.org/resys/ontologies/2016/2/ocean#"
     xmlns:smells="http://www.semanticweb.org/resys/ontologies/2016/1/codesmells#">
    <owl:Ontology rdf:about="http://example.org/project"/>
    <owl:Class rdf:about="&repo;Commit"/>
    <owl:Class rdf:about="&smells;LongMethod"/>
    <owl:Class rdf:about="&smells;GodClass"/>
    <owl:Class rdf:about="&smells;DataClass"/>
    <owl:Class rdf:about="&smells;BrainMethod"/>
    <owl:Class rdf:about="&smells;SpaghettiCode"/>

    <repo:Committer rdf:about="&p;alice">
        <repo:hasCommited rdf:resource="&p;c1"/>
        <repo:hasCommited rdf:resource="&p;c2"/>
    </repo:Committer>
    <repo:Committer rdf:about="&p;bob">
        <repo:hasCommited rdf:resource="&p;c3"/>
    </repo:Committer>

    <repo:Commit rdf:about="&p;c1">
        <repo:datetime>2017-01-10 09:00:00</repo:datetime>
        <ocean:hasIntroduced rdf:resource="&p;s1"/>
        <ocean:hasIntroduced rdf:resource="&p;s2"/>
    </repo:Commit>
    <repo:Commit rdf:about="&p;c2">
        <repo:datetime>2017-01-22 17:45:00</repo:datetime>
        <ocean:hasIntroduced rdf:resource="&p;s3"/>
    </repo:Commit>
    <repo:Commit rdf:about="&p;c3">
        <repo:datetime>2017-02-05 14:30:00</repo:datetime>
        <ocean:hasIntroduced rdf:resource="&p;s4"/>
        <ocean:hasIntroduced rdf:resource="&p;s5"/>
        <ocean:hasIntroduced rdf:resource="&p;s6"/>
    </repo:Commit>

    <smells:LongMethod rdf:about="&p;s1"><ocean:foundIn>src/A.java</ocean:foundIn></smells:LongMethod>
    <smells:GodClass rdf:about="&p;s2"><ocean:foundIn>src/B.java</ocean:foundIn></smells:GodClass>
    <smells:DataClass rdf:about="&p;s3"><ocean:foundIn>src/C.java</ocean:foundIn></smells:DataClass>
    <smells:LongMethod rdf:about="&p;s4"><ocean:foundIn>src/D.java</ocean:foundIn></smells:LongMethod>
    <smells:SpaghettiCode rdf:about="&p;s5"><ocean:foundIn>src/E.java</ocean:foundIn></smells:SpaghettiCode>
    <smells:BrainMethod rdf:about="&p;s6"><ocean:foundIn>src/F.java</ocean:foundIn></smells:BrainMethod>
</rdf:RDF>"##;

const DATASET: &str = "date,correlation,commits\n\
                       2017-01-10,0.91,c1|c2\n\
                       2017-02-05,0.40,c3\n\
                       broken line\n";

struct Workspace {
    _dir: TempDir,
    config: ResysConfig,
}

fn workspace() -> Workspace {
    let dir = TempDir::new().unwrap();
    let config = ResysConfig::with_base_dir(dir.path());
    for path in [
        &config.ontologies.input_path,
        &config.ontologies.output_path,
        &config.ontologies.osore_path,
        &config.datasets.input_path,
        &config.datasets.output_path,
    ] {
        fs::create_dir_all(path).unwrap();
    }

    fs::write(config.osore_file(), OSORE).unwrap();
    fs::write(config.ontologies.input_path.join("ocean_project.owl"), OCEAN).unwrap();
    fs::write(config.datasets.input_path.join("correlation.csv"), DATASET).unwrap();
    for companion in ["metrics.owl", "codesmells.owl", "repositories.owl"] {
        fs::write(config.ontologies.output_path.join(companion), "<rdf:RDF/>").unwrap();
    }

    Workspace { _dir: dir, config }
}

fn links(onto: &Ontology, property: &str) -> BTreeSet<(String, String)> {
    onto.object_links(property)
        .map(|(s, o)| (s.fragment().to_string(), o.fragment().to_string()))
        .collect()
}

fn pairs(items: &[(&str, &str)]) -> BTreeSet<(String, String)> {
    items
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

#[test]
fn test_recommend_end_to_end() {
    let ws = workspace();
    let service = ResysService::new(ws.config.clone()).unwrap();
    let input = ws.config.ontologies.input_path.join("ocean_project.owl");
    let before = fs::read(&input).unwrap();

    let outcome = service.recommend("ocean_project.owl").unwrap();

    assert!(outcome.onto.starts_with("ocean_") && outcome.onto.ends_with(".owl"));
    assert!(outcome.zip.starts_with("ocean_") && outcome.zip.ends_with(".zip"));
    assert_eq!(outcome.refactorings, 5);
    assert_eq!(fs::read(&input).unwrap(), before);

    let replica = Ontology::load(&ws.config.ontologies.output_path.join(&outcome.onto)).unwrap();
    assert_eq!(
        links(&replica, "refactoredBy"),
        pairs(&[
            ("s1", "ExtractMethod"),
            ("s2", "ExtractClass"),
            ("s2", "ExtractMethod"),
            ("s3", "ExtractClass"),
            ("s4", "ExtractMethod"),
        ])
    );

    let recommended: BTreeSet<String> = links(&replica, "hasRecommendedFor")
        .into_iter()
        .map(|(_, smell)| smell)
        .collect();
    assert_eq!(
        recommended,
        ["s1", "s2", "s3", "s4"].iter().map(|s| s.to_string()).collect()
    );
    assert!(replica.imports().contains(&Iri::new(OSORE_IRI)));
    assert!(links(&replica, "contextualizedBy").is_empty());

    let zip_path = ws.config.ontologies.output_path.join(&outcome.zip);
    let mut archive = zip::ZipArchive::new(File::open(zip_path).unwrap()).unwrap();
    let names: BTreeSet<String> = archive.file_names().map(str::to_string).collect();
    assert!(names.contains(&outcome.onto));
    assert!(names.contains("metrics.owl"));
    assert!(!names.contains("osore.owl"));
    assert!(archive.by_name(&outcome.onto).is_ok());

    let json = serde_json::to_value(&outcome).unwrap();
    let keys: BTreeSet<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["millis", "onto", "zip"].into_iter().collect());
}

#[test]
fn test_recommend_by_effort_correlation() {
    let ws = workspace();
    let service = ResysService::new(ws.config.clone()).unwrap();

    let outcome = service
        .recommend_by_effort_correlation("ocean_project.owl", "correlation.csv", 0.9)
        .unwrap();
    assert_eq!(outcome.refactorings, 4);

    let replica = Ontology::load(&ws.config.ontologies.output_path.join(&outcome.onto)).unwrap();
    assert_eq!(
        links(&replica, "refactoredBy"),
        pairs(&[
            ("s1", "ExtractMethod"),
            ("s2", "ExtractClass"),
            ("s2", "ExtractMethod"),
            ("s3", "ExtractClass"),
        ])
    );
    assert_eq!(links(&replica, "contextualizedBy").len(), 1);

    let effort = replica
        .object_links("contextualizedBy")
        .map(|(_, effort)| effort.clone())
        .next()
        .unwrap();
    let correlation: Vec<f64> = replica
        .data_values(&effort, "correlation")
        .filter_map(|literal| literal.as_f64())
        .collect();
    assert_eq!(correlation, vec![0.9]);
}

#[test]
fn test_effort_threshold_above_every_commit_recommends_nothing() {
    let ws = workspace();
    let service = ResysService::new(ws.config.clone()).unwrap();

    let outcome = service
        .recommend_by_effort_correlation("ocean_project.owl", "correlation.csv", 0.95)
        .unwrap();
    assert_eq!(outcome.refactorings, 0);

    let replica = Ontology::load(&ws.config.ontologies.output_path.join(&outcome.onto)).unwrap();
    assert!(links(&replica, "refactoredBy").is_empty());
    assert!(links(&replica, "hasRecommendedFor").is_empty());
}

#[test]
fn test_exports_after_recommendation() {
    let ws = workspace();
    let service = ResysService::new(ws.config.clone()).unwrap();
    let outcome = service.recommend("ocean_project.owl").unwrap();
    let csv_dir = &ws.config.datasets.output_path;

    let committers = service.export_refactorings_by_committers(&outcome.onto).unwrap();
    assert!(committers.csv.starts_with("refactoringsbycommitter_"));
    assert_eq!(
        fs::read_to_string(csv_dir.join(&committers.csv)).unwrap(),
        "committer,smell,datetime,location\n\
         bob,s4,2017-02-05 14:30:00,src/D.java\n\
         alice,s1,2017-01-10 09:00:00,src/A.java"
    );

    let incidence = service.export_incidence_of_refactorings(&outcome.onto).unwrap();
    assert!(incidence.csv.starts_with("incidence_"));
    assert_eq!(
        fs::read_to_string(csv_dir.join(&incidence.csv)).unwrap(),
        "date,refactoring,qt\n\
         2017-01,ExtractClass,2\n\
         2017-01,ExtractMethod,2\n\
         2017-02,ExtractMethod,1"
    );

    let contextualized = service
        .export_effort_contextualized_incidence(&outcome.onto)
        .unwrap();
    assert_eq!(
        fs::read_to_string(csv_dir.join(&contextualized.csv)).unwrap(),
        "date,refactoring,qt"
    );
}

#[test]
fn test_effort_contextualized_export() {
    let ws = workspace();
    let service = ResysService::new(ws.config.clone()).unwrap();
    let outcome = service
        .recommend_by_effort_correlation("ocean_project.owl", "correlation.csv", 0.9)
        .unwrap();

    let export = service
        .export_effort_contextualized_incidence(&outcome.onto)
        .unwrap();
    assert_eq!(
        fs::read_to_string(ws.config.datasets.output_path.join(&export.csv)).unwrap(),
        "date,refactoring,qt\n\
         2017-01,ExtractClass,2\n\
         2017-01,ExtractMethod,2"
    );
}

#[test]
fn test_missing_input_leaves_no_output() {
    let ws = workspace();
    let service = ResysService::new(ws.config.clone()).unwrap();
    let before: BTreeSet<_> = fs::read_dir(&ws.config.ontologies.output_path)
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();

    let err = service.recommend("missing.owl").unwrap_err();
    assert_eq!(err.kind(), "OntologyAccessError");

    let after: BTreeSet<_> = fs::read_dir(&ws.config.ontologies.output_path)
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_replica_keeps_unmodelled_content() {
    let ws = workspace();
    let annotations = r##"
    <owl:Class rdf:about="&smells;LongMethod" xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#">
        <rdfs:label>Long Method</rdfs:label>
        <rdfs:subClassOf>
            <owl:Restriction>
                <owl:onProperty rdf:resource="http://www.semanticweb.org/resys/ontologies/2016/2/ocean#foundIn"/>
                <owl:someValuesFrom rdf:resource="http://www.w3.org/2001/XMLSchema#string"/>
            </owl:Restriction>
        </rdfs:subClassOf>
    </owl:Class>
    <owl:ObjectProperty rdf:about="&repo;hasCommited">
        <owl:inverseOf rdf:resource="&repo;hasAuthor"/>
    </owl:ObjectProperty>
</rdf:RDF>"##;
    let annotated = OCEAN.replace("</rdf:RDF>", annotations);
    fs::write(ws.config.ontologies.input_path.join("ocean_annotated.owl"), annotated).unwrap();

    let service = ResysService::new(ws.config.clone()).unwrap();
    let outcome = service.recommend("ocean_annotated.owl").unwrap();
    assert_eq!(outcome.refactorings, 5);

    let replica = Ontology::load(&ws.config.ontologies.output_path.join(&outcome.onto)).unwrap();
    let kept = replica.passthrough();
    assert!(kept.contains(&Triple {
        subject: Node::Iri(Iri::new(
            "http://www.semanticweb.org/resys/ontologies/2016/1/codesmells#LongMethod"
        )),
        predicate: Iri::new("http://www.w3.org/2000/01/rdf-schema#label"),
        object: Object::Literal(Literal::plain("Long Method")),
    }));
    assert!(kept.contains(&Triple {
        subject: Node::Iri(Iri::new(
            "http://www.semanticweb.org/resys/ontologies/2016/1/repositories#hasCommited"
        )),
        predicate: Iri::new("http://www.w3.org/2002/07/owl#inverseOf"),
        object: Object::Node(Node::Iri(Iri::new(
            "http://www.semanticweb.org/resys/ontologies/2016/1/repositories#hasAuthor"
        ))),
    }));
    let restriction_parts: BTreeSet<&str> = kept
        .iter()
        .filter(|triple| matches!(triple.subject, Node::Blank(_)))
        .map(|triple| triple.predicate.fragment())
        .collect();
    assert_eq!(
        restriction_parts,
        ["onProperty", "someValuesFrom", "type"].into_iter().collect()
    );
}

#[test]
fn test_unparseable_input_leaves_no_replica() {
    let ws = workspace();
    fs::write(
        ws.config.ontologies.input_path.join("ocean_broken.owl"),
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"><rdf:Description>"#,
    )
    .unwrap();
    let service = ResysService::new(ws.config.clone()).unwrap();
    let before: BTreeSet<_> = fs::read_dir(&ws.config.ontologies.output_path)
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();

    let err = service.recommend("ocean_broken.owl").unwrap_err();
    assert_eq!(err.kind(), "OntologyAccessError");

    let after: BTreeSet<_> = fs::read_dir(&ws.config.ontologies.output_path)
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_missing_dataset_fails_before_replication() {
    let ws = workspace();
    let service = ResysService::new(ws.config.clone()).unwrap();

    let err = service
        .recommend_by_effort_correlation("ocean_project.owl", "absent.csv", 0.5)
        .unwrap_err();
    assert_eq!(err.kind(), "DatasetParseError");
    let replicas = fs::read_dir(&ws.config.ontologies.output_path)
        .unwrap()
        .filter(|entry| {
            entry
                .as_ref()
                .map(|e| e.file_name().to_string_lossy().starts_with("ocean_"))
                .unwrap_or(false)
        })
        .count();
    assert_eq!(replicas, 0);
}

#[test]
fn test_catalog_is_shared_and_idempotent() {
    let ws = workspace();
    let first = RefactoringCatalog::load(&ws.config.osore_file()).unwrap();
    let second = RefactoringCatalog::load(&ws.config.osore_file()).unwrap();
    assert_eq!(first.acronyms_by_smell(), second.acronyms_by_smell());
    assert_eq!(first.len(), 5);
    assert!(first.get(SmellKind::BrainMethod).is_none());

    let catalog = Arc::new(first);
    let service = ResysService::with_catalog(ws.config.clone(), Arc::clone(&catalog));
    assert!(Arc::ptr_eq(service.catalog(), &catalog));

    let a = service.recommend("ocean_project.owl").unwrap();
    let b = service.recommend("ocean_project.owl").unwrap();
    assert_ne!(a.onto, b.onto);
    assert_eq!(a.refactorings, b.refactorings);
}
