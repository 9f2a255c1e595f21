//! Structural reasoner: instance retrieval over the asserted class hierarchy

use std::collections::{HashSet, VecDeque};

use super::iri::Iri;
use super::model::Ontology;

/// Answers "instances of class C" using asserted class membership and
/// asserted `rdfs:subClassOf` edges only. No other entailment is computed.
pub struct StructuralReasoner<'a> {
    ontology: &'a Ontology,
}

impl<'a> StructuralReasoner<'a> {
    pub fn new(ontology: &'a Ontology) -> Self {
        Self { ontology }
    }

    /// Instances of `class`. With `direct == false` instances of every
    /// (transitive) subclass are included. Each individual is returned once,
    /// in breadth-first class order.
    pub fn instances(&self, class: &Iri, direct: bool) -> Vec<Iri> {
        if direct {
            return self.ontology.asserted_instances(class).to_vec();
        }

        let mut result = Vec::new();
        let mut seen_individuals = HashSet::new();
        let mut seen_classes = HashSet::new();
        let mut queue = VecDeque::from([class.clone()]);

        while let Some(current) = queue.pop_front() {
            if !seen_classes.insert(current.clone()) {
                continue;
            }
            for individual in self.ontology.asserted_instances(&current) {
                if seen_individuals.insert(individual.clone()) {
                    result.push(individual.clone());
                }
            }
            for sub in self.ontology.direct_subclasses(&current) {
                queue.push_back(sub.clone());
            }
        }

        result
    }
}
