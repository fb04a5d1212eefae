//! Order-independent aggregation.
//!
//! One occurrence of a `Set` is a *cycle*: the pool of elements not yet recognized is scanned
//! again and again, each remaining element being tried once per pass, until a pass recognizes
//! nothing new or the pool is empty. Recognized elements leave the pool and their nodes are
//! appended in the order they were found. The cycle succeeds when at least
//! `min_recognition_count` elements are satisfied, counting the recognized ones plus the
//! unrecognized ones that may occur zero times.

use tracing::{debug, trace};

use crate::aggregation::AggregationElement;
use crate::cardinality::Cardinality;
use crate::diagnostics::Result;
use crate::grammar::Grammar;
use crate::node::NodeSequence;
use crate::path::SymbolPath;
use crate::pulsar_err;
use crate::reader::TokenReader;
use crate::recognition::{Attempt, FailedRecognition, RecognitionResult};

const SEGMENT: &str = "[set]";

#[derive(Debug, Clone)]
pub struct Set {
    elements: Vec<AggregationElement>,
    min_recognition_count: usize,
    cardinality: Cardinality,
}

impl Set {
    /// A set in which every element must be satisfied.
    pub fn new(elements: Vec<AggregationElement>) -> Result<Self> {
        if elements.is_empty() {
            return Err(pulsar_err!("a set needs at least one element"));
        }
        Ok(Self {
            min_recognition_count: elements.len(),
            elements,
            cardinality: Cardinality::default(),
        })
    }

    /// How many elements one cycle must satisfy, between 1 and the number of elements.
    pub fn with_min_recognition_count(mut self, count: usize) -> Result<Self> {
        if count == 0 || count > self.elements.len() {
            return Err(pulsar_err!(
                "min recognition count {} is outside 1..={}",
                count,
                self.elements.len()
            ));
        }
        self.min_recognition_count = count;
        Ok(self)
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn elements(&self) -> &[AggregationElement] {
        &self.elements
    }

    pub fn min_recognition_count(&self) -> usize {
        self.min_recognition_count
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn recognize(
        &self,
        reader: &mut TokenReader,
        path: &SymbolPath,
        grammar: &dyn Grammar,
    ) -> Attempt<NodeSequence> {
        let path = path.child(SEGMENT);
        self.cardinality
            .repeat(reader, &path, |reader| self.recognize_cycle(reader, &path, grammar))
    }

    fn recognize_cycle(
        &self,
        reader: &mut TokenReader,
        path: &SymbolPath,
        grammar: &dyn Grammar,
    ) -> Attempt<NodeSequence> {
        let start = reader.position();
        let mut pool: Vec<&AggregationElement> = self.elements.iter().collect();
        let mut nodes = NodeSequence::empty();
        let mut recognized = 0;
        let mut best: Option<FailedRecognition> = None;

        loop {
            let mut progressed = false;
            let mut remaining = Vec::with_capacity(pool.len());
            for element in pool {
                let before = reader.position();
                match element.recognize(reader, path, grammar)? {
                    RecognitionResult::Success(found) if reader.position() > before => {
                        nodes.append(found, true);
                        recognized += 1;
                        progressed = true;
                    }
                    // zero occurrences; the element may still match after others
                    RecognitionResult::Success(_) => remaining.push(element),
                    RecognitionResult::Failed(failed) => {
                        best = Some(match best {
                            Some(held) => held.most_advanced(failed),
                            None => failed,
                        });
                        remaining.push(element);
                    }
                    RecognitionResult::Partial(partial) => {
                        return Ok(RecognitionResult::Partial(partial))
                    }
                }
            }
            pool = remaining;
            if !progressed || pool.is_empty() {
                break;
            }
        }

        let absent = pool
            .iter()
            .filter(|element| !element.cardinality().is_required())
            .count();
        let satisfied = recognized + absent;
        trace!(set = %path, recognized, satisfied, required = self.min_recognition_count, "set cycle");

        if satisfied >= self.min_recognition_count {
            return Ok(RecognitionResult::Success(nodes));
        }

        reader.restore(start);
        debug!(set = %path, recognized, "set cycle incomplete");
        let position = best.as_ref().map_or(start, FailedRecognition::position);
        Ok(RecognitionResult::Failed(
            FailedRecognition::new(path.clone(), position).with_element_count(recognized),
        ))
    }
}
