//! Ordered, all-or-nothing aggregation.

use tracing::trace;

use crate::aggregation::AggregationElement;
use crate::cardinality::Cardinality;
use crate::diagnostics::Result;
use crate::grammar::Grammar;
use crate::node::NodeSequence;
use crate::path::SymbolPath;
use crate::pulsar_err;
use crate::reader::TokenReader;
use crate::recognition::{Attempt, FailedRecognition, NodeRecognitionAccumulator, RecognitionResult};

const SEGMENT: &str = "[sequence]";

/// All elements, in declared order, each under its own cardinality.
///
/// A failure reports how many elements matched before the failing one; the reader goes back to
/// where the sequence started.
#[derive(Debug, Clone)]
pub struct Sequence {
    elements: Vec<AggregationElement>,
    cardinality: Cardinality,
}

#[derive(Debug, Default)]
struct SequenceProgress {
    nodes: NodeSequence,
    matched: usize,
}

impl SequenceProgress {
    fn record(mut self, nodes: NodeSequence) -> Self {
        self.nodes.append(nodes, true);
        self.matched += 1;
        self
    }
}

impl Sequence {
    pub fn new(elements: Vec<AggregationElement>) -> Result<Self> {
        if elements.is_empty() {
            return Err(pulsar_err!("a sequence needs at least one element"));
        }
        Ok(Self {
            elements,
            cardinality: Cardinality::default(),
        })
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn elements(&self) -> &[AggregationElement] {
        &self.elements
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
            .repeat(reader, &path, |reader| self.recognize_once(reader, &path, grammar))
    }

    fn recognize_once(
        &self,
        reader: &mut TokenReader,
        path: &SymbolPath,
        grammar: &dyn Grammar,
    ) -> Attempt<NodeSequence> {
        let start = reader.position();
        let mut progress = NodeRecognitionAccumulator::of(SequenceProgress::default());
        for element in &self.elements {
            progress = progress.then_try(
                |_| element.recognize(reader, path, grammar),
                SequenceProgress::record,
            )?;
        }

        let matched = progress.data().matched;
        Ok(match progress.into_result() {
            RecognitionResult::Success(progress) => RecognitionResult::Success(progress.nodes),
            RecognitionResult::Failed(failed) => {
                reader.restore(start);
                trace!(sequence = %path, matched, position = failed.position(), "sequence failed");
                RecognitionResult::Failed(
                    FailedRecognition::new(path.clone(), failed.position()).with_element_count(matched),
                )
            }
            RecognitionResult::Partial(partial) => RecognitionResult::Partial(partial),
        })
    }
}
