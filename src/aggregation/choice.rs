//! Ordered alternatives.

use tracing::trace;

use crate::aggregation::AggregationElement;
use crate::cardinality::Cardinality;
use crate::diagnostics::Result;
use crate::grammar::Grammar;
use crate::node::NodeSequence;
use crate::path::SymbolPath;
use crate::pulsar_err;
use crate::reader::TokenReader;
use crate::recognition::{Attempt, NodeRecognitionAccumulator, RecognitionResult};

const SEGMENT: &str = "[choice]";

/// The first alternative that matches, tried in declared order.
///
/// When every alternative fails, the failure reported is the most advanced one: the
/// alternative that recognized the most elements, then the one that got furthest into the
/// input. Earlier alternatives win ties. A partial recognition from any alternative ends the
/// choice on the spot.
#[derive(Debug, Clone)]
pub struct Choice {
    alternatives: Vec<AggregationElement>,
    cardinality: Cardinality,
}

impl Choice {
    pub fn new(alternatives: Vec<AggregationElement>) -> Result<Self> {
        if alternatives.is_empty() {
            return Err(pulsar_err!("a choice needs at least one alternative"));
        }
        Ok(Self {
            alternatives,
            cardinality: Cardinality::default(),
        })
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn alternatives(&self) -> &[AggregationElement] {
        &self.alternatives
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
        let take = |_: NodeSequence, nodes: NodeSequence| nodes;
        let (first, rest) = match self.alternatives.split_first() {
            Some(split) => split,
            None => return Err(pulsar_err!("a choice needs at least one alternative")),
        };

        let mut choice = NodeRecognitionAccumulator::of(NodeSequence::empty())
            .then_try(|_| first.recognize(reader, path, grammar), take)?;
        for alternative in rest {
            choice = choice.or_try(|_| alternative.recognize(reader, path, grammar), take)?;
        }

        let result = choice.into_result();
        if let RecognitionResult::Failed(failed) = &result {
            trace!(
                choice = %path,
                best = %failed.symbol(),
                element_count = failed.element_count(),
                "no alternative matched"
            );
        }
        Ok(result)
    }
}
