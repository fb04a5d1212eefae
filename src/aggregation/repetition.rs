//! Explicit repetition of another element.

use crate::aggregation::AggregationElement;
use crate::cardinality::Cardinality;
use crate::grammar::Grammar;
use crate::node::NodeSequence;
use crate::path::SymbolPath;
use crate::reader::TokenReader;
use crate::recognition::Attempt;

const SEGMENT: &str = "[repetition]";

/// Repeats an element, which keeps its own cardinality, under an outer one.
///
/// `(a b?)+` is a repetition of a sequence whose `b` is optional; every occurrence of the
/// inner element counts as one repetition.
#[derive(Debug, Clone)]
pub struct Repetition {
    element: Box<AggregationElement>,
    cardinality: Cardinality,
}

impl Repetition {
    pub fn new(element: impl Into<AggregationElement>, cardinality: Cardinality) -> Self {
        Self {
            element: Box::new(element.into()),
            cardinality,
        }
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn element(&self) -> &AggregationElement {
        &self.element
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
            .repeat(reader, &path, |reader| self.element.recognize(reader, &path, grammar))
    }
}
