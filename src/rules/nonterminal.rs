//! Productions built from aggregation elements.
//!
//! A `NonTerminal` recognizes its element and wraps whatever nodes it produced in a
//! `Composite` node named after the production. It is also the boundary where a failure
//! changes meaning: once the element got at least `threshold` of its own elements in before
//! failing, the input is taken to be a malformed instance of this production rather than
//! something else entirely, and the failure is reported as a partial recognition. Elements
//! that matched zero times count toward the threshold, so the failure must also lie past the
//! start: a production that consumed nothing never reports a partial recognition.
//!
//! Element counts do not cross production boundaries. A failure leaving a `NonTerminal` always
//! carries a count of zero, so only the aggregation directly inside a production decides
//! whether that production was partially recognized.

use tracing::{debug, trace};

use crate::aggregation::AggregationElement;
use crate::grammar::{Grammar, Rule};
use crate::node::SymbolNode;
use crate::path::SymbolPath;
use crate::reader::TokenReader;
use crate::recognition::{Attempt, FailedRecognition, PartialRecognition, RecognitionResult};

/// Number of recognized elements from which a failing production reports a partial recognition.
pub const DEFAULT_RECOGNITION_THRESHOLD: usize = 2;

#[derive(Debug, Clone)]
pub struct NonTerminal {
    element: AggregationElement,
    threshold: Option<usize>,
}

impl NonTerminal {
    pub fn new(element: impl Into<AggregationElement>) -> Self {
        Self {
            element: element.into(),
            threshold: Some(DEFAULT_RECOGNITION_THRESHOLD),
        }
    }

    /// `None` never turns a failure into a partial recognition.
    pub fn with_threshold(mut self, threshold: Option<usize>) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn element(&self) -> &AggregationElement {
        &self.element
    }

    pub fn threshold(&self) -> Option<usize> {
        self.threshold
    }

    fn is_partial(&self, failed: &FailedRecognition, start: usize) -> bool {
        failed.position() > start
            && self
                .threshold
                .is_some_and(|threshold| failed.element_count() >= threshold)
    }
}

impl Rule for NonTerminal {
    fn try_recognize(
        &self,
        reader: &mut TokenReader,
        path: &SymbolPath,
        grammar: &dyn Grammar,
    ) -> Attempt<SymbolNode> {
        let start = reader.position();
        trace!(symbol = %path, position = start, element = %self.element, "recognizing");

        Ok(match self.element.recognize(reader, path, grammar)? {
            RecognitionResult::Success(nodes) => {
                RecognitionResult::Success(SymbolNode::composite(path.symbol(), nodes.into_nodes()))
            }
            RecognitionResult::Failed(failed) if self.is_partial(&failed, start) => {
                let position = failed.position();
                reader.restore(position);
                debug!(
                    symbol = %path,
                    start,
                    position,
                    element_count = failed.element_count(),
                    "partial recognition"
                );
                RecognitionResult::Partial(PartialRecognition::new(
                    path.clone(),
                    position,
                    position - start,
                ))
            }
            RecognitionResult::Failed(failed) => {
                RecognitionResult::Failed(FailedRecognition::new(path.clone(), failed.position()))
            }
            RecognitionResult::Partial(partial) => RecognitionResult::Partial(partial),
        })
    }
}
