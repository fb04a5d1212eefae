//! # The Recognition Algebra
//!
//! Every rule in the engine answers a recognition attempt with exactly one of three outcomes:
//!
//! - **`Success(T)`**: the rule matched and produced a value.
//! - **`Failed`**: nothing usable was found here. The reader is back where it was before the
//!   attempt, so the caller is free to try something else.
//! - **`Partial`**: the rule committed to a match and then broke off. The input is malformed, not
//!   merely different. The reader may have moved, and its position is part of the diagnosis.
//!
//! The outcome is a closed enum, so every consumer has to decide what to do with all three.
//!
//! Configuration problems (an unknown production, a bad cardinality) are *not* outcomes. They
//! travel on the outer `Result` of `Attempt<T>` and abort recognition entirely.

pub mod accumulator;

use serde::Serialize;

use crate::diagnostics::PulsarError;
use crate::path::SymbolPath;

pub use accumulator::NodeRecognitionAccumulator;

/// A recognition attempt: configuration errors outside, the recognition outcome inside.
pub type Attempt<T> = Result<RecognitionResult<T>, PulsarError>;

// ============================================================================
// FAILURE RECORDS
// ============================================================================

/// A recoverable no-match.
///
/// `position` is where recognition stopped making progress, which may lie past the position
/// where the attempt began (a sequence that matched two elements before failing reports the
/// position of the third). `element_count` is how many elements the failing aggregation did
/// recognize before giving up; it ranks failures against each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRecognition {
    symbol: SymbolPath,
    position: usize,
    element_count: usize,
}

impl FailedRecognition {
    pub fn new(symbol: SymbolPath, position: usize) -> Self {
        Self {
            symbol,
            position,
            element_count: 0,
        }
    }

    pub fn with_element_count(mut self, element_count: usize) -> Self {
        self.element_count = element_count;
        self
    }

    pub fn symbol(&self) -> &SymbolPath {
        &self.symbol
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Ranks by recognized elements first, then by how far into the input the failure lies.
    pub fn is_more_advanced_than(&self, other: &FailedRecognition) -> bool {
        (self.element_count, self.position) > (other.element_count, other.position)
    }

    /// Keeps the more advanced of two failures; ties keep `self`.
    pub fn most_advanced(self, other: FailedRecognition) -> FailedRecognition {
        if other.is_more_advanced_than(&self) {
            other
        } else {
            self
        }
    }
}

/// An unrecoverable, structural failure after committed progress.
///
/// `position` is where recognition broke off and `consumed` is how much input the rule had
/// committed to by then, so the malformed construct starts at `position - consumed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialRecognition {
    symbol: SymbolPath,
    position: usize,
    consumed: usize,
}

impl PartialRecognition {
    /// `consumed` is capped at `position`, so `start` never precedes the input.
    pub fn new(symbol: SymbolPath, position: usize, consumed: usize) -> Self {
        Self {
            symbol,
            position,
            consumed: consumed.min(position),
        }
    }

    pub fn symbol(&self) -> &SymbolPath {
        &self.symbol
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn start(&self) -> usize {
        self.position - self.consumed
    }
}

// ============================================================================
// RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionResult<T> {
    Success(T),
    Failed(FailedRecognition),
    Partial(PartialRecognition),
}

impl<T> RecognitionResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, RecognitionResult::Success(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RecognitionResult::Failed(_))
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, RecognitionResult::Partial(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            RecognitionResult::Success(value) => Some(value),
            RecognitionResult::Failed(_) | RecognitionResult::Partial(_) => None,
        }
    }

    pub fn as_success(&self) -> Option<&T> {
        match self {
            RecognitionResult::Success(value) => Some(value),
            RecognitionResult::Failed(_) | RecognitionResult::Partial(_) => None,
        }
    }

    pub fn failed(&self) -> Option<&FailedRecognition> {
        match self {
            RecognitionResult::Failed(failed) => Some(failed),
            RecognitionResult::Success(_) | RecognitionResult::Partial(_) => None,
        }
    }

    pub fn partial(&self) -> Option<&PartialRecognition> {
        match self {
            RecognitionResult::Partial(partial) => Some(partial),
            RecognitionResult::Success(_) | RecognitionResult::Failed(_) => None,
        }
    }

    /// Maps the success value, passing both failure kinds through untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RecognitionResult<U> {
        match self {
            RecognitionResult::Success(value) => RecognitionResult::Success(f(value)),
            RecognitionResult::Failed(failed) => RecognitionResult::Failed(failed),
            RecognitionResult::Partial(partial) => RecognitionResult::Partial(partial),
        }
    }
}
