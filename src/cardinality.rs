//! # Cardinality
//!
//! Occurrence bounds for aggregation elements, and the repetition loop that enforces them.
//!
//! A `Cardinality` is a `min..=max` range of occurrences with an optional upper bound. Every
//! aggregation element carries one (the default is "exactly once") and every recognition of an
//! element goes through `Cardinality::repeat`, which drives the element through as many
//! attempts as the bounds allow.
//!
//! ## Repetition Semantics
//!
//! - Successes are collected while another occurrence is still allowed.
//! - A partial recognition of any occurrence is the repetition's own result, immediately.
//! - The first failed occurrence ends the loop. If the count so far is within bounds the
//!   collected nodes are the result; otherwise the reader is rewound and the repetition fails,
//!   reporting how many occurrences did match.
//! - An occurrence that succeeds without consuming input ends an unbounded loop.

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::diagnostics::{PulsarError, Result};
use crate::node::NodeSequence;
use crate::path::SymbolPath;
use crate::reader::TokenReader;
use crate::recognition::{Attempt, FailedRecognition, RecognitionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Cardinality {
    min_occurs: usize,
    max_occurs: Option<usize>,
}

impl Default for Cardinality {
    fn default() -> Self {
        Self::occurs_once()
    }
}

impl Cardinality {
    /// `min..=max`, or `min..` when `max` is `None`.
    pub fn new(min_occurs: usize, max_occurs: Option<usize>) -> Result<Self> {
        match max_occurs {
            Some(max) if max < min_occurs || max == 0 => Err(PulsarError::InvalidCardinality {
                min: min_occurs,
                max,
            }),
            _ => Ok(Self {
                min_occurs,
                max_occurs,
            }),
        }
    }

    /// Exactly one occurrence; the cardinality of an element that declares none.
    pub const fn occurs_once() -> Self {
        Self {
            min_occurs: 1,
            max_occurs: Some(1),
        }
    }

    pub const fn optional() -> Self {
        Self {
            min_occurs: 0,
            max_occurs: Some(1),
        }
    }

    /// Zero or more.
    pub const fn any() -> Self {
        Self {
            min_occurs: 0,
            max_occurs: None,
        }
    }

    pub const fn at_least(min_occurs: usize) -> Self {
        Self {
            min_occurs,
            max_occurs: None,
        }
    }

    /// The only cardinality allowed to be `0..=0`.
    pub const fn never() -> Self {
        Self {
            min_occurs: 0,
            max_occurs: Some(0),
        }
    }

    pub fn exactly(occurs: usize) -> Result<Self> {
        Self::new(occurs, Some(occurs))
    }

    pub fn between(min_occurs: usize, max_occurs: usize) -> Result<Self> {
        Self::new(min_occurs, Some(max_occurs))
    }

    pub fn min_occurs(&self) -> usize {
        self.min_occurs
    }

    pub fn max_occurs(&self) -> Option<usize> {
        self.max_occurs
    }

    pub fn is_optional(&self) -> bool {
        self.min_occurs == 0 && self.max_occurs == Some(1)
    }

    pub fn is_probable(&self) -> bool {
        self.min_occurs == 0 && self.max_occurs.is_none()
    }

    pub fn is_open(&self) -> bool {
        self.min_occurs > 0 && self.max_occurs.is_none()
    }

    pub fn is_closed(&self) -> bool {
        self.max_occurs.is_some()
    }

    pub fn is_default(&self) -> bool {
        *self == Self::occurs_once()
    }

    pub fn is_never(&self) -> bool {
        self.max_occurs == Some(0)
    }

    /// Whether the element must occur at all.
    pub fn is_required(&self) -> bool {
        self.min_occurs > 0
    }

    pub fn is_valid_count(&self, count: usize) -> bool {
        count >= self.min_occurs && self.max_occurs.map_or(true, |max| count <= max)
    }

    /// Whether one more occurrence after `count` would still be within bounds.
    pub fn can_repeat(&self, count: usize) -> bool {
        self.max_occurs.map_or(true, |max| count < max)
    }

    // ========================================================================
    // REPETITION
    // ========================================================================

    /// Drives `attempt` through as many occurrences as these bounds allow.
    ///
    /// `path` names the repeated element in the failure this produces when too few
    /// occurrences match. If not even one occurrence matched, the element's own failure is
    /// passed through as-is, since it already says more than a zero count would.
    pub fn repeat<F>(&self, reader: &mut TokenReader, path: &SymbolPath, mut attempt: F) -> Attempt<NodeSequence>
    where
        F: FnMut(&mut TokenReader) -> Attempt<NodeSequence>,
    {
        let start = reader.position();
        let required = self.is_required();
        let mut matched = NodeSequence::empty();
        let mut count = 0;

        let failure = loop {
            if !self.can_repeat(count) {
                break None;
            }
            let before = reader.position();
            match attempt(reader)? {
                RecognitionResult::Success(nodes) => {
                    count += 1;
                    matched.append(nodes, required);
                    // an empty occurrence repeats identically, so it also covers the minimum
                    if reader.position() == before {
                        count = count.max(self.min_occurs);
                        trace!(element = %path, count, "repetition stopped on empty occurrence");
                        break None;
                    }
                }
                RecognitionResult::Failed(failed) => break Some(failed),
                RecognitionResult::Partial(partial) => {
                    return Ok(RecognitionResult::Partial(partial))
                }
            }
        };

        if self.is_valid_count(count) {
            return Ok(RecognitionResult::Success(if count == 0 {
                NodeSequence::optional_empty()
            } else {
                matched
            }));
        }

        let stopped_at = reader.position();
        reader.restore(start);
        trace!(element = %path, count, min = self.min_occurs, "too few occurrences");
        Ok(RecognitionResult::Failed(match failure {
            Some(failed) if count == 0 => failed,
            Some(failed) => {
                FailedRecognition::new(path.clone(), failed.position()).with_element_count(count)
            }
            None => FailedRecognition::new(path.clone(), stopped_at).with_element_count(count),
        }))
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min_occurs, self.max_occurs) {
            (1, Some(1)) => Ok(()),
            (0, Some(1)) => f.write_str("?"),
            (0, None) => f.write_str("*"),
            (1, None) => f.write_str("+"),
            (min, None) => write!(f, "{{{min},}}"),
            (min, Some(max)) if min == max => write!(f, "{{{min}}}"),
            (min, Some(max)) => write!(f, "{{{min},{max}}}"),
        }
    }
}
