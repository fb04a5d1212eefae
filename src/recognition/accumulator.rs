//! Chaining of mandatory and alternative recognition steps.
//!
//! `NodeRecognitionAccumulator` threads a piece of data through a chain of recognition attempts
//! while keeping track of which kind of step may run next:
//!
//! - **required mode**: `then_try` steps run. A success folds its value into the data; a failure
//!   switches the chain to alternatives mode; a partial recognition halts the chain.
//! - **alternatives mode**: `or_try` steps run. A success folds in and switches back to required
//!   mode; a failure is ranked against the failure already held; a partial halts.
//! - **halted**: nothing runs any more.
//!
//! Each call consumes the accumulator and returns the next one, so a chain reads top to bottom:
//!
//! ```ignore
//! let result = NodeRecognitionAccumulator::of(nodes)
//!     .then_try(|_| keyword.recognize(reader, &path, grammar), append)?
//!     .then_try(|_| body.recognize(reader, &path, grammar), append)?
//!     .into_result();
//! ```

use crate::diagnostics::Result;
use crate::recognition::{Attempt, FailedRecognition, PartialRecognition, RecognitionResult};

#[derive(Debug, Clone, PartialEq)]
enum State {
    Required,
    Alternatives(FailedRecognition),
    Halted(PartialRecognition),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecognitionAccumulator<T> {
    data: T,
    state: State,
}

impl<T> NodeRecognitionAccumulator<T> {
    /// Starts a chain in required mode.
    pub fn of(data: T) -> Self {
        Self {
            data,
            state: State::Required,
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn can_try_required(&self) -> bool {
        matches!(self.state, State::Required)
    }

    pub fn can_try_alternatives(&self) -> bool {
        matches!(self.state, State::Alternatives(_))
    }

    /// Runs a mandatory step.
    pub fn then_try<U>(
        self,
        op: impl FnOnce(&T) -> Attempt<U>,
        map: impl FnOnce(T, U) -> T,
    ) -> Result<Self> {
        if !self.can_try_required() {
            return Ok(self);
        }
        Ok(match op(&self.data)? {
            RecognitionResult::Success(value) => Self::of(map(self.data, value)),
            RecognitionResult::Failed(failed) => Self {
                data: self.data,
                state: State::Alternatives(failed),
            },
            RecognitionResult::Partial(partial) => Self {
                data: self.data,
                state: State::Halted(partial),
            },
        })
    }

    /// Runs a step whose failure is absorbed: `default` folds the failure into the data and the
    /// chain stays in required mode.
    pub fn then_try_or_default<U>(
        self,
        op: impl FnOnce(&T) -> Attempt<U>,
        map: impl FnOnce(T, U) -> T,
        default: impl FnOnce(T, FailedRecognition) -> T,
    ) -> Result<Self> {
        if !self.can_try_required() {
            return Ok(self);
        }
        Ok(match op(&self.data)? {
            RecognitionResult::Success(value) => Self::of(map(self.data, value)),
            RecognitionResult::Failed(failed) => Self::of(default(self.data, failed)),
            RecognitionResult::Partial(partial) => Self {
                data: self.data,
                state: State::Halted(partial),
            },
        })
    }

    /// Runs an alternative step, only after a previous step failed.
    pub fn or_try<U>(
        self,
        op: impl FnOnce(&T) -> Attempt<U>,
        map: impl FnOnce(T, U) -> T,
    ) -> Result<Self> {
        let State::Alternatives(held) = self.state else {
            return Ok(self);
        };
        Ok(match op(&self.data)? {
            RecognitionResult::Success(value) => Self::of(map(self.data, value)),
            RecognitionResult::Failed(failed) => Self {
                data: self.data,
                state: State::Alternatives(held.most_advanced(failed)),
            },
            RecognitionResult::Partial(partial) => Self {
                data: self.data,
                state: State::Halted(partial),
            },
        })
    }

    pub fn into_result(self) -> RecognitionResult<T> {
        match self.state {
            State::Required => RecognitionResult::Success(self.data),
            State::Alternatives(failed) => RecognitionResult::Failed(failed),
            State::Halted(partial) => RecognitionResult::Partial(partial),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::SymbolPath;

    fn ok(value: u32) -> Attempt<u32> {
        Ok(RecognitionResult::Success(value))
    }

    fn failed(count: usize) -> Attempt<u32> {
        Ok(RecognitionResult::Failed(
            FailedRecognition::new(SymbolPath::root("f"), count).with_element_count(count),
        ))
    }

    fn partial() -> Attempt<u32> {
        Ok(RecognitionResult::Partial(PartialRecognition::new(
            SymbolPath::root("p"),
            2,
            2,
        )))
    }

    fn sum(acc: u32, v: u32) -> u32 {
        acc + v
    }

    #[test]
    fn test_required_chain_succeeds() {
        let acc = NodeRecognitionAccumulator::of(0)
            .then_try(|_| ok(1), sum)
            .unwrap()
            .then_try(|_| ok(2), sum)
            .unwrap();
        assert!(acc.can_try_required());
        assert_eq!(acc.into_result(), RecognitionResult::Success(3));
    }

    #[test]
    fn test_failure_skips_required_and_enables_alternatives() {
        let acc = NodeRecognitionAccumulator::of(0)
            .then_try(|_| failed(1), sum)
            .unwrap()
            .then_try(|_| panic!("required step after failure must not run"), sum)
            .unwrap();
        assert!(acc.can_try_alternatives());
        let acc = acc.or_try(|_| ok(5), sum).unwrap();
        assert!(acc.can_try_required());
        assert_eq!(acc.into_result(), RecognitionResult::Success(5));
    }

    #[test]
    fn test_alternatives_keep_most_advanced_failure() {
        let result = NodeRecognitionAccumulator::of(0)
            .then_try(|_| failed(2), sum)
            .unwrap()
            .or_try(|_| failed(5), sum)
            .unwrap()
            .or_try(|_| failed(1), sum)
            .unwrap()
            .into_result();
        assert_eq!(result.failed().map(|f| f.element_count()), Some(5));
    }

    #[test]
    fn test_or_try_is_inert_in_required_mode() {
        let acc = NodeRecognitionAccumulator::of(1)
            .or_try(|_| panic!("alternative must not run"), sum)
            .unwrap();
        assert_eq!(acc.into_result(), RecognitionResult::Success(1));
    }

    #[test]
    fn test_partial_halts_everything() {
        let acc = NodeRecognitionAccumulator::of(0)
            .then_try(|_| partial(), sum)
            .unwrap()
            .or_try(|_| ok(1), sum)
            .unwrap()
            .then_try(|_| ok(1), sum)
            .unwrap();
        assert!(!acc.can_try_required() && !acc.can_try_alternatives());
        assert!(acc.into_result().is_partial());
    }

    #[test]
    fn test_default_absorbs_failure() {
        let acc = NodeRecognitionAccumulator::of(10)
            .then_try_or_default(|_| failed(1), sum, |data, _| data + 100)
            .unwrap()
            .then_try(|_| ok(1), sum)
            .unwrap();
        assert_eq!(acc.into_result(), RecognitionResult::Success(111));
    }

    #[test]
    fn test_configuration_errors_escape_the_chain() {
        let result = NodeRecognitionAccumulator::of(0).then_try(
            |_| -> Attempt<u32> {
                Err(crate::PulsarError::UnknownProduction {
                    symbol: "missing".into(),
                })
            },
            sum,
        );
        assert!(result.is_err());
    }
}
