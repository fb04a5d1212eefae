//! # Pulsar Diagnostics
//!
//! This module defines the unified, `miette`-based error surface for the Pulsar engine.
//!
//! Two very different things can go wrong while recognizing text, and they travel on two
//! different channels:
//!
//! - **Configuration errors** (`PulsarError`): a broken grammar or a misused API. Unknown
//!   production symbols, invalid cardinalities, malformed patterns, reading past the end of the
//!   source. These are returned through `Err(..)` and are never part of the recognition algebra.
//! - **Recognition outcomes** (`RecognitionResult`): whether the input matched. A failed or
//!   partial recognition is *not* an error of the engine, it is an answer about the input.
//!   `RecognitionReport` renders such an answer as a diagnostic when a host wants to show it.
//!
//! ## Error Construction
//!
//! - Use the typed variants directly for structured errors.
//! - Use `pulsar_err!` for message-only argument errors:
//!   `pulsar_err!("literal must not be empty")`

use std::sync::Arc;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::recognition::RecognitionResult;

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

/// Crate-wide result alias for fallible, non-recognition operations.
pub type Result<T> = std::result::Result<T, PulsarError>;

/// Unified error type for every precondition violation the engine can raise.
///
/// None of these describe bad *input*; they describe a broken grammar or a misused API.
#[derive(Debug, Error, Diagnostic)]
pub enum PulsarError {
    #[error("unknown production symbol `{symbol}`")]
    #[diagnostic(
        code(pulsar::grammar::unknown_production),
        help("register the production in the grammar before recognizing, or fix the reference")
    )]
    UnknownProduction { symbol: String },

    #[error("production `{symbol}` is already registered")]
    #[diagnostic(code(pulsar::grammar::duplicate_production))]
    DuplicateProduction { symbol: String },

    #[error("grammar has no root production")]
    #[diagnostic(
        code(pulsar::grammar::missing_root),
        help("call `set_root` with a registered symbol")
    )]
    MissingRoot,

    #[error("invalid cardinality: min {min}, max {max}")]
    #[diagnostic(
        code(pulsar::cardinality::invalid),
        help("the minimum must not exceed the maximum; use `Cardinality::never()` for zero occurrences")
    )]
    InvalidCardinality { min: usize, max: usize },

    #[error("invalid argument: {message}")]
    #[diagnostic(code(pulsar::invalid_argument))]
    InvalidArgument { message: String },

    #[error("invalid pattern `{pattern}`")]
    #[diagnostic(code(pulsar::rules::invalid_pattern))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(
        "unexpected end of stream at {position}: requested {requested} characters, {available} available"
    )]
    #[diagnostic(code(pulsar::reader::end_of_stream))]
    EndOfStream {
        position: usize,
        requested: usize,
        available: usize,
    },

    #[error("position {position} is outside the source or not on a character boundary (source length {length})")]
    #[diagnostic(code(pulsar::reader::invalid_position))]
    InvalidPosition { position: usize, length: usize },
}

/// Constructs a `PulsarError::InvalidArgument` with a formatted message.
#[macro_export]
macro_rules! pulsar_err {
    ($msg:expr) => {
        $crate::PulsarError::InvalidArgument {
            message: format!("{}", $msg),
        }
    };
    ($msg:expr, $($arg:expr),+ $(,)?) => {
        $crate::PulsarError::InvalidArgument {
            message: format!($msg, $($arg),+),
        }
    };
}

// ============================================================================
// RECOGNITION REPORTS
// ============================================================================

/// A rendered, user-facing account of a recognition that did not succeed.
///
/// Hosts build one from a `RecognitionResult` when they want to show the outcome with the
/// offending region of the source highlighted.
#[derive(Debug, Error, Diagnostic)]
pub enum RecognitionReport {
    #[error("no match for rule `{symbol}`")]
    #[diagnostic(code(pulsar::recognition::failed))]
    Failed {
        symbol: String,
        #[source_code]
        src: Arc<NamedSource<String>>,
        #[label("no match here")]
        span: SourceSpan,
    },

    #[error("malformed `{symbol}` starting at position {start}")]
    #[diagnostic(code(pulsar::recognition::partial))]
    Partial {
        symbol: String,
        start: usize,
        #[source_code]
        src: Arc<NamedSource<String>>,
        #[label("recognition stopped after this")]
        span: SourceSpan,
        #[help]
        help: String,
    },
}

impl RecognitionReport {
    /// Builds a report for a non-successful result, or `None` when the result is a success.
    pub fn from_result<T>(
        result: &RecognitionResult<T>,
        source_name: &str,
        source_text: &str,
    ) -> Option<Self> {
        let src = Arc::new(NamedSource::new(source_name, source_text.to_string()));
        match result {
            RecognitionResult::Success(_) => None,
            RecognitionResult::Failed(failed) => Some(RecognitionReport::Failed {
                symbol: failed.symbol().to_string(),
                src,
                span: (failed.position(), 0).into(),
            }),
            RecognitionResult::Partial(partial) => Some(RecognitionReport::Partial {
                symbol: partial.symbol().to_string(),
                start: partial.start(),
                src,
                span: (partial.start(), partial.consumed()).into(),
                help: format!(
                    "consumed {} characters before failing at position {}",
                    partial.consumed(),
                    partial.position()
                ),
            }),
        }
    }

    /// The symbol path of the rule the report is about.
    pub fn symbol(&self) -> &str {
        match self {
            RecognitionReport::Failed { symbol, .. } | RecognitionReport::Partial { symbol, .. } => {
                symbol
            }
        }
    }
}
