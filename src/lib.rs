//! # Pulsar
//!
//! A grammar-driven token recognition engine. Grammars are graphs of rules built from a small,
//! closed set of aggregation elements; recognition runs them over a single shared cursor and
//! produces a tree of symbol nodes whose spans point back into the source.
//!
//! ```ignore
//! use pulsar::{AtomicRuleRef, Choice, Literal, NonTerminal, ProductionTable, Sequence};
//!
//! let lit = |text: &str| AtomicRuleRef::new(text, Literal::new(text)?);
//! let mut grammar = ProductionTable::new();
//! grammar.register(
//!     "S",
//!     NonTerminal::new(Sequence::new(vec![
//!         lit("a").into(),
//!         Choice::new(vec![lit("b").into(), lit("c").into()])?.into(),
//!         lit("d").into(),
//!     ])?),
//! )?;
//! grammar.set_root("S")?;
//! let tree = grammar.recognize("abd")?.success();
//! ```

pub use crate::diagnostics::{PulsarError, RecognitionReport, Result};

pub mod aggregation;
pub mod cardinality;
pub mod diagnostics;
pub mod grammar;
pub mod node;
pub mod path;
pub mod reader;
pub mod recognition;
pub mod rules;
pub mod tokens;

pub use aggregation::{
    AggregationElement, AtomicRuleRef, Choice, ProductionRef, Repetition, Sequence, Set,
};
pub use cardinality::Cardinality;
pub use grammar::{Grammar, Production, ProductionTable, Rule};
pub use node::{NodeFilter, NodeKind, NodePath, NodeSequence, PathSegment, SymbolNode};
pub use path::SymbolPath;
pub use reader::TokenReader;
pub use recognition::{
    Attempt, FailedRecognition, NodeRecognitionAccumulator, PartialRecognition, RecognitionResult,
};
pub use rules::{
    CharacterClass, EndOfInput, Literal, NonTerminal, Pattern, PatternMatchType,
    DEFAULT_RECOGNITION_THRESHOLD,
};
pub use tokens::Tokens;
