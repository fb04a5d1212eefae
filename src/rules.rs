//! # Rules
//!
//! Concrete `Rule` implementations.
//!
//! - **Atomic rules** match terminals directly against the reader: literals, regex patterns,
//!   character classes and the end of input. Each yields an `Atom` node.
//! - **`NonTerminal`** recognizes an aggregation element and wraps the resulting nodes in a
//!   `Composite` node. It is also where a failure deep enough into a production turns into a
//!   partial recognition.

pub mod atomic;
pub mod nonterminal;

pub use atomic::{CharacterClass, EndOfInput, Literal, Pattern, PatternMatchType};
pub use nonterminal::{NonTerminal, DEFAULT_RECOGNITION_THRESHOLD};
