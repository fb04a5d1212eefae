//! # Aggregation Elements
//!
//! The building blocks of a rule graph. Every element answers one question: starting at the
//! reader's position, which nodes does it recognize? The answer is a `NodeSequence`, produced
//! under the element's own `Cardinality`.
//!
//! The set of element kinds is closed:
//!
//! | Kind            | Recognizes                                                   |
//! |-----------------|--------------------------------------------------------------|
//! | `AtomicRuleRef` | a terminal rule, yielding one node per occurrence            |
//! | `ProductionRef` | a production resolved through the grammar, by symbol         |
//! | `Sequence`      | all of its elements, in order                                |
//! | `Choice`        | the first of its alternatives that matches                   |
//! | `Set`           | its elements in any order, at least `min_recognition_count`  |
//! | `Repetition`    | another element, repeated under an extra cardinality         |
//!
//! ## Contract
//!
//! - A `Failed` result leaves the reader where it was before the call.
//! - A `Partial` result is never retried as an alternative; it travels straight up.
//! - `Err(..)` means the grammar itself is broken (e.g. an unknown production).

pub mod choice;
pub mod refs;
pub mod repetition;
pub mod sequence;
pub mod set;

use std::fmt;

use crate::cardinality::Cardinality;
use crate::grammar::Grammar;
use crate::node::NodeSequence;
use crate::path::SymbolPath;
use crate::reader::TokenReader;
use crate::recognition::Attempt;

pub use choice::Choice;
pub use refs::{AtomicRuleRef, ProductionRef};
pub use repetition::Repetition;
pub use sequence::Sequence;
pub use set::Set;

#[derive(Debug, Clone)]
pub enum AggregationElement {
    AtomicRule(AtomicRuleRef),
    Production(ProductionRef),
    Sequence(Sequence),
    Choice(Choice),
    Set(Set),
    Repetition(Repetition),
}

impl AggregationElement {
    /// Recognizes this element at the reader's position, under its cardinality.
    ///
    /// `path` is the symbol path of the enclosing rule; groups extend it with their own
    /// segment, references with the referenced symbol.
    pub fn recognize(
        &self,
        reader: &mut TokenReader,
        path: &SymbolPath,
        grammar: &dyn Grammar,
    ) -> Attempt<NodeSequence> {
        match self {
            AggregationElement::AtomicRule(element) => element.recognize(reader, path, grammar),
            AggregationElement::Production(element) => element.recognize(reader, path, grammar),
            AggregationElement::Sequence(element) => element.recognize(reader, path, grammar),
            AggregationElement::Choice(element) => element.recognize(reader, path, grammar),
            AggregationElement::Set(element) => element.recognize(reader, path, grammar),
            AggregationElement::Repetition(element) => element.recognize(reader, path, grammar),
        }
    }

    pub fn cardinality(&self) -> Cardinality {
        match self {
            AggregationElement::AtomicRule(element) => element.cardinality(),
            AggregationElement::Production(element) => element.cardinality(),
            AggregationElement::Sequence(element) => element.cardinality(),
            AggregationElement::Choice(element) => element.cardinality(),
            AggregationElement::Set(element) => element.cardinality(),
            AggregationElement::Repetition(element) => element.cardinality(),
        }
    }

    /// Replaces the element's cardinality.
    pub fn with_cardinality(self, cardinality: Cardinality) -> Self {
        match self {
            AggregationElement::AtomicRule(element) => element.with_cardinality(cardinality).into(),
            AggregationElement::Production(element) => element.with_cardinality(cardinality).into(),
            AggregationElement::Sequence(element) => element.with_cardinality(cardinality).into(),
            AggregationElement::Choice(element) => element.with_cardinality(cardinality).into(),
            AggregationElement::Set(element) => element.with_cardinality(cardinality).into(),
            AggregationElement::Repetition(element) => element.with_cardinality(cardinality).into(),
        }
    }
}

impl From<AtomicRuleRef> for AggregationElement {
    fn from(element: AtomicRuleRef) -> Self {
        AggregationElement::AtomicRule(element)
    }
}

impl From<ProductionRef> for AggregationElement {
    fn from(element: ProductionRef) -> Self {
        AggregationElement::Production(element)
    }
}

impl From<Sequence> for AggregationElement {
    fn from(element: Sequence) -> Self {
        AggregationElement::Sequence(element)
    }
}

impl From<Choice> for AggregationElement {
    fn from(element: Choice) -> Self {
        AggregationElement::Choice(element)
    }
}

impl From<Set> for AggregationElement {
    fn from(element: Set) -> Self {
        AggregationElement::Set(element)
    }
}

impl From<Repetition> for AggregationElement {
    fn from(element: Repetition) -> Self {
        AggregationElement::Repetition(element)
    }
}

/// EBNF-like rendering, used in trace output.
impl fmt::Display for AggregationElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationElement::AtomicRule(element) => write!(f, "{}", element.symbol())?,
            AggregationElement::Production(element) => write!(f, "{}", element.symbol())?,
            AggregationElement::Sequence(element) => write_group(f, element.elements(), " ")?,
            AggregationElement::Choice(element) => write_group(f, element.alternatives(), " | ")?,
            AggregationElement::Set(element) => write_group(f, element.elements(), " & ")?,
            AggregationElement::Repetition(element) => write!(f, "({})", element.element())?,
        }
        write!(f, "{}", self.cardinality())
    }
}

fn write_group(
    f: &mut fmt::Formatter<'_>,
    elements: &[AggregationElement],
    separator: &str,
) -> fmt::Result {
    f.write_str("(")?;
    for (index, element) in elements.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{element}")?;
    }
    f.write_str(")")
}
