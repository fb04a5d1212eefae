//! Leaf references: terminal rules and productions.
//!
//! Both kinds recognize one node per occurrence. An `AtomicRuleRef` holds its rule directly; a
//! `ProductionRef` holds only a symbol and looks the production up in the grammar each time it
//! is recognized, which is what allows grammars to be recursive. A symbol the grammar does not
//! know is a broken grammar, reported as `PulsarError::UnknownProduction`, never as a failed
//! recognition.

use std::sync::Arc;

use crate::cardinality::Cardinality;
use crate::diagnostics::PulsarError;
use crate::grammar::{Grammar, Rule};
use crate::node::NodeSequence;
use crate::path::SymbolPath;
use crate::reader::TokenReader;
use crate::recognition::Attempt;

#[derive(Debug, Clone)]
pub struct AtomicRuleRef {
    symbol: String,
    rule: Arc<dyn Rule>,
    cardinality: Cardinality,
}

impl AtomicRuleRef {
    pub fn new(symbol: impl Into<String>, rule: impl Rule + 'static) -> Self {
        Self::shared(symbol, Arc::new(rule))
    }

    /// A reference to a rule that other elements may hold as well.
    pub fn shared(symbol: impl Into<String>, rule: Arc<dyn Rule>) -> Self {
        Self {
            symbol: symbol.into(),
            rule,
            cardinality: Cardinality::default(),
        }
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn rule(&self) -> &Arc<dyn Rule> {
        &self.rule
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
        let path = path.child(self.symbol.as_str());
        self.cardinality.repeat(reader, &path, |reader| {
            Ok(self
                .rule
                .try_recognize(reader, &path, grammar)?
                .map(NodeSequence::single))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionRef {
    symbol: String,
    cardinality: Cardinality,
}

impl ProductionRef {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            cardinality: Cardinality::default(),
        }
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
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
        let production = grammar
            .production(&self.symbol)
            .ok_or_else(|| PulsarError::UnknownProduction {
                symbol: self.symbol.clone(),
            })?;
        let repeated = path.child(self.symbol.as_str());
        self.cardinality.repeat(reader, &repeated, |reader| {
            Ok(production
                .try_recognize(reader, path, grammar)?
                .map(NodeSequence::single))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::test_support::{lit, run, texts};
    use crate::aggregation::{AggregationElement, Sequence};
    use crate::grammar::ProductionTable;
    use crate::rules::{Literal, NonTerminal};

    #[test]
    fn test_atomic_ref_names_its_nodes() {
        let element: AggregationElement =
            AtomicRuleRef::new("kw", Literal::new("let").unwrap()).into();
        let (result, _) = run(&element, "let x");
        let nodes = result.success().unwrap();
        let node = nodes.nodes().next().unwrap();
        assert_eq!(node.symbol(), "kw");
        assert_eq!(node.text(), "let");
    }

    #[test]
    fn test_atomic_ref_failure_path() {
        let (result, position) = run(&lit("a"), "b");
        assert_eq!(result.failed().unwrap().symbol().to_string(), "S/a");
        assert_eq!(position, 0);
    }

    #[test]
    fn test_production_ref_resolves_through_grammar() {
        let mut grammar = ProductionTable::new();
        grammar
            .register("pair", NonTerminal::new(Sequence::new(vec![lit("a"), lit("b")]).unwrap()))
            .unwrap();
        let element: AggregationElement = ProductionRef::new("pair")
            .with_cardinality(Cardinality::at_least(1))
            .into();

        let mut reader = TokenReader::new("abab");
        let result = element
            .recognize(&mut reader, &SymbolPath::root("S"), &grammar)
            .unwrap();
        let nodes = result.success().unwrap();
        assert_eq!(texts(&nodes), vec!["ab", "ab"]);
        assert!(nodes.nodes().all(|node| node.symbol() == "pair" && node.is_composite()));
    }

    #[test]
    fn test_unknown_production_is_an_error() {
        let element: AggregationElement = ProductionRef::new("missing").into();
        let grammar = ProductionTable::new();
        let mut reader = TokenReader::new("abc");
        let err = element
            .recognize(&mut reader, &SymbolPath::root("S"), &grammar)
            .unwrap_err();
        assert!(matches!(err, PulsarError::UnknownProduction { symbol } if symbol == "missing"));
    }
}
