//! # Pulsar Test Fixtures
//!
//! Grammar builders shared by the integration tests.

#![allow(dead_code)]

use pulsar::{
    AggregationElement, AtomicRuleRef, Cardinality, Choice, Literal, NonTerminal, Pattern,
    NodeSequence, ProductionRef, ProductionTable, RecognitionResult, Repetition, Sequence,
    SymbolNode, SymbolPath, TokenReader,
};

/// A literal terminal named after its own text.
pub fn lit(text: &str) -> AggregationElement {
    AtomicRuleRef::new(text, Literal::new(text).unwrap()).into()
}

pub fn prod(symbol: &str) -> AggregationElement {
    ProductionRef::new(symbol).into()
}

pub fn seq(elements: Vec<AggregationElement>) -> AggregationElement {
    Sequence::new(elements).unwrap().into()
}

pub fn choice(alternatives: Vec<AggregationElement>) -> AggregationElement {
    Choice::new(alternatives).unwrap().into()
}

/// A one-production grammar rooted at `symbol`.
pub fn single(symbol: &str, rule: NonTerminal) -> ProductionTable {
    let mut grammar = ProductionTable::new();
    grammar.register(symbol, rule).unwrap();
    grammar.set_root(symbol).unwrap();
    grammar
}

/// `S := 'a' ('b' | 'c') 'd'`
pub fn abd_grammar() -> ProductionTable {
    single(
        "S",
        NonTerminal::new(Sequence::new(vec![lit("a"), choice(vec![lit("b"), lit("c")]), lit("d")]).unwrap()),
    )
}

/// ```text
/// expr := term ('+' term)*
/// term := number | '(' expr ')'
/// ```
pub fn expression_grammar() -> ProductionTable {
    let number = AtomicRuleRef::new("number", Pattern::new(r"\d+").unwrap());
    let mut grammar = ProductionTable::new();
    grammar
        .register(
            "expr",
            NonTerminal::new(
                Sequence::new(vec![
                    prod("term"),
                    Repetition::new(
                        Sequence::new(vec![lit("+"), prod("term")]).unwrap(),
                        Cardinality::any(),
                    )
                    .into(),
                ])
                .unwrap(),
            ),
        )
        .unwrap();
    grammar
        .register(
            "term",
            NonTerminal::new(
                Choice::new(vec![
                    number.into(),
                    seq(vec![lit("("), prod("expr"), lit(")")]),
                ])
                .unwrap(),
            ),
        )
        .unwrap();
    grammar.set_root("expr").unwrap();
    grammar
}

/// Recognizes the root of `grammar` over `input`, returning the result and the final position.
pub fn recognize(grammar: &ProductionTable, input: &str) -> (RecognitionResult<SymbolNode>, usize) {
    let mut reader = TokenReader::new(input);
    let result = grammar.recognize_at(&mut reader).unwrap();
    (result, reader.position())
}

/// Recognizes a bare element under the path `S`, outside of any production.
pub fn recognize_element(
    element: &AggregationElement,
    input: &str,
) -> (RecognitionResult<NodeSequence>, usize) {
    let mut reader = TokenReader::new(input);
    let result = element
        .recognize(&mut reader, &SymbolPath::root("S"), &ProductionTable::new())
        .unwrap();
    (result, reader.position())
}
