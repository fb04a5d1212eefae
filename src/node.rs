//! # Symbol Trees
//!
//! The output of a successful recognition is a tree of `SymbolNode`s:
//!
//! - **`Atom`**: a leaf holding the span its terminal rule matched.
//! - **`Composite`**: a production's node, holding the ordered nodes its rule recognized.
//!
//! Trees are assembled bottom-up and never change once a rule has returned them. A composite's
//! span and display text are derived from its children on first access and cached.
//!
//! `NodeSequence` is the in-flight form of those children: the ordered nodes an aggregation
//! recognized, each tagged with whether it came from a required element.

pub mod query;

use std::fmt;

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::tokens::Tokens;

pub use query::{NodeFilter, NodeKind, NodePath, PathSegment};

// ============================================================================
// SYMBOL NODES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SymbolNode {
    Atom(AtomNode),
    Composite(CompositeNode),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtomNode {
    symbol: String,
    tokens: Tokens,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompositeNode {
    symbol: String,
    children: Vec<SymbolNode>,
    #[serde(skip)]
    tokens: OnceCell<Tokens>,
    #[serde(skip)]
    text: OnceCell<String>,
}

impl PartialEq for CompositeNode {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol && self.children == other.children
    }
}

impl SymbolNode {
    pub fn atom(symbol: impl Into<String>, tokens: Tokens) -> Self {
        SymbolNode::Atom(AtomNode {
            symbol: symbol.into(),
            tokens,
        })
    }

    pub fn composite(symbol: impl Into<String>, children: Vec<SymbolNode>) -> Self {
        SymbolNode::Composite(CompositeNode {
            symbol: symbol.into(),
            children,
            tokens: OnceCell::new(),
            text: OnceCell::new(),
        })
    }

    pub fn symbol(&self) -> &str {
        match self {
            SymbolNode::Atom(atom) => &atom.symbol,
            SymbolNode::Composite(composite) => &composite.symbol,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            SymbolNode::Atom(_) => NodeKind::Atom,
            SymbolNode::Composite(_) => NodeKind::Composite,
        }
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, SymbolNode::Atom(_))
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, SymbolNode::Composite(_))
    }

    /// Child nodes; atoms have none.
    pub fn children(&self) -> &[SymbolNode] {
        match self {
            SymbolNode::Atom(_) => &[],
            SymbolNode::Composite(composite) => &composite.children,
        }
    }

    /// The span this node covers.
    ///
    /// For a composite this is the merge of its children's spans, computed once. A composite
    /// with no children (or only default-spanned ones) has the default span.
    pub fn tokens(&self) -> &Tokens {
        match self {
            SymbolNode::Atom(atom) => &atom.tokens,
            SymbolNode::Composite(composite) => composite.tokens.get_or_init(|| {
                composite
                    .children
                    .iter()
                    .fold(Tokens::default(), |acc, child| {
                        let next = child.tokens();
                        acc.merge(next)
                            .or_else(|| acc.cover(next))
                            .unwrap_or(acc)
                    })
            }),
        }
    }

    /// The recognized text: the atom's span, or the concatenation of a composite's children.
    pub fn text(&self) -> &str {
        match self {
            SymbolNode::Atom(atom) => atom.tokens.as_str(),
            SymbolNode::Composite(composite) => composite
                .text
                .get_or_init(|| composite.children.iter().map(SymbolNode::text).collect()),
        }
    }

    /// Nodes selected by `path`, starting below this node.
    pub fn find(&self, path: &NodePath) -> Vec<&SymbolNode> {
        path.select(self)
    }

    /// This node and all its descendants, in pre-order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl fmt::Display for SymbolNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolNode::Atom(atom) => write!(f, "{:?}", atom.tokens.as_str()),
            SymbolNode::Composite(composite) => {
                write!(f, "{}(", composite.symbol)?;
                for (index, child) in composite.children.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Pre-order iterator over a node and its descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a SymbolNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SymbolNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

// ============================================================================
// NODE SEQUENCES
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct SequencedNode {
    node: SymbolNode,
    required: bool,
}

/// The ordered nodes an aggregation element recognized.
///
/// Each node remembers whether it was contributed by a required element (one whose
/// cardinality demands at least one occurrence, all the way up the aggregation). A sequence
/// is *optional* when it is the empty result of an element allowed to occur zero times.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeSequence {
    entries: Vec<SequencedNode>,
    optional: bool,
}

impl NodeSequence {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The result of an element that was allowed to, and did, occur zero times.
    pub fn optional_empty() -> Self {
        Self {
            entries: Vec::new(),
            optional: true,
        }
    }

    pub fn single(node: SymbolNode) -> Self {
        Self {
            entries: vec![SequencedNode {
                node,
                required: true,
            }],
            optional: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn push(&mut self, node: SymbolNode, required: bool) {
        self.entries.push(SequencedNode { node, required });
        self.optional = false;
    }

    /// Appends `other`'s nodes; when `required` is false they all become optional.
    pub fn append(&mut self, other: NodeSequence, required: bool) {
        for entry in other.entries {
            self.push(entry.node, entry.required && required);
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SymbolNode> {
        self.entries.iter().map(|entry| &entry.node)
    }

    pub fn required_nodes(&self) -> impl Iterator<Item = &SymbolNode> {
        self.entries
            .iter()
            .filter(|entry| entry.required)
            .map(|entry| &entry.node)
    }

    pub fn optional_nodes(&self) -> impl Iterator<Item = &SymbolNode> {
        self.entries
            .iter()
            .filter(|entry| !entry.required)
            .map(|entry| &entry.node)
    }

    pub fn required_node_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.required).count()
    }

    pub fn into_nodes(self) -> Vec<SymbolNode> {
        self.entries.into_iter().map(|entry| entry.node).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;

    fn atoms(source: &str, widths: &[usize]) -> Vec<SymbolNode> {
        let source: Arc<str> = Arc::from(source);
        let mut offset = 0;
        widths
            .iter()
            .map(|width| {
                let tokens = Tokens::new(Arc::clone(&source), offset, *width).unwrap();
                offset += width;
                SymbolNode::atom("t", tokens)
            })
            .collect()
    }

    #[test]
    fn test_composite_span_merges_children() {
        let node = SymbolNode::composite("S", atoms("abcd", &[1, 2, 1]));
        assert_eq!(node.tokens().as_str(), "abcd");
        assert_eq!(node.tokens().offset(), 0);
        assert_eq!(node.text(), "abcd");
    }

    #[test]
    fn test_empty_composite_has_default_span() {
        let node = SymbolNode::composite("S", vec![]);
        assert!(node.tokens().is_default());
        assert_eq!(node.text(), "");
    }

    #[test]
    fn test_equality_is_structural() {
        let a = SymbolNode::composite("S", atoms("ab", &[1, 1]));
        let b = SymbolNode::composite("S", atoms("ab", &[1, 1]));
        // populate one cache only
        let _ = a.tokens();
        assert_eq!(a, b);
        assert_ne!(a, SymbolNode::composite("T", atoms("ab", &[1, 1])));
    }

    #[test]
    fn test_display_and_descendants() {
        let inner = SymbolNode::composite("B", atoms("bc", &[1, 1]));
        let mut children = atoms("a", &[1]);
        children.push(inner);
        let root = SymbolNode::composite("A", children);
        assert_eq!(root.to_string(), r#"A("a" B("b" "c"))"#);
        let symbols: Vec<_> = root.descendants().map(SymbolNode::symbol).collect();
        assert_eq!(symbols, vec!["A", "t", "B", "t", "t"]);
    }

    #[test]
    fn test_json_shape() {
        let root = SymbolNode::composite("S", atoms("x", &[1]));
        assert_eq!(
            root.to_json().unwrap(),
            json!({
                "kind": "composite",
                "symbol": "S",
                "children": [
                    {"kind": "atom", "symbol": "t", "tokens": {"offset": 0, "length": 1, "text": "x"}}
                ]
            })
        );
    }

    #[test]
    fn test_node_sequence_required_tracking() {
        let mut nodes = NodeSequence::empty();
        let mut parts = atoms("abc", &[1, 1, 1]).into_iter();
        nodes.push(parts.next().unwrap(), true);
        let mut optional = NodeSequence::single(parts.next().unwrap());
        optional.push(parts.next().unwrap(), true);
        nodes.append(optional, false);

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes.required_node_count(), 1);
        assert_eq!(nodes.optional_nodes().count(), 2);
        assert!(!nodes.is_optional());
        assert!(NodeSequence::optional_empty().is_optional());
    }
}
