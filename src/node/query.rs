//! Path queries over symbol trees.
//!
//! A `NodePath` is an ordered list of segments, one per tree level. Each segment holds a set of
//! alternative `NodeFilter`s; a node passes the segment when any filter accepts it. Selection is
//! breadth-first: starting from the queried node, each segment replaces the current set of nodes
//! with those of their children that pass it.
//!
//! ```ignore
//! // every `number` directly below an `item`, itself directly below the root
//! let path = NodePath::new()
//!     .then(NodeFilter::symbol("item"))
//!     .then(NodeFilter::symbol("number"));
//! let numbers = tree.find(&path);
//! ```

use serde::Serialize;

use crate::node::SymbolNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Atom,
    Composite,
}

/// Accepts nodes by kind, symbol and exact text. Unset criteria accept anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFilter {
    kind: Option<NodeKind>,
    symbol: Option<String>,
    text: Option<String>,
}

impl NodeFilter {
    /// A filter accepting every node.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn kind(kind: NodeKind) -> Self {
        Self::any().with_kind(kind)
    }

    pub fn symbol(symbol: impl Into<String>) -> Self {
        Self::any().with_symbol(symbol)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::any().with_text(text)
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn matches(&self, node: &SymbolNode) -> bool {
        self.kind.map_or(true, |kind| node.kind() == kind)
            && self
                .symbol
                .as_deref()
                .map_or(true, |symbol| node.symbol() == symbol)
            && self.text.as_deref().map_or(true, |text| node.text() == text)
    }
}

/// One level of a `NodePath`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSegment {
    filters: Vec<NodeFilter>,
}

impl PathSegment {
    pub fn new(filters: Vec<NodeFilter>) -> Self {
        Self { filters }
    }

    pub fn or(mut self, filter: NodeFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// A segment without filters accepts every node.
    pub fn matches(&self, node: &SymbolNode) -> bool {
        self.filters.is_empty() || self.filters.iter().any(|filter| filter.matches(node))
    }
}

impl From<NodeFilter> for PathSegment {
    fn from(filter: NodeFilter) -> Self {
        Self::new(vec![filter])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

impl NodePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, segment: impl Into<PathSegment>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Nodes reached by descending one level per segment from `root`.
    ///
    /// An empty path selects `root` itself. Atoms are selectable too; a segment holding
    /// `NodeFilter::kind(NodeKind::Composite)` keeps composites only.
    pub fn select<'a>(&self, root: &'a SymbolNode) -> Vec<&'a SymbolNode> {
        self.segments
            .iter()
            .fold(vec![root], |current, segment| {
                current
                    .into_iter()
                    .flat_map(SymbolNode::children)
                    .filter(|child| segment.matches(child))
                    .collect()
            })
    }
}
