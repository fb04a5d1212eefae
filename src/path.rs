//! A canonical, cheaply extended path of symbols through the rule graph.
//!
//! Every recognition attempt receives the path of the rule that invoked it and extends it with
//! its own symbol. Paths are persistent linked lists: `child` allocates one segment and shares the
//! whole parent chain, so descending into a rule never copies the path above it.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Serialize, Serializer};

#[derive(Clone, Default)]
pub struct SymbolPath(Option<Arc<Segment>>);

#[derive(Debug)]
struct Segment {
    symbol: String,
    parent: SymbolPath,
    depth: usize,
}

impl SymbolPath {
    pub fn root(symbol: impl Into<String>) -> Self {
        Self::default().child(symbol)
    }

    pub fn child(&self, symbol: impl Into<String>) -> Self {
        SymbolPath(Some(Arc::new(Segment {
            symbol: symbol.into(),
            parent: self.clone(),
            depth: self.depth() + 1,
        })))
    }

    /// The innermost symbol, or `""` for the empty path.
    pub fn symbol(&self) -> &str {
        self.0.as_ref().map_or("", |segment| segment.symbol.as_str())
    }

    pub fn parent(&self) -> Option<&SymbolPath> {
        self.0.as_ref().map(|segment| &segment.parent)
    }

    pub fn depth(&self) -> usize {
        self.0.as_ref().map_or(0, |segment| segment.depth)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Symbols from the outermost to the innermost.
    pub fn segments(&self) -> Vec<&str> {
        let mut segments = Vec::with_capacity(self.depth());
        let mut current = self;
        while let Some(segment) = &current.0 {
            segments.push(segment.symbol.as_str());
            current = &segment.parent;
        }
        segments.reverse();
        segments
    }
}

impl fmt::Display for SymbolPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments().join("/"))
    }
}

impl fmt::Debug for SymbolPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolPath({:?})", self.to_string())
    }
}

impl PartialEq for SymbolPath {
    fn eq(&self, other: &Self) -> bool {
        self.depth() == other.depth() && self.segments() == other.segments()
    }
}

impl Eq for SymbolPath {}

impl Hash for SymbolPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments().hash(state);
    }
}

impl Serialize for SymbolPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
