//! Token spans: non-copying views into a single shared source buffer.
//!
//! A `Tokens` value is a `(source, offset, length)` triple. The source is reference counted, so
//! spans are cheap to clone and never copy text. Offsets and lengths are byte based and always
//! fall on UTF-8 character boundaries.
//!
//! A span is in exactly one of three states:
//!
//! - **default**: no source at all, used to express absence (`Tokens::default()`).
//! - **empty**: a real source position with zero length.
//! - **non-empty**: a real region of the source.
//!
//! Equality (`==`) is *value* equality: two spans are equal when they address the same
//! characters, wherever those characters live. Use `is_same_ref` to ask whether two spans
//! address the very same region of the very same source.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::diagnostics::{PulsarError, Result};

#[derive(Clone, Default)]
pub struct Tokens {
    source: Option<Arc<str>>,
    offset: usize,
    length: usize,
}

impl Tokens {
    /// Creates a span over `source[offset..offset + length]`, validating the bounds.
    pub fn new(source: Arc<str>, offset: usize, length: usize) -> Result<Self> {
        let end = offset.saturating_add(length);
        if end > source.len() || !source.is_char_boundary(offset) || !source.is_char_boundary(end)
        {
            return Err(PulsarError::InvalidPosition {
                position: if end > source.len() { end } else { offset },
                length: source.len(),
            });
        }
        Ok(Self::spanning(&source, offset, length))
    }

    /// Creates an empty span positioned at `offset`.
    pub fn empty(source: Arc<str>, offset: usize) -> Result<Self> {
        Self::new(source, offset, 0)
    }

    /// Creates a span over the whole of `text`, which becomes its own source.
    pub fn of(text: &str) -> Self {
        let source: Arc<str> = Arc::from(text);
        let length = source.len();
        Self::spanning(&source, 0, length)
    }

    /// Bounds are the caller's responsibility; the reader only hands out positions it has
    /// already validated.
    pub(crate) fn spanning(source: &Arc<str>, offset: usize, length: usize) -> Self {
        debug_assert!(offset + length <= source.len());
        Self {
            source: Some(Arc::clone(source)),
            offset,
            length,
        }
    }

    pub fn is_default(&self) -> bool {
        self.source.is_none()
    }

    /// True for empty and default spans alike.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The offset one past the last byte of this span.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    pub fn source(&self) -> Option<&Arc<str>> {
        self.source.as_ref()
    }

    /// The addressed text. Default spans read as `""`.
    pub fn as_str(&self) -> &str {
        match &self.source {
            Some(source) => &source[self.offset..self.end()],
            None => "",
        }
    }

    /// Returns the sub-span at `range`, relative to this span's start.
    ///
    /// `None` when the range escapes the span or splits a character.
    pub fn slice(&self, range: Range<usize>) -> Option<Tokens> {
        let source = self.source.as_ref()?;
        if range.start > range.end || range.end > self.length {
            return None;
        }
        let text = self.as_str();
        if !text.is_char_boundary(range.start) || !text.is_char_boundary(range.end) {
            return None;
        }
        Some(Self::spanning(
            source,
            self.offset + range.start,
            range.end - range.start,
        ))
    }

    /// Splits into `[0, mid)` and `[mid, len)`.
    pub fn split_at(&self, mid: usize) -> Option<(Tokens, Tokens)> {
        Some((self.slice(0..mid)?, self.slice(mid..self.length)?))
    }

    /// True when both spans view the same source buffer.
    pub fn is_same_source(&self, other: &Tokens) -> bool {
        match (&self.source, &other.source) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Reference equality: same source buffer, same offset, same length.
    pub fn is_same_ref(&self, other: &Tokens) -> bool {
        match (self.is_default(), other.is_default()) {
            (true, true) => true,
            (false, false) => {
                self.is_same_source(other)
                    && self.offset == other.offset
                    && self.length == other.length
            }
            _ => false,
        }
    }

    /// True when `next` starts exactly where this span ends, in the same source.
    ///
    /// Default and empty spans are never consecutive to anything.
    pub fn is_consecutive_to(&self, next: &Tokens) -> bool {
        !self.is_empty()
            && !next.is_empty()
            && self.is_same_source(next)
            && self.end() == next.offset
    }

    /// Joins two spans without losing or inventing text.
    ///
    /// Succeeds when either side is default or empty, or when the spans are consecutive or
    /// overlapping in the same source. Gapped or foreign spans cannot be merged.
    pub fn merge(&self, other: &Tokens) -> Option<Tokens> {
        if self.is_default() || (self.is_empty() && !other.is_default()) {
            return Some(other.clone());
        }
        if other.is_default() || other.is_empty() {
            return Some(self.clone());
        }
        if !self.is_same_source(other) {
            return None;
        }
        let (first, second) = if self.offset <= other.offset {
            (self, other)
        } else {
            (other, self)
        };
        if first.end() < second.offset {
            return None;
        }
        first.hull(second)
    }

    /// The smallest span of the shared source containing both spans, gaps included.
    pub fn cover(&self, other: &Tokens) -> Option<Tokens> {
        if self.is_default() {
            return Some(other.clone());
        }
        if other.is_default() {
            return Some(self.clone());
        }
        if !self.is_same_source(other) {
            return None;
        }
        self.hull(other)
    }

    fn hull(&self, other: &Tokens) -> Option<Tokens> {
        let source = self.source.as_ref()?;
        let start = self.offset.min(other.offset);
        let end = self.end().max(other.end());
        Some(Self::spanning(source, start, end - start))
    }
}

impl PartialEq for Tokens {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_default(), other.is_default()) {
            (true, true) => true,
            (false, false) => self.as_str() == other.as_str(),
            _ => false,
        }
    }
}

impl Eq for Tokens {}

impl Hash for Tokens {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.is_default().hash(state);
        self.as_str().hash(state);
    }
}

impl PartialEq<str> for Tokens {
    fn eq(&self, other: &str) -> bool {
        !self.is_default() && self.as_str() == other
    }
}

impl PartialEq<&str> for Tokens {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Debug for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            write!(f, "Tokens(<default>)")
        } else {
            write!(f, "Tokens({:?} @ {}..{})", self.as_str(), self.offset, self.end())
        }
    }
}

impl fmt::Display for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Tokens {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.is_default() {
            return serializer.serialize_none();
        }
        let mut state = serializer.serialize_struct("Tokens", 3)?;
        state.serialize_field("offset", &self.offset)?;
        state.serialize_field("length", &self.length)?;
        state.serialize_field("text", self.as_str())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(text: &str) -> Arc<str> {
        Arc::from(text)
    }

    #[test]
    fn test_three_states_are_distinguishable() {
        let src = source("abc");
        let default = Tokens::default();
        let empty = Tokens::empty(Arc::clone(&src), 1).unwrap();
        let full = Tokens::new(src, 0, 3).unwrap();

        assert!(default.is_default() && default.is_empty());
        assert!(!empty.is_default() && empty.is_empty());
        assert!(!full.is_default() && !full.is_empty());
        assert_ne!(default, empty);
    }

    #[test]
    fn test_new_rejects_out_of_bounds_and_split_characters() {
        assert!(matches!(
            Tokens::new(source("abc"), 2, 5),
            Err(PulsarError::InvalidPosition { .. })
        ));
        // 'é' is two bytes wide
        assert!(Tokens::new(source("é"), 1, 0).is_err());
    }

    #[test]
    fn test_value_equality_ignores_source_identity() {
        let a = Tokens::new(source("xabc"), 1, 3).unwrap();
        let b = Tokens::of("abc");
        assert_eq!(a, b);
        assert!(!a.is_same_ref(&b));
        assert_eq!(a, "abc");
    }

    #[test]
    fn test_consecutive_spans_merge() {
        let src = source("hello world");
        let hello = Tokens::new(Arc::clone(&src), 0, 5).unwrap();
        let space = Tokens::new(Arc::clone(&src), 5, 1).unwrap();
        assert!(hello.is_consecutive_to(&space));
        let merged = hello.merge(&space).unwrap();
        assert_eq!(merged.as_str(), "hello ");
        assert!(merged.is_same_source(&hello));
    }

    #[test]
    fn test_gapped_spans_only_cover() {
        let src = source("hello world");
        let hello = Tokens::new(Arc::clone(&src), 0, 5).unwrap();
        let world = Tokens::new(src, 6, 5).unwrap();
        assert!(hello.merge(&world).is_none());
        assert_eq!(hello.cover(&world).unwrap().as_str(), "hello world");
    }

    #[test]
    fn test_foreign_spans_do_not_merge() {
        let a = Tokens::of("ab");
        let b = Tokens::of("cd");
        assert!(a.merge(&b).is_none());
        assert!(a.cover(&b).is_none());
    }

    #[test]
    fn test_empty_and_default_merge_losslessly() {
        let src = source("abc");
        let bc = Tokens::new(Arc::clone(&src), 1, 2).unwrap();
        let empty = Tokens::empty(src, 0).unwrap();
        assert!(bc.merge(&Tokens::default()).unwrap().is_same_ref(&bc));
        assert!(empty.merge(&bc).unwrap().is_same_ref(&bc));
        assert!(bc.merge(&empty).unwrap().is_same_ref(&bc));
    }

    #[test]
    fn test_overlapping_spans_merge_to_union() {
        let src = source("abcdef");
        let left = Tokens::new(Arc::clone(&src), 0, 4).unwrap();
        let right = Tokens::new(src, 2, 4).unwrap();
        assert_eq!(right.merge(&left).unwrap().as_str(), "abcdef");
    }

    #[test]
    fn test_slice_and_split() {
        let tokens = Tokens::of("pulsar");
        assert_eq!(tokens.slice(1..4).unwrap(), "uls");
        assert!(tokens.slice(4..9).is_none());
        let (head, tail) = tokens.split_at(3).unwrap();
        assert_eq!((head.as_str(), tail.as_str()), ("pul", "sar"));
        assert!(head.is_consecutive_to(&tail));
    }

    #[test]
    fn test_serializes_as_struct_or_null() {
        let tokens = Tokens::of("ab");
        assert_eq!(
            serde_json::to_value(&tokens).unwrap(),
            serde_json::json!({"offset": 0, "length": 2, "text": "ab"})
        );
        assert_eq!(
            serde_json::to_value(Tokens::default()).unwrap(),
            serde_json::Value::Null
        );
    }
}
