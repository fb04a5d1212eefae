//! The recognition cursor.
//!
//! `TokenReader` is a positional reader over an immutable source. Its entire state is a single
//! byte offset, so saving and restoring it (backtracking) is a copy of one integer. The reader is
//! deliberately not `Clone`: one reader is threaded by `&mut` through every nested recognition
//! attempt so that all of them share, and can rewind, the same position.
//!
//! ## Invariants
//!
//! - `0 <= position <= source.len()`, always on a UTF-8 character boundary.
//! - Every `try_*` operation leaves the position untouched when it returns `None`.
//! - Reading past the end is reported as `PulsarError::EndOfStream`, which is distinct from a
//!   literal or pattern simply not matching.
//!
//! Counts passed to `peek`, `read` and `back` are measured in characters; positions and the
//! returned spans are measured in bytes.

use std::sync::Arc;

use regex::Regex;

use crate::diagnostics::{PulsarError, Result};
use crate::tokens::Tokens;

#[derive(Debug)]
pub struct TokenReader {
    source: Arc<str>,
    position: usize,
}

impl TokenReader {
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        Self {
            source: source.into(),
            position: 0,
        }
    }

    pub fn source(&self) -> &Arc<str> {
        &self.source
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// The unread remainder of the source.
    pub fn remaining(&self) -> &str {
        &self.source[self.position..]
    }

    /// An empty span at the current position.
    pub fn empty_tokens(&self) -> Tokens {
        Tokens::spanning(&self.source, self.position, 0)
    }

    // ========================================================================
    // POSITIONAL READS
    // ========================================================================

    /// Returns the next `count` characters without consuming them.
    pub fn peek(&self, count: usize) -> Result<Tokens> {
        let width = self.forward_width(count)?;
        Ok(Tokens::spanning(&self.source, self.position, width))
    }

    /// Consumes and returns the next `count` characters.
    pub fn read(&mut self, count: usize) -> Result<Tokens> {
        let tokens = self.peek(count)?;
        self.position = tokens.end();
        Ok(tokens)
    }

    /// Moves the position back by `count` characters.
    pub fn back(&mut self, count: usize) -> Result<()> {
        let mut offset = self.position;
        let mut consumed = self.source[..self.position].chars().rev();
        for available in 0..count {
            match consumed.next() {
                Some(ch) => offset -= ch.len_utf8(),
                None => {
                    return Err(PulsarError::EndOfStream {
                        position: self.position,
                        requested: count,
                        available,
                    })
                }
            }
        }
        self.position = offset;
        Ok(())
    }

    /// Moves to an absolute byte position.
    pub fn reset(&mut self, position: usize) -> Result<()> {
        if position > self.source.len() || !self.source.is_char_boundary(position) {
            return Err(PulsarError::InvalidPosition {
                position,
                length: self.source.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Rewinds to a position this reader reported earlier.
    pub(crate) fn restore(&mut self, position: usize) {
        debug_assert!(self.source.is_char_boundary(position));
        self.position = position;
    }

    // ========================================================================
    // SPECULATIVE READS
    // ========================================================================

    /// Consumes `literal` if the remainder starts with it.
    pub fn try_read_exact(&mut self, literal: &str) -> Option<Tokens> {
        if literal.is_empty() || !self.remaining().starts_with(literal) {
            return None;
        }
        let tokens = Tokens::spanning(&self.source, self.position, literal.len());
        self.position = tokens.end();
        Some(tokens)
    }

    /// Consumes the next `count` characters if `accept` approves of them.
    ///
    /// Too little input left is a plain non-match here, not an end-of-stream error.
    pub fn try_read_if(&mut self, count: usize, accept: impl FnOnce(&str) -> bool) -> Option<Tokens> {
        let tokens = self.peek(count).ok()?;
        if !accept(tokens.as_str()) {
            return None;
        }
        self.position = tokens.end();
        Some(tokens)
    }

    /// Consumes the longest non-empty run of characters satisfying `predicate`.
    pub fn try_read_while(&mut self, mut predicate: impl FnMut(char) -> bool) -> Option<Tokens> {
        let width: usize = self
            .remaining()
            .chars()
            .take_while(|ch| predicate(*ch))
            .map(char::len_utf8)
            .sum();
        if width == 0 {
            return None;
        }
        let tokens = Tokens::spanning(&self.source, self.position, width);
        self.position = tokens.end();
        Some(tokens)
    }

    /// Consumes the longest non-empty prefix of the remainder that `pattern` matches in full.
    ///
    /// See `try_read_pattern_within`; this variant scans all the way to the end of the source.
    pub fn try_read_pattern(&mut self, pattern: &Regex) -> Option<Tokens> {
        self.try_read_pattern_within(pattern, usize::MAX)
    }

    /// Scans the remainder one character at a time, testing each candidate prefix against
    /// `pattern` and remembering the longest prefix matched in full. Scanning stops after
    /// `max_mismatch` consecutive candidates fail to match.
    ///
    /// A full match means the match starts at the first character and ends at the last one, so
    /// patterns should be anchored (`^(?:...)$`) for exact semantics.
    pub fn try_read_pattern_within(&mut self, pattern: &Regex, max_mismatch: usize) -> Option<Tokens> {
        let max_mismatch = max_mismatch.max(1);
        let remaining = self.remaining();
        let mut longest = None;
        let mut mismatches = 0;
        for (index, ch) in remaining.char_indices() {
            let end = index + ch.len_utf8();
            if is_full_match(pattern, &remaining[..end]) {
                longest = Some(end);
                mismatches = 0;
            } else {
                mismatches += 1;
                if mismatches >= max_mismatch {
                    break;
                }
            }
        }
        let width = longest?;
        let tokens = Tokens::spanning(&self.source, self.position, width);
        self.position = tokens.end();
        Some(tokens)
    }

    fn forward_width(&self, count: usize) -> Result<usize> {
        let mut width = 0;
        let mut chars = self.remaining().chars();
        for available in 0..count {
            match chars.next() {
                Some(ch) => width += ch.len_utf8(),
                None => {
                    return Err(PulsarError::EndOfStream {
                        position: self.position,
                        requested: count,
                        available,
                    })
                }
            }
        }
        Ok(width)
    }
}

fn is_full_match(pattern: &Regex, candidate: &str) -> bool {
    pattern
        .find(candidate)
        .is_some_and(|found| found.start() == 0 && found.end() == candidate.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_advances_and_peek_does_not() {
        let mut reader = TokenReader::new("abcdef");
        assert_eq!(reader.peek(2).unwrap(), "ab");
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read(3).unwrap(), "abc");
        assert_eq!(reader.position(), 3);
        assert_eq!(reader.remaining(), "def");
    }

    #[test]
    fn test_reading_past_end_is_end_of_stream() {
        let mut reader = TokenReader::new("ab");
        let err = reader.read(3).unwrap_err();
        assert!(matches!(
            err,
            PulsarError::EndOfStream {
                position: 0,
                requested: 3,
                available: 2
            }
        ));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_counts_are_characters() {
        let mut reader = TokenReader::new("héllo");
        let tokens = reader.read(2).unwrap();
        assert_eq!(tokens.as_str(), "hé");
        assert_eq!(reader.position(), 3);
        reader.back(1).unwrap();
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn test_back_and_reset_validate() {
        let mut reader = TokenReader::new("é!");
        assert!(reader.back(1).is_err());
        assert!(matches!(
            reader.reset(1),
            Err(PulsarError::InvalidPosition { position: 1, .. })
        ));
        reader.reset(2).unwrap();
        assert_eq!(reader.remaining(), "!");
        assert!(reader.reset(4).is_err());
    }

    #[test]
    fn test_try_read_exact_restores_on_failure() {
        let mut reader = TokenReader::new("let x");
        assert!(reader.try_read_exact("lex").is_none());
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.try_read_exact("let").unwrap(), "let");
        assert!(reader.try_read_exact("").is_none());
    }

    #[test]
    fn test_try_read_pattern_takes_longest_full_match() {
        let number = Regex::new(r"^(?:\d+(\.\d+)?)$").unwrap();
        let mut reader = TokenReader::new("3.14;");
        // "3." is not a full match, but "3.1" is again: scanning must look past it
        assert_eq!(reader.try_read_pattern(&number).unwrap(), "3.14");
        assert_eq!(reader.remaining(), ";");
    }

    #[test]
    fn test_try_read_pattern_mismatch_budget() {
        let number = Regex::new(r"^(?:\d+(\.\d+)?)$").unwrap();
        let mut reader = TokenReader::new("3.14;");
        assert_eq!(reader.try_read_pattern_within(&number, 1).unwrap(), "3");
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn test_try_read_pattern_no_match_keeps_position() {
        let word = Regex::new(r"^(?:[a-z]+)$").unwrap();
        let mut reader = TokenReader::new("42");
        assert!(reader.try_read_pattern(&word).is_none());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_try_read_while_requires_one_character() {
        let mut reader = TokenReader::new("   x");
        assert_eq!(reader.try_read_while(char::is_whitespace).unwrap().len(), 3);
        assert!(reader.try_read_while(char::is_whitespace).is_none());
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn test_try_read_if_at_end_is_a_non_match() {
        let mut reader = TokenReader::new("a");
        assert!(reader.try_read_if(2, |_| true).is_none());
        assert_eq!(reader.position(), 0);
        assert!(reader.try_read_if(1, |text| text == "a").is_some());
        assert!(reader.is_at_end());
    }
}
