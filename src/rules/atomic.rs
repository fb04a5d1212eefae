//! Terminal rules.
//!
//! Every atomic rule either consumes a non-empty span and returns an `Atom` node named after
//! its path's symbol, or fails without moving the reader. `EndOfInput` is the one exception to
//! "non-empty": it matches the empty span at the end of the source.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::diagnostics::{PulsarError, Result};
use crate::grammar::{Grammar, Rule};
use crate::node::SymbolNode;
use crate::path::SymbolPath;
use crate::pulsar_err;
use crate::reader::TokenReader;
use crate::recognition::{Attempt, FailedRecognition, RecognitionResult};
use crate::tokens::Tokens;

fn outcome(matched: Option<Tokens>, path: &SymbolPath, position: usize) -> Attempt<SymbolNode> {
    Ok(match matched {
        Some(tokens) => RecognitionResult::Success(SymbolNode::atom(path.symbol(), tokens)),
        None => RecognitionResult::Failed(FailedRecognition::new(path.clone(), position)),
    })
}

// ============================================================================
// LITERAL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    value: String,
    case_sensitive: bool,
    folded: String,
    char_count: usize,
}

impl Literal {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(pulsar_err!("literal must not be empty"));
        }
        Ok(Self {
            folded: value.to_lowercase(),
            char_count: value.chars().count(),
            value,
            case_sensitive: true,
        })
    }

    /// A literal compared without regard to case.
    pub fn case_insensitive(value: impl Into<String>) -> Result<Self> {
        let mut literal = Self::new(value)?;
        literal.case_sensitive = false;
        Ok(literal)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

impl Rule for Literal {
    fn try_recognize(
        &self,
        reader: &mut TokenReader,
        path: &SymbolPath,
        _grammar: &dyn Grammar,
    ) -> Attempt<SymbolNode> {
        let position = reader.position();
        let matched = if self.case_sensitive {
            reader.try_read_exact(&self.value)
        } else {
            reader.try_read_if(self.char_count, |text| text.to_lowercase() == self.folded)
        };
        outcome(matched, path, position)
    }
}

// ============================================================================
// PATTERN
// ============================================================================

/// How a `Pattern` decides which prefix of the remaining input to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMatchType {
    /// Grow the candidate one character at a time, keeping the longest full match, until
    /// `max_mismatch` consecutive candidates in a row fail to match.
    Open { max_mismatch: usize },
    /// Try candidate lengths from `max` down to `min` characters; the first full match wins.
    Closed { min: usize, max: usize },
}

impl Default for PatternMatchType {
    fn default() -> Self {
        PatternMatchType::Open { max_mismatch: 1 }
    }
}

#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
    match_type: PatternMatchType,
}

impl Pattern {
    /// Compiles `pattern`; it must match a candidate in full to accept it.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
            PulsarError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
            match_type: PatternMatchType::default(),
        })
    }

    pub fn with_match_type(mut self, match_type: PatternMatchType) -> Result<Self> {
        match match_type {
            PatternMatchType::Open { max_mismatch: 0 } => {
                return Err(pulsar_err!("max_mismatch must be at least 1"))
            }
            PatternMatchType::Closed { min, max } if min == 0 || min > max => {
                return Err(pulsar_err!("invalid closed pattern length {}..={}", min, max))
            }
            _ => {}
        }
        self.match_type = match_type;
        Ok(self)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn match_type(&self) -> PatternMatchType {
        self.match_type
    }
}

impl Rule for Pattern {
    fn try_recognize(
        &self,
        reader: &mut TokenReader,
        path: &SymbolPath,
        _grammar: &dyn Grammar,
    ) -> Attempt<SymbolNode> {
        let position = reader.position();
        let matched = match self.match_type {
            PatternMatchType::Open { max_mismatch } => {
                reader.try_read_pattern_within(&self.regex, max_mismatch)
            }
            PatternMatchType::Closed { min, max } => (min..=max)
                .rev()
                .find_map(|length| reader.try_read_if(length, |text| self.regex.is_match(text))),
        };
        outcome(matched, path, position)
    }
}

// ============================================================================
// CHARACTER CLASS
// ============================================================================

type CharPredicate = Arc<dyn Fn(char) -> bool + Send + Sync>;

/// The longest non-empty run of characters accepted by a predicate.
#[derive(Clone)]
pub struct CharacterClass {
    name: String,
    predicate: CharPredicate,
}

impl CharacterClass {
    pub fn new(
        name: impl Into<String>,
        predicate: impl Fn(char) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn whitespace() -> Self {
        Self::new("whitespace", char::is_whitespace)
    }

    pub fn digits() -> Self {
        Self::new("digits", |ch| ch.is_ascii_digit())
    }

    pub fn alphanumeric() -> Self {
        Self::new("alphanumeric", char::is_alphanumeric)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharacterClass")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Rule for CharacterClass {
    fn try_recognize(
        &self,
        reader: &mut TokenReader,
        path: &SymbolPath,
        _grammar: &dyn Grammar,
    ) -> Attempt<SymbolNode> {
        let position = reader.position();
        let matched = reader.try_read_while(|ch| (self.predicate)(ch));
        outcome(matched, path, position)
    }
}

// ============================================================================
// END OF INPUT
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndOfInput;

impl Rule for EndOfInput {
    fn try_recognize(
        &self,
        reader: &mut TokenReader,
        path: &SymbolPath,
        _grammar: &dyn Grammar,
    ) -> Attempt<SymbolNode> {
        let position = reader.position();
        let matched = reader.is_at_end().then(|| reader.empty_tokens());
        outcome(matched, path, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ProductionTable;

    fn attempt(rule: &dyn Rule, input: &str) -> (RecognitionResult<SymbolNode>, usize) {
        let mut reader = TokenReader::new(input);
        let result = rule
            .try_recognize(&mut reader, &SymbolPath::root("t"), &ProductionTable::new())
            .unwrap();
        (result, reader.position())
    }

    fn matched_text(rule: &dyn Rule, input: &str) -> Option<String> {
        attempt(rule, input).0.success().map(|node| node.text().to_string())
    }

    #[test]
    fn test_literal() {
        let rule = Literal::new("let").unwrap();
        assert_eq!(matched_text(&rule, "let x").as_deref(), Some("let"));
        let (result, position) = attempt(&rule, "LET x");
        assert_eq!(result.failed().map(|f| f.position()), Some(0));
        assert_eq!(position, 0);
        assert!(Literal::new("").is_err());
    }

    #[test]
    fn test_case_insensitive_literal_keeps_source_text() {
        let rule = Literal::case_insensitive("Select").unwrap();
        assert_eq!(matched_text(&rule, "SELECT *").as_deref(), Some("SELECT"));
        assert!(matched_text(&rule, "SEL").is_none());
    }

    #[test]
    fn test_open_pattern() {
        let rule = Pattern::new(r"[a-z]+").unwrap();
        assert_eq!(matched_text(&rule, "abc1").as_deref(), Some("abc"));
        assert!(matched_text(&rule, "1abc").is_none());
    }

    #[test]
    fn test_open_pattern_tolerates_gaps_within_budget() {
        let number = r"\d+(\.\d+)?";
        let strict = Pattern::new(number).unwrap();
        let lenient = Pattern::new(number)
            .unwrap()
            .with_match_type(PatternMatchType::Open { max_mismatch: 2 })
            .unwrap();
        assert_eq!(matched_text(&strict, "12.5").as_deref(), Some("12"));
        assert_eq!(matched_text(&lenient, "12.5").as_deref(), Some("12.5"));
    }

    #[test]
    fn test_closed_pattern_prefers_longest_length() {
        let rule = Pattern::new(r"[0-9a-f]+")
            .unwrap()
            .with_match_type(PatternMatchType::Closed { min: 2, max: 4 })
            .unwrap();
        assert_eq!(matched_text(&rule, "beef00").as_deref(), Some("beef"));
        assert_eq!(matched_text(&rule, "ab").as_deref(), Some("ab"));
        assert!(matched_text(&rule, "a").is_none());
    }

    #[test]
    fn test_pattern_validation() {
        assert!(matches!(Pattern::new("("), Err(PulsarError::InvalidPattern { .. })));
        let rule = Pattern::new("a").unwrap();
        assert!(rule
            .clone()
            .with_match_type(PatternMatchType::Open { max_mismatch: 0 })
            .is_err());
        assert!(rule
            .with_match_type(PatternMatchType::Closed { min: 3, max: 2 })
            .is_err());
    }

    #[test]
    fn test_character_class() {
        let rule = CharacterClass::digits();
        assert_eq!(matched_text(&rule, "2024-01").as_deref(), Some("2024"));
        assert!(matched_text(&rule, "x").is_none());
        assert_eq!(format!("{rule:?}"), "CharacterClass { name: \"digits\", .. }");
    }

    #[test]
    fn test_end_of_input() {
        let (result, _) = attempt(&EndOfInput, "");
        let node = result.success().unwrap();
        assert!(node.tokens().is_empty() && !node.tokens().is_default());
        assert!(attempt(&EndOfInput, "x").0.is_failed());
    }
}
