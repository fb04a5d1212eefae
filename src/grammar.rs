//! # Grammars
//!
//! A grammar is anything that can resolve a production symbol to its rule. Rules are the
//! recognizers behind productions and terminal references; they receive the shared reader, the
//! symbol path they are being recognized under, and the grammar for further lookups.
//!
//! `ProductionTable` is the stock grammar: an immutable map from symbol to production plus an
//! optional root symbol. Cloning one is cheap, and a built table is read-only, so any number
//! of recognitions (each with its own `TokenReader`) may share it across threads.

use std::fmt;
use std::sync::Arc;

use im::HashMap;
use tracing::trace;

use crate::diagnostics::{PulsarError, Result};
use crate::node::SymbolNode;
use crate::path::SymbolPath;
use crate::reader::TokenReader;
use crate::recognition::Attempt;

// ============================================================================
// CORE TRAITS
// ============================================================================

/// A recognizer producing one node.
///
/// The node's symbol is `path.symbol()`. An implementation must leave the reader where it
/// found it when returning a failed recognition.
pub trait Rule: fmt::Debug + Send + Sync {
    fn try_recognize(
        &self,
        reader: &mut TokenReader,
        path: &SymbolPath,
        grammar: &dyn Grammar,
    ) -> Attempt<SymbolNode>;
}

/// Resolves production symbols to productions.
pub trait Grammar: Send + Sync {
    fn root(&self) -> Option<&str>;

    fn production(&self, symbol: &str) -> Option<&Production>;
}

// ============================================================================
// PRODUCTIONS
// ============================================================================

#[derive(Debug, Clone)]
pub struct Production {
    symbol: String,
    rule: Arc<dyn Rule>,
}

impl Production {
    pub fn new(symbol: impl Into<String>, rule: Arc<dyn Rule>) -> Self {
        Self {
            symbol: symbol.into(),
            rule,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn rule(&self) -> &Arc<dyn Rule> {
        &self.rule
    }

    /// Recognizes this production below `parent`.
    pub fn try_recognize(
        &self,
        reader: &mut TokenReader,
        parent: &SymbolPath,
        grammar: &dyn Grammar,
    ) -> Attempt<SymbolNode> {
        let path = parent.child(self.symbol.as_str());
        trace!(production = %path, position = reader.position(), "enter");
        let result = self.rule.try_recognize(reader, &path, grammar)?;
        trace!(
            production = %path,
            position = reader.position(),
            success = result.is_success(),
            "exit"
        );
        Ok(result)
    }
}

// ============================================================================
// PRODUCTION TABLE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ProductionTable {
    root: Option<String>,
    productions: HashMap<String, Arc<Production>>,
}

impl ProductionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a production. Symbols are unique within a table.
    pub fn register(&mut self, symbol: impl Into<String>, rule: impl Rule + 'static) -> Result<()> {
        self.register_shared(symbol, Arc::new(rule))
    }

    pub fn register_shared(&mut self, symbol: impl Into<String>, rule: Arc<dyn Rule>) -> Result<()> {
        let symbol = symbol.into();
        if self.productions.contains_key(&symbol) {
            return Err(PulsarError::DuplicateProduction { symbol });
        }
        let production = Arc::new(Production::new(symbol.clone(), rule));
        self.productions.insert(symbol, production);
        Ok(())
    }

    /// Selects the production `recognize` starts from. It must already be registered.
    pub fn set_root(&mut self, symbol: impl Into<String>) -> Result<()> {
        let symbol = symbol.into();
        if !self.productions.contains_key(&symbol) {
            return Err(PulsarError::UnknownProduction { symbol });
        }
        self.root = Some(symbol);
        Ok(())
    }

    pub fn get(&self, symbol: &str) -> Option<&Arc<Production>> {
        self.productions.get(symbol)
    }

    pub fn list(&self) -> Vec<String> {
        self.productions.keys().cloned().collect()
    }

    pub fn has(&self, symbol: &str) -> bool {
        self.productions.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.productions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    // ------------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------------

    /// Recognizes the root production at the start of `text`.
    pub fn recognize(&self, text: &str) -> Attempt<SymbolNode> {
        let mut reader = TokenReader::new(text);
        self.recognize_at(&mut reader)
    }

    /// Recognizes the root production at the reader's position.
    pub fn recognize_at(&self, reader: &mut TokenReader) -> Attempt<SymbolNode> {
        let root = self.root.as_deref().ok_or(PulsarError::MissingRoot)?;
        self.recognize_symbol(root, reader)
    }

    /// Recognizes any registered production at the reader's position.
    pub fn recognize_symbol(&self, symbol: &str, reader: &mut TokenReader) -> Attempt<SymbolNode> {
        let production = self.get(symbol).ok_or_else(|| PulsarError::UnknownProduction {
            symbol: symbol.to_string(),
        })?;
        production.try_recognize(reader, &SymbolPath::default(), self)
    }
}

impl Grammar for ProductionTable {
    fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    fn production(&self, symbol: &str) -> Option<&Production> {
        self.productions.get(symbol).map(Arc::as_ref)
    }
}
