#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::sync::Arc;

use arborium_tree_sitter as tree_sitter;
use tree_sitter::{Language, Parser, Tree};

pub mod builtin;

pub use builtin::*;

/// User-facing language type.
pub type Lang = Arc<dyn LangImpl>;

/// Facade over a tree-sitter grammar: its name plus the ability to parse.
pub trait LangImpl: Send + Sync {
    fn name(&self) -> &str;

    fn language(&self) -> &Language;

    /// Parse a whole document.
    fn parse(&self, source: &str) -> Result<Tree, ParseError>;

    /// Parse only the given byte ranges of `source`, as an injected layer.
    ///
    /// Ranges must be sorted and non-overlapping.
    fn parse_ranges(&self, source: &str, ranges: &[tree_sitter::Range])
    -> Result<Tree, ParseError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("grammar '{name}' cannot be loaded: {message}")]
    Incompatible { name: String, message: String },

    #[error("invalid included ranges for '{name}': {message}")]
    InvalidRanges { name: String, message: String },

    #[error("parser produced no tree for '{0}'")]
    NoTree(String),
}

#[derive(Debug)]
pub struct LangInner {
    name: String,
    ts_lang: Language,
}

impl LangInner {
    pub fn new(name: &str, ts_lang: Language) -> Self {
        Self {
            name: name.to_owned(),
            ts_lang,
        }
    }

    fn parser(&self) -> Result<Parser, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.ts_lang)
            .map_err(|e| ParseError::Incompatible {
                name: self.name.clone(),
                message: e.to_string(),
            })?;
        Ok(parser)
    }
}

impl LangImpl for LangInner {
    fn name(&self) -> &str {
        &self.name
    }

    fn language(&self) -> &Language {
        &self.ts_lang
    }

    fn parse(&self, source: &str) -> Result<Tree, ParseError> {
        let mut parser = self.parser()?;
        parser
            .parse(source, None)
            .ok_or_else(|| ParseError::NoTree(self.name.clone()))
    }

    fn parse_ranges(
        &self,
        source: &str,
        ranges: &[tree_sitter::Range],
    ) -> Result<Tree, ParseError> {
        let mut parser = self.parser()?;
        parser
            .set_included_ranges(ranges)
            .map_err(|e| ParseError::InvalidRanges {
                name: self.name.clone(),
                message: e.to_string(),
            })?;
        parser
            .parse(source, None)
            .ok_or_else(|| ParseError::NoTree(self.name.clone()))
    }
}

#[cfg(test)]
mod lib_tests;
