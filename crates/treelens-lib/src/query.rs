//! Query compilation and execution.

use std::fmt;
use std::sync::Arc;

use arborium_tree_sitter::{Node, Query, QueryCursor, QueryErrorKind};
use serde::Serialize;
use streaming_iterator::StreamingIterator;
use tracing::debug;

use treelens_core::{NodeId, Point, Range, end_point, point_at_offset};
use treelens_langs::Lang;

use crate::cursor::to_ts_point;
use crate::scope::PatternRules;

/// Failure to compile query text against a grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} error at row {row}, column {column}: {message}")]
pub struct QueryCompileError {
    pub kind: CompileErrorKind,
    pub row: usize,
    pub column: usize,
    pub message: String,
}

impl QueryCompileError {
    pub(crate) fn predicate(at: Point, message: impl Into<String>) -> Self {
        Self {
            kind: CompileErrorKind::Predicate,
            row: at.row,
            column: at.column,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompileErrorKind {
    Syntax,
    NodeType,
    Field,
    Capture,
    Predicate,
    Structure,
    Language,
}

impl fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Syntax => "syntax",
            Self::NodeType => "node type",
            Self::Field => "field",
            Self::Capture => "capture",
            Self::Predicate => "predicate",
            Self::Structure => "structure",
            Self::Language => "language",
        })
    }
}

impl From<arborium_tree_sitter::QueryError> for QueryCompileError {
    fn from(err: arborium_tree_sitter::QueryError) -> Self {
        let (kind, message) = match err.kind {
            QueryErrorKind::Syntax => (CompileErrorKind::Syntax, "invalid syntax".to_owned()),
            QueryErrorKind::NodeType => (
                CompileErrorKind::NodeType,
                format!("invalid node type {}", err.message),
            ),
            QueryErrorKind::Field => (
                CompileErrorKind::Field,
                format!("invalid field name {}", err.message),
            ),
            QueryErrorKind::Capture => (
                CompileErrorKind::Capture,
                format!("invalid capture name {}", err.message),
            ),
            QueryErrorKind::Predicate => (CompileErrorKind::Predicate, err.message),
            QueryErrorKind::Structure => (CompileErrorKind::Structure, "impossible pattern".to_owned()),
            QueryErrorKind::Language => (CompileErrorKind::Language, err.message),
        };
        Self {
            kind,
            row: err.row,
            column: err.column,
            message,
        }
    }
}

/// A query compiled against one grammar.
///
/// Cheap to clone; clones share the underlying tree-sitter query.
#[derive(Clone)]
pub struct CompiledQuery {
    query: Arc<Query>,
    grammar: String,
    source: Arc<str>,
    capture_names: Arc<[String]>,
    rules: Arc<[PatternRules]>,
}

impl fmt::Debug for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledQuery")
            .field("grammar", &self.grammar)
            .field("capture_names", &self.capture_names)
            .field("patterns", &self.rules.len())
            .finish()
    }
}

impl CompiledQuery {
    pub fn compile(source: &str, lang: &Lang) -> Result<Self, QueryCompileError> {
        let query = match Query::new(lang.language(), source) {
            Ok(query) => query,
            Err(err) => {
                let err = QueryCompileError::from(err);
                debug!(grammar = lang.name(), %err, "query compile failed");
                return Err(err);
            }
        };

        let rules = (0..query.pattern_count())
            .map(|pattern| PatternRules::from_query(&query, pattern, source))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|err| debug!(grammar = lang.name(), %err, "query compile failed"))?;

        let capture_names: Vec<String> =
            query.capture_names().iter().map(|&n| n.to_owned()).collect();
        debug!(
            grammar = lang.name(),
            patterns = query.pattern_count(),
            captures = capture_names.len(),
            "query compiled"
        );

        Ok(Self {
            query: Arc::new(query),
            grammar: lang.name().to_owned(),
            source: source.into(),
            capture_names: capture_names.into(),
            rules: rules.into(),
        })
    }

    /// Name of the grammar the query was compiled against.
    pub fn grammar(&self) -> &str {
        &self.grammar
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Declared capture names, deduplicated, in declaration order.
    pub fn capture_names(&self) -> &[String] {
        &self.capture_names
    }

    pub fn capture_index(&self, name: &str) -> Option<usize> {
        self.capture_names.iter().position(|n| n == name)
    }

    pub fn pattern_count(&self) -> usize {
        self.rules.len()
    }

    pub(crate) fn rules(&self, pattern: usize) -> &PatternRules {
        &self.rules[pattern]
    }

    /// Runs the query over `root`, restricted to `bounds`.
    ///
    /// `text` is the whole document the tree was parsed from. Without
    /// explicit bounds the query covers the whole document; explicit bounds
    /// are clipped to it. Captures come back in tree-sitter's order, which is
    /// not necessarily document order.
    pub fn execute<'t>(&self, root: Node<'t>, text: &str, bounds: Option<Range>) -> Vec<Capture<'t>> {
        let extent = Range::new(Point::ZERO, end_point(text));
        let bounds = bounds.unwrap_or(extent).clip(extent);

        let mut cursor = QueryCursor::new();
        cursor.set_point_range(to_ts_point(bounds.start)..to_ts_point(bounds.end));

        let mut out = Vec::new();
        let mut captures = cursor.captures(&self.query, root, text.as_bytes());
        while let Some((m, index)) = captures.next() {
            let capture = m.captures[*index];
            out.push(Capture {
                name_index: capture.index as usize,
                pattern_index: m.pattern_index,
                node: capture.node,
            });
        }
        out
    }
}

/// One query result: a captured node and the name it was captured under.
#[derive(Clone, Copy, Debug)]
pub struct Capture<'t> {
    /// Index into [`CompiledQuery::capture_names`].
    pub name_index: usize,
    pub pattern_index: usize,
    pub node: Node<'t>,
}

impl Capture<'_> {
    pub fn name<'q>(&self, query: &'q CompiledQuery) -> &'q str {
        &query.capture_names[self.name_index]
    }

    pub fn node_id(&self) -> NodeId {
        NodeId(self.node.id())
    }
}

/// Position of byte `offset` of the query text.
pub(crate) fn query_point(source: &str, offset: usize) -> Point {
    point_at_offset(source, Point::ZERO, offset)
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod query_tests;
