//! Highlight category assignment and the capture-to-highlight pipeline.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use treelens_core::{NodeId, Point, Range, point_at_offset};

use crate::query::{Capture, CompiledQuery};
use crate::scope::ScopeResolver;

/// Number of highlight categories.
pub const PALETTE_SIZE: usize = 5;

/// One of the [`PALETTE_SIZE`] visual categories, numbered from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct HighlightCategory(u8);

impl HighlightCategory {
    /// Category reserved for the injection-range overlay.
    pub const INJECTION_RANGE: Self = Self(5);

    /// Category of the capture declared at `index`.
    pub fn for_index(index: usize) -> Self {
        Self((index % PALETTE_SIZE) as u8 + 1)
    }

    /// Category of capture `name`, by its position in the declared list.
    pub fn for_capture<S: AsRef<str>>(name: &str, declared: &[S]) -> Option<Self> {
        declared
            .iter()
            .position(|n| n.as_ref() == name)
            .map(Self::for_index)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn class_name(self) -> String {
        format!("query-match-color-{}", self.0)
    }
}

impl fmt::Display for HighlightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A highlighted range in the document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedHighlight {
    pub range: Range,
    pub category: HighlightCategory,
    pub capture_name: String,
    pub node_id: NodeId,
}

/// An `@name` occurrence in the query text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CaptureMark {
    pub range: Range,
    pub category: HighlightCategory,
    pub capture_name: String,
}

/// A category-tagged range with no capture behind it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Mark {
    pub range: Range,
    pub category: HighlightCategory,
}

/// Drops items whose node equals the previous kept item's node.
///
/// Only adjacent repeats collapse: `[a, a, b]` becomes `[a, b]` while
/// `[a, b, a]` is left alone.
pub fn collapse_repeats<T>(
    items: impl IntoIterator<Item = T>,
    node_of: impl Fn(&T) -> NodeId,
) -> Vec<T> {
    let mut last = None;
    items
        .into_iter()
        .filter(|item| {
            let id = node_of(item);
            if last == Some(id) {
                return false;
            }
            last = Some(id);
            true
        })
        .collect()
}

/// Resolves, collapses and categorizes the captures of one query run.
///
/// The resolver is reset before and after the pass.
pub fn resolve_highlights(
    query: &CompiledQuery,
    captures: &[Capture<'_>],
    text: &str,
    resolver: &mut ScopeResolver,
) -> Vec<ResolvedHighlight> {
    resolver.reset();
    let resolved = captures
        .iter()
        .filter_map(|capture| Some((capture, resolver.resolve(query, capture, text)?)));
    let highlights: Vec<_> = collapse_repeats(resolved, |(capture, _)| capture.node_id())
        .into_iter()
        .map(|(capture, range)| ResolvedHighlight {
            range,
            category: HighlightCategory::for_index(capture.name_index),
            capture_name: capture.name(query).to_owned(),
            node_id: capture.node_id(),
        })
        .collect();
    resolver.reset();

    debug!(
        captures = captures.len(),
        highlights = highlights.len(),
        "highlights resolved"
    );
    highlights
}

/// Marks every `@name` in the query text with its capture's category.
///
/// An occurrence followed by `.` or a word character belongs to a longer
/// name and is skipped.
pub fn capture_marks(query: &CompiledQuery) -> Vec<CaptureMark> {
    let source = query.source();
    let mut marks = Vec::new();
    for (index, name) in query.capture_names().iter().enumerate() {
        let needle = format!("@{name}");
        for (start, _) in source.match_indices(&needle) {
            let end = start + needle.len();
            let continues = source[end..]
                .chars()
                .next()
                .is_some_and(|c| c == '.' || c == '_' || c.is_alphanumeric());
            if continues {
                continue;
            }
            marks.push(CaptureMark {
                range: Range::new(
                    point_at_offset(source, Point::ZERO, start),
                    point_at_offset(source, Point::ZERO, end),
                ),
                category: HighlightCategory::for_index(index),
                capture_name: name.clone(),
            });
        }
    }
    marks
}

#[cfg(test)]
#[path = "highlight_tests.rs"]
mod highlight_tests;
