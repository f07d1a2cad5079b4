//! Scope resolution: narrows a capture to the range worth highlighting.
//!
//! Patterns refine their captures with predicates:
//!
//! ```text
//! ((string) @str
//!   (#is-not? test.descendantOfType "comment")
//!   (#set! adjust.startAt firstChild.endPosition)
//!   (#set! adjust.endAt lastChild.startPosition)
//!   (#set! capture.final))
//! ```
//!
//! `test.*` keys reject captures, `adjust.*` keys move the range edges and
//! `capture.*` keys arbitrate between captures that land on the same range.

use std::collections::HashMap;

use arborium_tree_sitter::Node;
use tracing::trace;

use treelens_core::{Point, Range, point_at_offset};

use crate::cursor::to_point;
use crate::query::{Capture, CompiledQuery};

mod descriptor;
mod rules;

pub(crate) use rules::PatternRules;
use rules::{Adjustment, Claim, default_edge};

/// A position together with its byte offset in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Anchor {
    pub(crate) point: Point,
    pub(crate) byte: usize,
}

#[derive(Clone, Copy, Debug)]
struct Span {
    start: Anchor,
    end: Anchor,
}

impl Span {
    fn of(node: &Node<'_>) -> Self {
        Self {
            start: Anchor {
                point: to_point(node.start_position()),
                byte: node.start_byte(),
            },
            end: Anchor {
                point: to_point(node.end_position()),
                byte: node.end_byte(),
            },
        }
    }

    fn range(&self) -> Range {
        Range::new(self.start.point, self.end.point)
    }

    fn apply(mut self, adjustment: &Adjustment, node: Node<'_>, text: &str) -> Option<Self> {
        match adjustment {
            Adjustment::StartAt(d) => self.start = d.resolve(node, default_edge(adjustment))?,
            Adjustment::EndAt(d) => self.end = d.resolve(node, default_edge(adjustment))?,
            Adjustment::OffsetStart(delta) => self.start = shift(self.start, *delta),
            Adjustment::OffsetEnd(delta) => self.end = shift(self.end, *delta),
            Adjustment::AroundFirstMatch(re) => {
                let (start, end) = self.first_match(re, text)?;
                self.start = start;
                self.end = end;
            }
            Adjustment::StartBeforeFirstMatch(re) => self.start = self.first_match(re, text)?.0,
            Adjustment::EndAfterFirstMatch(re) => self.end = self.first_match(re, text)?.1,
        }
        Some(self)
    }

    fn first_match(
        &self,
        re: &regex_automata::meta::Regex,
        text: &str,
    ) -> Option<(Anchor, Anchor)> {
        let haystack = text.get(self.start.byte..self.end.byte)?;
        let m = re.find(haystack)?;
        let anchor = |offset: usize| Anchor {
            point: point_at_offset(haystack, self.start.point, offset),
            byte: self.start.byte + offset,
        };
        Some((anchor(m.start()), anchor(m.end())))
    }
}

/// Moves an anchor along its row. Columns are bytes, so the byte offset moves
/// with it.
fn shift(anchor: Anchor, delta: i64) -> Anchor {
    let point = anchor.point.offset_column(delta);
    let moved = point.column as i64 - anchor.point.column as i64;
    Anchor {
        point,
        byte: anchor.byte.saturating_add_signed(moved as isize),
    }
}

#[derive(Debug, Default)]
struct ClaimedRange {
    names: Vec<usize>,
    is_final: bool,
}

/// Resolves captures for one highlight pass.
///
/// Holds the ranges claimed so far; call [`reset`](Self::reset) before and
/// after each pass.
#[derive(Debug, Default)]
pub struct ScopeResolver {
    claimed: HashMap<Range, ClaimedRange>,
}

impl ScopeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.claimed.clear();
    }

    /// The range to highlight for `capture`, or `None` when the capture
    /// should not be rendered.
    pub fn resolve(
        &mut self,
        query: &CompiledQuery,
        capture: &Capture<'_>,
        text: &str,
    ) -> Option<Range> {
        let rules = query.rules(capture.pattern_index);
        let name = capture.name_index;
        let node = capture.node;

        if rules.tests_for(name).any(|test| !test.passes(node)) {
            trace!(node = node.id(), capture = capture.name(query), "test failed");
            return None;
        }

        let mut span = Span::of(&node);
        let mut adjusted = false;
        for adjustment in rules.adjustments_for(name) {
            adjusted = true;
            let Some(next) = span.apply(adjustment, node, text) else {
                trace!(node = node.id(), capture = capture.name(query), "adjustment failed");
                return None;
            };
            span = next;
        }

        let range = span.range();
        if adjusted && range.is_empty() {
            trace!(node = node.id(), %range, "adjusted range is empty");
            return None;
        }

        let shy = rules.has_claim(name, Claim::Shy);
        let is_final = rules.has_claim(name, Claim::Final);
        self.claim(range, name, shy, is_final)
    }

    fn claim(&mut self, range: Range, name: usize, shy: bool, is_final: bool) -> Option<Range> {
        if let Some(existing) = self.claimed.get(&range)
            && (existing.is_final || shy || existing.names.contains(&name))
        {
            trace!(%range, "range already claimed");
            return None;
        }
        let entry = self.claimed.entry(range).or_default();
        entry.names.push(name);
        entry.is_final |= is_final;
        Some(range)
    }
}
