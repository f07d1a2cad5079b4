#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the treelens crates.
//!
//! Positions follow tree-sitter conventions: rows and columns are 0-based,
//! columns count bytes, and a [`Range`] is half-open (`end` is exclusive).

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod colors;

pub use colors::Colors;

// ============================================================================
// Positions
// ============================================================================

/// A position in a source document.
///
/// Ordering is lexicographic: first by row, then by column.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub const ZERO: Self = Self { row: 0, column: 0 };

    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// The position reached after writing `text` starting at `self`.
    pub fn advance(self, text: &str) -> Self {
        let mut point = self;
        for line in text.split_inclusive('\n') {
            if line.ends_with('\n') {
                point.row += 1;
                point.column = 0;
            } else {
                point.column += line.len();
            }
        }
        point
    }

    /// Moves the column by `delta`, saturating at column 0.
    pub fn offset_column(self, delta: i64) -> Self {
        let column = if delta < 0 {
            self.column.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.column.saturating_add(delta as usize)
        };
        Self { column, ..self }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Position of the byte `offset` within `text`, where `text` starts at `base`.
///
/// Offsets past the end of `text` clamp to the end.
pub fn point_at_offset(text: &str, base: Point, offset: usize) -> Point {
    let mut end = offset.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    base.advance(&text[..end])
}

/// The point just past the last byte of `text`.
pub fn end_point(text: &str) -> Point {
    Point::ZERO.advance(text)
}

/// A half-open span between two positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Point,
    pub end: Point,
}

impl Range {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Whole rows `start_row..end_row`, from column 0 to column 0.
    pub const fn rows(start_row: usize, end_row: usize) -> Self {
        Self {
            start: Point::new(start_row, 0),
            end: Point::new(end_row, 0),
        }
    }

    /// True when the range covers no bytes (or is inverted).
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains_point(&self, point: Point) -> bool {
        self.start <= point && point < self.end
    }

    pub fn contains(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Restricts the range to `extent`.
    pub fn clip(self, extent: Range) -> Self {
        let start = self.start.clamp(extent.start, extent.end);
        let end = self.end.clamp(start, extent.end);
        Self { start, end }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}]", self.start, self.end)
    }
}

// ============================================================================
// Identifiers
// ============================================================================

/// Stable identifier of a syntax node within one parse generation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a language layer.
///
/// The root layer always has identity 0; injected layers get unique,
/// non-zero identities assigned at runtime.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LayerId(pub u64);

impl LayerId {
    pub const ROOT: Self = Self(0);

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
