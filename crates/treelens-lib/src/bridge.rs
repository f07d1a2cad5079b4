//! Mapping between source positions, rendered rows and node identities.

use std::fmt;

use serde::Serialize;

use treelens_core::{NodeId, Point, Range};

use crate::cursor::{SyntaxCursor, SyntaxTree};

/// Snapshot of one node, detached from the tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeInfo {
    pub id: NodeId,
    pub kind: String,
    pub is_named: bool,
    pub is_missing: bool,
    pub range: Range,
}

impl NodeInfo {
    fn at<C: SyntaxCursor>(cursor: &C) -> Self {
        Self {
            id: cursor.node_id(),
            kind: cursor.kind().to_owned(),
            is_named: cursor.is_named(),
            is_missing: cursor.is_missing(),
            range: cursor.range(),
        }
    }
}

/// What a failed lookup was looking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum NodeLookup {
    Row(usize),
    Id(NodeId),
    Position(Point),
}

impl fmt::Display for NodeLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(index) => write!(f, "no row {index}"),
            Self::Id(id) => write!(f, "no node with id {id}"),
            Self::Position(point) => write!(f, "no node at {point}"),
        }
    }
}

/// Nodes from the root down to the deepest node spanning `target`.
///
/// Containment follows tree-sitter: a child is entered when it reaches the
/// end of `target`, starts at or before its start, and extends past its
/// start (or touches it, for zero-width children).
pub fn node_path_at<C: SyntaxCursor>(mut cursor: C, target: Range) -> Vec<NodeInfo> {
    let mut path = vec![NodeInfo::at(&cursor)];
    'descend: while cursor.goto_first_child() {
        loop {
            let start = cursor.start_position();
            let end = cursor.end_position();
            let reaches_end = end >= target.end;
            let passes_start = if start == end {
                end >= target.start
            } else {
                end > target.start
            };
            if reaches_end && passes_start {
                if target.start < start {
                    break 'descend;
                }
                path.push(NodeInfo::at(&cursor));
                continue 'descend;
            }
            if !cursor.goto_next_sibling() {
                break 'descend;
            }
        }
    }
    path
}

/// The innermost node spanning `target`; named nodes only unless
/// `include_anonymous`. Falls back to the root.
pub fn node_at_range<T: SyntaxTree>(
    tree: &T,
    target: Range,
    include_anonymous: bool,
) -> Option<NodeInfo> {
    let mut path = node_path_at(tree.walk()?, target);
    let deepest = path
        .iter()
        .rposition(|n| include_anonymous || n.is_named)
        .unwrap_or(0);
    Some(path.swap_remove(deepest))
}

pub fn node_at_position<T: SyntaxTree>(
    tree: &T,
    point: Point,
    include_anonymous: bool,
) -> Option<NodeInfo> {
    node_at_range(tree, Range::new(point, point), include_anonymous)
}

/// The node `id` if it encloses `point`.
///
/// Used to map a rendered row back onto a live tree: rows only carry ids,
/// and ids are only valid for the tree they were rendered from.
pub fn find_node_at<T: SyntaxTree>(tree: &T, point: Point, id: NodeId) -> Option<NodeInfo> {
    node_path_at(tree.walk()?, Range::new(point, point))
        .into_iter()
        .find(|n| n.id == id)
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod bridge_tests;
