//! Cursor abstraction over syntax trees.
//!
//! The renderer and the position bridge only need first-child / next-sibling /
//! parent navigation plus per-node introspection, so they are written against
//! [`SyntaxCursor`] rather than a concrete tree type.

use arborium_tree_sitter::{Node, Tree, TreeCursor};

use treelens_core::{NodeId, Point, Range};

/// A movable position inside one syntax tree.
pub trait SyntaxCursor {
    fn goto_first_child(&mut self) -> bool;
    fn goto_next_sibling(&mut self) -> bool;
    fn goto_parent(&mut self) -> bool;

    fn kind(&self) -> &str;
    fn is_named(&self) -> bool;
    fn is_missing(&self) -> bool;
    fn start_position(&self) -> Point;
    fn end_position(&self) -> Point;

    /// Field name of the current node relative to its parent.
    fn field_name(&self) -> Option<&str>;
    fn node_id(&self) -> NodeId;

    /// Pre-order index of the current node relative to the cursor's root.
    fn descendant_index(&self) -> usize;
    fn goto_descendant(&mut self, index: usize);

    fn range(&self) -> Range {
        Range::new(self.start_position(), self.end_position())
    }
}

/// A tree that can hand out cursors positioned at its root.
pub trait SyntaxTree {
    type Cursor<'a>: SyntaxCursor
    where
        Self: 'a;

    /// `None` when the tree has no root node.
    fn walk(&self) -> Option<Self::Cursor<'_>>;
}

impl<T: SyntaxTree> SyntaxTree for &T {
    type Cursor<'a>
        = T::Cursor<'a>
    where
        Self: 'a;

    fn walk(&self) -> Option<Self::Cursor<'_>> {
        (**self).walk()
    }
}

impl SyntaxTree for Tree {
    type Cursor<'a> = TreeCursor<'a>;

    fn walk(&self) -> Option<Self::Cursor<'_>> {
        Some(Tree::walk(self))
    }
}

impl SyntaxCursor for TreeCursor<'_> {
    #[inline]
    fn goto_first_child(&mut self) -> bool {
        TreeCursor::goto_first_child(self)
    }

    #[inline]
    fn goto_next_sibling(&mut self) -> bool {
        TreeCursor::goto_next_sibling(self)
    }

    #[inline]
    fn goto_parent(&mut self) -> bool {
        TreeCursor::goto_parent(self)
    }

    fn kind(&self) -> &str {
        self.node().kind()
    }

    fn is_named(&self) -> bool {
        self.node().is_named()
    }

    fn is_missing(&self) -> bool {
        self.node().is_missing()
    }

    fn start_position(&self) -> Point {
        to_point(self.node().start_position())
    }

    fn end_position(&self) -> Point {
        to_point(self.node().end_position())
    }

    fn field_name(&self) -> Option<&str> {
        TreeCursor::field_name(self)
    }

    fn node_id(&self) -> NodeId {
        NodeId(self.node().id())
    }

    #[inline]
    fn descendant_index(&self) -> usize {
        TreeCursor::descendant_index(self)
    }

    #[inline]
    fn goto_descendant(&mut self, index: usize) {
        TreeCursor::goto_descendant(self, index);
    }
}

pub(crate) fn to_point(point: arborium_tree_sitter::Point) -> Point {
    Point::new(point.row, point.column)
}

pub(crate) fn to_ts_point(point: Point) -> arborium_tree_sitter::Point {
    arborium_tree_sitter::Point {
        row: point.row,
        column: point.column,
    }
}

pub(crate) fn node_range(node: &Node<'_>) -> Range {
    Range::new(to_point(node.start_position()), to_point(node.end_position()))
}
