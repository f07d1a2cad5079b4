//! In-memory syntax trees for renderer and bridge tests.
//!
//! A fixture is an s-expression whose node positions are the node's own span
//! in the fixture text:
//!
//! ```text
//! (a (b) field: (c "(" (MISSING d)))
//! ```
//!
//! `(kind ...)` is a named node, `"text"` an anonymous leaf, `name: node`
//! attaches a field name, and `(MISSING kind)` / `(MISSING "text")` is a
//! missing placeholder.

use treelens_core::{NodeId, Point, Range};

use crate::cursor::{SyntaxCursor, SyntaxTree};

#[derive(Debug, Clone)]
struct MockNode {
    kind: String,
    named: bool,
    missing: bool,
    field: Option<String>,
    range: Range,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Nodes are stored in pre-order, so a node's index is its descendant index.
#[derive(Debug, Clone, Default)]
pub struct MockTree {
    nodes: Vec<MockNode>,
}

impl MockTree {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn parse(fixture: &str) -> Self {
        let mut parser = FixtureParser {
            text: fixture,
            pos: 0,
            nodes: Vec::new(),
        };
        parser.skip_ws();
        parser.node(None, None);
        parser.skip_ws();
        assert_eq!(parser.pos, fixture.len(), "trailing input in fixture");
        Self {
            nodes: parser.nodes,
        }
    }

    /// Id of the first node of `kind` in pre-order.
    pub fn id_of(&self, kind: &str) -> NodeId {
        let index = self
            .nodes
            .iter()
            .position(|n| n.kind == kind)
            .unwrap_or_else(|| panic!("no node of kind {kind}"));
        NodeId(index + 1)
    }

    pub fn range_of(&self, kind: &str) -> Range {
        self.nodes[self.id_of(kind).0 - 1].range
    }
}

impl SyntaxTree for MockTree {
    type Cursor<'a> = MockCursor<'a>;

    fn walk(&self) -> Option<Self::Cursor<'_>> {
        (!self.nodes.is_empty()).then_some(MockCursor {
            tree: self,
            current: 0,
        })
    }
}

pub struct MockCursor<'a> {
    tree: &'a MockTree,
    current: usize,
}

impl MockCursor<'_> {
    fn node(&self) -> &MockNode {
        &self.tree.nodes[self.current]
    }
}

impl SyntaxCursor for MockCursor<'_> {
    fn goto_first_child(&mut self) -> bool {
        match self.node().children.first() {
            Some(&child) => {
                self.current = child;
                true
            }
            None => false,
        }
    }

    fn goto_next_sibling(&mut self) -> bool {
        let Some(parent) = self.node().parent else {
            return false;
        };
        let siblings = &self.tree.nodes[parent].children;
        let at = siblings.iter().position(|&c| c == self.current);
        match at.and_then(|i| siblings.get(i + 1)) {
            Some(&next) => {
                self.current = next;
                true
            }
            None => false,
        }
    }

    fn goto_parent(&mut self) -> bool {
        match self.node().parent {
            Some(parent) => {
                self.current = parent;
                true
            }
            None => false,
        }
    }

    fn kind(&self) -> &str {
        &self.node().kind
    }

    fn is_named(&self) -> bool {
        self.node().named
    }

    fn is_missing(&self) -> bool {
        self.node().missing
    }

    fn start_position(&self) -> Point {
        self.node().range.start
    }

    fn end_position(&self) -> Point {
        self.node().range.end
    }

    fn field_name(&self) -> Option<&str> {
        self.node().field.as_deref()
    }

    fn node_id(&self) -> NodeId {
        NodeId(self.current + 1)
    }

    fn descendant_index(&self) -> usize {
        self.current
    }

    fn goto_descendant(&mut self, index: usize) {
        self.current = index;
    }
}

struct FixtureParser<'s> {
    text: &'s str,
    pos: usize,
    nodes: Vec<MockNode>,
}

impl FixtureParser<'_> {
    fn point(&self, offset: usize) -> Point {
        treelens_core::point_at_offset(self.text, Point::ZERO, offset)
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn word(&mut self) -> &str {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.')
        {
            self.pos += 1;
        }
        &self.text[start..self.pos]
    }

    fn quoted(&mut self) -> String {
        assert_eq!(self.peek(), Some('"'));
        self.pos += 1;
        let start = self.pos;
        while self.peek().is_some_and(|c| c != '"') {
            self.pos += self.peek().map_or(1, char::len_utf8);
        }
        let text = self.text[start..self.pos].to_owned();
        self.pos += 1;
        text
    }

    fn push(&mut self, node: MockNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn node(&mut self, parent: Option<usize>, field: Option<String>) -> usize {
        let start = self.pos;
        let index = self.push(MockNode {
            kind: String::new(),
            named: true,
            missing: false,
            field,
            range: Range::default(),
            parent,
            children: Vec::new(),
        });

        if self.peek() == Some('"') {
            let kind = self.quoted();
            let node = &mut self.nodes[index];
            node.kind = kind;
            node.named = false;
        } else {
            assert_eq!(self.peek(), Some('('), "expected node at {}", self.pos);
            self.pos += 1;
            let mut kind = self.word().to_owned();
            if kind == "MISSING" {
                self.skip_ws();
                self.nodes[index].missing = true;
                if self.peek() == Some('"') {
                    kind = self.quoted();
                    self.nodes[index].named = false;
                } else {
                    kind = self.word().to_owned();
                }
            }
            self.nodes[index].kind = kind;

            loop {
                self.skip_ws();
                match self.peek() {
                    Some(')') => {
                        self.pos += 1;
                        break;
                    }
                    Some('(') | Some('"') => {
                        let child = self.node(Some(index), None);
                        self.nodes[index].children.push(child);
                    }
                    Some(_) => {
                        let name = self.word().to_owned();
                        assert_eq!(self.peek(), Some(':'), "expected field at {}", self.pos);
                        self.pos += 1;
                        self.skip_ws();
                        let child = self.node(Some(index), Some(name));
                        self.nodes[index].children.push(child);
                    }
                    None => panic!("unclosed node in fixture"),
                }
            }
        }

        self.nodes[index].range = Range::new(self.point(start), self.point(self.pos));
        index
    }
}
