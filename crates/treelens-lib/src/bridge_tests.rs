use treelens_core::{NodeId, Point, Range};

use super::*;
use crate::test_utils::MockTree;

const FIXTURE: &str = r#"(a (b) (c (d)) "(")"#;

fn kind_at(tree: &MockTree, point: Point, include_anonymous: bool) -> String {
    node_at_position(tree, point, include_anonymous).unwrap().kind
}

#[test]
fn deepest_named_node() {
    let tree = MockTree::parse(FIXTURE);
    assert_eq!(kind_at(&tree, Point::new(0, 11), false), "d");
    assert_eq!(kind_at(&tree, Point::new(0, 4), false), "b");
    assert_eq!(kind_at(&tree, Point::new(0, 8), false), "c");
}

#[test]
fn gap_between_children_resolves_to_parent() {
    let tree = MockTree::parse(FIXTURE);
    assert_eq!(kind_at(&tree, Point::new(0, 2), false), "a");
}

#[test]
fn end_of_child_is_exclusive() {
    let tree = MockTree::parse(FIXTURE);
    // b ends at column 6 and c starts at column 7
    assert_eq!(kind_at(&tree, Point::new(0, 6), false), "a");
}

#[test]
fn anonymous_nodes_only_on_request() {
    let tree = MockTree::parse(FIXTURE);
    assert_eq!(kind_at(&tree, Point::new(0, 16), false), "a");
    assert_eq!(kind_at(&tree, Point::new(0, 16), true), "(");
}

#[test]
fn outside_document_falls_back_to_root() {
    let tree = MockTree::parse(FIXTURE);
    let node = node_at_position(&tree, Point::new(5, 0), false).unwrap();
    assert_eq!(node.kind, "a");
    assert_eq!(node.id, tree.id_of("a"));
}

#[test]
fn empty_tree_has_no_node() {
    assert!(node_at_position(&MockTree::empty(), Point::ZERO, true).is_none());
}

#[test]
fn path_runs_root_to_leaf() {
    let tree = MockTree::parse(FIXTURE);
    let path = node_path_at(
        tree.walk().unwrap(),
        Range::new(Point::new(0, 11), Point::new(0, 11)),
    );
    let kinds: Vec<_> = path.iter().map(|n| n.kind.as_str()).collect();
    assert_eq!(kinds, ["a", "c", "d"]);
    assert_eq!(path[1].range, tree.range_of("c"));
}

#[test]
fn range_must_fit_inside_node() {
    let tree = MockTree::parse(FIXTURE);
    // spans b and c, so only a contains it
    let target = Range::new(Point::new(0, 4), Point::new(0, 11));
    assert_eq!(node_at_range(&tree, target, false).unwrap().kind, "a");

    let target = Range::new(Point::new(0, 10), Point::new(0, 13));
    assert_eq!(node_at_range(&tree, target, false).unwrap().kind, "d");
}

#[test]
fn find_node_checks_ancestor_chain() {
    let tree = MockTree::parse(FIXTURE);
    let c = tree.id_of("c");
    let found = find_node_at(&tree, Point::new(0, 11), c).unwrap();
    assert_eq!(found.kind, "c");
    assert!(find_node_at(&tree, Point::new(0, 11), tree.id_of("b")).is_none());
    assert!(find_node_at(&tree, Point::new(0, 11), NodeId(99)).is_none());
}

#[test]
fn lookup_display() {
    assert_eq!(NodeLookup::Row(3).to_string(), "no row 3");
    assert_eq!(NodeLookup::Id(NodeId(7)).to_string(), "no node with id 7");
    assert_eq!(
        NodeLookup::Position(Point::new(1, 2)).to_string(),
        "no node at (1, 2)"
    );
}

#[cfg(feature = "lang-json")]
#[test]
fn json_positions() {
    let json = treelens_langs::from_name("json").unwrap();
    let tree = json.parse(r#"{"a": 1}"#).unwrap();

    let number = node_at_position(&tree, Point::new(0, 6), false).unwrap();
    assert_eq!(number.kind, "number");
    assert!(number.is_named);
    assert_eq!(number.range.to_string(), "[(0, 6) - (0, 7)]");

    assert_eq!(
        node_at_position(&tree, Point::new(0, 4), false).unwrap().kind,
        "pair"
    );
    let colon = node_at_position(&tree, Point::new(0, 4), true).unwrap();
    assert_eq!(colon.kind, ":");
    assert!(!colon.is_named);
}
