use std::num::NonZeroUsize;

use indoc::indoc;
use treelens_core::{Colors, NodeId};

use super::*;
use crate::test_utils::MockTree;

fn render(fixture: &str, show_anonymous_nodes: bool) -> RowSequence {
    let tree = MockTree::parse(fixture);
    render_rows(
        &tree,
        RenderOptions::default().with_anonymous_nodes(show_anonymous_nodes),
    )
}

fn interval(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

#[test]
fn nested_named_nodes() {
    let rows = render("(a (b) (c (d)))", false);

    insta::assert_snapshot!(rows, @r"
    a (0, 0) - (0, 15)
      b (0, 3) - (0, 6)
      c (0, 7) - (0, 14)
        d (0, 10) - (0, 13)
    ");

    let depths: Vec<_> = rows.iter().map(|r| r.depth).collect();
    assert_eq!(depths, [0, 1, 1, 2]);
}

#[test]
fn anonymous_nodes_hidden_by_default() {
    let rows = render(r#"(call name: (ident) "(" (args) ")")"#, false);

    insta::assert_snapshot!(rows, @r"
    call (0, 0) - (0, 35)
      name: ident (0, 12) - (0, 19)
      args (0, 24) - (0, 30)
    ");
}

#[test]
fn anonymous_nodes_quoted_when_shown() {
    let rows = render(r#"(call name: (ident) "(" (args) ")")"#, true);

    insta::assert_snapshot!(rows, @r#"
    call (0, 0) - (0, 35)
      name: ident (0, 12) - (0, 19)
      "(" (0, 20) - (0, 23)
      args (0, 24) - (0, 30)
      ")" (0, 31) - (0, 34)
    "#);
}

#[test]
fn missing_nodes_always_labelled() {
    let rows = render(r#"(stmt (expr) (MISSING ";"))"#, false);

    insta::assert_snapshot!(rows, @r"
    stmt (0, 0) - (0, 27)
      expr (0, 6) - (0, 12)
      MISSING ; (0, 13) - (0, 26)
    ");
    assert!(matches!(rows.rows()[2].label, NodeLabel::Missing(_)));
}

#[test]
fn field_label_only_on_field_child() {
    let rows = render("(fn name: (id) (body (id)))", false);

    let fields: Vec<_> = rows.iter().map(|r| r.field_name.as_deref()).collect();
    assert_eq!(fields, [None, Some("name"), None, None]);
}

#[test]
fn multi_line_positions() {
    let rows = render(
        indoc! {"
            (a
              (b)
              (c))
        "},
        false,
    );

    insta::assert_snapshot!(rows, @r"
    a (0, 0) - (2, 6)
      b (1, 2) - (1, 5)
      c (2, 2) - (2, 5)
    ");
}

#[test]
fn empty_tree_renders_nothing() {
    let rows = render_rows(MockTree::empty(), RenderOptions::default());
    assert!(rows.is_empty());
}

#[test]
fn childless_root_is_single_row() {
    let rows = render(r#"(a "x" "y")"#, false);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.rows()[0].label, NodeLabel::Named("a".into()));
}

#[test]
fn rendering_is_deterministic() {
    let fixture = r#"(a (b "+" (c)) x: (d (e) (f)))"#;
    assert_eq!(render(fixture, true), render(fixture, true));
    assert_eq!(render(fixture, false), render(fixture, false));
}

#[test]
fn rows_index_by_node_id() {
    let tree = MockTree::parse("(a (b) (c (d)))");
    let rows = render_rows(&tree, RenderOptions::default());

    assert_eq!(rows.row_for_node_id(tree.id_of("a")), Some(0));
    assert_eq!(rows.row_for_node_id(tree.id_of("d")), Some(3));
    assert_eq!(rows.row_for_node_id(NodeId(999)), None);
}

#[test]
fn hidden_anonymous_node_has_no_row() {
    let tree = MockTree::parse(r#"(a "+" (b))"#);
    let rows = render_rows(&tree, RenderOptions::default());
    assert_eq!(rows.row_for_node_id(tree.id_of("+")), None);
}

#[test]
fn yielding_does_not_change_output() {
    let tree = MockTree::parse(r#"(a (b "+" (c)) x: (d (e) (f)))"#);
    let options = RenderOptions::default()
        .with_anonymous_nodes(true)
        .with_yield_interval(interval(1));

    let mut job = RenderJob::new(&tree, options, CancellationToken::detached());
    let mut yields = 0;
    let rows = loop {
        match job.resume() {
            RenderStep::Yielded(next) => {
                yields += 1;
                job = next;
            }
            RenderStep::Cancelled => panic!("detached job cancelled"),
            RenderStep::Complete(rows) => break rows,
        }
    };

    assert!(yields > 10);
    assert_eq!(rows, render_rows(&tree, RenderOptions::default().with_anonymous_nodes(true)));
}

#[test]
fn stale_job_is_discarded_on_resume() {
    let tree = MockTree::parse("(a (b) (c (d)))");
    let counter = GenerationCounter::new();
    let options = RenderOptions::default().with_yield_interval(interval(2));

    let first = RenderJob::new(&tree, options, counter.advance());
    let RenderStep::Yielded(first) = first.resume() else {
        panic!("expected the first slice to yield");
    };

    let second = RenderJob::new(&tree, options, counter.advance());
    let rows = second.run_to_completion().expect("newest render completes");
    assert_eq!(rows.generation(), Generation(2));
    assert_eq!(rows.len(), 4);

    assert!(matches!(first.resume(), RenderStep::Cancelled));
}

#[test]
fn job_cancelled_before_first_slice() {
    let tree = MockTree::parse("(a)");
    let counter = GenerationCounter::new();
    let job = RenderJob::new(&tree, RenderOptions::default(), counter.advance());
    counter.advance();
    assert!(job.run_to_completion().is_none());
}

#[test]
fn generation_tokens() {
    let counter = GenerationCounter::new();
    assert_eq!(counter.current(), Generation(0));

    let a = counter.advance();
    assert_eq!(a.generation(), Generation(1));
    assert!(!a.is_cancelled());

    let b = counter.token();
    assert_eq!(b.generation(), Generation(1));

    counter.advance();
    assert!(a.is_cancelled());
    assert!(b.is_cancelled());
    assert!(!CancellationToken::detached().is_cancelled());
}

#[test]
fn colored_row() {
    let rows = render(r#"(a f: (b) "+")"#, true);
    let line = rows.rows()[1].to_colored_string(Colors::ON);
    assert_eq!(
        line,
        "  \x1b[2mf:\x1b[0m \x1b[34mb\x1b[0m \x1b[2m(0, 6) - (0, 9)\x1b[0m"
    );
}

#[test]
fn options_deserialize_kebab_case() {
    let options: RenderOptions =
        serde_json::from_str(r#"{"show-anonymous-nodes": true}"#).unwrap();
    assert!(options.show_anonymous_nodes);
    assert_eq!(options.yield_interval, DEFAULT_YIELD_INTERVAL);
}

#[test]
#[cfg(feature = "lang-json")]
fn renders_parsed_json() {
    let tree = treelens_langs::json().parse(r#"{"a": 1}"#).unwrap();
    let rows = render_rows(&tree, RenderOptions::default());

    let first = &rows.rows()[0];
    assert_eq!(first.label, NodeLabel::Named("document".into()));
    assert_eq!(first.depth, 0);
    assert!(
        rows.iter()
            .any(|r| r.field_name.as_deref() == Some("key") && r.label.node_type() == "string")
    );
    for pair in rows.rows().windows(2) {
        assert!(pair[1].depth <= pair[0].depth + 1);
    }
}
