//! Run a query against a source file and print the highlights.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use treelens_core::{Colors, Range};
use treelens_lib::highlight::Mark;
use treelens_lib::{Inspector, InspectorOptions, ResolvedHighlight};

use super::run_common::{self, SourceArgs, fail};

pub struct QueryArgs {
    pub source: SourceArgs,
    pub query_text: Option<String>,
    pub query_file: Option<PathBuf>,
    pub rows: Option<String>,
    pub layer: Option<u64>,
    pub injection_ranges: bool,
    pub color: bool,
    pub json: bool,
}

#[derive(Serialize)]
struct QueryOutput<'a> {
    grammar: &'a str,
    captures: &'a [String],
    highlights: &'a [ResolvedHighlight],
    injection_ranges: &'a [Mark],
}

pub fn run(args: QueryArgs) {
    let query_source = load_query(args.query_text.as_deref(), args.query_file.as_ref());
    let bounds = args.rows.as_deref().map(|s| {
        let (start, end) = run_common::parse_rows(s).unwrap_or_else(|msg| fail(msg));
        Range::rows(start, end)
    });

    let mut inspector =
        run_common::open_inspector(&args.source, InspectorOptions::default(), args.layer);
    // Only takes effect once an injected layer is active.
    inspector.set_show_injection_ranges(args.injection_ranges);
    if let Err(e) = inspector.compile_query(&query_source) {
        fail(e);
    }
    if bounds.is_some()
        && let Err(e) = inspector.run_query(bounds)
    {
        fail(e);
    }

    if args.json {
        print_json(&inspector);
        return;
    }
    print!(
        "{}",
        format_highlights(&inspector, inspector.text(), Colors::new(args.color))
    );
}

fn load_query(text: Option<&str>, path: Option<&PathBuf>) -> String {
    let source = match (text, path) {
        (Some(text), _) => text.to_owned(),
        (None, Some(path)) => fs::read_to_string(path).unwrap_or_else(|e| {
            fail(format_args!("failed to read '{}': {}", path.display(), e))
        }),
        (None, None) => fail("query is required: use -q/--query or --query-file"),
    };
    if source.trim().is_empty() {
        fail("query cannot be empty");
    }
    source
}

fn print_json(inspector: &Inspector) {
    let Some(query) = inspector.query() else {
        return;
    };
    run_common::print_json(&QueryOutput {
        grammar: query.grammar(),
        captures: query.capture_names(),
        highlights: inspector.highlights(),
        injection_ranges: inspector.injection_overlay(),
    });
}

/// One line per highlight: category, capture, range and the highlighted text.
pub fn format_highlights(inspector: &Inspector, text: &str, colors: Colors) -> String {
    let Colors {
        blue, dim, reset, ..
    } = colors;
    let mut out = String::new();
    for h in inspector.highlights() {
        out.push_str(&format!(
            "{} {blue}@{}{reset} {dim}{}{reset} {:?}\n",
            h.category,
            h.capture_name,
            h.range,
            snippet(text, h.range)
        ));
    }
    for mark in inspector.injection_overlay() {
        out.push_str(&format!(
            "{} {dim}injection {}{reset}\n",
            mark.category, mark.range
        ));
    }
    out
}

const SNIPPET_CHARS: usize = 40;

/// The first line of `range` in `text`, shortened to a readable length.
fn snippet(text: &str, range: Range) -> String {
    let Some(line) = text.split('\n').nth(range.start.row) else {
        return String::new();
    };
    let end = if range.end.row == range.start.row {
        range.end.column.min(line.len())
    } else {
        line.len()
    };
    let Some(slice) = line.get(range.start.column.min(end)..end) else {
        return String::new();
    };
    let multiline = range.end.row > range.start.row;
    if slice.chars().count() > SNIPPET_CHARS || multiline {
        let short: String = slice.chars().take(SNIPPET_CHARS).collect();
        return format!("{short}…");
    }
    slice.to_owned()
}

#[cfg(test)]
mod tests {
    use treelens_core::Point;

    use super::*;

    fn range(sr: usize, sc: usize, er: usize, ec: usize) -> Range {
        Range::new(Point::new(sr, sc), Point::new(er, ec))
    }

    #[test]
    fn snippets() {
        let text = "let a = 1;\nlet b = [\n  2,\n];";
        assert_eq!(snippet(text, range(0, 4, 0, 5)), "a");
        assert_eq!(snippet(text, range(1, 8, 3, 1)), "[…");
        assert_eq!(snippet(text, range(9, 0, 9, 1)), "");
        assert_eq!(snippet(&"x".repeat(50), range(0, 0, 0, 50)), format!("{}…", "x".repeat(40)));
    }

    #[test]
    #[cfg(feature = "lang-json")]
    fn highlight_lines() {
        use treelens_lib::layers::{Document, LayerSource};

        let text = r#"{"key": [1, true]}"#;
        let mut document = Document::new(treelens_langs::json());
        document.set_text(text).unwrap();
        let mut inspector = Inspector::new(document.snapshot(), InspectorOptions::default());
        inspector.update().unwrap();
        inspector.compile_query("(number) @num (true) @bool").unwrap();

        insta::assert_snapshot!(format_highlights(&inspector, text, Colors::OFF), @r#"
        1 @num [(0, 9) - (0, 10)] "1"
        2 @bool [(0, 12) - (0, 16)] "true"
        "#);
    }
}
