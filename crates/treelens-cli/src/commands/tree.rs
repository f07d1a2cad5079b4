//! Print the syntax tree of a source file.

use treelens_core::Colors;
use treelens_lib::{InspectorOptions, RowSequence};

use super::run_common::{self, SourceArgs};

pub struct TreeArgs {
    pub source: SourceArgs,
    pub layer: Option<u64>,
    pub raw: bool,
    pub color: bool,
    pub json: bool,
}

pub fn run(args: TreeArgs) {
    let options = InspectorOptions {
        show_anonymous_nodes: args.raw,
        ..Default::default()
    };
    let inspector = run_common::open_inspector(&args.source, options, args.layer);

    if args.json {
        run_common::print_json(inspector.rows().rows());
        return;
    }
    print!("{}", format_rows(inspector.rows(), Colors::new(args.color)));
}

pub fn format_rows(rows: &RowSequence, colors: Colors) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&row.to_colored_string(colors));
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[cfg(feature = "lang-json")]
mod tests {
    use treelens_lib::RenderOptions;
    use treelens_lib::render::render_rows;

    use super::*;

    #[test]
    fn plain_rows() {
        let tree = treelens_langs::json().parse(r#"{"a": null}"#).unwrap();
        let rows = render_rows(&tree, RenderOptions::default());
        insta::assert_snapshot!(format_rows(&rows, Colors::OFF), @r"
        document (0, 0) - (0, 11)
          object (0, 0) - (0, 11)
            pair (0, 1) - (0, 10)
              key: string (0, 1) - (0, 4)
                string_content (0, 2) - (0, 3)
              value: null (0, 6) - (0, 10)
        ");
    }

    #[test]
    fn colored_rows_match_plain_text() {
        let tree = treelens_langs::json().parse("[1]").unwrap();
        let rows = render_rows(&tree, RenderOptions::default().with_anonymous_nodes(true));
        let colored = format_rows(&rows, Colors::ON);
        assert!(colored.contains("\x1b[34m"));
        assert_eq!(strip_ansi(&colored), format_rows(&rows, Colors::OFF));
    }

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }
}
