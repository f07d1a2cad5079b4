//! Command builders for the CLI.
//!
//! Each command is built from the shared arg builders in `args.rs`.

use clap::Command;

use super::args::*;

/// Source input, language, injection and verbosity args shared by every inspecting command.
fn with_source_args(cmd: Command) -> Command {
    cmd.arg(source_path_arg())
        .arg(source_text_arg())
        .arg(lang_arg())
        .arg(inject_arg())
        .arg(verbose_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("treelens")
        .about("Inspect tree-sitter syntax trees and test queries against them")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(tree_command())
        .subcommand(query_command())
        .subcommand(node_command())
        .subcommand(layers_command())
        .subcommand(langs_command())
}

/// Print the syntax tree, one row per node.
pub fn tree_command() -> Command {
    let cmd = Command::new("tree")
        .about("Print the syntax tree of a source file")
        .override_usage(
            "\
  treelens tree <SOURCE>
  treelens tree -s <TEXT> -l <LANG>",
        )
        .after_help(
            r#"EXAMPLES:
  treelens tree app.ts                          # named nodes only
  treelens tree app.ts --raw                    # include anonymous nodes
  treelens tree -s '[1, 2]' -l json --json      # rows as JSON
  treelens tree doc.json --inject string=json --layer 1"#,
        )
        .arg(layer_arg())
        .arg(raw_arg())
        .arg(color_arg())
        .arg(json_arg());
    with_source_args(cmd)
}

/// Run a query and print the highlights it produces.
pub fn query_command() -> Command {
    let cmd = Command::new("query")
        .about("Run a tree-sitter query and print the highlighted ranges")
        .override_usage(
            "\
  treelens query -q <QUERY> <SOURCE>
  treelens query --query-file <FILE> -s <TEXT> -l <LANG>",
        )
        .after_help(
            r#"EXAMPLES:
  treelens query -q '(identifier) @id' app.js
  treelens query --query-file highlights.scm app.rs --rows 10..20
  treelens query -q '(number) @n' -s '[1, 2]' -l json --json"#,
        )
        .arg(query_text_arg())
        .arg(query_file_arg())
        .arg(rows_arg())
        .arg(layer_arg())
        .arg(injection_ranges_arg())
        .arg(color_arg())
        .arg(json_arg());
    with_source_args(cmd)
}

/// Look up the node at a position.
pub fn node_command() -> Command {
    let cmd = Command::new("node")
        .about("Show the innermost node at a position and its tree row")
        .override_usage(
            "\
  treelens node <SOURCE> --at <ROW:COL>",
        )
        .after_help(
            r#"EXAMPLES:
  treelens node app.py --at 3:8
  treelens node app.py --at 3:8 --raw    # anonymous nodes count too"#,
        )
        .arg(at_arg())
        .arg(layer_arg())
        .arg(raw_arg())
        .arg(json_arg());
    with_source_args(cmd)
}

/// List the language layers of a document.
pub fn layers_command() -> Command {
    let cmd = Command::new("layers")
        .about("List the language layers of a source file")
        .after_help(
            r#"EXAMPLES:
  treelens layers doc.json --inject string=json
  treelens layers notes.py --inject 'comment=markdown:\bTODO\b'"#,
        )
        .arg(json_arg());
    with_source_args(cmd)
}

/// List supported languages.
pub fn langs_command() -> Command {
    Command::new("langs")
        .about("List supported languages")
        .arg(verbose_arg())
}
