//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Source file to inspect (positional).
pub fn source_path_arg() -> Arg {
    Arg::new("source_path")
        .value_name("SOURCE")
        .value_parser(value_parser!(PathBuf))
        .help("Source file to parse (use \"-\" for stdin)")
}

/// Inline source text (-s/--source).
pub fn source_text_arg() -> Arg {
    Arg::new("source_text")
        .short('s')
        .long("source")
        .value_name("TEXT")
        .conflicts_with("source_path")
        .help("Inline source text")
}

/// Language flag (-l/--lang).
pub fn lang_arg() -> Arg {
    Arg::new("lang")
        .short('l')
        .long("lang")
        .value_name("LANG")
        .help("Language (inferred from extension if not specified)")
}

/// Injection points (--inject KIND=LANG[:REGEX]).
pub fn inject_arg() -> Arg {
    Arg::new("inject")
        .long("inject")
        .value_name("KIND=LANG[:REGEX]")
        .action(ArgAction::Append)
        .help("Parse nodes of KIND as LANG, optionally only when their text matches REGEX")
}

/// Layer to inspect (--layer).
pub fn layer_arg() -> Arg {
    Arg::new("layer")
        .long("layer")
        .value_name("ID")
        .value_parser(value_parser!(u64))
        .help("Layer to inspect (0 is the root layer, see `treelens layers`)")
}

/// Inline query text (-q/--query).
pub fn query_text_arg() -> Arg {
    Arg::new("query_text")
        .short('q')
        .long("query")
        .value_name("TEXT")
        .help("Inline query text")
}

/// Query from file (--query-file).
pub fn query_file_arg() -> Arg {
    Arg::new("query_file")
        .long("query-file")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .conflicts_with("query_text")
        .help("Query from file")
}

/// Restrict the query to source rows (--rows).
pub fn rows_arg() -> Arg {
    Arg::new("rows")
        .long("rows")
        .value_name("START..END")
        .help("Only run the query over rows START..END (0-based, end exclusive)")
}

/// Position to look up (--at).
pub fn at_arg() -> Arg {
    Arg::new("at")
        .long("at")
        .value_name("ROW:COL")
        .required(true)
        .help("Position to look up (0-based row and byte column)")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Include anonymous nodes (--raw).
pub fn raw_arg() -> Arg {
    Arg::new("raw")
        .long("raw")
        .action(ArgAction::SetTrue)
        .help("Include anonymous nodes (literals, punctuation)")
}

/// Show injection ranges (--injection-ranges).
pub fn injection_ranges_arg() -> Arg {
    Arg::new("injection_ranges")
        .long("injection-ranges")
        .action(ArgAction::SetTrue)
        .help("Also print the source ranges of the selected injected layer")
}

/// Machine-readable output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output JSON")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .help("Log verbosity (-v for debug, -vv for trace; TREELENS_LOG overrides)")
}
