//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! `*Params` structs are populated from clap; `Into<*Args>` bridges them to
//! the command handlers, resolving `--color` against the terminal on the way.

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::layers::LayersArgs;
use crate::commands::node::NodeArgs;
use crate::commands::query::QueryArgs;
use crate::commands::run_common::SourceArgs;
use crate::commands::tree::TreeArgs;

pub struct SourceParams {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub lang: Option<String>,
    pub inject: Vec<String>,
}

impl SourceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: m.get_one::<PathBuf>("source_path").cloned(),
            source_text: m.get_one::<String>("source_text").cloned(),
            lang: m.get_one::<String>("lang").cloned(),
            inject: m
                .get_many::<String>("inject")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
        }
    }
}

impl From<SourceParams> for SourceArgs {
    fn from(p: SourceParams) -> Self {
        Self {
            source_path: p.source_path,
            source_text: p.source_text,
            lang: p.lang,
            inject: p.inject,
        }
    }
}

pub struct TreeParams {
    pub source: SourceParams,
    pub layer: Option<u64>,
    pub raw: bool,
    pub color: ColorChoice,
    pub json: bool,
}

impl TreeParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source: SourceParams::from_matches(m),
            layer: m.get_one::<u64>("layer").copied(),
            raw: m.get_flag("raw"),
            color: parse_color(m),
            json: m.get_flag("json"),
        }
    }
}

impl From<TreeParams> for TreeArgs {
    fn from(p: TreeParams) -> Self {
        Self {
            source: p.source.into(),
            layer: p.layer,
            raw: p.raw,
            color: p.color.should_colorize(),
            json: p.json,
        }
    }
}

pub struct QueryParams {
    pub source: SourceParams,
    pub query_text: Option<String>,
    pub query_file: Option<PathBuf>,
    pub rows: Option<String>,
    pub layer: Option<u64>,
    pub injection_ranges: bool,
    pub color: ColorChoice,
    pub json: bool,
}

impl QueryParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source: SourceParams::from_matches(m),
            query_text: m.get_one::<String>("query_text").cloned(),
            query_file: m.get_one::<PathBuf>("query_file").cloned(),
            rows: m.get_one::<String>("rows").cloned(),
            layer: m.get_one::<u64>("layer").copied(),
            injection_ranges: m.get_flag("injection_ranges"),
            color: parse_color(m),
            json: m.get_flag("json"),
        }
    }
}

impl From<QueryParams> for QueryArgs {
    fn from(p: QueryParams) -> Self {
        Self {
            source: p.source.into(),
            query_text: p.query_text,
            query_file: p.query_file,
            rows: p.rows,
            layer: p.layer,
            injection_ranges: p.injection_ranges,
            color: p.color.should_colorize(),
            json: p.json,
        }
    }
}

pub struct NodeParams {
    pub source: SourceParams,
    pub at: String,
    pub layer: Option<u64>,
    pub raw: bool,
    pub json: bool,
}

impl NodeParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source: SourceParams::from_matches(m),
            at: m.get_one::<String>("at").cloned().unwrap_or_default(),
            layer: m.get_one::<u64>("layer").copied(),
            raw: m.get_flag("raw"),
            json: m.get_flag("json"),
        }
    }
}

impl From<NodeParams> for NodeArgs {
    fn from(p: NodeParams) -> Self {
        Self {
            source: p.source.into(),
            at: p.at,
            layer: p.layer,
            raw: p.raw,
            json: p.json,
        }
    }
}

pub struct LayersParams {
    pub source: SourceParams,
    pub json: bool,
}

impl LayersParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source: SourceParams::from_matches(m),
            json: m.get_flag("json"),
        }
    }
}

impl From<LayersParams> for LayersArgs {
    fn from(p: LayersParams) -> Self {
        Self {
            source: p.source.into(),
            json: p.json,
        }
    }
}

/// `-v` count, given before the subcommand, after it, or both.
pub fn verbosity(root: &ArgMatches, sub: &ArgMatches) -> u8 {
    root.get_count("verbose").saturating_add(sub.get_count("verbose"))
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
