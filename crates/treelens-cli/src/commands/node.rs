//! Show the node under a source position and the row that displays it.

use serde_json::json;
use treelens_lib::{InspectorOptions, NodeInfo};

use super::run_common::{self, SourceArgs, fail};

pub struct NodeArgs {
    pub source: SourceArgs,
    pub at: String,
    pub layer: Option<u64>,
    pub raw: bool,
    pub json: bool,
}

pub fn run(args: NodeArgs) {
    let point = run_common::parse_point(&args.at).unwrap_or_else(|msg| fail(msg));
    let options = InspectorOptions {
        show_anonymous_nodes: args.raw,
        ..Default::default()
    };
    let inspector = run_common::open_inspector(&args.source, options, args.layer);
    let node = inspector.node_at_position(point).unwrap_or_else(|e| fail(e));
    let row = inspector.row_for_node_id(node.id);

    if args.json {
        run_common::print_json(&json!({ "node": node, "row": row }));
        return;
    }
    print!("{}", describe(&node, row));
}

fn describe(node: &NodeInfo, row: Option<usize>) -> String {
    let kind = if node.is_named {
        node.kind.clone()
    } else {
        format!("{:?}", node.kind)
    };
    let missing = if node.is_missing { " MISSING" } else { "" };
    let row = match row {
        Some(index) => format!("row {}", index),
        None => "not rendered".to_owned(),
    };
    format!("{}{} {}\n  id {}, {}\n", kind, missing, node.range, node.id, row)
}
