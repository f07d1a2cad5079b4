mod cli;
mod commands;
mod logging;

use cli::{LayersParams, NodeParams, QueryParams, TreeParams, build_cli, verbosity};

fn main() {
    let matches = build_cli().get_matches();

    let Some((name, m)) = matches.subcommand() else {
        unreachable!("clap should have caught this")
    };
    logging::init(verbosity(&matches, m));

    match name {
        "tree" => {
            let params = TreeParams::from_matches(m);
            commands::tree::run(params.into());
        }
        "query" => {
            let params = QueryParams::from_matches(m);
            commands::query::run(params.into());
        }
        "node" => {
            let params = NodeParams::from_matches(m);
            commands::node::run(params.into());
        }
        "layers" => {
            let params = LayersParams::from_matches(m);
            commands::layers::run(params.into());
        }
        "langs" => commands::langs::run(),
        _ => unreachable!("clap should have caught this"),
    }
}
