//! List the language layers of a document.

use serde::Serialize;
use treelens_core::{LayerId, Range};
use treelens_lib::layers::{Layer, LayerRegistry, LayerSource};

use super::run_common::{self, SourceArgs};

pub struct LayersArgs {
    pub source: SourceArgs,
    pub json: bool,
}

#[derive(Serialize)]
struct LayerSummary<'a> {
    id: LayerId,
    grammar: &'a str,
    extent: Range,
    ranges: Vec<Range>,
    parsed: bool,
}

impl<'a> From<&'a Layer> for LayerSummary<'a> {
    fn from(layer: &'a Layer) -> Self {
        Self {
            id: layer.id(),
            grammar: layer.grammar(),
            extent: layer.extent(),
            ranges: layer.current_ranges(),
            parsed: layer.tree().is_some(),
        }
    }
}

pub fn run(args: LayersArgs) {
    let document = run_common::load_document(&args.source);
    let registry = LayerRegistry::new(document.snapshot());

    if args.json {
        let summaries: Vec<LayerSummary> =
            registry.all_layers().iter().map(LayerSummary::from).collect();
        run_common::print_json(&summaries);
        return;
    }
    print!("{}", format_layers(&registry));
}

fn format_layers(registry: &LayerRegistry) -> String {
    let mut out = String::new();
    for layer in registry.all_layers() {
        out.push_str(&format!("{}: {}", layer.id(), layer.description()));
        if layer.tree().is_none() {
            out.push_str(" (unparsed)");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[cfg(feature = "lang-json")]
mod tests {
    use treelens_lib::layers::{Document, InjectionPoint};

    use super::*;

    #[test]
    fn root_and_injected_layers() {
        let json = treelens_langs::json();
        let mut document =
            Document::new(json.clone()).with_injection_point(InjectionPoint::new("string", json));
        document.set_text(r#"["ab", 1]"#).unwrap();
        let registry = LayerRegistry::new(document.snapshot());
        insta::assert_snapshot!(format_layers(&registry), @r"
        0: json [(0, 0) - (0, 9)]
        1: json [(0, 1) - (0, 5)]
        ");
    }

    #[test]
    fn plain_document_has_only_root() {
        let mut document = Document::new(treelens_langs::json());
        document.set_text("{}\n").unwrap();
        let registry = LayerRegistry::new(document.snapshot());
        assert_eq!(format_layers(&registry), "0: json [(0, 0) - (1, 0)]\n");
    }
}
