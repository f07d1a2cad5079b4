use std::collections::HashMap;
use std::sync::Arc;

use arborium_tree_sitter::{Node, Tree};
use regex_automata::meta::Regex;
use tracing::{debug, warn};

use treelens_core::{LayerId, Range};
use treelens_langs::Lang;

use crate::cursor::node_range;
use crate::{Error, Result};

use super::{DocumentSnapshot, Layer, LayerSource};

/// How an injection point picks the grammar for a matching node.
#[derive(Clone)]
pub enum LanguageRule {
    Fixed(Lang),
    /// Inject only when the node's text matches the pattern.
    When { lang: Lang, pattern: Regex },
}

impl LanguageRule {
    fn lang_for(&self, node: &Node<'_>, text: &str) -> Option<&Lang> {
        match self {
            Self::Fixed(lang) => Some(lang),
            Self::When { lang, pattern } => {
                let node_text = text.get(node.byte_range())?;
                pattern.is_match(node_text).then_some(lang)
            }
        }
    }
}

/// Nodes of kind `node_kind` in the root tree become injected layers.
#[derive(Clone)]
pub struct InjectionPoint {
    pub node_kind: String,
    pub rule: LanguageRule,
}

impl InjectionPoint {
    pub fn new(node_kind: impl Into<String>, lang: Lang) -> Self {
        Self {
            node_kind: node_kind.into(),
            rule: LanguageRule::Fixed(lang),
        }
    }

    pub fn when_matches(node_kind: impl Into<String>, lang: Lang, pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_owned(),
            message: e.to_string(),
        })?;
        Ok(Self {
            node_kind: node_kind.into(),
            rule: LanguageRule::When { lang, pattern },
        })
    }
}

/// Identity of an injection across reparses.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct InjectionKey {
    point: usize,
    ordinal: usize,
    grammar: String,
}

type FoundInjection = (InjectionKey, Lang, arborium_tree_sitter::Range, Range);

/// A parsed document: a root layer plus layers for its injection points.
pub struct Document {
    lang: Lang,
    points: Vec<InjectionPoint>,
    text: Arc<str>,
    root: Option<Tree>,
    injections: Vec<Layer>,
    ids: HashMap<InjectionKey, LayerId>,
    next_id: u64,
}

impl Document {
    /// An empty, not yet parsed document.
    pub fn new(lang: Lang) -> Self {
        Self {
            lang,
            points: Vec::new(),
            text: Arc::from(""),
            root: None,
            injections: Vec::new(),
            ids: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn with_injection_point(mut self, point: InjectionPoint) -> Self {
        self.points.push(point);
        self
    }

    pub fn lang(&self) -> &Lang {
        &self.lang
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.root.as_ref()
    }

    /// Replaces the text and reparses every layer.
    ///
    /// Injections that survive the edit keep their identities.
    pub fn set_text(&mut self, text: impl Into<Arc<str>>) -> Result<()> {
        let text = text.into();
        let tree = self.lang.parse(&text)?;
        self.text = text;
        self.injections = self.collect_injections(&tree);
        self.root = Some(tree);
        debug!(
            grammar = self.lang.name(),
            injections = self.injections.len(),
            "document parsed"
        );
        Ok(())
    }

    fn collect_injections(&mut self, tree: &Tree) -> Vec<Layer> {
        if self.points.is_empty() {
            self.ids.clear();
            return Vec::new();
        }

        let mut found = Vec::new();
        let mut ordinals = vec![0usize; self.points.len()];
        let mut cursor = tree.walk();
        loop {
            let node = cursor.node();
            for (index, point) in self.points.iter().enumerate() {
                if node.kind() != point.node_kind || node.byte_range().is_empty() {
                    continue;
                }
                let Some(lang) = point.rule.lang_for(&node, &self.text) else {
                    continue;
                };
                let key = InjectionKey {
                    point: index,
                    ordinal: ordinals[index],
                    grammar: lang.name().to_owned(),
                };
                ordinals[index] += 1;
                found.push((key, lang.clone(), node.range(), node_range(&node)));
            }

            if cursor.goto_first_child() {
                continue;
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    return self.build_layers(found);
                }
            }
        }
    }

    fn build_layers(&mut self, found: Vec<FoundInjection>) -> Vec<Layer> {
        let mut ids = HashMap::with_capacity(found.len());
        let mut layers = Vec::with_capacity(found.len());
        for (key, lang, range, content) in found {
            let id = match self.ids.get(&key) {
                Some(&id) => id,
                None => {
                    let id = LayerId(self.next_id);
                    self.next_id += 1;
                    id
                }
            };
            let tree = match lang.parse_ranges(&self.text, &[range]) {
                Ok(tree) => Some(tree),
                Err(err) => {
                    warn!(%id, %err, "injected layer failed to parse");
                    None
                }
            };
            layers.push(Layer::injected(id, lang, tree, vec![content]));
            ids.insert(key, id);
        }
        self.ids = ids;
        layers
    }
}

impl LayerSource for Document {
    fn snapshot(&self) -> DocumentSnapshot {
        let root = Layer::root(self.lang.clone(), self.root.clone(), &self.text);
        DocumentSnapshot::new(Arc::clone(&self.text), root, self.injections.clone())
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod document_tests;
