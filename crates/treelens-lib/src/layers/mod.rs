//! Language layers of a document and the registry tracking the active one.

use std::sync::Arc;

use arborium_tree_sitter::Tree;
use tracing::{debug, warn};

use treelens_core::{LayerId, Point, Range, end_point};
use treelens_langs::Lang;

use crate::{Error, Result};

mod document;

pub use document::{Document, InjectionPoint, LanguageRule};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerKind {
    /// Spans the whole document.
    Root,
    /// Spans the listed sub-ranges of the parent document.
    Injected { ranges: Vec<Range> },
}

/// One grammar and tree pair.
#[derive(Clone)]
pub struct Layer {
    id: LayerId,
    lang: Lang,
    tree: Option<Tree>,
    kind: LayerKind,
    extent: Range,
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("id", &self.id)
            .field("grammar", &self.lang.name())
            .field("has_tree", &self.tree.is_some())
            .field("kind", &self.kind)
            .finish()
    }
}

impl Layer {
    /// The root layer of a document with the given text.
    pub fn root(lang: Lang, tree: Option<Tree>, text: &str) -> Self {
        Self {
            id: LayerId::ROOT,
            lang,
            tree,
            kind: LayerKind::Root,
            extent: Range::new(Point::ZERO, end_point(text)),
        }
    }

    /// An injected layer. `id` must not be the root identity and `ranges`
    /// must be in document order.
    pub fn injected(id: LayerId, lang: Lang, tree: Option<Tree>, ranges: Vec<Range>) -> Self {
        debug_assert!(!id.is_root(), "injected layer cannot use the root id");
        let extent = match (ranges.first(), ranges.last()) {
            (Some(first), Some(last)) => Range::new(first.start, last.end),
            _ => Range::default(),
        };
        Self {
            id,
            lang,
            tree,
            kind: LayerKind::Injected { ranges },
            extent,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn lang(&self) -> &Lang {
        &self.lang
    }

    pub fn grammar(&self) -> &str {
        self.lang.name()
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    pub fn kind(&self) -> &LayerKind {
        &self.kind
    }

    pub fn is_root(&self) -> bool {
        matches!(self.kind, LayerKind::Root)
    }

    /// Region of the document the layer covers.
    pub fn extent(&self) -> Range {
        self.extent
    }

    /// Source ranges the layer's content occupies.
    pub fn current_ranges(&self) -> Vec<Range> {
        match &self.kind {
            LayerKind::Root => vec![self.extent],
            LayerKind::Injected { ranges } => ranges.clone(),
        }
    }

    /// `"<grammar> [(r, c) - (r, c)]"`, for layer pickers.
    pub fn description(&self) -> String {
        format!("{} {}", self.grammar(), self.extent)
    }
}

/// Document text plus its live layers, root first.
#[derive(Clone, Debug)]
pub struct DocumentSnapshot {
    pub text: Arc<str>,
    layers: Vec<Layer>,
}

impl DocumentSnapshot {
    pub fn new(text: impl Into<Arc<str>>, root: Layer, injections: Vec<Layer>) -> Self {
        debug_assert!(root.is_root());
        let mut layers = Vec::with_capacity(injections.len() + 1);
        layers.push(root);
        layers.extend(injections);
        Self {
            text: text.into(),
            layers,
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

/// Anything that can report a document's current layers.
pub trait LayerSource {
    fn snapshot(&self) -> DocumentSnapshot;
}

/// What a refresh did to the active layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    Kept,
    /// The active layer vanished; the registry switched to the root.
    FellBack { previous: LayerId },
}

/// Live layers of one document. Exactly one layer is active.
#[derive(Debug)]
pub struct LayerRegistry {
    layers: Vec<Layer>,
    active: LayerId,
}

impl LayerRegistry {
    pub fn new(snapshot: DocumentSnapshot) -> Self {
        Self {
            layers: snapshot.layers,
            active: LayerId::ROOT,
        }
    }

    /// Replaces the layer set. Falls back to the root layer when the active
    /// identity no longer exists.
    pub fn refresh(&mut self, snapshot: DocumentSnapshot) -> RefreshOutcome {
        self.layers = snapshot.layers;
        debug!(layers = self.layers.len(), "layers refreshed");
        if self.get(self.active).is_some() {
            return RefreshOutcome::Kept;
        }
        let previous = std::mem::replace(&mut self.active, LayerId::ROOT);
        warn!(%previous, "active layer vanished, falling back to root");
        RefreshOutcome::FellBack { previous }
    }

    pub fn active_id(&self) -> LayerId {
        self.active
    }

    pub fn active_layer(&self) -> &Layer {
        self.get(self.active).unwrap_or(&self.layers[0])
    }

    pub fn all_layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Activates layer `id`. Returns whether the active layer changed.
    pub fn set_active(&mut self, id: LayerId) -> Result<bool> {
        if self.get(id).is_none() {
            return Err(Error::LayerNotFound(id));
        }
        let changed = self.active != id;
        self.active = id;
        Ok(changed)
    }

    pub fn descriptions(&self) -> Vec<(LayerId, String)> {
        self.layers
            .iter()
            .map(|l| (l.id, l.description()))
            .collect()
    }
}
