//! The per-document inspection session.
//!
//! An [`Inspector`] owns everything derived from one document's active layer:
//! the rendered rows, the compiled query and its highlights, the active node
//! and the injection-range overlay. All of it is replaced together when the
//! active layer changes.
//!
//! Rendering is cooperative. A host that must stay responsive drives the
//! render itself:
//!
//! ```ignore
//! let mut job = inspector.begin_render()?;
//! loop {
//!     match job.resume() {
//!         RenderStep::Yielded(next) => { job = next; /* let the host breathe */ }
//!         RenderStep::Cancelled => break,
//!         RenderStep::Complete(rows) => { inspector.finish_render(rows); break; }
//!     }
//! }
//! ```
//!
//! Hosts that do not care call [`Inspector::update`].

use std::num::NonZeroUsize;
use std::sync::Arc;

use arborium_tree_sitter::Tree;
use serde::Deserialize;
use tracing::{debug, warn};

use treelens_core::{LayerId, NodeId, Point, Range};

use crate::bridge::{self, NodeInfo, NodeLookup};
use crate::events::{Emitter, InspectorEvent, SubscriptionId};
use crate::highlight::{
    CaptureMark, HighlightCategory, Mark, ResolvedHighlight, capture_marks, resolve_highlights,
};
use crate::layers::{DocumentSnapshot, Layer, LayerRegistry, LayerSource, RefreshOutcome};
use crate::query::CompiledQuery;
use crate::render::{
    DEFAULT_YIELD_INTERVAL, Generation, GenerationCounter, RenderJob, RenderOptions, RowSequence,
};
use crate::scope::ScopeResolver;
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct InspectorOptions {
    pub show_anonymous_nodes: bool,
    pub show_injection_ranges: bool,
    pub yield_interval: NonZeroUsize,
}

impl Default for InspectorOptions {
    fn default() -> Self {
        Self {
            show_anonymous_nodes: false,
            show_injection_ranges: false,
            yield_interval: DEFAULT_YIELD_INTERVAL,
        }
    }
}

impl InspectorOptions {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::default()
            .with_anonymous_nodes(self.show_anonymous_nodes)
            .with_yield_interval(self.yield_interval)
    }
}

/// A render started by [`Inspector::begin_render`].
pub type RenderTicket = RenderJob<Tree>;

#[derive(Debug)]
pub struct Inspector {
    registry: LayerRegistry,
    text: Arc<str>,
    options: InspectorOptions,
    generations: GenerationCounter,
    rows: RowSequence,
    in_flight: Option<Generation>,

    query: Option<CompiledQuery>,
    resolver: ScopeResolver,
    highlights: Vec<ResolvedHighlight>,
    marks: Vec<CaptureMark>,
    overlay: Vec<Mark>,
    status: Option<String>,

    selection: Option<Range>,
    active_node: Option<NodeInfo>,
    highlighted_row: Option<usize>,
    /// Range handed to the host by `select_row`; its echo is not tracked.
    pending_echo: Option<Range>,

    events: Emitter,
}

impl Inspector {
    pub fn new(snapshot: DocumentSnapshot, options: InspectorOptions) -> Self {
        let mut inspector = Self {
            text: Arc::clone(&snapshot.text),
            registry: LayerRegistry::new(snapshot),
            options,
            generations: GenerationCounter::new(),
            rows: RowSequence::default(),
            in_flight: None,
            query: None,
            resolver: ScopeResolver::new(),
            highlights: Vec::new(),
            marks: Vec::new(),
            overlay: Vec::new(),
            status: None,
            selection: None,
            active_node: None,
            highlighted_row: None,
            pending_echo: None,
            events: Emitter::default(),
        };
        inspector.force_overlay_off_at_root();
        inspector
    }

    // ========================================================================
    // Document and layers
    // ========================================================================

    /// Takes in a reparsed document. Any in-flight render becomes stale.
    ///
    /// Falls back to the root layer (and notifies subscribers) when the
    /// active layer no longer exists.
    pub fn document_changed(&mut self, snapshot: DocumentSnapshot) {
        self.text = Arc::clone(&snapshot.text);
        self.invalidate_render();
        if let RefreshOutcome::FellBack { previous } = self.registry.refresh(snapshot) {
            self.clear_layer_state();
            self.force_overlay_off_at_root();
            self.events.emit(&InspectorEvent::ActiveLayerChanged {
                previous,
                current: LayerId::ROOT,
                fell_back: true,
            });
        }
        self.refresh_overlay();
    }

    pub fn refresh_from(&mut self, source: &impl LayerSource) {
        self.document_changed(source.snapshot());
    }

    /// Text of the current document snapshot.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn active_layer(&self) -> &Layer {
        self.registry.active_layer()
    }

    pub fn layers(&self) -> &LayerRegistry {
        &self.registry
    }

    /// Switches layers. Rows, query and highlights of the old layer are
    /// dropped; the query must be compiled again for the new grammar.
    pub fn set_active_layer(&mut self, id: LayerId) -> Result<()> {
        let previous = self.registry.active_id();
        if !self.registry.set_active(id)? {
            return Ok(());
        }
        debug!(%previous, current = %id, "active layer changed");
        self.invalidate_render();
        self.clear_layer_state();
        self.force_overlay_off_at_root();
        self.refresh_overlay();
        self.events.emit(&InspectorEvent::ActiveLayerChanged {
            previous,
            current: id,
            fell_back: false,
        });
        Ok(())
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Starts a render of the active layer. Every earlier render is stale
    /// from here on.
    pub fn begin_render(&mut self) -> Result<RenderTicket> {
        let layer = self.registry.active_layer();
        let tree = layer.tree().cloned().ok_or(Error::NoActiveTree(layer.id()))?;
        let token = self.generations.advance();
        self.in_flight = Some(token.generation());
        Ok(RenderJob::new(tree, self.options.render_options(), token))
    }

    /// Commits a finished render. Returns false, leaving the current rows in
    /// place, when `rows` belong to a stale pass.
    pub fn finish_render(&mut self, rows: RowSequence) -> bool {
        let generation = rows.generation();
        if self.in_flight != Some(generation) || self.generations.current() != generation {
            debug!(generation = generation.0, "stale render result dropped");
            return false;
        }
        self.in_flight = None;
        self.pending_echo = None;
        self.rows = rows;
        debug!(generation = generation.0, rows = self.rows.len(), "rows committed");

        match self.selection {
            Some(selection) => self.track(selection),
            None => {
                self.highlighted_row = self
                    .active_node
                    .as_ref()
                    .and_then(|n| self.rows.row_for_node_id(n.id));
            }
        }
        if self.query.is_some()
            && let Err(err) = self.run_query(None)
        {
            warn!(%err, "query rerun failed");
        }
        self.refresh_overlay();

        self.events.emit(&InspectorEvent::RenderComplete {
            generation,
            rows: self.rows.len(),
        });
        true
    }

    /// Renders the active layer to completion and commits the result.
    pub fn update(&mut self) -> Result<&RowSequence> {
        let job = self.begin_render()?;
        if let Some(rows) = job.run_to_completion() {
            self.finish_render(rows);
        }
        Ok(&self.rows)
    }

    pub fn is_rendering(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn rows(&self) -> &RowSequence {
        &self.rows
    }

    pub fn options(&self) -> &InspectorOptions {
        &self.options
    }

    /// Takes effect on the next render.
    pub fn set_show_anonymous_nodes(&mut self, show: bool) {
        if self.options.show_anonymous_nodes != show {
            self.options.show_anonymous_nodes = show;
            self.invalidate_render();
        }
    }

    /// Returns whether the overlay is now on. It stays off while the root
    /// layer is active.
    pub fn set_show_injection_ranges(&mut self, show: bool) -> bool {
        self.options.show_injection_ranges = show;
        self.force_overlay_off_at_root();
        self.refresh_overlay();
        self.options.show_injection_ranges
    }

    fn invalidate_render(&mut self) {
        self.generations.advance();
        self.in_flight = None;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Compiles `source` against the active layer's grammar and runs it over
    /// the whole document.
    ///
    /// On failure the previous query and its highlights stay in place and
    /// the error message becomes the status line.
    pub fn compile_query(&mut self, source: &str) -> Result<&[ResolvedHighlight]> {
        let lang = self.registry.active_layer().lang().clone();
        match CompiledQuery::compile(source, &lang) {
            Ok(query) => {
                self.status = None;
                self.marks = capture_marks(&query);
                self.query = Some(query);
                self.run_query(None)
            }
            Err(err) => {
                self.status = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Reruns the current query, restricted to `bounds` when given. The
    /// result replaces every previous highlight.
    pub fn run_query(&mut self, bounds: Option<Range>) -> Result<&[ResolvedHighlight]> {
        let Some(query) = &self.query else {
            self.highlights.clear();
            return Ok(&self.highlights);
        };
        let layer = self.registry.active_layer();
        let tree = layer.tree().ok_or(Error::NoActiveTree(layer.id()))?;
        let captures = query.execute(tree.root_node(), &self.text, bounds);
        self.highlights = resolve_highlights(query, &captures, &self.text, &mut self.resolver);
        Ok(&self.highlights)
    }

    pub fn clear_query(&mut self) {
        self.query = None;
        self.highlights.clear();
        self.marks.clear();
        self.status = None;
    }

    pub fn query(&self) -> Option<&CompiledQuery> {
        self.query.as_ref()
    }

    pub fn highlights(&self) -> &[ResolvedHighlight] {
        &self.highlights
    }

    /// `@name` marks for the query editor.
    pub fn capture_marks(&self) -> &[CaptureMark] {
        &self.marks
    }

    pub fn injection_overlay(&self) -> &[Mark] {
        &self.overlay
    }

    /// Message of the last failed compile.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    // ========================================================================
    // Positions and rows
    // ========================================================================

    /// Follows the host selection. Returns the highlighted row.
    ///
    /// Ignored while a render is in flight, when the active layer has no
    /// tree, and when `selection` is the range the last
    /// [`select_row`](Self::select_row) returned. Only the movement right
    /// after `select_row` can be skipped that way.
    pub fn handle_cursor_movement(&mut self, selection: Range) -> Option<usize> {
        self.selection = Some(selection);
        let echoed = self.pending_echo.take() == Some(selection);
        if echoed || self.in_flight.is_some() {
            return self.highlighted_row;
        }
        self.track(selection);
        self.highlighted_row
    }

    fn track(&mut self, selection: Range) {
        let Some(tree) = self.registry.active_layer().tree() else {
            return;
        };
        self.active_node =
            bridge::node_at_range(tree, selection, self.options.show_anonymous_nodes);
        self.highlighted_row = self
            .active_node
            .as_ref()
            .and_then(|n| self.rows.row_for_node_id(n.id));
    }

    /// Resolves row `index` back to a live node and makes it the active
    /// node. Returns the node's range for the host to select; the cursor
    /// movement that selection causes is ignored.
    pub fn select_row(&mut self, index: usize) -> Result<Range> {
        self.pending_echo = None;
        let row = self
            .rows
            .get(index)
            .ok_or(Error::NodeNotFound(NodeLookup::Row(index)))?;
        let layer = self.registry.active_layer();
        let tree = layer.tree().ok_or(Error::NoActiveTree(layer.id()))?;
        let node = bridge::find_node_at(tree, row.range.start, row.node_id)
            .ok_or(Error::NodeNotFound(NodeLookup::Id(row.node_id)))?;

        let range = node.range;
        self.active_node = Some(node);
        self.highlighted_row = Some(index);
        self.pending_echo = Some(range);
        Ok(range)
    }

    pub fn node_at_position(&self, point: Point) -> Result<NodeInfo> {
        let layer = self.registry.active_layer();
        let tree = layer.tree().ok_or(Error::NoActiveTree(layer.id()))?;
        bridge::node_at_position(tree, point, self.options.show_anonymous_nodes)
            .ok_or(Error::NodeNotFound(NodeLookup::Position(point)))
    }

    /// Looked up in the current rows; indices change with every render.
    pub fn row_for_node_id(&self, id: NodeId) -> Option<usize> {
        self.rows.row_for_node_id(id)
    }

    pub fn active_node(&self) -> Option<&NodeInfo> {
        self.active_node.as_ref()
    }

    pub fn highlighted_row(&self) -> Option<usize> {
        self.highlighted_row
    }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn subscribe(
        &mut self,
        handler: impl FnMut(&InspectorEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn clear_layer_state(&mut self) {
        self.rows = RowSequence::default();
        self.clear_query();
        self.active_node = None;
        self.highlighted_row = None;
        self.pending_echo = None;
    }

    fn force_overlay_off_at_root(&mut self) {
        if self.registry.active_id().is_root() {
            self.options.show_injection_ranges = false;
        }
    }

    fn refresh_overlay(&mut self) {
        let layer = self.registry.active_layer();
        self.overlay = if self.options.show_injection_ranges && !layer.is_root() {
            layer
                .current_ranges()
                .into_iter()
                .map(|range| Mark {
                    range,
                    category: HighlightCategory::INJECTION_RANGE,
                })
                .collect()
        } else {
            Vec::new()
        };
    }
}

#[cfg(test)]
#[path = "inspector_tests.rs"]
mod inspector_tests;
