//! Tree-to-row renderer.
//!
//! Walks a syntax tree with a cursor (no recursion) and produces one
//! [`DisplayRow`] per qualifying node in document pre-order. A walk is split
//! into slices of `yield_interval` steps; between slices the job is handed
//! back to the caller, and on resumption it checks its [`CancellationToken`]
//! before touching the tree again.

use std::num::NonZeroUsize;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::cursor::{SyntaxCursor, SyntaxTree};

mod generation;
mod row;

pub use generation::{CancellationToken, Generation, GenerationCounter};
pub use row::{DisplayRow, NodeLabel, RowSequence};

/// Traversal steps between cooperative yields.
pub const DEFAULT_YIELD_INTERVAL: NonZeroUsize = match NonZeroUsize::new(10_000) {
    Some(n) => n,
    None => unreachable!(),
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderOptions {
    pub show_anonymous_nodes: bool,
    pub yield_interval: NonZeroUsize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_anonymous_nodes: false,
            yield_interval: DEFAULT_YIELD_INTERVAL,
        }
    }
}

impl RenderOptions {
    pub fn with_anonymous_nodes(mut self, show: bool) -> Self {
        self.show_anonymous_nodes = show;
        self
    }

    pub fn with_yield_interval(mut self, interval: NonZeroUsize) -> Self {
        self.yield_interval = interval;
        self
    }
}

/// Renders a whole tree without yielding.
pub fn render_rows<T: SyntaxTree>(tree: T, options: RenderOptions) -> RowSequence {
    match RenderJob::new(tree, options, CancellationToken::detached()).run_to_completion() {
        Some(rows) => rows,
        None => RowSequence::default(),
    }
}

/// Outcome of one slice of a render.
pub enum RenderStep<T: SyntaxTree> {
    /// The slice budget ran out; resume the job later.
    Yielded(RenderJob<T>),
    /// A newer pass started. Partial output has been dropped.
    Cancelled,
    Complete(RowSequence),
}

/// An in-flight render. Owns its tree; dropping the job releases it.
pub struct RenderJob<T: SyntaxTree> {
    tree: T,
    options: RenderOptions,
    token: CancellationToken,
    walk: Walk,
}

impl<T: SyntaxTree> RenderJob<T> {
    pub fn new(tree: T, options: RenderOptions, token: CancellationToken) -> Self {
        debug!(generation = token.generation().0, "render started");
        Self {
            tree,
            options,
            token,
            walk: Walk::default(),
        }
    }

    pub fn generation(&self) -> Generation {
        self.token.generation()
    }

    /// Runs one slice of at most `yield_interval` steps.
    pub fn resume(mut self) -> RenderStep<T> {
        if self.token.is_cancelled() {
            debug!(
                generation = self.token.generation().0,
                rows = self.walk.rows.len(),
                "render superseded, discarding"
            );
            return RenderStep::Cancelled;
        }

        let Some(mut cursor) = self.tree.walk() else {
            return RenderStep::Complete(RowSequence::new(Vec::new(), self.token.generation()));
        };
        if self.walk.started {
            cursor.goto_descendant(self.walk.position);
        }
        self.walk.started = true;

        for _ in 0..self.options.yield_interval.get() {
            if !self.walk.step(&mut cursor, self.options.show_anonymous_nodes) {
                let generation = self.token.generation();
                debug!(generation = generation.0, rows = self.walk.rows.len(), "render complete");
                let rows = std::mem::take(&mut self.walk.rows);
                return RenderStep::Complete(RowSequence::new(rows, generation));
            }
        }

        self.walk.position = cursor.descendant_index();
        drop(cursor);
        trace!(
            generation = self.token.generation().0,
            rows = self.walk.rows.len(),
            "render yielding"
        );
        RenderStep::Yielded(self)
    }

    /// Resumes until the job completes. `None` if it was cancelled.
    pub fn run_to_completion(self) -> Option<RowSequence> {
        let mut job = self;
        loop {
            match job.resume() {
                RenderStep::Yielded(next) => job = next,
                RenderStep::Cancelled => return None,
                RenderStep::Complete(rows) => return Some(rows),
            }
        }
    }
}

/// Traversal state that survives between slices.
#[derive(Debug, Default)]
struct Walk {
    started: bool,
    position: usize,
    /// Number of qualifying ancestors of the cursor's node.
    depth: usize,
    visited_children: bool,
    rows: Vec<DisplayRow>,
}

impl Walk {
    /// One traversal step. Returns false once the walk is back at the root.
    fn step<C: SyntaxCursor>(&mut self, cursor: &mut C, show_anonymous: bool) -> bool {
        if self.visited_children {
            if cursor.goto_next_sibling() {
                self.visited_children = false;
            } else if cursor.goto_parent() {
                if qualifies(cursor, show_anonymous) {
                    self.depth -= 1;
                }
            } else {
                return false;
            }
            return true;
        }

        let label = label_for(cursor, show_anonymous);
        let qualifies = label.is_some();
        if let Some(label) = label {
            self.rows.push(DisplayRow {
                depth: self.depth,
                field_name: cursor.field_name().map(str::to_owned),
                label,
                range: cursor.range(),
                node_id: cursor.node_id(),
            });
        }

        if cursor.goto_first_child() {
            if qualifies {
                self.depth += 1;
            }
        } else {
            self.visited_children = true;
        }
        true
    }
}

/// Missing and named nodes always get a row; anonymous ones only on request.
fn qualifies<C: SyntaxCursor>(cursor: &C, show_anonymous: bool) -> bool {
    cursor.is_missing() || cursor.is_named() || show_anonymous
}

fn label_for<C: SyntaxCursor>(cursor: &C, show_anonymous: bool) -> Option<NodeLabel> {
    let kind = cursor.kind().to_owned();
    if cursor.is_missing() {
        Some(NodeLabel::Missing(kind))
    } else if cursor.is_named() {
        Some(NodeLabel::Named(kind))
    } else if show_anonymous {
        Some(NodeLabel::Anonymous(kind))
    } else {
        None
    }
}

#[cfg(test)]
mod render_tests;
