//! Treelens: an inspector for tree-sitter syntax trees.
//!
//! The [`Inspector`] ties together the pieces of one inspection session:
//! it renders the active layer's tree into indented rows, runs a tree-sitter
//! query against it and turns the captures into highlights, and maps editor
//! positions to rows and back.
//!
//! # Example
//!
//! ```
//! use treelens_lib::{Inspector, InspectorOptions, layers::{Document, LayerSource}};
//!
//! # #[cfg(feature = "lang-json")] {
//! let json = treelens_langs::from_name("json").unwrap();
//! let mut doc = Document::new(json);
//! doc.set_text(r#"{"a": [1, 2]}"#).unwrap();
//!
//! let mut inspector = Inspector::new(doc.snapshot(), InspectorOptions::default());
//! inspector.update().unwrap();
//! assert_eq!(inspector.rows().rows()[0].label.node_type(), "document");
//!
//! inspector.compile_query("(number) @n").unwrap();
//! assert_eq!(inspector.highlights().len(), 2);
//! # }
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod bridge;
pub mod cursor;
pub mod events;
pub mod highlight;
pub mod inspector;
pub mod layers;
pub mod query;
pub mod render;
pub mod scope;

#[cfg(test)]
pub(crate) mod test_utils;

pub use bridge::{NodeInfo, NodeLookup};
pub use events::{InspectorEvent, SubscriptionId};
pub use highlight::{HighlightCategory, ResolvedHighlight};
pub use inspector::{Inspector, InspectorOptions};
pub use query::{CompiledQuery, QueryCompileError};
pub use render::{DisplayRow, RenderOptions, RowSequence};

use treelens_core::LayerId;

/// Errors produced by an inspection session.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    QueryCompile(#[from] QueryCompileError),

    #[error("layer {0} not found")]
    LayerNotFound(LayerId),

    /// The layer exists but its text has not been parsed.
    #[error("layer {0} has no syntax tree yet")]
    NoActiveTree(LayerId),

    #[error("node not found: {0}")]
    NodeNotFound(NodeLookup),

    #[error(transparent)]
    Parse(#[from] treelens_langs::ParseError),

    #[error("invalid injection pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, Error>;
