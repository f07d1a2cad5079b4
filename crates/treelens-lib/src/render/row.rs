use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use treelens_core::{Colors, NodeId, Range};

use super::Generation;

/// Display label of a row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum NodeLabel {
    Named(String),
    Anonymous(String),
    /// Error-recovery placeholder; always labelled.
    Missing(String),
}

impl NodeLabel {
    pub fn node_type(&self) -> &str {
        match self {
            Self::Named(t) | Self::Anonymous(t) | Self::Missing(t) => t,
        }
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(t) => f.write_str(t),
            Self::Anonymous(t) => write!(f, "{}", quote(t)),
            Self::Missing(t) => write!(f, "MISSING {t}"),
        }
    }
}

fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{text}\""))
}

/// One rendered tree node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    pub label: NodeLabel,
    pub range: Range,
    pub node_id: NodeId,
}

impl DisplayRow {
    /// Renders the row as a terminal line.
    pub fn to_colored_string(&self, colors: Colors) -> String {
        let Colors {
            blue,
            green,
            red,
            dim,
            reset,
        } = colors;
        let indent = "  ".repeat(self.depth);
        let field = match &self.field_name {
            Some(name) => format!("{dim}{name}:{reset} "),
            None => String::new(),
        };
        let color = match self.label {
            NodeLabel::Named(_) => blue,
            NodeLabel::Anonymous(_) => green,
            NodeLabel::Missing(_) => red,
        };
        let Range { start, end } = self.range;
        format!("{indent}{field}{color}{}{reset} {dim}{start} - {end}{reset}", self.label)
    }
}

impl fmt::Display for DisplayRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_colored_string(Colors::OFF))
    }
}

/// The complete output of one render pass.
///
/// Row indices are only meaningful for the sequence they came from; a new
/// render replaces the whole sequence.
#[derive(Clone, Debug, Default)]
pub struct RowSequence {
    rows: Vec<DisplayRow>,
    by_node: HashMap<NodeId, usize>,
    generation: Generation,
}

impl RowSequence {
    pub(crate) fn new(rows: Vec<DisplayRow>, generation: Generation) -> Self {
        let mut by_node = HashMap::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            by_node.entry(row.node_id).or_insert(index);
        }
        Self {
            rows,
            by_node,
            generation,
        }
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&DisplayRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DisplayRow> {
        self.rows.iter()
    }

    /// The generation the rows were rendered under.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn row_for_node_id(&self, id: NodeId) -> Option<usize> {
        self.by_node.get(&id).copied()
    }
}

impl PartialEq for RowSequence {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl<'a> IntoIterator for &'a RowSequence {
    type Item = &'a DisplayRow;
    type IntoIter = std::slice::Iter<'a, DisplayRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for RowSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
