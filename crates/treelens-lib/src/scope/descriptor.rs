//! Node path descriptors such as `firstChild.nextSibling.endPosition`.

use std::str::FromStr;

use arborium_tree_sitter::Node;

use crate::cursor::to_point;

use super::Anchor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Parent,
    FirstChild,
    LastChild,
    FirstNamedChild,
    LastNamedChild,
    NextSibling,
    PreviousSibling,
    NextNamedSibling,
    PreviousNamedSibling,
}

impl Step {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "parent" => Self::Parent,
            "firstChild" => Self::FirstChild,
            "lastChild" => Self::LastChild,
            "firstNamedChild" => Self::FirstNamedChild,
            "lastNamedChild" => Self::LastNamedChild,
            "nextSibling" => Self::NextSibling,
            "previousSibling" => Self::PreviousSibling,
            "nextNamedSibling" => Self::NextNamedSibling,
            "previousNamedSibling" => Self::PreviousNamedSibling,
            _ => return None,
        })
    }

    fn follow<'t>(self, node: Node<'t>) -> Option<Node<'t>> {
        match self {
            Self::Parent => node.parent(),
            Self::FirstChild => node.child(0),
            Self::LastChild => {
                let mut cursor = node.walk();
                node.children(&mut cursor).last()
            }
            Self::FirstNamedChild => {
                let mut cursor = node.walk();
                node.named_children(&mut cursor).next()
            }
            Self::LastNamedChild => {
                let mut cursor = node.walk();
                node.named_children(&mut cursor).last()
            }
            Self::NextSibling => node.next_sibling(),
            Self::PreviousSibling => node.prev_sibling(),
            Self::NextNamedSibling => node.next_named_sibling(),
            Self::PreviousNamedSibling => node.prev_named_sibling(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Edge {
    Start,
    End,
}

/// A walk from a captured node to another node, optionally naming which
/// edge of the target to use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Descriptor {
    steps: Vec<Step>,
    edge: Option<Edge>,
}

impl FromStr for Descriptor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        let mut steps = Vec::new();
        let mut edge = None;
        for (i, part) in parts.iter().enumerate() {
            let last = i + 1 == parts.len();
            match *part {
                "startPosition" if last => edge = Some(Edge::Start),
                "endPosition" if last => edge = Some(Edge::End),
                "startPosition" | "endPosition" => {
                    return Err(format!("'{part}' must end the descriptor '{s}'"));
                }
                name => match Step::from_name(name) {
                    Some(step) => steps.push(step),
                    None => return Err(format!("unknown step '{name}' in descriptor '{s}'")),
                },
            }
        }
        Ok(Self { steps, edge })
    }
}

impl Descriptor {
    /// Follows the path from `node`. `None` when a step leads nowhere.
    pub(crate) fn resolve(&self, node: Node<'_>, default_edge: Edge) -> Option<Anchor> {
        let target = self
            .steps
            .iter()
            .try_fold(node, |current, step| step.follow(current))?;
        Some(match self.edge.unwrap_or(default_edge) {
            Edge::Start => Anchor {
                point: to_point(target.start_position()),
                byte: target.start_byte(),
            },
            Edge::End => Anchor {
                point: to_point(target.end_position()),
                byte: target.end_byte(),
            },
        })
    }
}
