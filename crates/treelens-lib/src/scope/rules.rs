//! Per-pattern resolver rules parsed from `#is?`, `#is-not?` and `#set!`.

use arborium_tree_sitter::{Node, Query, QueryProperty};
use regex_automata::meta::Regex;

use crate::query::{QueryCompileError, query_point};

use super::descriptor::{Descriptor, Edge};

/// A rule bound to one capture, or to every capture of its pattern.
#[derive(Clone, Debug)]
pub(crate) struct Scoped<T> {
    capture: Option<usize>,
    pub(crate) rule: T,
}

impl<T> Scoped<T> {
    fn applies_to(&self, capture: usize) -> bool {
        self.capture.is_none_or(|c| c == capture)
    }
}

#[derive(Clone, Debug)]
pub(crate) enum TestKind {
    First,
    Last,
    Type(Vec<String>),
    AncestorOfType(Vec<String>),
    DescendantOfType(Vec<String>),
}

#[derive(Clone, Debug)]
pub(crate) struct NodeTest {
    kind: TestKind,
    /// False for `#is-not?`.
    expected: bool,
}

impl NodeTest {
    pub(crate) fn passes(&self, node: Node<'_>) -> bool {
        let actual = match &self.kind {
            TestKind::First => node.prev_sibling().is_none(),
            TestKind::Last => node.next_sibling().is_none(),
            TestKind::Type(types) => types.iter().any(|t| t == node.kind()),
            TestKind::AncestorOfType(types) => has_descendant(node, types),
            TestKind::DescendantOfType(types) => has_ancestor(node, types),
        };
        actual == self.expected
    }
}

fn has_ancestor(node: Node<'_>, types: &[String]) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if types.iter().any(|t| t == parent.kind()) {
            return true;
        }
        current = parent.parent();
    }
    false
}

fn has_descendant(node: Node<'_>, types: &[String]) -> bool {
    let mut cursor = node.walk();
    if !cursor.goto_first_child() {
        return false;
    }
    let mut depth = 1usize;
    loop {
        if types.iter().any(|t| t == cursor.node().kind()) {
            return true;
        }
        if cursor.goto_first_child() {
            depth += 1;
            continue;
        }
        while !cursor.goto_next_sibling() {
            if depth == 1 || !cursor.goto_parent() {
                return false;
            }
            depth -= 1;
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Adjustment {
    StartAt(Descriptor),
    EndAt(Descriptor),
    OffsetStart(i64),
    OffsetEnd(i64),
    AroundFirstMatch(Regex),
    StartBeforeFirstMatch(Regex),
    EndAfterFirstMatch(Regex),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Claim {
    /// No later capture may take the same range.
    Final,
    /// Only applies while the range is unclaimed.
    Shy,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct PatternRules {
    tests: Vec<Scoped<NodeTest>>,
    adjustments: Vec<Scoped<Adjustment>>,
    claims: Vec<Scoped<Claim>>,
}

impl PatternRules {
    pub(crate) fn from_query(
        query: &Query,
        pattern: usize,
        source: &str,
    ) -> Result<Self, QueryCompileError> {
        let at = query_point(source, query.start_byte_for_pattern(pattern));
        let fail = |message: String| QueryCompileError::predicate(at, message);

        if let Some(predicate) = query.general_predicates(pattern).first() {
            return Err(fail(format!("unknown predicate '#{}'", predicate.operator)));
        }

        let mut rules = Self::default();

        for (property, expected) in query.property_predicates(pattern) {
            let kind = match &*property.key {
                "test.first" => TestKind::First,
                "test.last" => TestKind::Last,
                "test.type" => TestKind::Type(type_list(property).map_err(fail)?),
                "test.ancestorOfType" => {
                    TestKind::AncestorOfType(type_list(property).map_err(fail)?)
                }
                "test.descendantOfType" => {
                    TestKind::DescendantOfType(type_list(property).map_err(fail)?)
                }
                key => return Err(fail(format!("unknown test '{key}'"))),
            };
            rules.tests.push(Scoped {
                capture: property.capture_id,
                rule: NodeTest {
                    kind,
                    expected: *expected,
                },
            });
        }

        for property in query.property_settings(pattern) {
            let key = &*property.key;
            let capture = property.capture_id;
            match key {
                "capture.final" | "capture.shy" => {
                    let rule = if key == "capture.final" {
                        Claim::Final
                    } else {
                        Claim::Shy
                    };
                    rules.claims.push(Scoped { capture, rule });
                    continue;
                }
                _ => {}
            }

            let value = required_value(property).map_err(fail)?;
            let rule = match key {
                "adjust.startAt" => Adjustment::StartAt(value.parse().map_err(fail)?),
                "adjust.endAt" => Adjustment::EndAt(value.parse().map_err(fail)?),
                "adjust.offsetStart" => Adjustment::OffsetStart(integer(key, value).map_err(fail)?),
                "adjust.offsetEnd" => Adjustment::OffsetEnd(integer(key, value).map_err(fail)?),
                "adjust.startAndEndAroundFirstMatchOf" => {
                    Adjustment::AroundFirstMatch(regex(value).map_err(fail)?)
                }
                "adjust.startBeforeFirstMatchOf" => {
                    Adjustment::StartBeforeFirstMatch(regex(value).map_err(fail)?)
                }
                "adjust.endAfterFirstMatchOf" => {
                    Adjustment::EndAfterFirstMatch(regex(value).map_err(fail)?)
                }
                _ => return Err(fail(format!("unknown property '{key}'"))),
            };
            rules.adjustments.push(Scoped { capture, rule });
        }

        Ok(rules)
    }

    pub(crate) fn tests_for(&self, capture: usize) -> impl Iterator<Item = &NodeTest> {
        self.tests
            .iter()
            .filter(move |s| s.applies_to(capture))
            .map(|s| &s.rule)
    }

    pub(crate) fn adjustments_for(&self, capture: usize) -> impl Iterator<Item = &Adjustment> {
        self.adjustments
            .iter()
            .filter(move |s| s.applies_to(capture))
            .map(|s| &s.rule)
    }

    pub(crate) fn has_claim(&self, capture: usize, claim: Claim) -> bool {
        self.claims
            .iter()
            .any(|s| s.applies_to(capture) && s.rule == claim)
    }
}

fn required_value(property: &QueryProperty) -> Result<&str, String> {
    property
        .value
        .as_deref()
        .ok_or_else(|| format!("'{}' requires a value", property.key))
}

fn type_list(property: &QueryProperty) -> Result<Vec<String>, String> {
    let value = required_value(property)?;
    let types: Vec<String> = value
        .split([' ', ','])
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect();
    if types.is_empty() {
        return Err(format!("'{}' requires at least one node type", property.key));
    }
    Ok(types)
}

fn integer(key: &str, value: &str) -> Result<i64, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("'{key}' expects an integer, got '{value}'"))
}

fn regex(value: &str) -> Result<Regex, String> {
    Regex::new(value).map_err(|e| format!("invalid regex '{value}': {e}"))
}

/// Default edge a descriptor resolves to for each adjustment.
pub(crate) fn default_edge(adjustment: &Adjustment) -> Edge {
    match adjustment {
        Adjustment::EndAt(_) => Edge::End,
        _ => Edge::Start,
    }
}
