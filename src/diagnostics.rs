//! Hierarchical failure descriptions.
//!
//! A node describes the failing value and lists one or more reasons. Leaf
//! nodes (built directly by a conversion strategy) only hold plain reasons;
//! recursion wraps a child node in a [`Reason::Nested`] tagged with the path
//! segment where it failed.
pub mod inspect;
pub mod render;

use crate::serialization::Direction;
use crate::value::Value;

pub use inspect::describe_failure;
pub use render::render;

#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticNode {
    pub direction: Direction,
    /// Type display for the header, e.g. `array<number>`.
    pub type_display: String,
    pub summary: String,
    pub rendering: Option<String>,
    pub reasons: Vec<Reason>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reason {
    Plain(String),
    Nested { path: String, node: Box<DiagnosticNode> },
}

impl Reason {
    pub fn nested(path: impl Into<String>, node: DiagnosticNode) -> Self {
        Reason::Nested { path: path.into(), node: Box::new(node) }
    }
}

impl From<String> for Reason {
    fn from(s: String) -> Self { Reason::Plain(s) }
}

impl From<&str> for Reason {
    fn from(s: &str) -> Self { Reason::Plain(s.to_owned()) }
}

pub fn compose_node(
    direction: Direction,
    type_display: String,
    summary: String,
    rendering: Option<String>,
    reasons: Vec<Reason>,
) -> DiagnosticNode {
    DiagnosticNode { direction, type_display, summary, rendering, reasons }
}

impl DiagnosticNode {
    /// Describes `value` and attaches `reasons`.
    pub fn for_value(direction: Direction, type_display: String, value: &Value, reasons: Vec<Reason>) -> Self {
        let (summary, rendering) = describe_failure(value);
        compose_node(direction, type_display, summary, rendering, reasons)
    }

    pub fn is_leaf(&self) -> bool {
        self.reasons.iter().all(|r| matches!(r, Reason::Plain(_)))
    }

    /// One line per leaf reason, nested path segments joined in front:
    /// `Index 0: Key 'a': Value is not a number`.
    pub fn flatten(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<String>) {
        for reason in &self.reasons {
            match reason {
                Reason::Plain(text) => out.push(format!("{prefix}{text}")),
                Reason::Nested { path, node } => node.flatten_into(&format!("{prefix}{path}: "), out),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flatten_joins_paths() {
        let leaf = DiagnosticNode::for_value(
            Direction::Serialize,
            "number".into(),
            &Value::from(json!("x")),
            vec!["Value is not a number".into()],
        );
        let mid = DiagnosticNode::for_value(
            Direction::Serialize,
            "map<number>".into(),
            &Value::from(json!({"a": "x"})),
            vec![Reason::nested("Key 'a'", leaf)],
        );
        let root = DiagnosticNode::for_value(
            Direction::Serialize,
            "array<map<number>>".into(),
            &Value::from(json!([{"a": "x"}])),
            vec![Reason::nested("Index 0", mid)],
        );
        assert!(!root.is_leaf());
        assert_eq!(root.flatten(), ["Index 0: Key 'a': Value is not a number"]);
    }
}
