//! Closed representation of a parsed workflow document.
//!
//! `serde_yaml::Value` carries tags and several scalar kinds the updater has
//! no use for. Workflow files are folded into three shapes (mapping, sequence,
//! scalar) so every walk over them is an exhaustive match.

use crate::error::Result;
use serde_yaml::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Entries in document order.
    Mapping(Vec<(Node, Node)>),
    Sequence(Vec<Node>),
    Scalar(Scalar),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(String),
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => f.write_str(n),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl Node {
    /// Parse YAML text. An empty document parses to `Scalar::Null`.
    pub fn parse(text: &str) -> Result<Node> {
        let value: Value = serde_yaml::from_str(text)?;
        Ok(Node::from(value))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Short human-readable rendering, used in diagnostics for values that
    /// are not plain strings.
    pub fn describe(&self) -> String {
        match self {
            Node::Mapping(entries) => format!("<mapping with {} entries>", entries.len()),
            Node::Sequence(items) => format!("<sequence with {} items>", items.len()),
            Node::Scalar(scalar) => scalar.to_string(),
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Node::Scalar(Scalar::Number(n.to_string())),
            Value::String(s) => Node::Scalar(Scalar::String(s)),
            Value::Sequence(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Mapping(map) => Node::Mapping(
                map.into_iter()
                    .map(|(k, v)| (Node::from(k), Node::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Node::from(tagged.value),
        }
    }
}
