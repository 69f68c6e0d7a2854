use std::path::PathBuf;

use thiserror::Error;

use crate::diagnostics::{render, DiagnosticNode};

/// Everything `process` can fail with.
#[derive(Debug, Error)]
pub enum Error {
    /// The value does not fit the type.
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    /// The type system is inconsistent; never folded into diagnostics.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// A value-shape failure rooted at the caller's label.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", render_root(.label, .node))]
pub struct SerializationError {
    pub label: String,
    pub node: DiagnosticNode,
}

fn render_root(label: &str, node: &DiagnosticNode) -> String {
    render(label, node.direction, &node.type_display, node)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("type not found: {fqn}")]
    UnknownType { fqn: String },
    #[error("{fqn} is not an enum type")]
    NotAnEnum { fqn: String },
    #[error("no symbols registered for enum {fqn}")]
    UnknownSymbols { fqn: String },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("at JSON path {path} → {message}")]
    Parse { path: String, message: String },
    #[error("type {fqn} is declared more than once")]
    Duplicate { fqn: String },
    #[error("type registered under {key} declares fqn {fqn}")]
    FqnMismatch { key: String, fqn: String },
}
