//! Error types for relation building and queries.

use thiserror::Error;

/// Errors produced while building or querying boundary relations.
///
/// A feature missing a level's property is never an error; it is reported as
/// [`Diagnostic::MissingProperty`](crate::diagnostics::Diagnostic::MissingProperty)
/// and only that level's record is omitted. `AncestorChainBroken` is normally
/// reported the same way and only returned by the strict
/// [`AncestorChain::into_result`](crate::relations::AncestorChain::into_result).
/// `EmptyInput`, `EmptyGroup` and `CycleDetected` mean the input or the builder
/// itself is broken.
#[derive(Debug, Error)]
pub enum RelationError {
    #[error("cannot aggregate an empty set of envelopes")]
    EmptyInput,

    #[error("relation group '{name}' at level {level} has no members")]
    EmptyGroup { level: usize, name: String },

    #[error("invalid envelope: min must not exceed max and coordinates must be finite")]
    InvalidEnvelope,

    #[error("ancestor chain broken: no relation '{name}' at level {level}")]
    AncestorChainBroken { level: usize, name: String },

    #[error("cycle detected at relation '{name}' (level {level})")]
    CycleDetected { level: usize, name: String },

    #[error("no relation '{name}' at level {level}")]
    NotFound { level: usize, name: String },

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RelationError>;
