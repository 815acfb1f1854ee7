//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::NodeId;

/// Errors produced while building the run configuration or core values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid value {value:?} for key {key:?}: {reason}")]
    InvalidValue {
        key:    String,
        value:  String,
        reason: String,
    },

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `ng-core`.
pub type CoreResult<T> = Result<T, CoreError>;
