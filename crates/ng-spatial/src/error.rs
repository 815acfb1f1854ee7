//! Spatial-subsystem error type.

use thiserror::Error;

use ng_core::NodeId;

/// Errors produced by `ng-spatial`.
///
/// Routing never fails with an error: an unreachable destination is the
/// ordinary [`RouteResult::Unreachable`](crate::RouteResult::Unreachable)
/// outcome.  Everything here is a topology problem and is fatal at load.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("{file}, record {record}: {reason}")]
    Load {
        file:   String,
        record: u64,
        reason: String,
    },

    #[error("network has no nodes")]
    EmptyNetwork,

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("edge {a} – {b}: {reason}")]
    InvalidEdge {
        a:      NodeId,
        b:      NodeId,
        reason: String,
    },

    #[error("invalid position for node {0}: coordinates must be finite")]
    InvalidPosition(NodeId),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
