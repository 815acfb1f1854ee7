use thiserror::Error;

use ng_core::NodeId;
use ng_mobility::MobilityError;

#[derive(Debug, Error)]
pub enum SpawnError {
    /// No route was found after exhausting the retry budget.
    #[error("no reachable destination after {attempts} attempts (last pair {from} → {to})")]
    RetriesExhausted {
        attempts: u32,
        from:     NodeId,
        to:       NodeId,
    },

    #[error("network has no node with an incident edge to start from")]
    NoStartNodes,

    #[error(transparent)]
    Mobility(#[from] MobilityError),
}

pub type SpawnResult<T> = Result<T, SpawnError>;
