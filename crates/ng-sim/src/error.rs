use ng_core::CoreError;
use ng_mobility::MobilityError;
use ng_spatial::SpatialError;
use ng_spawn::SpawnError;
use thiserror::Error;

use crate::Phase;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("generator configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("generation failed: {0}")]
    Spawn(#[from] SpawnError),

    #[error("moving object error: {0}")]
    Mobility(#[from] MobilityError),

    #[error("cannot {op} while the generator is {phase:?}")]
    InvalidPhase {
        op:    &'static str,
        phase: Phase,
    },
}

pub type SimResult<T> = Result<T, SimError>;
