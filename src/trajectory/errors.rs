use thiserror::Error;

use super::types::StepPosition;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    #[error("trajectory has no steps")]
    EmptyTrajectory,

    #[error("{position}: observation structure differs from step 0: {detail}")]
    InconsistentObservationShape {
        position: StepPosition,
        detail: String,
    },

    #[error("{position}: observation slot {slot} has rank {rank}, expected 1 or 3")]
    UnsupportedObservationRank {
        position: StepPosition,
        slot: usize,
        rank: usize,
    },

    #[error("observation data length {len} does not match shape {shape:?}")]
    ShapeDataMismatch { shape: Vec<usize>, len: usize },
}
