mod builder;
mod errors;
mod split;
mod types;

#[cfg(test)]
mod proptests;
#[cfg(test)]
pub(crate) mod testing;

pub use builder::{TrajectoryBufferBuilder, trajectory_to_agentbuffer};
pub use errors::TrajectoryError;
pub use split::{ObsKind, ObsLayout, SlotSpec, SplitObservations, split_obs};
pub use types::{AgentExperience, AgentId, ObsTensor, StepPosition, Trajectory};
