//! Flattens recorded agent trajectories into column-oriented training buffers.
//!
//! A [`Trajectory`] is a row-per-step recording plus one bootstrap step. The
//! [`TrajectoryBufferBuilder`] transposes it into an [`AgentBuffer`] keyed by
//! field name, splitting each step's observations into a concatenated vector
//! part and per-slot visual tensors and aligning the `next_*` fields one step
//! ahead.
//!
//! ```
//! use rollbuf::{AgentExperience, AgentId, BufferKey, ObsTensor, Trajectory};
//!
//! let step = |value: f32| AgentExperience {
//!     observations: vec![ObsTensor::vector(vec![value; 3])],
//!     reward: 0.0,
//!     done: false,
//!     action: vec![0.0],
//!     action_probs: vec![1.0],
//!     action_pre: vec![0.0],
//!     action_mask: vec![1.0],
//!     prev_action: vec![0.0],
//!     max_step: false,
//!     memory: Vec::new(),
//!     agent_id: AgentId::new("agent-0"),
//! };
//! let trajectory = Trajectory::new(vec![step(0.0), step(1.0)], step(2.0));
//!
//! let buffer = trajectory.to_agentbuffer()?;
//! assert_eq!(buffer.num_experiences(), 2);
//! assert!(!buffer.contains(&BufferKey::VisualObs(0)));
//! # Ok::<(), rollbuf::TrajectoryError>(())
//! ```

pub mod buffer;
pub mod runtime;
pub mod trajectory;

pub use buffer::{AgentBuffer, AgentBufferField, BufferError, BufferKey, FieldValue};
pub use runtime::{
    BufferSink, ConversionHandle, ProcessError, ProcessorConfig, ProcessorStats, SinkError,
    TrajectoryProcessor, VecSink,
};
pub use trajectory::{
    AgentExperience, AgentId, ObsKind, ObsLayout, ObsTensor, SplitObservations, StepPosition,
    Trajectory, TrajectoryBufferBuilder, TrajectoryError, split_obs, trajectory_to_agentbuffer,
};
