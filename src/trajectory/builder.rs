use tracing::{debug, warn};

use super::errors::TrajectoryError;
use super::split::{ObsLayout, SplitObservations};
use super::types::{AgentExperience, StepPosition, Trajectory};
use crate::buffer::{AgentBuffer, BufferKey, FieldValue};

/// Flattens a trajectory into an [`AgentBuffer`] with one entry per step.
///
/// Every field is read from `steps[i]` except the `next_*` observation
/// fields, which come from `steps[i + 1]`, or from the bootstrap step for the
/// last index. The observation layout is taken from step 0 and every other
/// step, including the bootstrap step, must match it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrajectoryBufferBuilder;

impl TrajectoryBufferBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, trajectory: &Trajectory) -> Result<AgentBuffer, TrajectoryError> {
        let result = build_buffer(trajectory);
        match &result {
            Ok(buffer) => debug!(
                agent_id = trajectory.agent_id().map(|id| id.as_str()),
                steps = trajectory.len(),
                fields = buffer.len(),
                "converted trajectory to agent buffer"
            ),
            Err(err) => warn!(
                agent_id = trajectory.agent_id().map(|id| id.as_str()),
                steps = trajectory.len(),
                error = %err,
                "failed to convert trajectory"
            ),
        }
        result
    }
}

pub fn trajectory_to_agentbuffer(trajectory: &Trajectory) -> Result<AgentBuffer, TrajectoryError> {
    TrajectoryBufferBuilder::new().build(trajectory)
}

impl Trajectory {
    pub fn to_agentbuffer(&self) -> Result<AgentBuffer, TrajectoryError> {
        trajectory_to_agentbuffer(self)
    }
}

fn build_buffer(trajectory: &Trajectory) -> Result<AgentBuffer, TrajectoryError> {
    let first = trajectory
        .steps
        .first()
        .ok_or(TrajectoryError::EmptyTrajectory)?;
    let layout = ObsLayout::detect(&first.observations, StepPosition::Step(0))?;

    let splits = trajectory
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| layout.split(&step.observations, StepPosition::Step(index)))
        .collect::<Result<Vec<_>, _>>()?;
    let bootstrap = layout.split(
        &trajectory.bootstrap_step.observations,
        StepPosition::Bootstrap,
    )?;

    let mut buffer = AgentBuffer::new();
    for (index, (step, current)) in trajectory.steps.iter().zip(&splits).enumerate() {
        let next = splits.get(index + 1).unwrap_or(&bootstrap);
        append_step(&mut buffer, step, current, next);
    }

    Ok(buffer)
}

fn append_step(
    buffer: &mut AgentBuffer,
    step: &AgentExperience,
    current: &SplitObservations,
    next: &SplitObservations,
) {
    for (slot, (obs, next_obs)) in current
        .visual_observations
        .iter()
        .zip(&next.visual_observations)
        .enumerate()
    {
        buffer
            .field_mut(BufferKey::VisualObs(slot))
            .push(FieldValue::Tensor(obs.clone()));
        buffer
            .field_mut(BufferKey::NextVisualObs(slot))
            .push(FieldValue::Tensor(next_obs.clone()));
    }

    let vector = |values: &[f32]| FieldValue::Vector(values.to_vec());
    buffer
        .field_mut(BufferKey::VectorObs)
        .push(vector(&current.vector_observations));
    buffer
        .field_mut(BufferKey::NextVectorIn)
        .push(vector(&next.vector_observations));
    buffer.field_mut(BufferKey::Memory).push(vector(&step.memory));

    // Truncated steps must not bootstrap, whether or not `done` is also set.
    let mask = if step.max_step { 0.0 } else { 1.0 };
    buffer.field_mut(BufferKey::Masks).push(FieldValue::Scalar(mask));
    buffer
        .field_mut(BufferKey::Done)
        .push(FieldValue::Flag(step.done));

    buffer
        .field_mut(BufferKey::ActionsPre)
        .push(vector(&step.action_pre));
    buffer.field_mut(BufferKey::Actions).push(vector(&step.action));
    buffer
        .field_mut(BufferKey::ActionProbs)
        .push(vector(&step.action_probs));
    buffer
        .field_mut(BufferKey::ActionMask)
        .push(vector(&step.action_mask));
    buffer
        .field_mut(BufferKey::PrevAction)
        .push(vector(&step.prev_action));
    buffer
        .field_mut(BufferKey::EnvironmentRewards)
        .push(FieldValue::Scalar(step.reward));
}
