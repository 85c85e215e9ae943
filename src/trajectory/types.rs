use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::TrajectoryError;

/// A dense observation tensor stored row-major.
///
/// Rank 1 tensors are vector observations, rank 3 tensors are
/// height x width x channel visual observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ObsTensorParts")]
pub struct ObsTensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

#[derive(Deserialize)]
struct ObsTensorParts {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl TryFrom<ObsTensorParts> for ObsTensor {
    type Error = TrajectoryError;

    fn try_from(parts: ObsTensorParts) -> Result<Self, Self::Error> {
        ObsTensor::new(parts.shape, parts.data)
    }
}

impl ObsTensor {
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self, TrajectoryError> {
        if element_count(&shape) != Some(data.len()) {
            return Err(TrajectoryError::ShapeDataMismatch {
                shape,
                len: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Rank 1 tensor over `values`.
    pub fn vector(values: Vec<f32>) -> Self {
        Self {
            shape: vec![values.len()],
            data: values,
        }
    }

    /// Tensor of `shape` with every element set to `value`.
    pub fn filled(shape: &[usize], value: f32) -> Result<Self, TrajectoryError> {
        let len = element_count(shape).ok_or_else(|| TrajectoryError::ShapeDataMismatch {
            shape: shape.to_vec(),
            len: 0,
        })?;
        Ok(Self {
            shape: shape.to_vec(),
            data: vec![value; len],
        })
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Number of elements a tensor of `shape` holds, `None` on overflow.
fn element_count(shape: &[usize]) -> Option<usize> {
    shape
        .iter()
        .try_fold(1_usize, |count, &dim| count.checked_mul(dim))
}

/// Opaque identifier of the agent instance that produced an experience.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One time step of agent/environment interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentExperience {
    pub observations: Vec<ObsTensor>,
    /// Reward received entering this step.
    pub reward: f32,
    /// Last step of the episode, for any reason.
    pub done: bool,
    pub action: Vec<f32>,
    pub action_probs: Vec<f32>,
    /// Action before the policy's output transform (e.g. pre-squash).
    pub action_pre: Vec<f32>,
    /// 1.0 marks an allowed discrete choice.
    pub action_mask: Vec<f32>,
    pub prev_action: Vec<f32>,
    /// `done` was caused by a step limit rather than a natural episode end.
    pub max_step: bool,
    /// Recurrent hidden state snapshot.
    pub memory: Vec<f32>,
    pub agent_id: AgentId,
}

/// Consecutive steps of one agent's episode segment.
///
/// `bootstrap_step` follows the last element of `steps` in time. It only
/// supplies the next observation for that last step and never becomes a
/// buffer row of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub steps: Vec<AgentExperience>,
    pub bootstrap_step: AgentExperience,
}

impl Trajectory {
    pub fn new(steps: Vec<AgentExperience>, bootstrap_step: AgentExperience) -> Self {
        Self {
            steps,
            bootstrap_step,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The segment ended because its episode ended.
    pub fn done_reached(&self) -> bool {
        self.steps.last().is_some_and(|step| step.done)
    }

    /// The segment ended on a step limit.
    pub fn max_step_reached(&self) -> bool {
        self.steps.last().is_some_and(|step| step.max_step)
    }

    pub fn agent_id(&self) -> Option<&AgentId> {
        self.steps.first().map(|step| &step.agent_id)
    }
}

/// Where in a trajectory an observation list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepPosition {
    Step(usize),
    Bootstrap,
    /// A bare observation list not attached to a trajectory.
    Detached,
}

impl fmt::Display for StepPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepPosition::Step(index) => write!(f, "step {index}"),
            StepPosition::Bootstrap => f.write_str("bootstrap step"),
            StepPosition::Detached => f.write_str("observation list"),
        }
    }
}
