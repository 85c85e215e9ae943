//! Fixtures shared by the crate's unit tests.

use super::{AgentExperience, AgentId, ObsTensor, Trajectory};

pub(crate) const VEC_OBS_SIZE: usize = 6;
pub(crate) const ACTION_SIZE: usize = 4;
pub(crate) const MEMORY_SIZE: usize = 10;

pub(crate) fn make_experience(observations: Vec<ObsTensor>) -> AgentExperience {
    AgentExperience {
        observations,
        reward: 1.0,
        done: false,
        action: vec![0.0; ACTION_SIZE],
        action_probs: vec![1.0; ACTION_SIZE],
        action_pre: vec![0.0; ACTION_SIZE],
        action_mask: vec![1.0; ACTION_SIZE],
        prev_action: vec![1.0; ACTION_SIZE],
        max_step: false,
        memory: vec![1.0; MEMORY_SIZE],
        agent_id: AgentId::new("test_agent"),
    }
}

/// One 84x84x3 visual observation followed by one vector observation.
pub(crate) fn default_obs() -> Vec<ObsTensor> {
    vec![
        ObsTensor::filled(&[84, 84, 3], 1.0).unwrap(),
        ObsTensor::filled(&[VEC_OBS_SIZE], 1.0).unwrap(),
    ]
}

/// Trajectory of `length` steps ending in a done, or in a step limit when
/// `max_step_complete` is set.
pub(crate) fn make_fake_trajectory(length: usize, max_step_complete: bool) -> Trajectory {
    let mut steps: Vec<AgentExperience> = (0..length.saturating_sub(1))
        .map(|_| make_experience(default_obs()))
        .collect();
    let mut last = make_experience(default_obs());
    last.done = !max_step_complete;
    last.max_step = max_step_complete;
    steps.push(last);
    Trajectory::new(steps, make_experience(default_obs()))
}
