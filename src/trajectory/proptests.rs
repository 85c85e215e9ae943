//! Property tests over random observation layouts and end-of-episode flags.

use std::collections::BTreeSet;

use proptest::prelude::*;

use super::testing::make_experience;
use super::{ObsTensor, Trajectory, split_obs, trajectory_to_agentbuffer};
use crate::buffer::BufferKey;

#[derive(Debug, Clone)]
enum Slot {
    Vector(usize),
    Visual([usize; 3]),
}

impl Slot {
    fn tensor(&self, value: f32) -> ObsTensor {
        match self {
            Slot::Vector(size) => ObsTensor::vector(vec![value; *size]),
            Slot::Visual(shape) => ObsTensor::filled(shape, value).unwrap(),
        }
    }
}

fn slot() -> impl Strategy<Value = Slot> {
    prop_oneof![
        (0usize..8).prop_map(Slot::Vector),
        (1usize..5, 1usize..5, 1usize..4).prop_map(|(h, w, c)| Slot::Visual([h, w, c])),
    ]
}

/// (done, max_step) per step.
fn end_flags() -> impl Strategy<Value = Vec<(bool, bool)>> {
    prop::collection::vec((any::<bool>(), any::<bool>()), 1..20)
}

fn observations(layout: &[Slot], value: f32) -> Vec<ObsTensor> {
    layout.iter().map(|slot| slot.tensor(value)).collect()
}

fn make_trajectory(layout: &[Slot], flags: &[(bool, bool)]) -> Trajectory {
    let steps = flags
        .iter()
        .enumerate()
        .map(|(index, &(done, max_step))| {
            let mut step = make_experience(observations(layout, index as f32));
            step.done = done;
            step.max_step = max_step;
            step
        })
        .collect();
    Trajectory::new(steps, make_experience(observations(layout, -1.0)))
}

fn num_visual(layout: &[Slot]) -> usize {
    layout
        .iter()
        .filter(|slot| matches!(slot, Slot::Visual(_)))
        .count()
}

proptest! {
    #[test]
    fn test_split_matches_layout(layout in prop::collection::vec(slot(), 0..8)) {
        let split = split_obs(&observations(&layout, 1.0)).unwrap();

        let vector_size: usize = layout
            .iter()
            .map(|slot| match slot {
                Slot::Vector(size) => *size,
                Slot::Visual(_) => 0,
            })
            .sum();
        let visual_shapes: Vec<Vec<usize>> = layout
            .iter()
            .filter_map(|slot| match slot {
                Slot::Visual(shape) => Some(shape.to_vec()),
                Slot::Vector(_) => None,
            })
            .collect();
        let split_shapes: Vec<Vec<usize>> = split
            .visual_observations
            .iter()
            .map(|tensor| tensor.shape().to_vec())
            .collect();

        prop_assert_eq!(split.vector_observations.len(), vector_size);
        prop_assert_eq!(split_shapes, visual_shapes);
    }

    #[test]
    fn test_buffer_fields_and_lengths(
        layout in prop::collection::vec(slot(), 0..6),
        flags in end_flags(),
    ) {
        let trajectory = make_trajectory(&layout, &flags);
        let buffer = trajectory_to_agentbuffer(&trajectory).unwrap();

        let mut expected: BTreeSet<BufferKey> = [
            BufferKey::VectorObs,
            BufferKey::NextVectorIn,
            BufferKey::Memory,
            BufferKey::Masks,
            BufferKey::Done,
            BufferKey::ActionsPre,
            BufferKey::Actions,
            BufferKey::ActionProbs,
            BufferKey::ActionMask,
            BufferKey::PrevAction,
            BufferKey::EnvironmentRewards,
        ]
        .into_iter()
        .collect();
        for slot in 0..num_visual(&layout) {
            expected.insert(BufferKey::VisualObs(slot));
            expected.insert(BufferKey::NextVisualObs(slot));
        }
        let keys: BTreeSet<BufferKey> = buffer.keys().copied().collect();

        prop_assert_eq!(keys, expected);
        prop_assert_eq!(buffer.check_length(flags.len()), Ok(()));
        prop_assert_eq!(buffer.num_experiences(), flags.len());
    }

    #[test]
    fn test_next_observations_shift_onto_bootstrap(
        layout in prop::collection::vec(slot(), 0..6),
        flags in end_flags(),
    ) {
        let trajectory = make_trajectory(&layout, &flags);
        let buffer = trajectory_to_agentbuffer(&trajectory).unwrap();

        let next_vectors = buffer
            .get(&BufferKey::NextVectorIn)
            .unwrap()
            .as_vectors()
            .unwrap();
        for index in 0..flags.len() {
            let source = trajectory
                .steps
                .get(index + 1)
                .unwrap_or(&trajectory.bootstrap_step);
            let expected = split_obs(&source.observations).unwrap();

            prop_assert_eq!(next_vectors[index], expected.vector_observations.as_slice());
            for (slot, tensor) in expected.visual_observations.iter().enumerate() {
                let next_visual = buffer
                    .get(&BufferKey::NextVisualObs(slot))
                    .unwrap()
                    .as_tensors()
                    .unwrap();
                prop_assert_eq!(next_visual[index], tensor);
            }
        }
    }

    #[test]
    fn test_masks_and_dones_follow_flags(
        layout in prop::collection::vec(slot(), 0..4),
        flags in end_flags(),
    ) {
        let trajectory = make_trajectory(&layout, &flags);
        let buffer = trajectory_to_agentbuffer(&trajectory).unwrap();

        let masks = buffer.get(&BufferKey::Masks).unwrap().as_scalars().unwrap();
        let dones = buffer.get(&BufferKey::Done).unwrap().as_flags().unwrap();
        for (index, &(done, max_step)) in flags.iter().enumerate() {
            prop_assert_eq!(masks[index], if max_step { 0.0 } else { 1.0 });
            prop_assert_eq!(dones[index], done);
        }

        prop_assert_eq!(trajectory_to_agentbuffer(&trajectory).unwrap(), buffer);
    }
}
