use super::errors::TrajectoryError;
use super::types::{ObsTensor, StepPosition};

/// How an observation slot is routed into the buffer, decided by tensor rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObsKind {
    Vector,
    Visual,
}

impl ObsKind {
    pub fn classify(
        tensor: &ObsTensor,
        position: StepPosition,
        slot: usize,
    ) -> Result<Self, TrajectoryError> {
        match tensor.rank() {
            1 => Ok(ObsKind::Vector),
            3 => Ok(ObsKind::Visual),
            rank => Err(TrajectoryError::UnsupportedObservationRank {
                position,
                slot,
                rank,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSpec {
    pub kind: ObsKind,
    pub shape: Vec<usize>,
    /// Element count, taken from the tensor's data.
    pub len: usize,
}

/// Observation slot structure taken from one step and enforced on the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObsLayout {
    slots: Vec<SlotSpec>,
}

impl ObsLayout {
    pub fn detect(
        observations: &[ObsTensor],
        position: StepPosition,
    ) -> Result<Self, TrajectoryError> {
        let slots = observations
            .iter()
            .enumerate()
            .map(|(slot, tensor)| -> Result<SlotSpec, TrajectoryError> {
                Ok(SlotSpec {
                    kind: ObsKind::classify(tensor, position, slot)?,
                    shape: tensor.shape().to_vec(),
                    len: tensor.len(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[SlotSpec] {
        &self.slots
    }

    pub fn num_visual(&self) -> usize {
        self.count(ObsKind::Visual)
    }

    /// Length of the concatenated vector observation.
    pub fn vector_size(&self) -> usize {
        self.slots
            .iter()
            .filter(|spec| spec.kind == ObsKind::Vector)
            .map(|spec| spec.len)
            .sum()
    }

    fn count(&self, kind: ObsKind) -> usize {
        self.slots.iter().filter(|spec| spec.kind == kind).count()
    }

    /// Checks `observations` against this layout slot by slot.
    pub fn validate(
        &self,
        observations: &[ObsTensor],
        position: StepPosition,
    ) -> Result<(), TrajectoryError> {
        if observations.len() != self.slots.len() {
            return Err(TrajectoryError::InconsistentObservationShape {
                position,
                detail: format!(
                    "expected {} observation slots, found {}",
                    self.slots.len(),
                    observations.len()
                ),
            });
        }

        for (slot, (tensor, spec)) in observations.iter().zip(&self.slots).enumerate() {
            ObsKind::classify(tensor, position, slot)?;
            if tensor.shape() != spec.shape.as_slice() {
                return Err(TrajectoryError::InconsistentObservationShape {
                    position,
                    detail: format!(
                        "slot {slot} has shape {:?}, expected {:?}",
                        tensor.shape(),
                        spec.shape
                    ),
                });
            }
        }
        Ok(())
    }

    /// Validates, then splits `observations` along this layout.
    pub fn split(
        &self,
        observations: &[ObsTensor],
        position: StepPosition,
    ) -> Result<SplitObservations, TrajectoryError> {
        self.validate(observations, position)?;

        let mut vector_observations = Vec::with_capacity(self.vector_size());
        let mut visual_observations = Vec::with_capacity(self.num_visual());
        for (tensor, spec) in observations.iter().zip(&self.slots) {
            match spec.kind {
                ObsKind::Vector => vector_observations.extend_from_slice(tensor.data()),
                ObsKind::Visual => visual_observations.push(tensor.clone()),
            }
        }

        Ok(SplitObservations {
            vector_observations,
            visual_observations,
        })
    }
}

/// One step's observations separated into the concatenated vector part and
/// the visual tensors in slot order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SplitObservations {
    pub vector_observations: Vec<f32>,
    pub visual_observations: Vec<ObsTensor>,
}

pub fn split_obs(observations: &[ObsTensor]) -> Result<SplitObservations, TrajectoryError> {
    let position = StepPosition::Detached;
    ObsLayout::detect(observations, position)?.split(observations, position)
}
