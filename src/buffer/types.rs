use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::errors::BufferError;
use crate::trajectory::ObsTensor;

/// Names of the per-step fields a converted trajectory carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BufferKey {
    VisualObs(usize),
    NextVisualObs(usize),
    VectorObs,
    NextVectorIn,
    Memory,
    Masks,
    Done,
    ActionsPre,
    Actions,
    ActionProbs,
    ActionMask,
    PrevAction,
    EnvironmentRewards,
}

impl fmt::Display for BufferKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferKey::VisualObs(slot) => write!(f, "visual_obs{slot}"),
            BufferKey::NextVisualObs(slot) => write!(f, "next_visual_obs{slot}"),
            BufferKey::VectorObs => f.write_str("vector_obs"),
            BufferKey::NextVectorIn => f.write_str("next_vector_in"),
            BufferKey::Memory => f.write_str("memory"),
            BufferKey::Masks => f.write_str("masks"),
            BufferKey::Done => f.write_str("done"),
            BufferKey::ActionsPre => f.write_str("actions_pre"),
            BufferKey::Actions => f.write_str("actions"),
            BufferKey::ActionProbs => f.write_str("action_probs"),
            BufferKey::ActionMask => f.write_str("action_mask"),
            BufferKey::PrevAction => f.write_str("prev_action"),
            BufferKey::EnvironmentRewards => f.write_str("environment_rewards"),
        }
    }
}

impl FromStr for BufferKey {
    type Err = BufferError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let unknown = || BufferError::UnknownField(name.to_string());
        let slot = |digits: &str| digits.parse::<usize>().map_err(|_| unknown());

        if let Some(digits) = name.strip_prefix("next_visual_obs") {
            return Ok(BufferKey::NextVisualObs(slot(digits)?));
        }
        if let Some(digits) = name.strip_prefix("visual_obs") {
            return Ok(BufferKey::VisualObs(slot(digits)?));
        }

        match name {
            "vector_obs" => Ok(BufferKey::VectorObs),
            "next_vector_in" => Ok(BufferKey::NextVectorIn),
            "memory" => Ok(BufferKey::Memory),
            "masks" => Ok(BufferKey::Masks),
            "done" => Ok(BufferKey::Done),
            "actions_pre" => Ok(BufferKey::ActionsPre),
            "actions" => Ok(BufferKey::Actions),
            "action_probs" => Ok(BufferKey::ActionProbs),
            "action_mask" => Ok(BufferKey::ActionMask),
            "prev_action" => Ok(BufferKey::PrevAction),
            "environment_rewards" => Ok(BufferKey::EnvironmentRewards),
            _ => Err(unknown()),
        }
    }
}

/// A single step's entry in a buffer field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(f32),
    Flag(bool),
    Vector(Vec<f32>),
    Tensor(ObsTensor),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            FieldValue::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[f32]> {
        match self {
            FieldValue::Vector(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_tensor(&self) -> Option<&ObsTensor> {
        match self {
            FieldValue::Tensor(tensor) => Some(tensor),
            _ => None,
        }
    }
}

/// Step-ordered sequence of one field's values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AgentBufferField {
    values: Vec<FieldValue>,
}

impl AgentBufferField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: FieldValue) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FieldValue> {
        self.values.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldValue> {
        self.values.iter()
    }

    /// All entries as scalars, or `None` if any entry is another variant.
    pub fn as_scalars(&self) -> Option<Vec<f32>> {
        self.values.iter().map(FieldValue::as_scalar).collect()
    }

    pub fn as_flags(&self) -> Option<Vec<bool>> {
        self.values.iter().map(FieldValue::as_flag).collect()
    }

    pub fn as_vectors(&self) -> Option<Vec<&[f32]>> {
        self.values.iter().map(FieldValue::as_vector).collect()
    }

    pub fn as_tensors(&self) -> Option<Vec<&ObsTensor>> {
        self.values.iter().map(FieldValue::as_tensor).collect()
    }

    fn extend_from(&mut self, other: &AgentBufferField) {
        self.values.extend(other.values.iter().cloned());
    }

    fn keep_last(&mut self, max_length: usize) {
        let excess = self.values.len().saturating_sub(max_length);
        self.values.drain(..excess);
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

impl<'a> IntoIterator for &'a AgentBufferField {
    type Item = &'a FieldValue;
    type IntoIter = std::slice::Iter<'a, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Column-oriented experience storage: one field per key, one entry per step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AgentBuffer {
    fields: BTreeMap<BufferKey, AgentBufferField>,
}

impl AgentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The field under `key`, created empty if absent.
    pub fn field_mut(&mut self, key: BufferKey) -> &mut AgentBufferField {
        self.fields.entry(key).or_default()
    }

    pub fn get(&self, key: &BufferKey) -> Option<&AgentBufferField> {
        self.fields.get(key)
    }

    pub fn get_by_name(&self, name: &str) -> Result<&AgentBufferField, BufferError> {
        let key: BufferKey = name.parse()?;
        self.fields
            .get(&key)
            .ok_or_else(|| BufferError::UnknownField(name.to_string()))
    }

    pub fn contains(&self, key: &BufferKey) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &BufferKey> {
        self.fields.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BufferKey, &AgentBufferField)> {
        self.fields.iter()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Entries per field, taken from the first field.
    pub fn num_experiences(&self) -> usize {
        self.fields.values().next().map_or(0, AgentBufferField::len)
    }

    /// Fails on the first field whose length is not `expected`.
    pub fn check_length(&self, expected: usize) -> Result<(), BufferError> {
        for (key, field) in &self.fields {
            if field.len() != expected {
                return Err(BufferError::LengthMismatch {
                    key: *key,
                    expected,
                    found: field.len(),
                });
            }
        }
        Ok(())
    }

    /// Appends every field of `other` after this buffer's entries.
    ///
    /// An empty buffer adopts `other`'s field set; otherwise both field sets
    /// must match.
    pub fn append_buffer(&mut self, other: &AgentBuffer) -> Result<(), BufferError> {
        if self.fields.is_empty() {
            self.fields = other.fields.clone();
            return Ok(());
        }
        if !self.fields.keys().eq(other.fields.keys()) {
            return Err(BufferError::KeySetMismatch);
        }

        for (key, field) in &other.fields {
            self.field_mut(*key).extend_from(field);
        }
        Ok(())
    }

    /// Drops the oldest entries so that each field holds at most `max_length`.
    pub fn truncate(&mut self, max_length: usize) {
        for field in self.fields.values_mut() {
            field.keep_last(max_length);
        }
    }

    /// Empties every field, keeping the field set.
    pub fn reset(&mut self) {
        for field in self.fields.values_mut() {
            field.clear();
        }
    }
}
