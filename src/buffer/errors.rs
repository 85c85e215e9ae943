use thiserror::Error;

use super::types::BufferKey;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BufferError {
    #[error("field {key} has {found} entries, expected {expected}")]
    LengthMismatch {
        key: BufferKey,
        expected: usize,
        found: usize,
    },

    #[error("buffers hold different field sets")]
    KeySetMismatch,

    #[error("unknown buffer field: {0}")]
    UnknownField(String),
}
