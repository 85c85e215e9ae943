mod errors;
mod types;

pub use errors::BufferError;
pub use types::{AgentBuffer, AgentBufferField, BufferKey, FieldValue};
