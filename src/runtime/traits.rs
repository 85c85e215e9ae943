use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::SinkError;
use crate::buffer::AgentBuffer;

/// Consumer of converted buffers, typically the learner's update queue.
#[async_trait]
pub trait BufferSink: Send {
    async fn submit(&mut self, buffer: AgentBuffer) -> Result<(), SinkError>;
}

/// Keeps every submitted buffer in memory.
#[derive(Debug, Default)]
pub struct VecSink {
    buffers: Vec<AgentBuffer>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffers(&self) -> &[AgentBuffer] {
        &self.buffers
    }

    pub fn into_inner(self) -> Vec<AgentBuffer> {
        self.buffers
    }
}

#[async_trait]
impl BufferSink for VecSink {
    async fn submit(&mut self, buffer: AgentBuffer) -> Result<(), SinkError> {
        self.buffers.push(buffer);
        Ok(())
    }
}

#[async_trait]
impl BufferSink for mpsc::Sender<AgentBuffer> {
    async fn submit(&mut self, buffer: AgentBuffer) -> Result<(), SinkError> {
        self.send(buffer).await.map_err(|_| SinkError::Closed)
    }
}
