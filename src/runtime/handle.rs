use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use uuid::Uuid;

use super::error::ProcessError;
use crate::buffer::AgentBuffer;

/// Pending result of one submitted trajectory conversion.
#[derive(Debug)]
pub struct ConversionHandle {
    id: Uuid,
    receiver: oneshot::Receiver<Result<AgentBuffer, ProcessError>>,
}

impl ConversionHandle {
    pub(crate) fn new(
        id: Uuid,
        receiver: oneshot::Receiver<Result<AgentBuffer, ProcessError>>,
    ) -> Self {
        Self { id, receiver }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Future for ConversionHandle {
    type Output = Result<AgentBuffer, ProcessError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| -> Self::Output { Ok(received??) })
    }
}
