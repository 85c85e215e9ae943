use thiserror::Error;

use crate::trajectory::TrajectoryError;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("conversion canceled")]
    Canceled,

    #[error("conversion failed: {0}")]
    Conversion(#[from] TrajectoryError),

    /// The blocking conversion task panicked or was aborted.
    #[error("conversion worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl From<tokio::sync::oneshot::error::RecvError> for ProcessError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        ProcessError::Canceled
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink closed")]
    Closed,

    #[error("sink error: {0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
