use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{Semaphore, mpsc, oneshot};
use tracing::{info, warn};
use uuid::Uuid;

use super::error::ProcessError;
use super::handle::ConversionHandle;
use super::traits::BufferSink;
use crate::buffer::AgentBuffer;
use crate::trajectory::{Trajectory, TrajectoryBufferBuilder, TrajectoryError};

#[derive(Debug, Clone, Default)]
pub struct ProcessorConfig {
    /// Upper bound on conversions running at once. `None` means unbounded.
    pub max_in_flight: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorStats {
    pub trajectories: u64,
    pub experiences: u64,
}

/// Converts trajectories from independent agents on the tokio blocking pool.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct TrajectoryProcessor {
    builder: TrajectoryBufferBuilder,
    permits: Option<Arc<Semaphore>>,
}

impl Default for TrajectoryProcessor {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}

impl TrajectoryProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            builder: TrajectoryBufferBuilder::new(),
            permits: config
                .max_in_flight
                .map(|limit| Arc::new(Semaphore::new(limit.max(1)))),
        }
    }

    pub fn submit(&self, trajectory: Trajectory) -> ConversionHandle {
        let builder = self.builder;
        self.spawn_conversion(move || builder.build(&trajectory))
    }

    fn spawn_conversion<F>(&self, convert: F) -> ConversionHandle
    where
        F: FnOnce() -> Result<AgentBuffer, TrajectoryError> + Send + 'static,
    {
        let task_id = Uuid::new_v4();
        let (sender, receiver) = oneshot::channel();
        let permits = self.permits.clone();

        tokio::spawn(async move {
            let _permit = match permits {
                Some(permits) => match permits.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => return,
                },
                None => None,
            };
            let result = match tokio::task::spawn_blocking(convert).await {
                Ok(converted) => converted.map_err(ProcessError::from),
                Err(err) => {
                    warn!(task_id = %task_id, error = %err, "conversion worker failed");
                    Err(ProcessError::Worker(err))
                }
            };
            let _ = sender.send(result);
        });

        ConversionHandle::new(task_id, receiver)
    }

    /// One result per trajectory, in input order.
    pub async fn process_all(
        &self,
        trajectories: Vec<Trajectory>,
    ) -> Vec<Result<AgentBuffer, ProcessError>> {
        let handles: Vec<_> = trajectories
            .into_iter()
            .map(|trajectory| self.submit(trajectory))
            .collect();
        join_all(handles).await
    }

    /// Feeds every trajectory received on `receiver` through conversion into
    /// `sink`, in arrival order, until the channel closes.
    pub async fn drain<S>(
        &self,
        mut receiver: mpsc::Receiver<Trajectory>,
        sink: &mut S,
    ) -> Result<ProcessorStats, ProcessError>
    where
        S: BufferSink + ?Sized,
    {
        let mut stats = ProcessorStats::default();
        while let Some(trajectory) = receiver.recv().await {
            let buffer = self.submit(trajectory).await?;
            stats.trajectories += 1;
            stats.experiences += buffer.num_experiences() as u64;
            sink.submit(buffer).await?;
        }

        info!(
            trajectories = stats.trajectories,
            experiences = stats.experiences,
            "trajectory channel closed"
        );
        Ok(stats)
    }
}
