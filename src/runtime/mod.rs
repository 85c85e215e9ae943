pub mod error;
pub mod handle;
pub mod processor;
pub mod traits;

pub use error::{ProcessError, SinkError};
pub use handle::ConversionHandle;
pub use processor::{ProcessorConfig, ProcessorStats, TrajectoryProcessor};
pub use traits::{BufferSink, VecSink};
