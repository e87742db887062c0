use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global preparation options shared read-only by every candidate task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepConfig {
    /// Channel count of the output frequency-time image.
    pub frequency_size: usize,
    /// Sample count of the output time axes.
    pub time_size: usize,
    /// GPU device id; negative means CPU-only.
    pub gpu_id: i32,
    /// Worker pool size for the batch driver.
    pub nproc: usize,
    /// Refine DM/SNR before dedispersion (experimental).
    pub optimize_dm: bool,
    /// Directory receiving one artifact per candidate.
    pub output_dir: PathBuf,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            frequency_size: 256,
            time_size: 256,
            gpu_id: -1,
            nproc: 2,
            optimize_dm: false,
            output_dir: PathBuf::from("."),
        }
    }
}

/// Common error type for candidate preparation.
///
/// Every variant except `Gpu` is fatal for the candidate that raised it and
/// is isolated by the driver; `Gpu` only surfaces for device failures the
/// dispatcher chose not to recover from.
#[derive(thiserror::Error, Debug)]
pub enum PrepError {
    #[error("unsupported source format: {0}")]
    UnsupportedFormat(String),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("gpu execution failure: {0}")]
    Gpu(#[from] crate::processing::gpu::GpuError),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type PrepResult<T> = Result<T, PrepError>;
