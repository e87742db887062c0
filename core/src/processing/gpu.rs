use crate::candidate::LoadedCandidate;
use crate::prelude::PrepConfig;

/// Failure taxonomy of the accelerated transform.
///
/// `Device` is the recoverable category: the dispatcher retries the
/// candidate on the CPU path. Everything else propagates as a fatal
/// per-candidate error.
#[derive(thiserror::Error, Debug)]
pub enum GpuError {
    #[error("device {device} execution failure: {reason}")]
    Device { device: u32, reason: String },
    #[error("device {device} out of memory: {reason}")]
    OutOfMemory { device: u32, reason: String },
}

/// Accelerated dedisperse-and-DMT-crop collaborator.
///
/// A successful call must leave the candidate exactly as the CPU pipeline
/// would: `dedispersed` at `time_size x channel`, `dmt` at
/// `dm_bins x time_size`, equivalent content. Downstream stages are
/// oblivious to which variant ran.
pub trait GpuTransform: Send + Sync {
    fn dedisp_and_dmt_crop(
        &self,
        cand: &mut LoadedCandidate,
        device: u32,
        config: &PrepConfig,
    ) -> Result<(), GpuError>;
}

/// Stand-in used when no CUDA-capable transform is linked into the build.
///
/// Every call reports a device failure, so a configured GPU id degrades to
/// the CPU path per candidate instead of aborting the batch.
pub struct UnavailableGpu;

impl GpuTransform for UnavailableGpu {
    fn dedisp_and_dmt_crop(
        &self,
        _cand: &mut LoadedCandidate,
        device: u32,
        _config: &PrepConfig,
    ) -> Result<(), GpuError> {
        Err(GpuError::Device {
            device,
            reason: "no GPU transform linked into this build".into(),
        })
    }
}
