use crate::candidate::LoadedCandidate;
use crate::prelude::{PrepConfig, PrepError, PrepResult};
use crate::processing::cpu::cpu_dedisp_dmt;
use crate::processing::engine::DispersionEngine;
use crate::processing::gpu::{GpuError, GpuTransform, UnavailableGpu};
use crate::telemetry::TaskContext;
use std::sync::Arc;

/// Execution variant selected from the configured device id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformVariant {
    Cpu,
    Gpu(u32),
}

impl TransformVariant {
    pub fn from_gpu_id(gpu_id: i32) -> Self {
        if gpu_id >= 0 {
            Self::Gpu(gpu_id as u32)
        } else {
            Self::Cpu
        }
    }
}

/// What happened during dispatch, for batch accounting.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchReport {
    /// The GPU variant raised a device failure and the CPU path ran instead.
    pub gpu_fallback: bool,
}

/// Routes one candidate through the GPU or CPU transform.
///
/// Both variants produce identical output contracts; a device failure on the
/// GPU variant falls back to the CPU pipeline for that candidate only and
/// never aborts the batch.
pub struct Dispatcher {
    engine: Arc<dyn DispersionEngine>,
    gpu: Arc<dyn GpuTransform>,
}

impl Dispatcher {
    pub fn new(engine: Arc<dyn DispersionEngine>) -> Self {
        Self {
            engine,
            gpu: Arc::new(UnavailableGpu),
        }
    }

    pub fn with_gpu(engine: Arc<dyn DispersionEngine>, gpu: Arc<dyn GpuTransform>) -> Self {
        Self { engine, gpu }
    }

    pub fn dispatch(
        &self,
        cand: &mut LoadedCandidate,
        config: &PrepConfig,
        ctx: &TaskContext,
    ) -> PrepResult<DispatchReport> {
        match TransformVariant::from_gpu_id(config.gpu_id) {
            TransformVariant::Gpu(device) => {
                ctx.debug(&format!("using GPU {device}"));
                match self.gpu.dedisp_and_dmt_crop(cand, device, config) {
                    Ok(()) => Ok(DispatchReport::default()),
                    Err(err @ GpuError::Device { .. }) => {
                        ctx.info(&format!(
                            "{err}, using the CPU version for this candidate"
                        ));
                        cpu_dedisp_dmt(cand, config, self.engine.as_ref(), ctx)?;
                        Ok(DispatchReport { gpu_fallback: true })
                    }
                    Err(err) => Err(PrepError::Gpu(err)),
                }
            }
            TransformVariant::Cpu => {
                cpu_dedisp_dmt(cand, config, self.engine.as_ref(), ctx)?;
                Ok(DispatchReport::default())
            }
        }
    }
}
