pub mod assembly;
pub mod cpu;
pub mod dispatch;
pub mod engine;
pub mod gpu;

pub use assembly::assemble;
pub use cpu::{cpu_dedisp_dmt, time_decimation_factor};
pub use dispatch::{DispatchReport, Dispatcher, TransformVariant};
pub use engine::{dispersion_delay, DispersionEngine, IncoherentEngine};
pub use gpu::{GpuError, GpuTransform, UnavailableGpu};
