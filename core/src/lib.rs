//! Core signal-transform library for preparing transient candidate images.
//!
//! The modules mirror the per-candidate pipeline: array math primitives, the
//! candidate working object, boundary contracts for the external
//! collaborators (loader, numerics, writer), and the CPU/GPU processing
//! stages with per-candidate dispatch.

pub mod candidate;
pub mod interface;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use prelude::{PrepConfig, PrepError, PrepResult};
