pub mod context;
pub mod metrics;

pub use context::TaskContext;
pub use metrics::{BatchMetrics, BatchSummary};
