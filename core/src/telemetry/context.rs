use log::{debug, info, warn};

/// Per-task logging context.
///
/// Carries the candidate correlation tag so interleaved worker output can be
/// attributed; verbosity stays with the global `log` level filter.
#[derive(Debug, Clone)]
pub struct TaskContext {
    tag: String,
}

impl TaskContext {
    pub fn for_candidate(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn debug(&self, message: &str) {
        debug!("[{}] {}", self.tag, message);
    }

    pub fn info(&self, message: &str) {
        info!("[{}] {}", self.tag, message);
    }

    pub fn warn(&self, message: &str) {
        warn!("[{}] {}", self.tag, message);
    }
}
