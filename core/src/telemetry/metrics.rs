use std::sync::Mutex;

/// Aggregated outcome of one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: usize,
    pub failed: usize,
    pub gpu_fallbacks: usize,
}

/// Thread-safe per-batch counters updated by worker tasks.
pub struct BatchMetrics {
    inner: Mutex<BatchSummary>,
}

impl BatchMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(BatchSummary::default()),
        }
    }

    pub fn record_completed(&self) {
        if let Ok(mut summary) = self.inner.lock() {
            summary.completed += 1;
        }
    }

    pub fn record_failed(&self) {
        if let Ok(mut summary) = self.inner.lock() {
            summary.failed += 1;
        }
    }

    pub fn record_gpu_fallback(&self) {
        if let Ok(mut summary) = self.inner.lock() {
            summary.gpu_fallbacks += 1;
        }
    }

    pub fn snapshot(&self) -> BatchSummary {
        self.inner
            .lock()
            .map(|summary| *summary)
            .unwrap_or_default()
    }
}

impl Default for BatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let metrics = BatchMetrics::new();
        metrics.record_completed();
        metrics.record_completed();
        metrics.record_failed();
        metrics.record_gpu_fallback();

        let summary = metrics.snapshot();
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.gpu_fallbacks, 1);
    }
}
