use crate::prelude::{PrepError, PrepResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One row of the candidate table, validated before any worker is dispatched.
///
/// `width` is stored as a power-of-two exponent; every consumer works with
/// the expanded sample count from [`width_samples`](Self::width_samples).
/// An empty `kill_mask_path` field deserializes to `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateDescriptor {
    #[serde(rename = "file")]
    pub source_path: PathBuf,
    pub snr: f64,
    pub width: u32,
    pub dm: f64,
    pub label: i64,
    #[serde(rename = "stime")]
    pub tcand: f64,
    #[serde(default)]
    pub kill_mask_path: Option<PathBuf>,
}

impl CandidateDescriptor {
    /// Pulse width expanded to a sample count, `2^width`.
    pub fn width_samples(&self) -> usize {
        1usize << self.width
    }

    /// Identity tag used for log correlation before the chunk is loaded.
    pub fn tag(&self) -> String {
        format!(
            "cand_tcand_{:.7}_dm_{:.5}_snr_{:.5}",
            self.tcand, self.dm, self.snr
        )
    }

    pub fn validate(&self) -> PrepResult<()> {
        if self.width >= 30 {
            return Err(PrepError::InvalidInput(format!(
                "width exponent {} expands beyond any plausible pulse",
                self.width
            )));
        }
        if !self.snr.is_finite() || !self.dm.is_finite() || !self.tcand.is_finite() {
            return Err(PrepError::InvalidInput(
                "snr, dm and stime must be finite".into(),
            ));
        }
        if self.tcand < 0.0 {
            return Err(PrepError::InvalidInput(format!(
                "candidate time offset {} is negative",
                self.tcand
            )));
        }
        Ok(())
    }
}
