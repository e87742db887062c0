use crate::interface::descriptor::CandidateDescriptor;
use crate::prelude::{PrepError, PrepResult};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Band and sampling geometry of an extracted chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkGeometry {
    pub nchans: usize,
    /// Sampling interval in seconds.
    pub tsamp: f64,
    /// First channel frequency in MHz.
    pub fch1: f64,
    /// Channel spacing in MHz; negative for a descending band.
    pub foff: f64,
}

impl ChunkGeometry {
    pub fn chan_freqs(&self) -> Vec<f64> {
        (0..self.nchans)
            .map(|i| self.fch1 + i as f64 * self.foff)
            .collect()
    }

    /// Lowest and highest channel frequency in MHz.
    pub fn freq_span(&self) -> (f64, f64) {
        let last = self.fch1 + (self.nchans.saturating_sub(1)) as f64 * self.foff;
        if self.fch1 <= last {
            (self.fch1, last)
        } else {
            (last, self.fch1)
        }
    }
}

/// Working object owned exclusively by one pipeline invocation.
///
/// Constructed from the raw chunk, mutated in place through
/// dedisperse -> decimate -> crop -> resize -> normalize, and dropped after
/// the artifact is written. `width` is the decoded sample count, not the
/// stored exponent.
#[derive(Debug, Clone)]
pub struct LoadedCandidate {
    pub snr: f64,
    pub width: usize,
    pub dm: f64,
    pub label: i64,
    pub tcand: f64,
    pub geometry: ChunkGeometry,
    /// Raw data chunk, time x channel.
    pub chunk: Array2<f32>,
    /// Dedispersed frequency-time map, time x channel.
    pub dedispersed: Option<Array2<f32>>,
    /// DM-time map, trial-DM x time.
    pub dmt: Option<Array2<f32>>,
    /// Optimized DM; -1 when optimization was skipped.
    pub dm_opt: f64,
    /// SNR at the optimized DM; -1 when optimization was skipped.
    pub snr_opt: f64,
}

impl LoadedCandidate {
    pub fn new(
        descriptor: &CandidateDescriptor,
        geometry: ChunkGeometry,
        chunk: Array2<f32>,
    ) -> PrepResult<Self> {
        if chunk.nrows() == 0 {
            return Err(PrepError::InvalidInput(
                "candidate chunk holds no time samples".into(),
            ));
        }
        if chunk.ncols() != geometry.nchans {
            return Err(PrepError::ShapeMismatch(format!(
                "chunk has {} channels, geometry expects {}",
                chunk.ncols(),
                geometry.nchans
            )));
        }
        Ok(Self {
            snr: descriptor.snr,
            width: descriptor.width_samples(),
            dm: descriptor.dm,
            label: descriptor.label,
            tcand: descriptor.tcand,
            geometry,
            chunk,
            dedispersed: None,
            dmt: None,
            dm_opt: -1.0,
            snr_opt: -1.0,
        })
    }

    /// Stable identity used for log correlation and artifact naming.
    pub fn id(&self) -> String {
        format!(
            "cand_tcand_{:.7}_dm_{:.5}_snr_{:.5}",
            self.tcand, self.dm, self.snr
        )
    }
}
