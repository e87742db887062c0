use crate::candidate::{ChunkGeometry, LoadedCandidate};
use crate::math::stats::StatsHelper;
use crate::prelude::{PrepError, PrepResult};
use ndarray::Array2;

/// Dispersion constant in MHz^2 s cm^3 pc^-1.
pub const DISPERSION_CONSTANT: f64 = 4.148808e3;

/// Full-band dispersion delay in seconds across the chunk's frequency span.
pub fn dispersion_delay(dm: f64, geometry: &ChunkGeometry) -> f64 {
    let (f_min, f_max) = geometry.freq_span();
    DISPERSION_CONSTANT * dm * (f_min.powi(-2) - f_max.powi(-2))
}

/// Contract for the dedispersion and DM-time numerics.
///
/// The pipeline consumes these as opaque operations and relies only on the
/// documented shapes: `dmtime` fills a `dm_bins x time` map over trial DMs
/// `[0, 2 * dm]`, `dedisperse` fills a `time x channel` map aligned at the
/// given DM, and `optimize_dm` reports a refined `(dm, snr)` pair.
/// `optimize_dm` requires the DM-time map to be present.
pub trait DispersionEngine: Send + Sync {
    fn dmtime(&self, cand: &mut LoadedCandidate) -> PrepResult<()>;
    fn dedisperse(&self, cand: &mut LoadedCandidate, dm: f64) -> PrepResult<()>;
    fn optimize_dm(&self, cand: &LoadedCandidate) -> PrepResult<(f64, f64)>;
}

/// Reference engine: incoherent dedispersion by per-channel circular shifts.
pub struct IncoherentEngine {
    dm_bins: usize,
}

impl IncoherentEngine {
    pub fn new() -> Self {
        Self { dm_bins: 256 }
    }

    /// Override the number of trial DMs in the DM-time map.
    pub fn with_trials(dm_bins: usize) -> Self {
        Self {
            dm_bins: dm_bins.max(1),
        }
    }

    /// Trial DMs linearly spaced over `[0, 2 * dm]`.
    fn trial_dms(&self, dm: f64) -> Vec<f64> {
        if self.dm_bins == 1 {
            return vec![dm];
        }
        (0..self.dm_bins)
            .map(|j| 2.0 * dm * j as f64 / (self.dm_bins - 1) as f64)
            .collect()
    }
}

impl Default for IncoherentEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-channel delay in samples relative to the highest channel frequency.
fn delay_samples(dm: f64, geometry: &ChunkGeometry) -> Vec<isize> {
    let (_, f_max) = geometry.freq_span();
    geometry
        .chan_freqs()
        .iter()
        .map(|f| {
            let delay = DISPERSION_CONSTANT * dm * (f.powi(-2) - f_max.powi(-2));
            (delay / geometry.tsamp).round() as isize
        })
        .collect()
}

impl DispersionEngine for IncoherentEngine {
    fn dmtime(&self, cand: &mut LoadedCandidate) -> PrepResult<()> {
        let nt = cand.chunk.nrows();
        if nt == 0 {
            return Err(PrepError::InvalidInput("empty chunk".into()));
        }
        let trials = self.trial_dms(cand.dm);
        let mut dmt = Array2::zeros((trials.len(), nt));
        for (row, &trial) in trials.iter().enumerate() {
            let shifts = delay_samples(trial, &cand.geometry);
            for (chan, &shift) in shifts.iter().enumerate() {
                for t in 0..nt {
                    let src = (t as isize + shift).rem_euclid(nt as isize) as usize;
                    dmt[[row, t]] += cand.chunk[[src, chan]];
                }
            }
        }
        cand.dmt = Some(dmt);
        Ok(())
    }

    fn dedisperse(&self, cand: &mut LoadedCandidate, dm: f64) -> PrepResult<()> {
        let nt = cand.chunk.nrows();
        if nt == 0 {
            return Err(PrepError::InvalidInput("empty chunk".into()));
        }
        let shifts = delay_samples(dm, &cand.geometry);
        let mut out = Array2::zeros(cand.chunk.raw_dim());
        for (chan, &shift) in shifts.iter().enumerate() {
            for t in 0..nt {
                let src = (t as isize + shift).rem_euclid(nt as isize) as usize;
                out[[t, chan]] = cand.chunk[[src, chan]];
            }
        }
        cand.dedispersed = Some(out);
        Ok(())
    }

    fn optimize_dm(&self, cand: &LoadedCandidate) -> PrepResult<(f64, f64)> {
        let dmt = cand
            .dmt
            .as_ref()
            .ok_or_else(|| PrepError::Internal("optimize_dm requires the DM-time map".into()))?;
        let trials = self.trial_dms(cand.dm);
        if trials.len() != dmt.nrows() {
            return Err(PrepError::ShapeMismatch(format!(
                "DM-time map has {} rows, engine expects {}",
                dmt.nrows(),
                trials.len()
            )));
        }

        let mut best_dm = cand.dm;
        let mut best_snr = f64::MIN;
        for (row, profile) in dmt.rows().into_iter().enumerate() {
            let values: Vec<f32> = profile.to_vec();
            let std = StatsHelper::std_dev(&values);
            if std == 0.0 {
                continue;
            }
            let median = StatsHelper::median(&values);
            let peak = values.iter().cloned().fold(f32::MIN, f32::max);
            let snr = ((peak - median) / std) as f64;
            if snr > best_snr {
                best_snr = snr;
                best_dm = trials[row];
            }
        }
        if best_snr == f64::MIN {
            return Err(PrepError::InvalidInput(
                "every trial profile has zero variance".into(),
            ));
        }
        Ok((best_dm, best_snr))
    }
}
