use crate::candidate::LoadedCandidate;
use crate::math::{crop_centered, decimate_median};
use crate::prelude::{PrepConfig, PrepError, PrepResult};
use crate::processing::engine::DispersionEngine;
use crate::telemetry::TaskContext;
use ndarray::Axis;

/// Time decimation relative to pulse width.
///
/// A one-sample pulse keeps full resolution; wider pulses tolerate coarser
/// time sampling without losing signal, so the factor is half the width.
pub fn time_decimation_factor(width: usize) -> usize {
    if width <= 1 {
        1
    } else {
        width / 2
    }
}

/// CPU transform pipeline: DM-time map, optional DM refinement,
/// dedispersion, and time-axis reshaping of both maps.
///
/// On return `dedispersed` is `time_size x channel` and `dmt` is
/// `dm_bins x time_size`; the frequency axis is resized later during
/// assembly. Arithmetic or shape failures are fatal for the candidate and
/// are never retried here.
pub fn cpu_dedisp_dmt(
    cand: &mut LoadedCandidate,
    config: &PrepConfig,
    engine: &dyn DispersionEngine,
    ctx: &TaskContext,
) -> PrepResult<()> {
    let factor = time_decimation_factor(cand.width);
    ctx.debug(&format!("time decimation factor {factor}"));

    engine.dmtime(cand)?;
    ctx.info("made DM-time map");

    if config.optimize_dm {
        ctx.info("optimising DM");
        ctx.warn("DM optimisation is experimental");
        let (dm_opt, snr_opt) = engine.optimize_dm(cand)?;
        cand.dm_opt = dm_opt;
        cand.snr_opt = snr_opt;
    } else {
        cand.dm_opt = -1.0;
        cand.snr_opt = -1.0;
    }

    let dm = if cand.dm_opt >= 0.0 { cand.dm_opt } else { cand.dm };
    engine.dedisperse(cand, dm)?;
    ctx.info("made dedispersed profile");

    let ft = cand
        .dedispersed
        .take()
        .ok_or_else(|| PrepError::Internal("dedispersed map missing after dedispersion".into()))?;
    let ft = decimate_median(&ft, Axis(0), factor)?;
    let ft = crop_centered(&ft, Axis(0), config.time_size)?;
    ctx.info(&format!(
        "decimated FT time axis to {}",
        ft.len_of(Axis(0))
    ));
    cand.dedispersed = Some(ft);

    let dmt = cand
        .dmt
        .take()
        .ok_or_else(|| PrepError::Internal("DM-time map missing after dmtime".into()))?;
    let dmt = decimate_median(&dmt, Axis(1), factor)?;
    let dmt = crop_centered(&dmt, Axis(1), config.time_size)?;
    ctx.info(&format!(
        "decimated DM-time to dmsize {} and tsize {}",
        dmt.len_of(Axis(0)),
        dmt.len_of(Axis(1))
    ));
    cand.dmt = Some(dmt);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::ChunkGeometry;
    use crate::interface::descriptor::CandidateDescriptor;
    use crate::processing::engine::IncoherentEngine;
    use ndarray::Array2;
    use std::path::PathBuf;

    fn candidate(width_exponent: u32, nt: usize) -> LoadedCandidate {
        let geometry = ChunkGeometry {
            nchans: 8,
            tsamp: 1e-3,
            fch1: 1400.0,
            foff: -8.0,
        };
        let descriptor = CandidateDescriptor {
            source_path: PathBuf::from("a.fil"),
            snr: 9.0,
            width: width_exponent,
            dm: 30.0,
            label: 0,
            tcand: 0.1,
            kill_mask_path: None,
        };
        let chunk = Array2::from_shape_fn((nt, 8), |(t, c)| ((t * 13 + c * 7) % 29) as f32);
        LoadedCandidate::new(&descriptor, geometry, chunk).unwrap()
    }

    fn config(time_size: usize) -> PrepConfig {
        PrepConfig {
            time_size,
            frequency_size: 8,
            ..PrepConfig::default()
        }
    }

    #[test]
    fn factor_is_one_for_unit_width_and_half_otherwise() {
        assert_eq!(time_decimation_factor(1), 1);
        assert_eq!(time_decimation_factor(2), 1);
        assert_eq!(time_decimation_factor(4), 2);
        assert_eq!(time_decimation_factor(8), 4);
    }

    #[test]
    fn pipeline_reshapes_both_maps_to_time_size() {
        let engine = IncoherentEngine::with_trials(32);
        let mut cand = candidate(2, 400);
        let ctx = TaskContext::for_candidate("test");
        cpu_dedisp_dmt(&mut cand, &config(64), &engine, &ctx).unwrap();

        // width 4 -> factor 2 -> 400 samples decimate to 200, crop to 64
        let ft = cand.dedispersed.as_ref().unwrap();
        assert_eq!(ft.len_of(Axis(0)), 64);
        assert_eq!(ft.len_of(Axis(1)), 8);
        let dmt = cand.dmt.as_ref().unwrap();
        assert_eq!(dmt.dim(), (32, 64));
    }

    #[test]
    fn sentinels_mark_skipped_optimization() {
        let engine = IncoherentEngine::with_trials(16);
        let mut cand = candidate(0, 128);
        let ctx = TaskContext::for_candidate("test");
        cpu_dedisp_dmt(&mut cand, &config(32), &engine, &ctx).unwrap();
        assert_eq!(cand.dm_opt, -1.0);
        assert_eq!(cand.snr_opt, -1.0);
    }

    #[test]
    fn optimization_fills_both_results() {
        let engine = IncoherentEngine::with_trials(16);
        let mut cand = candidate(0, 128);
        let ctx = TaskContext::for_candidate("test");
        let config = PrepConfig {
            optimize_dm: true,
            ..config(32)
        };
        cpu_dedisp_dmt(&mut cand, &config, &engine, &ctx).unwrap();
        assert!(cand.dm_opt >= 0.0);
        assert!(cand.snr_opt > f64::MIN);
    }

    #[test]
    fn short_chunk_fails_with_shape_mismatch() {
        let engine = IncoherentEngine::with_trials(16);
        let mut cand = candidate(2, 40);
        let ctx = TaskContext::for_candidate("test");
        // factor 2 leaves 20 samples, short of the 64 requested
        let err = cpu_dedisp_dmt(&mut cand, &config(64), &engine, &ctx).unwrap_err();
        assert!(matches!(err, PrepError::ShapeMismatch(_)));
    }
}
