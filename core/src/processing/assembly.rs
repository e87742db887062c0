use crate::candidate::LoadedCandidate;
use crate::interface::artifact::{ArtifactBundle, ArtifactMetadata};
use crate::math::{normalise, resample_axis};
use crate::prelude::{PrepConfig, PrepError, PrepResult};
use crate::telemetry::TaskContext;
use ndarray::Axis;

/// Post-dispatch assembly, identical for both transform variants.
///
/// Resizes the frequency axis of the dedispersed map to `frequency_size`
/// with anti-aliasing, normalizes both maps independently, and packages the
/// bundle for the external writer. The frequency-time image is stored
/// channel-major (`frequency_size x time_size`).
pub fn assemble(
    mut cand: LoadedCandidate,
    config: &PrepConfig,
    ctx: &TaskContext,
) -> PrepResult<ArtifactBundle> {
    let ft = cand
        .dedispersed
        .take()
        .ok_or_else(|| PrepError::Internal("no dedispersed map to assemble".into()))?;
    let ft = resample_axis(&ft, Axis(1), config.frequency_size)?;
    ctx.info(&format!(
        "resized FT frequency axis to {}",
        ft.len_of(Axis(1))
    ));

    let dmt = cand
        .dmt
        .take()
        .ok_or_else(|| PrepError::Internal("no DM-time map to assemble".into()))?;

    Ok(ArtifactBundle {
        id: cand.id(),
        dedispersed: normalise(ft.reversed_axes().as_standard_layout().to_owned()),
        dmt: normalise(dmt),
        metadata: ArtifactMetadata {
            snr: cand.snr,
            dm: cand.dm,
            dm_opt: cand.dm_opt,
            snr_opt: cand.snr_opt,
            label: cand.label,
            tcand: cand.tcand,
        },
    })
}
