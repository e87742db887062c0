use crate::io::SigprocFile;
use candcore::candidate::LoadedCandidate;
use candcore::interface::descriptor::CandidateDescriptor;
use candcore::interface::kill_mask::KillMask;
use candcore::interface::loader::ChunkLoader;
use candcore::interface::source::resolve_source_files;
use candcore::prelude::{PrepError, PrepResult};
use candcore::processing::engine::dispersion_delay;

/// Reference loader for filterbank sources.
///
/// Resolves the descriptor's source reference, derives the optional kill
/// mask, and extracts the chunk spanning `tcand` plus/minus the full-band
/// dispersion delay and one pulse width, clamped to the file bounds.
pub struct FileChunkLoader;

impl ChunkLoader for FileChunkLoader {
    fn load(&self, descriptor: &CandidateDescriptor) -> PrepResult<LoadedCandidate> {
        let files = resolve_source_files(&descriptor.source_path)?;
        let primary = &files[0];
        let is_filterbank = primary
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("fil"))
            .unwrap_or(false);
        if !is_filterbank {
            // TODO: PSRFITS chunk extraction once a FITS reader lands.
            return Err(PrepError::UnsupportedFormat(
                "PSRFITS chunk extraction is not available in this loader".into(),
            ));
        }

        let fil = SigprocFile::open(primary)?;
        let geometry = fil.geometry();

        let mask = match &descriptor.kill_mask_path {
            Some(path) => {
                let mask = KillMask::load(path, geometry.nchans)?;
                if let Some(mask) = &mask {
                    log::info!(
                        "using mask {} ({} channels)",
                        path.display(),
                        mask.killed_count()
                    );
                }
                mask
            }
            None => None,
        };

        let delay = dispersion_delay(descriptor.dm, &geometry);
        let margin = descriptor.width_samples() as f64 * geometry.tsamp;
        let t_from = descriptor.tcand - delay - margin;
        let t_to = descriptor.tcand + delay + margin;
        let start = (t_from / geometry.tsamp).floor().max(0.0) as usize;
        let stop = ((t_to / geometry.tsamp).ceil().max(0.0) as usize).min(fil.nsamples);
        if stop <= start {
            return Err(PrepError::InvalidInput(format!(
                "candidate window {t_from:.3}s..{t_to:.3}s lies outside {}",
                primary.display()
            )));
        }

        let mut chunk = fil.read_block(start, stop - start)?;
        if let Some(mask) = &mask {
            mask.apply(&mut chunk);
        }
        LoadedCandidate::new(descriptor, geometry, chunk)
    }
}
