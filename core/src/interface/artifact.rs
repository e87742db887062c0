use crate::prelude::PrepResult;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Descriptor metadata persisted alongside the image pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub snr: f64,
    pub dm: f64,
    pub dm_opt: f64,
    pub snr_opt: f64,
    pub label: i64,
    pub tcand: f64,
}

/// Fully prepared candidate payload handed to the external writer.
///
/// Both arrays are shape- and value-normalized: `dedispersed` is
/// `frequency_size x time_size`, `dmt` is `dm_bins x time_size`, and both
/// carry zero median and unit standard deviation (non-finite for degenerate
/// zero-variance inputs).
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub id: String,
    /// Frequency-time image, channel rows x time columns.
    pub dedispersed: Array2<f32>,
    /// DM-time image, trial-DM rows x time columns.
    pub dmt: Array2<f32>,
    pub metadata: ArtifactMetadata,
}

/// Contract for the external artifact writer.
///
/// The writer owns the on-disk layout. It must write atomically from the
/// batch's perspective: a failed candidate leaves no partial artifact behind.
pub trait ArtifactWriter: Send + Sync {
    /// Persist one bundle under `out_dir` and return the written path.
    fn write(&self, bundle: &ArtifactBundle, out_dir: &Path) -> PrepResult<PathBuf>;
}
