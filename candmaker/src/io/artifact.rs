use candcore::interface::artifact::{ArtifactBundle, ArtifactMetadata, ArtifactWriter};
use candcore::prelude::{PrepError, PrepResult};
use ndarray::Array2;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Reference artifact writer emitting one JSON document per candidate.
///
/// The document is fully serialized before the file is created, so a failed
/// candidate never leaves a partial artifact behind.
pub struct JsonArtifactWriter;

#[derive(Serialize)]
struct ArtifactDocument<'a> {
    #[serde(flatten)]
    metadata: &'a ArtifactMetadata,
    dedispersed: Vec<Vec<f32>>,
    dmt: Vec<Vec<f32>>,
}

fn image_rows(image: &Array2<f32>) -> Vec<Vec<f32>> {
    image.rows().into_iter().map(|row| row.to_vec()).collect()
}

impl ArtifactWriter for JsonArtifactWriter {
    fn write(&self, bundle: &ArtifactBundle, out_dir: &Path) -> PrepResult<PathBuf> {
        let document = ArtifactDocument {
            metadata: &bundle.metadata,
            dedispersed: image_rows(&bundle.dedispersed),
            dmt: image_rows(&bundle.dmt),
        };
        let body = serde_json::to_vec(&document)
            .map_err(|err| PrepError::Internal(format!("serializing artifact: {err}")))?;
        let path = out_dir.join(format!("{}.json", bundle.id));
        fs::write(&path, body)?;
        Ok(path)
    }
}
