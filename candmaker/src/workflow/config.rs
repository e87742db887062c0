use anyhow::Context;
use candcore::prelude::PrepConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Driver options, from CLI flags or a YAML file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub frequency_size: usize,
    pub time_size: usize,
    pub gpu_id: i32,
    pub nproc: usize,
    pub optimize_dm: bool,
    pub output_dir: PathBuf,
}

impl Default for DriverConfig {
    fn default() -> Self {
        let prep = PrepConfig::default();
        Self {
            frequency_size: prep.frequency_size,
            time_size: prep.time_size,
            gpu_id: prep.gpu_id,
            nproc: prep.nproc,
            optimize_dm: prep.optimize_dm,
            output_dir: prep.output_dir,
        }
    }
}

impl DriverConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading driver config {}", path_ref.display()))?;
        let config: DriverConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing driver config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn to_prep_config(&self) -> PrepConfig {
        PrepConfig {
            frequency_size: self.frequency_size,
            time_size: self.time_size,
            gpu_id: self.gpu_id,
            nproc: self.nproc,
            optimize_dm: self.optimize_dm,
            output_dir: self.output_dir.clone(),
        }
    }
}
