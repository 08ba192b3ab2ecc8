use crate::errors::{
    Result,
    SchedulerError,
};
use crate::models::{
    ImagingDataset,
    ImagingFeature,
};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Everything a scheduling run reads: one imaging raw file and the
/// features detected in it.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulingInput {
    pub dataset: ImagingDataset,
    pub features: Vec<ImagingFeature>,
}

impl SchedulingInput {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SchedulerError::io(e, path))?;
        let input: Self = serde_json::from_reader(BufReader::new(file))?;
        info!(
            "Loaded {} frames and {} features from {}",
            input.dataset.num_frames(),
            input.features.len(),
            path.display()
        );
        Ok(input)
    }
}
