use crate::models::FrameId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unsupported acquisition mode {0:?}, expected \"single\" or \"triple\"")]
    UnsupportedAcquisitionMode(String),

    #[error("At least one collision energy is required")]
    EmptyCollisionEnergies,

    #[error("Collision energy {0} is listed more than once")]
    DuplicateCollisionEnergy(f64),

    #[error("The number of spectra per feature and collision energy must be at least 1")]
    ZeroSpectraPerFeature,

    #[error(
        "{per_energy} spectra for each of {num_energies} collision energies is more than a feature can receive"
    )]
    TooManySpectra { per_energy: u32, num_energies: usize },

    #[error("Minimum mobility width {min} is larger than the maximum mobility width {max}")]
    InvalidMobilityWidths { min: f32, max: f32 },

    #[error("Parameter {0} must be a finite, non-negative number")]
    NonFinite(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnsupportedDataError {
    #[error("Not an ion mobility imaging file")]
    NotIonMobility,

    #[error("Representative frame {0:?} has fewer than two distinct mobility scans")]
    EmptyRepresentativeFrame(FrameId),

    #[error("Feature references frame {0:?} which is not part of the raw data file")]
    UnknownFrame(FrameId),
}

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unsupported data: {0}")]
    UnsupportedData(#[from] UnsupportedDataError),

    #[error("I/O error at {path}: {source}")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchedulerError {
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
