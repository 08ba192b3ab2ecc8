#![doc = include_str!("../README.md")]

pub mod cancel;
pub mod config;
pub mod errors;
pub mod io;
pub mod models;
pub mod oracle;
pub mod output;
pub mod scheduler;
pub mod utils;

// Re-export main structures
pub use crate::cancel::CancellationToken;
pub use crate::config::{
    IntensityThreshold,
    SchedulerConfig,
};
pub use crate::errors::{
    ConfigError,
    SchedulerError,
    UnsupportedDataError,
};
pub use crate::io::SchedulingInput;
pub use crate::models::{
    AcquisitionMode,
    CollisionEnergy,
    FeatureId,
    FrameId,
    ImagingDataset,
    ImagingFeature,
    Precursor,
    Spot,
    SpotInfo,
};
pub use crate::output::{
    JsonPlanWriter,
    WriteStatus,
    write_outputs,
};
pub use crate::scheduler::{
    Schedule,
    ScheduleOutcome,
    Scheduler,
    schedule,
};

// Re-export traits
pub use crate::oracle::{
    CollisionEnergyRules,
    PurityScorer,
};
pub use crate::output::AcquisitionWriter;
pub use crate::utils::TupleRange;
