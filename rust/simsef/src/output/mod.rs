//! Files written after a finished schedule: the acquisition plan and the
//! diagnostic reports.

pub mod acquisition;
pub mod reports;

pub use acquisition::{
    AcquisitionWriter,
    JsonPlanWriter,
};
pub use reports::{
    write_parameters,
    write_precursors_report,
    write_spots_report,
};

use crate::cancel::CancellationToken;
use crate::config::SchedulerConfig;
use crate::errors::{
    Result,
    SchedulerError,
};
use crate::models::ImagingFeature;
use crate::scheduler::Schedule;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{
    info,
    instrument,
};

pub const ACQUISITION_FILE: &str = "acquisition.json";
pub const SPOTS_REPORT: &str = "spots.csv";
pub const PRECURSORS_REPORT: &str = "precursors.csv";
pub const PARAMETERS_FILE: &str = "parameters.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Completed,
    Cancelled,
    /// `schedule_only` was set, nothing was written.
    Skipped,
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| SchedulerError::io(e, path))
}

/// Writes the acquisition plan followed by the reports into `directory`.
///
/// Stops at the first cancelled writer, files written so far are left in place.
/// Writes nothing when the config asks for the schedule only.
#[instrument(skip_all, fields(directory = %directory.display()))]
pub fn write_outputs(
    directory: &Path,
    schedule: &Schedule,
    features: &[ImagingFeature],
    config: &SchedulerConfig,
    acquisition: &mut impl AcquisitionWriter,
    cancel: &CancellationToken,
) -> Result<WriteStatus> {
    if config.schedule_only {
        info!("Schedule only, skipping acquisition plan and reports");
        return Ok(WriteStatus::Skipped);
    }
    std::fs::create_dir_all(directory).map_err(|e| SchedulerError::io(e, directory))?;

    if acquisition.write_plan(&schedule.spots, &config.collision_energies, cancel)?
        == WriteStatus::Cancelled
    {
        return Ok(WriteStatus::Cancelled);
    }

    let spots_path = directory.join(SPOTS_REPORT);
    if write_spots_report(create(&spots_path)?, &schedule.spots, cancel)? == WriteStatus::Cancelled
    {
        return Ok(WriteStatus::Cancelled);
    }

    let precursors_path = directory.join(PRECURSORS_REPORT);
    if write_precursors_report(
        create(&precursors_path)?,
        schedule,
        features,
        config,
        cancel,
    )? == WriteStatus::Cancelled
    {
        return Ok(WriteStatus::Cancelled);
    }

    let parameters_path = directory.join(PARAMETERS_FILE);
    write_parameters(create(&parameters_path)?, config)
        .map_err(|e| SchedulerError::io(e, &parameters_path))?;

    info!("Wrote reports to {}", directory.display());
    Ok(WriteStatus::Completed)
}
