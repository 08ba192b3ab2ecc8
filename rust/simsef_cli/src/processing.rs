use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use simsef::oracle::{
    DistanceRules,
    MobilityScanCursor,
};
use simsef::output::ACQUISITION_FILE;
use simsef::{
    CancellationToken,
    JsonPlanWriter,
    Schedule,
    ScheduleOutcome,
    Scheduler,
    SchedulingInput,
    WriteStatus,
    write_outputs,
};
use std::time::Instant;
use tracing::{
    info,
    instrument,
};

use crate::config::ResolvedConfig;
use crate::error::CliError;

fn feature_progress_bar(len: usize) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} features ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(len as u64).with_style(style)
}

fn print_summary(schedule: &Schedule) {
    println!(
        "Scheduled {} features on {} spots ({} MS/MS spectra)",
        schedule.precursors().len(),
        schedule.spots.len(),
        schedule.total_spectra()
    );
    for (num_spectra, count) in schedule.spectra_histogram.iter().enumerate() {
        println!("  {count} features with {num_spectra} spectra");
    }
}

/// Loads the input, schedules it and writes the outputs the config asks for.
#[instrument(skip_all)]
pub fn run_schedule(
    config: &ResolvedConfig,
    preview: bool,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    let start = Instant::now();
    let input = SchedulingInput::from_path(&config.input)?;

    let rules = DistanceRules::new(config.scheduler.min_spot_distance);
    let cursor = MobilityScanCursor::new(&input.dataset);
    let outcome = Scheduler::new(config.scheduler.clone(), rules, cursor)
        .map_err(simsef::SchedulerError::from)?
        .with_cancellation(cancel.clone())
        .with_progress(feature_progress_bar(input.features.len()))
        .run(&input.dataset, &input.features)?;

    let schedule = match outcome {
        ScheduleOutcome::Finished(schedule) => schedule,
        ScheduleOutcome::Cancelled => {
            info!("Scheduling was cancelled, nothing written");
            return Ok(());
        }
    };
    print_summary(&schedule);

    if preview {
        return Ok(());
    }

    let mut writer = JsonPlanWriter::new(config.output.join(ACQUISITION_FILE));
    let status = write_outputs(
        &config.output,
        &schedule,
        &input.features,
        &config.scheduler,
        &mut writer,
        cancel,
    )?;
    match status {
        WriteStatus::Completed => println!("Wrote outputs to {}", config.output.display()),
        WriteStatus::Cancelled => info!("Writing outputs was cancelled"),
        WriteStatus::Skipped => {}
    }
    println!("Finished in {:?}", start.elapsed());
    Ok(())
}
