use super::WriteStatus;
use crate::cancel::CancellationToken;
use crate::config::SchedulerConfig;
use crate::errors::Result;
use crate::models::{
    FeatureId,
    ImagingFeature,
    Spot,
};
use crate::scheduler::Schedule;
use serde::Serialize;
use std::collections::{
    HashMap,
    HashSet,
};
use std::io::Write;

#[derive(Debug, Serialize)]
struct SpotRow<'a> {
    spot_name: &'a str,
    x_index: i32,
    y_index: i32,
    ce: String,
    num_precursors: usize,
    precursor_ids: String,
}

impl<'a> SpotRow<'a> {
    fn new(spot: &'a Spot) -> Self {
        let ids: Vec<String> = spot.precursors().map(|p| p.feature.to_string()).collect();
        Self {
            spot_name: &spot.info().spot_name,
            x_index: spot.info().x_index,
            y_index: spot.info().y_index,
            ce: spot.collision_energy().to_string(),
            num_precursors: ids.len(),
            precursor_ids: format!("{{{}}}", ids.join(";")),
        }
    }
}

/// One row per spot, in the order given.
pub fn write_spots_report<W: Write>(
    writer: W,
    spots: &[Spot],
    cancel: &CancellationToken,
) -> Result<WriteStatus> {
    // header goes out even without rows
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record([
        "spot_name",
        "x_index",
        "y_index",
        "ce",
        "num_precursors",
        "precursor_ids",
    ])?;
    for spot in spots {
        if cancel.is_cancelled() {
            return Ok(WriteStatus::Cancelled);
        }
        wtr.serialize(SpotRow::new(spot))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(WriteStatus::Completed)
}

/// One row per distinct precursor hosted by a spot, weakest feature first.
pub fn write_precursors_report<W: Write>(
    writer: W,
    schedule: &Schedule,
    features: &[ImagingFeature],
    config: &SchedulerConfig,
    cancel: &CancellationToken,
) -> Result<WriteStatus> {
    let by_id: HashMap<FeatureId, &ImagingFeature> =
        features.iter().map(|f| (f.id(), f)).collect();

    let mut seen = HashSet::new();
    let mut hosted: Vec<&ImagingFeature> = schedule
        .spots
        .iter()
        .flat_map(|spot| spot.precursors())
        .filter(|entry| seen.insert(entry.feature))
        .filter_map(|entry| by_id.get(&entry.feature).copied())
        .collect();
    hosted.sort_by(|a, b| a.height().total_cmp(&b.height()));

    let mut wtr = csv::Writer::from_writer(writer);
    let mut header: Vec<String> = [
        "id",
        "height",
        "area",
        "mz",
        "spots_above_threshold",
        "total_spots",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    header.extend(
        config
            .collision_energies
            .iter()
            .map(|ce| format!("spots_{ce}")),
    );
    wtr.write_record(&header)?;

    for feature in hosted {
        if cancel.is_cancelled() {
            return Ok(WriteStatus::Cancelled);
        }
        let Some(precursor) = schedule.precursor(feature.id()) else {
            continue;
        };
        let threshold = config.min_intensity.for_height(feature.height());
        let mut record = vec![
            feature.id().to_string(),
            feature.height().to_string(),
            feature.area().to_string(),
            precursor.mz().to_string(),
            feature.num_pixels_above(threshold).to_string(),
            precursor.total_spot_count().to_string(),
        ];
        record.extend(
            config
                .collision_energies
                .iter()
                .map(|ce| precursor.spot_count_for_collision_energy(*ce).to_string()),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(WriteStatus::Completed)
}

/// `name: value` dump of the run's parameters.
pub fn write_parameters<W: Write>(mut writer: W, config: &SchedulerConfig) -> std::io::Result<()> {
    let lines = config.parameter_lines().map_err(std::io::Error::other)?;
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}
