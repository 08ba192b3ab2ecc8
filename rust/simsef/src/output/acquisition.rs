use super::WriteStatus;
use crate::cancel::CancellationToken;
use crate::errors::{
    Result,
    SchedulerError,
};
use crate::models::{
    CollisionEnergy,
    PrecursorEntry,
    QuadrantOffset,
    Spot,
};
use serde::Serialize;
use std::fs::File;
use std::io::{
    BufWriter,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};
use tracing::info;

/// Turns the ordered spot list into something the instrument can run.
pub trait AcquisitionWriter {
    fn write_plan(
        &mut self,
        spots: &[Spot],
        collision_energies: &[CollisionEnergy],
        cancel: &CancellationToken,
    ) -> Result<WriteStatus>;
}

#[derive(Debug, Serialize)]
struct PlannedQuadrant<'a> {
    offset: QuadrantOffset,
    precursors: &'a [PrecursorEntry],
}

#[derive(Debug, Serialize)]
struct PlannedSpot<'a> {
    spot_name: &'a str,
    x_index: i32,
    y_index: i32,
    collision_energy: CollisionEnergy,
    quadrants: Vec<PlannedQuadrant<'a>>,
}

#[derive(Debug, Serialize)]
struct AcquisitionPlan<'a> {
    collision_energies: &'a [CollisionEnergy],
    spots: Vec<PlannedSpot<'a>>,
}

/// Writes the plan as one JSON document.
#[derive(Debug, Clone)]
pub struct JsonPlanWriter {
    path: PathBuf,
}

impl JsonPlanWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_to<W: Write>(
        mut writer: W,
        spots: &[Spot],
        collision_energies: &[CollisionEnergy],
        cancel: &CancellationToken,
    ) -> Result<WriteStatus> {
        let mut planned = Vec::with_capacity(spots.len());
        for spot in spots {
            if cancel.is_cancelled() {
                return Ok(WriteStatus::Cancelled);
            }
            planned.push(PlannedSpot {
                spot_name: &spot.info().spot_name,
                x_index: spot.info().x_index,
                y_index: spot.info().y_index,
                collision_energy: spot.collision_energy(),
                quadrants: spot
                    .all_quadrant_lists()
                    .map(|(offset, precursors)| PlannedQuadrant { offset, precursors })
                    .collect(),
            });
        }
        let plan = AcquisitionPlan {
            collision_energies,
            spots: planned,
        };
        serde_json::to_writer_pretty(&mut writer, &plan)?;
        writer.flush().map_err(serde_json::Error::io)?;
        Ok(WriteStatus::Completed)
    }
}

impl AcquisitionWriter for JsonPlanWriter {
    fn write_plan(
        &mut self,
        spots: &[Spot],
        collision_energies: &[CollisionEnergy],
        cancel: &CancellationToken,
    ) -> Result<WriteStatus> {
        let file = File::create(&self.path).map_err(|e| SchedulerError::io(e, &self.path))?;
        let status = Self::write_to(BufWriter::new(file), spots, collision_energies, cancel)?;
        if status == WriteStatus::Completed {
            info!("Wrote acquisition plan for {} spots to {}", spots.len(), self.path.display());
        }
        Ok(status)
    }
}
