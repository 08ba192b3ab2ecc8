use super::imaging::{
    SpotInfo,
    SpotLocation,
};
use super::precursor::{
    CollisionEnergy,
    Precursor,
    PrecursorEntry,
};
use crate::errors::ConfigError;
use serde::{
    Deserialize,
    Serialize,
};
use std::str::FromStr;

/// Maximum number of precursors the quadrupole can step through in one ramp.
pub const MAX_PRECURSORS_PER_QUADRANT: usize = 25;

/// Offset of a quadrant relative to the spot itself, in a 2x2 layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuadrantOffset {
    pub x: u8,
    pub y: u8,
}

const SINGLE_OFFSETS: [QuadrantOffset; 1] = [QuadrantOffset { x: 0, y: 0 }];
// x then y, the (0, 0) cell is the spot itself and stays empty.
const TRIPLE_OFFSETS: [QuadrantOffset; 3] = [
    QuadrantOffset { x: 0, y: 1 },
    QuadrantOffset { x: 1, y: 0 },
    QuadrantOffset { x: 1, y: 1 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcquisitionMode {
    /// One MS/MS ramp on the spot itself.
    Single,
    /// Three MS/MS ramps on the neighbouring quadrants of the spot.
    Triple,
}

impl AcquisitionMode {
    pub const fn quadrant_offsets(self) -> &'static [QuadrantOffset] {
        match self {
            AcquisitionMode::Single => &SINGLE_OFFSETS,
            AcquisitionMode::Triple => &TRIPLE_OFFSETS,
        }
    }

    pub const fn quadrant_count(self) -> usize {
        self.quadrant_offsets().len()
    }
}

impl FromStr for AcquisitionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(AcquisitionMode::Single),
            "triple" => Ok(AcquisitionMode::Triple),
            _ => Err(ConfigError::UnsupportedAcquisitionMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for AcquisitionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcquisitionMode::Single => write!(f, "single"),
            AcquisitionMode::Triple => write!(f, "triple"),
        }
    }
}

/// A physical MS/MS location with a fixed collision energy.
///
/// Identity is the spot info: two instances for the same location compare equal.
#[derive(Debug, Clone)]
pub struct Spot {
    info: SpotInfo,
    mode: AcquisitionMode,
    collision_energy: CollisionEnergy,
    // One list per entry of `mode.quadrant_offsets()`.
    quadrants: Vec<Vec<PrecursorEntry>>,
}

impl PartialEq for Spot {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info
    }
}

impl Eq for Spot {}

fn quadrant_accepts(
    quadrant: &[PrecursorEntry],
    precursor: &Precursor,
    min_mobility_distance: f32,
) -> bool {
    if quadrant.len() >= MAX_PRECURSORS_PER_QUADRANT {
        return false;
    }
    let window = precursor.mobility_window();
    quadrant
        .iter()
        .all(|entry| !entry.mobility_window.overlaps_within(window, min_mobility_distance))
}

impl Spot {
    pub fn new(info: SpotInfo, mode: AcquisitionMode, collision_energy: CollisionEnergy) -> Self {
        Self {
            info,
            mode,
            collision_energy,
            quadrants: vec![Vec::new(); mode.quadrant_count()],
        }
    }

    pub fn info(&self) -> &SpotInfo {
        &self.info
    }

    pub fn location(&self) -> SpotLocation {
        self.info.location()
    }

    pub fn mode(&self) -> AcquisitionMode {
        self.mode
    }

    pub fn collision_energy(&self) -> CollisionEnergy {
        self.collision_energy
    }

    /// Precursors of the quadrant at the given offset.
    ///
    /// `None` if the offset is not an active quadrant in this spot's mode,
    /// e.g. the (0, 0) self quadrant of a triple spot.
    pub fn precursor_list(&self, offset_x: u8, offset_y: u8) -> Option<&[PrecursorEntry]> {
        let idx = self
            .mode
            .quadrant_offsets()
            .iter()
            .position(|o| o.x == offset_x && o.y == offset_y)?;
        Some(&self.quadrants[idx])
    }

    pub fn all_quadrant_lists(&self) -> impl Iterator<Item = (QuadrantOffset, &[PrecursorEntry])> {
        self.mode
            .quadrant_offsets()
            .iter()
            .copied()
            .zip(self.quadrants.iter().map(|q| q.as_slice()))
    }

    /// All hosted precursors, in quadrant order.
    pub fn precursors(&self) -> impl Iterator<Item = &PrecursorEntry> {
        self.quadrants.iter().flatten()
    }

    pub fn num_precursors(&self) -> usize {
        self.quadrants.iter().map(|q| q.len()).sum()
    }

    /// Same check as [`Spot::try_add_precursor`] without touching anything.
    pub fn can_accept_precursor(&self, precursor: &Precursor, min_mobility_distance: f32) -> bool {
        self.quadrants
            .iter()
            .any(|q| quadrant_accepts(q, precursor, min_mobility_distance))
    }

    /// Adds the precursor to the first quadrant that has room and no
    /// overlapping mobility window. Quadrants are tried in the fixed offset order.
    ///
    /// On success the precursor's counter for this spot's collision energy
    /// is incremented.
    pub fn try_add_precursor(
        &mut self,
        precursor: &mut Precursor,
        min_mobility_distance: f32,
    ) -> bool {
        let Some(idx) = self
            .quadrants
            .iter()
            .position(|q| quadrant_accepts(q, &*precursor, min_mobility_distance))
        else {
            return false;
        };
        self.quadrants[idx].push(precursor.entry());
        precursor.increment_spot_counter_for_collision_energy(self.collision_energy);
        true
    }
}
