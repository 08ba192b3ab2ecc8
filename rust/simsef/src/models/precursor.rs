use super::feature::{
    FeatureId,
    ImagingFeature,
};
use crate::utils::TupleRange;
use serde::{
    Deserialize,
    Serialize,
};

/// Collision energy in eV.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollisionEnergy(pub f64);

impl std::fmt::Display for CollisionEnergy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Debug keeps the decimal point for whole numbers ("20.0").
        write!(f, "{:?}", self.0)
    }
}

/// Fragmentation target derived from one feature.
///
/// Tracks, per requested collision energy, how many spots currently host it.
/// Only spots change the counters (see [`crate::models::Spot::try_add_precursor`]).
#[derive(Debug, Clone)]
pub struct Precursor {
    feature: FeatureId,
    mz: f64,
    mobility: f32,
    mobility_window: TupleRange<f32>,
    collision_energies: Vec<CollisionEnergy>,
    spot_counts: Vec<u32>,
}

/// What a spot keeps of a precursor: enough to check mobility overlap and
/// to write the acquisition plan, none of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrecursorEntry {
    pub feature: FeatureId,
    pub mz: f64,
    pub mobility_window: TupleRange<f32>,
}

impl Precursor {
    pub fn new(
        feature: &ImagingFeature,
        mobility_window: TupleRange<f32>,
        collision_energies: &[CollisionEnergy],
    ) -> Self {
        Self {
            feature: feature.id(),
            mz: feature.mz(),
            mobility: feature.mobility(),
            mobility_window,
            collision_energies: collision_energies.to_vec(),
            spot_counts: vec![0; collision_energies.len()],
        }
    }

    pub fn feature(&self) -> FeatureId {
        self.feature
    }

    pub fn mz(&self) -> f64 {
        self.mz
    }

    pub fn mobility(&self) -> f32 {
        self.mobility
    }

    pub fn mobility_window(&self) -> TupleRange<f32> {
        self.mobility_window
    }

    pub fn collision_energies(&self) -> &[CollisionEnergy] {
        &self.collision_energies
    }

    pub fn entry(&self) -> PrecursorEntry {
        PrecursorEntry {
            feature: self.feature,
            mz: self.mz,
            mobility_window: self.mobility_window,
        }
    }

    /// No bounds check, the caller reserved room before incrementing.
    /// Energies that were not requested are ignored.
    pub(crate) fn increment_spot_counter_for_collision_energy(&mut self, ce: CollisionEnergy) {
        if let Some(i) = self.collision_energies.iter().position(|x| *x == ce) {
            self.spot_counts[i] += 1;
        }
    }

    pub fn spot_count_for_collision_energy(&self, ce: CollisionEnergy) -> u32 {
        self.collision_energies
            .iter()
            .position(|x| *x == ce)
            .map(|i| self.spot_counts[i])
            .unwrap_or(0)
    }

    /// Limiting progress metric of the feature.
    pub fn lowest_count_across_collision_energies(&self) -> u32 {
        self.spot_counts.iter().copied().min().unwrap_or(0)
    }

    pub fn total_spot_count(&self) -> u32 {
        self.spot_counts.iter().sum()
    }
}
