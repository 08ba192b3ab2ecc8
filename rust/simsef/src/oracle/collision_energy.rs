use crate::models::{
    CollisionEnergy,
    Precursor,
    SpotLocation,
};
use serde::Serialize;

/// A spot a feature has already been scheduled on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AssignedSpot {
    pub location: SpotLocation,
    pub collision_energy: CollisionEnergy,
}

/// Decides which collision energies a feature may still use at a location.
///
/// The reuse and the new-spot decisions are separate operations and are
/// not required to agree with each other.
pub trait CollisionEnergyRules {
    /// Energies usable when adding the precursor to an existing spot at `candidate`.
    fn possible_for_reuse(
        &self,
        precursor: &Precursor,
        assigned: &[AssignedSpot],
        candidate: SpotLocation,
        collision_energies: &[CollisionEnergy],
        target_count: u32,
    ) -> Vec<CollisionEnergy>;

    /// The energy a new spot at `candidate` should get, if any.
    fn best_for_new_spot(
        &self,
        precursor: &Precursor,
        assigned: &[AssignedSpot],
        candidate: SpotLocation,
        collision_energies: &[CollisionEnergy],
        target_count: u32,
        lookahead: usize,
    ) -> Option<CollisionEnergy>;
}

/// Spots of one feature with the same collision energy must be at least
/// `min_distance` pixels apart.
#[derive(Debug, Clone, Copy)]
pub struct DistanceRules {
    pub min_distance: f64,
}

impl DistanceRules {
    pub fn new(min_distance: f64) -> Self {
        Self { min_distance }
    }

    fn blocked_by_distance(
        &self,
        ce: CollisionEnergy,
        assigned: &[AssignedSpot],
        candidate: SpotLocation,
    ) -> bool {
        assigned.iter().any(|spot| {
            spot.collision_energy == ce && spot.location.distance(&candidate) < self.min_distance
        })
    }
}

impl CollisionEnergyRules for DistanceRules {
    fn possible_for_reuse(
        &self,
        precursor: &Precursor,
        assigned: &[AssignedSpot],
        candidate: SpotLocation,
        collision_energies: &[CollisionEnergy],
        target_count: u32,
    ) -> Vec<CollisionEnergy> {
        collision_energies
            .iter()
            .copied()
            .filter(|ce| precursor.spot_count_for_collision_energy(*ce) < target_count)
            .filter(|ce| !self.blocked_by_distance(*ce, assigned, candidate))
            .collect()
    }

    fn best_for_new_spot(
        &self,
        precursor: &Precursor,
        assigned: &[AssignedSpot],
        candidate: SpotLocation,
        collision_energies: &[CollisionEnergy],
        target_count: u32,
        lookahead: usize,
    ) -> Option<CollisionEnergy> {
        let mut by_count: Vec<(u32, CollisionEnergy)> = collision_energies
            .iter()
            .map(|ce| (precursor.spot_count_for_collision_energy(*ce), *ce))
            .filter(|(count, _)| *count < target_count)
            .collect();
        // stable, ties keep the configured order
        by_count.sort_by_key(|(count, _)| *count);

        by_count
            .into_iter()
            .take(lookahead)
            .map(|(_, ce)| ce)
            .find(|ce| !self.blocked_by_distance(*ce, assigned, candidate))
    }
}
