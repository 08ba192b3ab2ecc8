//! Answers the per-candidate questions the scheduler asks: which collision
//! energies are still usable at a location, and how pure an isolation window is.

pub mod collision_energy;
pub mod mobility;
pub mod purity;

pub use collision_energy::{
    AssignedSpot,
    CollisionEnergyRules,
    DistanceRules,
};
pub use mobility::{
    adjust_mobility_range,
    mobility_distance_for_switch_time,
};
pub use purity::{
    MobilityScanCursor,
    PurityScorer,
    purity_in_mz_and_mobility_range,
};
