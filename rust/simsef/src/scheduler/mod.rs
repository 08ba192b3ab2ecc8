pub mod registry;
#[allow(clippy::module_inception)]
pub mod scheduler;

pub use registry::{
    FeatureSpotIndex,
    SpotRegistry,
};
pub use scheduler::{
    Schedule,
    ScheduleOutcome,
    Scheduler,
    schedule,
};
