pub mod feature;
pub mod imaging;
pub mod precursor;
pub mod spot;

pub use feature::{
    FeatureId,
    ImagingFeature,
    PixelIntensity,
};
pub use imaging::{
    FrameId,
    ImagingDataset,
    ImagingFrame,
    MobilityScan,
    SpotInfo,
    SpotLocation,
};
pub use precursor::{
    CollisionEnergy,
    Precursor,
    PrecursorEntry,
};
pub use spot::{
    AcquisitionMode,
    MAX_PRECURSORS_PER_QUADRANT,
    QuadrantOffset,
    Spot,
};
