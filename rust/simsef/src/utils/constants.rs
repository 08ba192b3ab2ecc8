/// Mass difference between 13C and 12C.
pub const C13_ISOTOPE_DISTANCE: f64 = 1.003_354_838;

/// Absolute tolerance (Da) used when matching isotope peaks inside an isolation window.
pub const ISOTOPE_MZ_TOLERANCE_DA: f64 = 0.003;
/// Relative tolerance (ppm) used when matching isotope peaks inside an isolation window.
pub const ISOTOPE_MZ_TOLERANCE_PPM: f64 = 10.0;

/// The quadrupole isolation window is typically wider than the nominal setting.
pub const ISOLATION_WIDTH_FACTOR: f64 = 1.3;
