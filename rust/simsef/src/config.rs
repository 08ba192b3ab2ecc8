use crate::errors::ConfigError;
use crate::models::{
    AcquisitionMode,
    CollisionEnergy,
};
use crate::utils::constants::ISOLATION_WIDTH_FACTOR;
use crate::utils::TupleRange;
use serde::{
    Deserialize,
    Serialize,
};

/// Lookahead of the new-spot collision energy selection.
pub const NEW_SPOT_CE_LOOKAHEAD: usize = 3;

/// Upper bound on the spectra a single feature can receive over all energies.
pub const MAX_SPECTRA_PER_FEATURE: u32 = 10_000;

/// Minimum MS/MS intensity, either absolute or relative to the feature height.
///
/// The effective threshold is the larger of the two.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityThreshold {
    pub absolute: f32,
    pub relative: f32,
}

impl IntensityThreshold {
    pub fn for_height(&self, height: f32) -> f32 {
        self.absolute.max(self.relative * height)
    }
}

impl Default for IntensityThreshold {
    fn default() -> Self {
        Self {
            absolute: 1e3,
            relative: 0.01,
        }
    }
}

/// Parameters of a scheduling run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Target number of spectra per feature and collision energy.
    pub spectra_per_feature: u32,
    pub collision_energies: Vec<CollisionEnergy>,
    /// Minimum distance (pixels) between two spots of one feature at the same energy.
    pub min_spot_distance: f64,
    pub min_purity: f64,
    pub min_intensity: IntensityThreshold,
    /// "single" or "triple".
    pub acquisition_mode: String,
    pub min_mobility_width: f32,
    pub max_mobility_width: f32,
    /// Nominal quadrupole isolation width in Da.
    pub isolation_width: f64,
    pub quad_switch_time_ms: f64,
    pub new_spot_ce_lookahead: usize,
    pub schedule_only: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            spectra_per_feature: 3,
            collision_energies: vec![CollisionEnergy(20.0), CollisionEnergy(35.0)],
            min_spot_distance: 3.0,
            min_purity: 0.5,
            min_intensity: IntensityThreshold::default(),
            acquisition_mode: AcquisitionMode::Single.to_string(),
            min_mobility_width: 0.005,
            max_mobility_width: 0.03,
            isolation_width: 1.7,
            quad_switch_time_ms: 1.65,
            new_spot_ce_lookahead: NEW_SPOT_CE_LOOKAHEAD,
            schedule_only: false,
        }
    }
}

fn check_non_negative(value: f64, name: &'static str) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonFinite(name))
    }
}

impl SchedulerConfig {
    /// Checks the parameters and resolves the acquisition mode.
    pub fn validate(&self) -> Result<AcquisitionMode, ConfigError> {
        let mode: AcquisitionMode = self.acquisition_mode.parse()?;

        if self.collision_energies.is_empty() {
            return Err(ConfigError::EmptyCollisionEnergies);
        }
        for (i, ce) in self.collision_energies.iter().enumerate() {
            check_non_negative(ce.0, "collision_energies")?;
            if self.collision_energies[..i].contains(ce) {
                return Err(ConfigError::DuplicateCollisionEnergy(ce.0));
            }
        }
        if self.spectra_per_feature == 0 {
            return Err(ConfigError::ZeroSpectraPerFeature);
        }
        self.total_spectra_per_feature()?;

        check_non_negative(self.min_spot_distance, "min_spot_distance")?;
        check_non_negative(self.min_purity, "min_purity")?;
        check_non_negative(self.min_intensity.absolute as f64, "min_intensity.absolute")?;
        check_non_negative(self.min_intensity.relative as f64, "min_intensity.relative")?;
        check_non_negative(self.min_mobility_width as f64, "min_mobility_width")?;
        check_non_negative(self.max_mobility_width as f64, "max_mobility_width")?;
        check_non_negative(self.isolation_width, "isolation_width")?;
        check_non_negative(self.quad_switch_time_ms, "quad_switch_time_ms")?;

        if self.min_mobility_width > self.max_mobility_width {
            return Err(ConfigError::InvalidMobilityWidths {
                min: self.min_mobility_width,
                max: self.max_mobility_width,
            });
        }
        Ok(mode)
    }

    /// Maximum number of spectra a single feature can receive.
    pub fn total_spectra_per_feature(&self) -> Result<u32, ConfigError> {
        u32::try_from(self.collision_energies.len())
            .ok()
            .and_then(|n| self.spectra_per_feature.checked_mul(n))
            .filter(|total| *total <= MAX_SPECTRA_PER_FEATURE)
            .ok_or(ConfigError::TooManySpectra {
                per_energy: self.spectra_per_feature,
                num_energies: self.collision_energies.len(),
            })
    }

    /// Isolation window actually seen by the precursor, which is wider than the setting.
    ///
    /// `None` only for a non-finite m/z.
    pub fn isolation_window(&self, mz: f64) -> Option<TupleRange<f64>> {
        let half_width = self.isolation_width * ISOLATION_WIDTH_FACTOR / 2.0;
        TupleRange::try_new(mz - half_width, mz + half_width).ok()
    }

    /// One `name: value` line per parameter, in alphabetical order.
    pub fn parameter_lines(&self) -> Result<Vec<String>, serde_json::Error> {
        let value = serde_json::to_value(self)?;
        let lines = match value {
            serde_json::Value::Object(map) => map
                .into_iter()
                .map(|(name, value)| format!("{}: {}", name, value))
                .collect(),
            other => vec![other.to_string()],
        };
        Ok(lines)
    }
}
