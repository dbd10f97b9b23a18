//! Run configuration: the flat key/value parameter file and its validation.
//!
//! Every knob of a run lives here and is fixed at construction; the world
//! owns one immutable copy and hands it by reference to every patch
//! operation. Field names map 1:1 onto the kebab-case JSON keys of the
//! parameter file.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::forcing::ForcingMode;

/// Everything that can go wrong while loading or validating a parameter
/// file. All variants fire before any simulation state is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read parameter file: {0}")]
    Io(#[from] io::Error),

    #[error("malformed parameter file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("side-length must be at least 1")]
    NonPositiveSideLength,

    #[error("{field} must lie in [0, 1], got {value}")]
    FractionOutOfRange { field: &'static str, value: f64 },

    /// More starting daisies were requested than the grid has cells;
    /// disjoint placement could never finish.
    #[error("white-start + black-start must not exceed 1, got {sum}")]
    StartFractionsExceedGrid { sum: f64 },

    #[error("{field} must be finite, got {value}")]
    NonFiniteValue { field: &'static str, value: f64 },
}

/// Global parameters of one Daisyworld run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SimulationConfig {
    /// Number of steps to run.
    pub ticks: u64,
    /// Grid side `N`; the world holds `N²` patches.
    pub side_length: usize,
    /// Starting white population as a fraction of the grid area.
    pub white_start: f64,
    /// Starting black population as a fraction of the grid area.
    pub black_start: f64,
    /// Reflectivity of white daisies (fraction of sunlight turned away).
    pub white_albedo: f64,
    /// Reflectivity of black daisies.
    pub black_albedo: f64,
    /// Reflectivity of bare ground.
    pub surface_albedo: f64,
    /// Incident solar energy scalar; the forcing mode may move it during
    /// the run.
    pub solar_luminosity: f64,
    /// Temperature every patch starts from.
    pub init_temperature: f64,
    /// Schedule by which luminosity changes over ticks.
    pub mode: ForcingMode,
    /// Soil-quality feedback: ground wears out under daisies and recovers
    /// when bare, scaling the seeding odds.
    pub soil_quality_mode: bool,
    /// Flexible-lifetime feedback: daisy lifespans drift with local
    /// habitability.
    #[serde(default)]
    pub flexible_lifetime: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 500,
            side_length: 30,
            white_start: 0.2,
            black_start: 0.2,
            white_albedo: 0.75,
            black_albedo: 0.25,
            surface_albedo: 0.4,
            solar_luminosity: 1.0,
            init_temperature: 0.0,
            mode: ForcingMode::None,
            soil_quality_mode: false,
            flexible_lifetime: false,
        }
    }
}

impl SimulationConfig {
    /// Read and validate a parameter file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse and validate parameters from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no world can be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.side_length == 0 {
            return Err(ConfigError::NonPositiveSideLength);
        }
        for (field, value) in [
            ("white-start", self.white_start),
            ("black-start", self.black_start),
            ("white-albedo", self.white_albedo),
            ("black-albedo", self.black_albedo),
            ("surface-albedo", self.surface_albedo),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::FractionOutOfRange { field, value });
            }
        }
        let sum = self.white_start + self.black_start;
        if sum > 1.0 {
            return Err(ConfigError::StartFractionsExceedGrid { sum });
        }
        for (field, value) in [
            ("solar-luminosity", self.solar_luminosity),
            ("init-temperature", self.init_temperature),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteValue { field, value });
            }
        }
        Ok(())
    }

    /// Grid area in patches.
    pub fn area(&self) -> usize {
        self.side_length * self.side_length
    }
}
