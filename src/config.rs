//! Experiment configuration.
//!
//! Every field has a default, so an empty (or absent) TOML file reproduces
//! the original kitchen experiment: a 4 in × 3 in ceramic mug, coffee poured
//! at 74 °C, a 21 °C room, and a mug preheated to 55 °C. Temperatures are in
//! °F throughout; use [`c_to_f`] when copying values off a Celsius
//! thermometer.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ensure_finite, ensure_non_negative, ensure_positive, CoolingError, Result};
use crate::physics::{MeasurementPoint, Mug};

/// Convert Celsius to Fahrenheit
pub fn c_to_f(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

/// Convert Fahrenheit to Celsius
pub fn f_to_c(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub environment: EnvironmentConfig,
    pub coffee: CoffeeConfig,
    pub mug: MugConfig,
    pub creamer: CreamerConfig,
    pub plot: PlotConfig,
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub ambient_temperature_f: f64,
    /// Calibrated against the stopwatch run, per minute.
    pub cooling_constant_per_min: f64,
    /// Coolest temperature still worth drinking.
    pub target_temperature_f: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            ambient_temperature_f: c_to_f(21.0),
            cooling_constant_per_min: 0.02,
            target_temperature_f: c_to_f(45.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoffeeConfig {
    pub pour_temperature_f: f64,
}

impl Default for CoffeeConfig {
    fn default() -> Self {
        Self {
            pour_temperature_f: c_to_f(74.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MugConfig {
    #[serde(flatten)]
    pub geometry: Mug,
    pub preheat_temperature_f: f64,
}

impl Default for MugConfig {
    fn default() -> Self {
        Self {
            geometry: Mug::default(),
            preheat_temperature_f: c_to_f(55.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreamerConfig {
    pub enabled: bool,
    pub temperature_f: f64,
    pub volume_ml: f64,
    /// Minutes after pouring
    pub added_at_min: f64,
}

impl Default for CreamerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            temperature_f: 38.0,
            volume_ml: 50.0,
            added_at_min: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub duration_min: f64,
    pub step_min: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            duration_min: 60.0,
            step_min: 5.0,
        }
    }
}

/// Which modeled curve the stopwatch readings are checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasuredScenario {
    RoomTemperature,
    #[default]
    Preheated,
    PreheatedWithCreamer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub scenario: MeasuredScenario,
    /// Minutes since pouring and the thermometer reading in °F
    pub measurements: Vec<MeasurementPoint>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            scenario: MeasuredScenario::Preheated,
            measurements: stopwatch_run(),
        }
    }
}

/// Readings from the one stopwatch run: preheated ceramic mug, black coffee.
fn stopwatch_run() -> Vec<MeasurementPoint> {
    [
        (0.0, 159.0),
        (2.0, 156.0),
        (5.0, 151.5),
        (10.0, 144.0),
        (15.0, 137.5),
        (20.0, 131.5),
        (30.0, 121.0),
        (40.0, 112.0),
    ]
    .into_iter()
    .map(|(t, temp)| MeasurementPoint::new(t, temp))
    .collect()
}

impl ModelConfig {
    /// Load from `path`, or use the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`ModelConfig::load`] but leaves validation to the caller, for
    /// callers that still have overrides to apply.
    pub fn read(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                debug!(path = %path.display(), "loaded config file");
                Self::from_toml_str(&text)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse without validating.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Check every physical quantity; the first problem found is returned.
    pub fn validate(&self) -> Result<()> {
        let env = &self.environment;
        let ambient = ensure_finite("environment.ambient_temperature_f", env.ambient_temperature_f)?;
        ensure_positive("environment.cooling_constant_per_min", env.cooling_constant_per_min)?;
        let pour = ensure_finite("coffee.pour_temperature_f", self.coffee.pour_temperature_f)?;
        if pour <= ambient {
            return Err(CoolingError::invalid(
                "coffee.pour_temperature_f",
                pour,
                "must be above ambient temperature",
            ));
        }
        let target = ensure_finite("environment.target_temperature_f", env.target_temperature_f)?;
        if target <= ambient || target >= pour {
            return Err(CoolingError::invalid(
                "environment.target_temperature_f",
                target,
                "must lie between ambient and pour temperature",
            ));
        }

        self.mug.geometry.validate()?;
        let preheat = ensure_finite("mug.preheat_temperature_f", self.mug.preheat_temperature_f)?;
        if preheat < ambient {
            warn!(preheat, ambient, "preheat temperature is below ambient; the \"preheated\" mug is colder than the room");
        }

        if self.creamer.enabled {
            ensure_finite("creamer.temperature_f", self.creamer.temperature_f)?;
            ensure_positive("creamer.volume_ml", self.creamer.volume_ml)?;
            ensure_non_negative("creamer.added_at_min", self.creamer.added_at_min)?;
        } else if self.validation.scenario == MeasuredScenario::PreheatedWithCreamer
            && !self.validation.measurements.is_empty()
        {
            return Err(CoolingError::invalid(
                "creamer.enabled",
                0.0,
                "measurements reference the creamer scenario but the creamer is disabled",
            ));
        }

        ensure_non_negative("plot.duration_min", self.plot.duration_min)?;
        ensure_positive("plot.step_min", self.plot.step_min)?;

        for m in &self.validation.measurements {
            ensure_non_negative("measurement.elapsed_time", m.elapsed_time)?;
            ensure_finite("measurement.observed_temperature", m.observed_temperature)?;
        }
        Ok(())
    }

    /// Creamer share of the drink by mass, treating both liquids as water.
    pub fn creamer_mass_fraction(&self) -> f64 {
        let coffee_ml = self.mug.geometry.coffee_volume_ml();
        self.creamer.volume_ml / (self.creamer.volume_ml + coffee_ml)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::physics::MugMaterial;

    #[test]
    fn test_c_to_f_known_values() {
        // Freezing point of water
        assert!((c_to_f(0.0) - 32.0).abs() < 0.001);
        // Boiling point of water
        assert!((c_to_f(100.0) - 212.0).abs() < 0.001);
        // Room temperature
        assert!((c_to_f(21.0) - 69.8).abs() < 1e-9);
    }

    #[test]
    fn test_f_to_c_known_values() {
        assert!((f_to_c(32.0) - 0.0).abs() < 0.001);
        assert!((f_to_c(212.0) - 100.0).abs() < 0.001);
        // The creamer straight from the fridge
        assert!((f_to_c(38.0) - 3.3333).abs() < 0.001);
        // -40 is the same in both scales
        assert!((f_to_c(-40.0) - (-40.0)).abs() < 0.001);
    }

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = ModelConfig::from_toml_str("").unwrap();
        assert_eq!(config, ModelConfig::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.validation.measurements.len(), 8);
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config = ModelConfig::from_toml_str(
            r#"
            [environment]
            cooling_constant_per_min = 0.035

            [mug]
            material = "stainless_steel"
            height_in = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(config.environment.cooling_constant_per_min, 0.035);
        assert_eq!(config.environment.ambient_temperature_f, c_to_f(21.0));
        assert_eq!(config.mug.geometry.material, MugMaterial::StainlessSteel);
        assert_eq!(config.mug.geometry.height_in, 5.0);
        assert_eq!(config.mug.geometry.diameter_in, 3.0);
        assert_eq!(config.mug.preheat_temperature_f, c_to_f(55.0));
    }

    #[test]
    fn test_measurements_table() {
        let config = ModelConfig::from_toml_str(
            r#"
            [validation]
            scenario = "room_temperature"

            [[validation.measurements]]
            elapsed_time = 0.0
            observed_temperature = 150.0

            [[validation.measurements]]
            elapsed_time = 10.0
            observed_temperature = 136.5
            "#,
        )
        .unwrap();
        assert_eq!(config.validation.scenario, MeasuredScenario::RoomTemperature);
        assert_eq!(
            config.validation.measurements,
            vec![MeasurementPoint::new(0.0, 150.0), MeasurementPoint::new(10.0, 136.5)]
        );
    }

    #[test]
    fn test_validate_rejects_non_physical_values() {
        let mut config = ModelConfig::default();
        config.environment.cooling_constant_per_min = 0.0;
        assert!(config.validate().unwrap_err().is_invalid_parameter());

        let mut config = ModelConfig::default();
        config.coffee.pour_temperature_f = 60.0;
        assert!(config.validate().is_err());

        let mut config = ModelConfig::default();
        config.environment.target_temperature_f = 200.0;
        assert!(config.validate().is_err());

        let mut config = ModelConfig::default();
        config.creamer.volume_ml = -5.0;
        assert!(config.validate().is_err());

        // A disabled creamer isn't checked
        config.creamer.enabled = false;
        assert!(config.validate().is_ok());

        config.validation.scenario = MeasuredScenario::PreheatedWithCreamer;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_creamer_mass_fraction() {
        let config = ModelConfig::default();
        let fraction = config.creamer_mass_fraction();
        assert!(fraction > 0.1 && fraction < 0.15, "got {fraction}");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[coffee]\npour_temperature_f = 180.0").unwrap();

        let config = ModelConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.coffee.pour_temperature_f, 180.0);
    }

    #[test]
    fn test_load_errors() {
        let missing = ModelConfig::load(Some(Path::new("/nonexistent/coffee.toml")));
        assert!(matches!(missing, Err(CoolingError::Io(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[coffee\npour = ").unwrap();
        assert!(matches!(
            ModelConfig::load(Some(file.path())),
            Err(CoolingError::ConfigParse(_))
        ));

        assert!(ModelConfig::load(None).is_ok());
    }

    #[test]
    fn test_read_skips_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[coffee]\npour_temperature_f = 10.0").unwrap();

        let config = ModelConfig::read(Some(file.path())).unwrap();
        assert_eq!(config.coffee.pour_temperature_f, 10.0);
        assert!(config.validate().unwrap_err().is_invalid_parameter());
        assert!(ModelConfig::load(Some(file.path())).unwrap_err().is_invalid_parameter());

        assert_eq!(ModelConfig::read(None).unwrap(), ModelConfig::default());
    }
}
