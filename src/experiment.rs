//! The preheated-vs-cold mug experiment, assembled from a [`ModelConfig`].

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{MeasuredScenario, ModelConfig};
use crate::error::Result;
use crate::physics::{
    compare_scenarios, compute_drinkable_window, summarize_residuals, time_grid,
    validate_against_measurements, ComparisonRow, Creamer, DrinkableWindow, MeasurementPoint,
    ResidualSummary, Scenario, ValidationRow,
};

/// The scenarios under study plus the stopwatch readings to check them against.
#[derive(Debug, Clone)]
pub struct Experiment {
    pub room_temperature: Scenario,
    pub preheated: Scenario,
    pub preheated_with_creamer: Option<Scenario>,
    pub measured: MeasuredScenario,
    pub measurements: Vec<MeasurementPoint>,
    pub target_temperature: f64,
    pub time_points: Vec<f64>,
}

/// Summary line for one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioSummary {
    pub label: String,
    pub starting_temperature: f64,
    pub equation: String,
    pub minutes_to_target: f64,
}

/// Everything a run produces, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    pub target_temperature: f64,
    pub ambient_temperature: f64,
    pub scenarios: Vec<ScenarioSummary>,
    /// Labels of the two compared columns, A then B.
    pub compared: (String, String),
    pub comparison: Vec<ComparisonRow>,
    pub drinkable_window: DrinkableWindow,
    /// Optional third curve sampled at the same time points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creamer_curve: Option<Vec<(f64, f64)>>,
    pub validated: String,
    pub validation: Vec<ValidationRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residuals: Option<ResidualSummary>,
}

impl Experiment {
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let env = &config.environment;
        let mug = &config.mug.geometry;
        let ambient = env.ambient_temperature_f;
        let k = env.cooling_constant_per_min;
        let pour = config.coffee.pour_temperature_f;

        let room_temperature =
            Scenario::poured_into("Room-temperature mug", mug, pour, ambient, ambient, k)?;
        let preheated = Scenario::poured_into(
            "Preheated mug",
            mug,
            pour,
            config.mug.preheat_temperature_f,
            ambient,
            k,
        )?;

        let preheated_with_creamer = if config.creamer.enabled {
            let creamer = Creamer {
                temperature: config.creamer.temperature_f,
                mass_fraction: config.creamer_mass_fraction(),
                added_at: config.creamer.added_at_min,
            };
            Some(
                preheated
                    .clone()
                    .relabeled("Preheated mug with creamer")
                    .with_creamer(creamer)?,
            )
        } else {
            None
        };

        let time_points = time_grid(config.plot.duration_min, config.plot.step_min)?;
        debug!(
            material = mug.material.name(),
            coffee_ml = mug.coffee_volume_ml(),
            mug_heat_capacity = mug.mug_heat_capacity(),
            points = time_points.len(),
            "experiment assembled"
        );

        Ok(Self {
            room_temperature,
            preheated,
            preheated_with_creamer,
            measured: config.validation.scenario,
            measurements: config.validation.measurements.clone(),
            target_temperature: env.target_temperature_f,
            time_points,
        })
    }

    /// All modeled scenarios, creamer last.
    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        [&self.room_temperature, &self.preheated]
            .into_iter()
            .chain(self.preheated_with_creamer.as_ref())
    }

    fn measured_scenario(&self) -> &Scenario {
        match self.measured {
            MeasuredScenario::RoomTemperature => &self.room_temperature,
            MeasuredScenario::Preheated => &self.preheated,
            MeasuredScenario::PreheatedWithCreamer => self
                .preheated_with_creamer
                .as_ref()
                .unwrap_or(&self.preheated),
        }
    }

    pub fn run(&self) -> Result<ExperimentReport> {
        let target = self.target_temperature;
        let scenarios = self
            .scenarios()
            .map(|s| {
                Ok(ScenarioSummary {
                    label: s.label().to_string(),
                    starting_temperature: s.temperature_at(0.0)?,
                    equation: s.equation(),
                    minutes_to_target: s.time_to_reach(target)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let comparison = compare_scenarios(&self.room_temperature, &self.preheated, &self.time_points)?;
        let drinkable_window = compute_drinkable_window(&comparison, target);

        let creamer_curve = self
            .preheated_with_creamer
            .as_ref()
            .map(|s| {
                self.time_points
                    .iter()
                    .map(|&t| Ok((t, s.temperature_at(t)?)))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        let measured = self.measured_scenario();
        let validation = validate_against_measurements(measured, &self.measurements)?;
        let residuals = summarize_residuals(&validation);

        for s in &scenarios {
            info!(scenario = %s.label, minutes = s.minutes_to_target, "time to target");
        }
        if let Some(r) = &residuals {
            info!(
                scenario = measured.label(),
                rms = r.root_mean_square,
                "validated against {} readings",
                r.count
            );
        }

        Ok(ExperimentReport {
            target_temperature: target,
            ambient_temperature: self.room_temperature.ambient_temperature(),
            scenarios,
            compared: (
                comparison.scenario_a().label().to_string(),
                comparison.scenario_b().label().to_string(),
            ),
            comparison: comparison.iter().collect(),
            drinkable_window,
            creamer_curve,
            validated: measured.label().to_string(),
            validation,
            residuals,
        })
    }
}
