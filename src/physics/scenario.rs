use serde::{Deserialize, Serialize};
use tracing::debug;

use super::materials::Mug;
use super::mixing::{mix_creamer, settle_into_mug};
use super::newton::{cooling_time, decay};
use crate::error::{ensure_finite, ensure_non_negative, ensure_positive, CoolingError, Result};

/// Creamer stirred into the coffee at `added_at` (0 = right after pouring).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Creamer {
    pub temperature: f64,
    /// Share of the final drink's mass that is creamer, strictly between 0 and 1.
    pub mass_fraction: f64,
    pub added_at: f64,
}

/// One stopwatch reading: thermometer value at a given elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPoint {
    pub elapsed_time: f64,
    pub observed_temperature: f64,
}

impl MeasurementPoint {
    pub const fn new(elapsed_time: f64, observed_temperature: f64) -> Self {
        Self {
            elapsed_time,
            observed_temperature,
        }
    }
}

/// A fully validated cooling scenario.
///
/// Fields are private so a `Scenario` can only exist once its invariants
/// hold: `cooling_constant > 0` and the coffee starts above ambient (both
/// before and after any creamer is added).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    label: String,
    initial_temperature: f64,
    ambient_temperature: f64,
    cooling_constant: f64,
    creamer: Option<Creamer>,
    /// Temperature just after the creamer goes in.
    #[serde(skip_serializing_if = "Option::is_none")]
    mixed_temperature: Option<f64>,
}

impl Scenario {
    pub fn new(
        label: impl Into<String>,
        initial_temperature: f64,
        ambient_temperature: f64,
        cooling_constant: f64,
    ) -> Result<Self> {
        ensure_finite("initial_temperature", initial_temperature)?;
        ensure_finite("ambient_temperature", ambient_temperature)?;
        ensure_positive("cooling_constant", cooling_constant)?;
        if ambient_temperature >= initial_temperature {
            return Err(CoolingError::invalid(
                "ambient_temperature",
                ambient_temperature,
                "must be below the initial temperature",
            ));
        }

        Ok(Self {
            label: label.into(),
            initial_temperature,
            ambient_temperature,
            cooling_constant,
            creamer: None,
            mixed_temperature: None,
        })
    }

    /// Scenario for coffee poured into `mug` while the mug sits at `mug_temperature`.
    ///
    /// The starting temperature is the coffee/mug equilibrium right after
    /// pouring; from there the pair cools together at `cooling_constant`.
    pub fn poured_into(
        label: impl Into<String>,
        mug: &Mug,
        coffee_temperature: f64,
        mug_temperature: f64,
        ambient_temperature: f64,
        cooling_constant: f64,
    ) -> Result<Self> {
        mug.validate()?;
        let settled = settle_into_mug(
            coffee_temperature,
            mug.coffee_heat_capacity(),
            mug_temperature,
            mug.mug_heat_capacity(),
        )?;
        let label = label.into();
        debug!(
            scenario = %label,
            coffee_temperature,
            mug_temperature,
            settled,
            "coffee settled into mug"
        );
        Self::new(label, settled, ambient_temperature, cooling_constant)
    }

    /// Same scenario with creamer stirred in at `creamer.added_at`.
    pub fn with_creamer(self, creamer: Creamer) -> Result<Self> {
        ensure_finite("creamer_temperature", creamer.temperature)?;
        ensure_non_negative("creamer_added_at", creamer.added_at)?;
        ensure_finite("creamer_mass_fraction", creamer.mass_fraction)?;
        if creamer.mass_fraction <= 0.0 || creamer.mass_fraction >= 1.0 {
            return Err(CoolingError::invalid(
                "creamer_mass_fraction",
                creamer.mass_fraction,
                "must be strictly between 0 and 1",
            ));
        }

        let before = self.black_coffee_at(creamer.added_at);
        let mixed = mix_creamer(
            before,
            1.0 - creamer.mass_fraction,
            creamer.temperature,
            creamer.mass_fraction,
        )?;
        if mixed <= self.ambient_temperature {
            return Err(CoolingError::invalid(
                "creamer_mass_fraction",
                creamer.mass_fraction,
                "creamer would chill the coffee to ambient or below",
            ));
        }
        debug!(scenario = %self.label, before, mixed, "creamer mixed in");

        Ok(Self {
            creamer: Some(creamer),
            mixed_temperature: Some(mixed),
            ..self
        })
    }

    /// Same scenario under a different label.
    pub fn relabeled(self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..self
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn initial_temperature(&self) -> f64 {
        self.initial_temperature
    }

    pub fn ambient_temperature(&self) -> f64 {
        self.ambient_temperature
    }

    pub fn cooling_constant(&self) -> f64 {
        self.cooling_constant
    }

    pub fn creamer(&self) -> Option<&Creamer> {
        self.creamer.as_ref()
    }

    pub fn mixed_temperature(&self) -> Option<f64> {
        self.mixed_temperature
    }

    fn black_coffee_at(&self, t: f64) -> f64 {
        decay(self.initial_temperature, self.ambient_temperature, self.cooling_constant, t)
    }

    /// Predicted temperature at `elapsed_time`.
    ///
    /// Before the creamer goes in the black coffee follows the plain cooling
    /// curve. From `added_at` on, cooling restarts from the mixed temperature.
    pub fn temperature_at(&self, elapsed_time: f64) -> Result<f64> {
        ensure_non_negative("elapsed_time", elapsed_time)?;
        Ok(self.temperature_at_unchecked(elapsed_time))
    }

    pub(crate) fn temperature_at_unchecked(&self, t: f64) -> f64 {
        match (self.creamer, self.mixed_temperature) {
            (Some(creamer), Some(mixed)) if t >= creamer.added_at => decay(
                mixed,
                self.ambient_temperature,
                self.cooling_constant,
                t - creamer.added_at,
            ),
            _ => self.black_coffee_at(t),
        }
    }

    /// Elapsed time until the coffee first drops to `target`.
    ///
    /// When stirring in the creamer jumps the temperature past `target`, the
    /// answer is the moment the creamer went in. A target at or above the
    /// starting temperature is reached immediately, at time 0.
    pub fn time_to_reach(&self, target: f64) -> Result<f64> {
        if target >= self.temperature_at_unchecked(0.0) {
            return Ok(0.0);
        }

        let (creamer, mixed) = match (self.creamer, self.mixed_temperature) {
            (Some(c), Some(m)) => (c, m),
            _ => {
                return cooling_time(
                    self.initial_temperature,
                    self.ambient_temperature,
                    self.cooling_constant,
                    target,
                )
            }
        };

        let before = self.black_coffee_at(creamer.added_at);
        if target >= before {
            return cooling_time(
                self.initial_temperature,
                self.ambient_temperature,
                self.cooling_constant,
                target,
            );
        }
        if target >= mixed {
            return Ok(creamer.added_at);
        }
        let after = cooling_time(mixed, self.ambient_temperature, self.cooling_constant, target)?;
        Ok(creamer.added_at + after)
    }

    /// The closed-form curve as text, one line per piece.
    pub fn equation(&self) -> String {
        let ta = self.ambient_temperature;
        let k = self.cooling_constant;
        match (self.creamer, self.mixed_temperature) {
            (Some(creamer), Some(mixed)) if creamer.added_at > 0.0 => {
                let at = creamer.added_at;
                format!(
                    "T(t) = {ta:.3} + ({:.3} - {ta:.3}) * e^(-{k:.3}t)  (t < {at:.3})\n\
                     T(t) = {ta:.3} + ({mixed:.3} - {ta:.3}) * e^(-{k:.3}(t - {at:.3}))  (t >= {at:.3}, with creamer)",
                    self.initial_temperature
                )
            }
            (_, Some(mixed)) => {
                format!("T(t) = {ta:.3} + ({mixed:.3} - {ta:.3}) * e^(-{k:.3}t)  (with creamer)")
            }
            _ => format!(
                "T(t) = {ta:.3} + ({:.3} - {ta:.3}) * e^(-{k:.3}t)",
                self.initial_temperature
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::predict_temperature;

    fn black() -> Scenario {
        Scenario::new("black", 180.0, 70.0, 0.02).unwrap()
    }

    #[test]
    fn test_rejects_ambient_at_or_above_initial() {
        assert!(Scenario::new("x", 70.0, 70.0, 0.02).unwrap_err().is_invalid_parameter());
        assert!(Scenario::new("x", 60.0, 70.0, 0.02).is_err());
        assert!(Scenario::new("x", 180.0, 70.0, 0.0).is_err());
    }

    #[test]
    fn test_black_coffee_matches_prediction() {
        let s = black();
        for t in [0.0, 1.0, 7.5, 30.0, 120.0] {
            let expected = predict_temperature(180.0, 70.0, 0.02, t).unwrap();
            assert!((s.temperature_at(t).unwrap() - expected).abs() < 1e-12);
        }
        assert!(s.temperature_at(-0.1).is_err());
    }

    #[test]
    fn test_creamer_at_pour_lowers_start() {
        let s = black()
            .with_creamer(Creamer {
                temperature: 38.0,
                mass_fraction: 0.1 / 1.1,
                added_at: 0.0,
            })
            .unwrap();
        let start = s.temperature_at(0.0).unwrap();
        assert!((start - 167.0909).abs() < 1e-3, "got {start:.4}");

        // Afterwards it's an ordinary cooling curve from the mixed temperature
        let expected = predict_temperature(start, 70.0, 0.02, 10.0).unwrap();
        assert!((s.temperature_at(10.0).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_late_creamer_drops_curve_at_addition() {
        let s = black()
            .with_creamer(Creamer {
                temperature: 38.0,
                mass_fraction: 0.1,
                added_at: 5.0,
            })
            .unwrap();
        let just_before = s.temperature_at(4.999).unwrap();
        let at = s.temperature_at(5.0).unwrap();
        assert!(just_before - at > 10.0, "expected a drop, {just_before:.2} -> {at:.2}");
        assert_eq!(s.temperature_at(2.0).unwrap(), black().temperature_at(2.0).unwrap());
    }

    #[test]
    fn test_creamer_fraction_bounds() {
        for fraction in [0.0, 1.0, -0.2, 1.5] {
            let result = black().with_creamer(Creamer {
                temperature: 38.0,
                mass_fraction: fraction,
                added_at: 0.0,
            });
            assert!(result.is_err(), "fraction {fraction} should be rejected");
        }
    }

    #[test]
    fn test_creamer_cannot_chill_below_ambient() {
        let result = black().with_creamer(Creamer {
            temperature: 38.0,
            mass_fraction: 0.9,
            added_at: 0.0,
        });
        assert!(result.unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_time_to_reach_with_creamer() {
        let s = black()
            .with_creamer(Creamer {
                temperature: 38.0,
                mass_fraction: 0.1,
                added_at: 5.0,
            })
            .unwrap();
        let before = s.temperature_at(5.0 - 1e-9).unwrap();
        let mixed = s.mixed_temperature().unwrap();

        // Reached before the creamer goes in
        let early = s.time_to_reach(before + 2.0).unwrap();
        assert!(early < 5.0);

        // Jumped past by the creamer itself
        let jump = s.time_to_reach((before + mixed) / 2.0).unwrap();
        assert!((jump - 5.0).abs() < 1e-12);

        // Reached after mixing; check it lands on the curve
        let late = s.time_to_reach(120.0).unwrap();
        assert!(late > 5.0);
        assert!((s.temperature_at(late).unwrap() - 120.0).abs() < 1e-9);

        assert!(s.time_to_reach(70.0).is_err());
        assert!(s.time_to_reach(f64::NAN).is_err());
        assert_eq!(s.time_to_reach(200.0).unwrap(), 0.0);
    }

    #[test]
    fn test_time_to_reach_target_above_start() {
        // Settled below the target: already cool enough at t = 0
        let mug = Mug::default();
        let cold = Scenario::poured_into("cold", &mug, 165.2, 69.8, 69.8, 0.02).unwrap();
        let start = cold.initial_temperature();
        assert!(start < 160.0, "settled at {start:.2}");
        assert_eq!(cold.time_to_reach(160.0).unwrap(), 0.0);
        assert_eq!(cold.time_to_reach(start).unwrap(), 0.0);

        // Creamer at pour starts the curve at the mixed temperature
        let creamed = black()
            .with_creamer(Creamer {
                temperature: 38.0,
                mass_fraction: 0.1,
                added_at: 0.0,
            })
            .unwrap();
        let mixed = creamed.mixed_temperature().unwrap();
        assert_eq!(creamed.time_to_reach(mixed + 1.0).unwrap(), 0.0);
        assert!(creamed.time_to_reach(mixed - 1.0).unwrap() > 0.0);
    }

    #[test]
    fn test_poured_into_preheated_is_warmer() {
        let mug = Mug::default();
        let cold = Scenario::poured_into("cold", &mug, 165.2, 69.8, 69.8, 0.02).unwrap();
        let hot = Scenario::poured_into("hot", &mug, 165.2, 131.0, 69.8, 0.02).unwrap();
        assert!(hot.initial_temperature() > cold.initial_temperature());
        assert!(hot.initial_temperature() < 165.2);
    }

    #[test]
    fn test_equation_rendering() {
        assert_eq!(
            black().equation(),
            "T(t) = 70.000 + (180.000 - 70.000) * e^(-0.020t)"
        );

        let late = black()
            .with_creamer(Creamer {
                temperature: 38.0,
                mass_fraction: 0.1,
                added_at: 0.5,
            })
            .unwrap();
        let eq = late.equation();
        assert_eq!(eq.lines().count(), 2);
        assert!(eq.contains("(t < 0.500)"));
        assert!(eq.contains("with creamer"));
    }
}
