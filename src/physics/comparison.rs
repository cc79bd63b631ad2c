use serde::Serialize;

use super::scenario::{MeasurementPoint, Scenario};
use crate::error::{ensure_finite, ensure_non_negative, Result};

/// Both scenarios evaluated at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub time: f64,
    pub temp_a: f64,
    pub temp_b: f64,
}

impl ComparisonRow {
    /// `temp_a - temp_b`
    pub fn difference(&self) -> f64 {
        self.temp_a - self.temp_b
    }
}

/// Side-by-side predictions for two scenarios over a fixed set of time points.
///
/// Nothing is computed until iterated, and iteration can be repeated: each
/// call to [`iter`](Self::iter) starts again from the first time point.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioComparison<'a> {
    scenario_a: &'a Scenario,
    scenario_b: &'a Scenario,
    time_points: &'a [f64],
}

impl<'a> ScenarioComparison<'a> {
    pub fn scenario_a(&self) -> &'a Scenario {
        self.scenario_a
    }

    pub fn scenario_b(&self) -> &'a Scenario {
        self.scenario_b
    }

    pub fn len(&self) -> usize {
        self.time_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_points.is_empty()
    }

    pub fn iter(&self) -> ComparisonIter<'a> {
        ComparisonIter {
            scenario_a: self.scenario_a,
            scenario_b: self.scenario_b,
            times: self.time_points.iter(),
        }
    }

    /// `(time, temp_a)` pairs, the shape the drinkable-window metrics take.
    pub fn series_a(&self) -> Vec<(f64, f64)> {
        self.iter().map(|row| (row.time, row.temp_a)).collect()
    }

    /// `(time, temp_b)` pairs.
    pub fn series_b(&self) -> Vec<(f64, f64)> {
        self.iter().map(|row| (row.time, row.temp_b)).collect()
    }
}

impl<'a> IntoIterator for ScenarioComparison<'a> {
    type Item = ComparisonRow;
    type IntoIter = ComparisonIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &ScenarioComparison<'a> {
    type Item = ComparisonRow;
    type IntoIter = ComparisonIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator behind [`ScenarioComparison`].
#[derive(Debug, Clone)]
pub struct ComparisonIter<'a> {
    scenario_a: &'a Scenario,
    scenario_b: &'a Scenario,
    times: std::slice::Iter<'a, f64>,
}

impl Iterator for ComparisonIter<'_> {
    type Item = ComparisonRow;

    fn next(&mut self) -> Option<Self::Item> {
        let &time = self.times.next()?;
        Some(ComparisonRow {
            time,
            temp_a: self.scenario_a.temperature_at_unchecked(time),
            temp_b: self.scenario_b.temperature_at_unchecked(time),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.times.size_hint()
    }
}

impl ExactSizeIterator for ComparisonIter<'_> {}

/// Compare two scenarios at each of `time_points`, in the order given.
///
/// Every time point is checked up front (finite, not negative) so that
/// iterating the result cannot fail.
pub fn compare_scenarios<'a>(
    scenario_a: &'a Scenario,
    scenario_b: &'a Scenario,
    time_points: &'a [f64],
) -> Result<ScenarioComparison<'a>> {
    for &t in time_points {
        ensure_non_negative("elapsed_time", t)?;
    }
    Ok(ScenarioComparison {
        scenario_a,
        scenario_b,
        time_points,
    })
}

/// A measurement next to what the model predicted for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValidationRow {
    pub time: f64,
    pub predicted: f64,
    pub observed: f64,
    /// `observed - predicted`: positive when the real coffee ran warmer.
    pub residual: f64,
}

/// Check a scenario's fixed parameters against stopwatch readings.
///
/// No fitting happens here; the scenario's cooling constant is taken as
/// given and each reading is compared directly.
pub fn validate_against_measurements(
    scenario: &Scenario,
    measurements: &[MeasurementPoint],
) -> Result<Vec<ValidationRow>> {
    measurements
        .iter()
        .map(|m| {
            let observed = ensure_finite("observed_temperature", m.observed_temperature)?;
            let predicted = scenario.temperature_at(m.elapsed_time)?;
            Ok(ValidationRow {
                time: m.elapsed_time,
                predicted,
                observed,
                residual: observed - predicted,
            })
        })
        .collect()
}

/// Descriptive statistics of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResidualSummary {
    pub count: usize,
    pub mean: f64,
    pub mean_absolute: f64,
    pub root_mean_square: f64,
    /// Row with the largest absolute residual
    pub worst: ValidationRow,
}

/// Summarize residuals. `None` when there are no rows.
pub fn summarize_residuals(rows: &[ValidationRow]) -> Option<ResidualSummary> {
    let worst = *rows
        .iter()
        .max_by(|a, b| a.residual.abs().total_cmp(&b.residual.abs()))?;
    let n = rows.len() as f64;
    let sum: f64 = rows.iter().map(|r| r.residual).sum();
    let sum_abs: f64 = rows.iter().map(|r| r.residual.abs()).sum();
    let sum_sq: f64 = rows.iter().map(|r| r.residual * r.residual).sum();

    Some(ResidualSummary {
        count: rows.len(),
        mean: sum / n,
        mean_absolute: sum_abs / n,
        root_mean_square: (sum_sq / n).sqrt(),
        worst,
    })
}
