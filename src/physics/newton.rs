use crate::error::{ensure_finite, ensure_non_negative, ensure_positive, CoolingError, Result};

/// Predicted temperature after `elapsed_time` under Newton's Law of Cooling.
///
/// # Physics Model
///
/// The rate of temperature change is proportional to the difference between
/// the coffee and its surroundings:
///
/// ```text
/// dT/dt = -k × (T - T_ambient)
/// ```
///
/// which has the closed-form solution
///
/// ```text
/// T(t) = T_ambient + (T_0 - T_ambient) × e^(-k t)
/// ```
///
/// Time units are whatever `cooling_constant` is expressed in (the CLI uses
/// minutes). Temperatures can be in any linear scale; the result is in the
/// same scale as the inputs.
///
/// Fails with [`CoolingError::InvalidParameter`] when `cooling_constant <= 0`,
/// `elapsed_time < 0`, or any input is not finite. A starting temperature at
/// or below ambient is accepted here (the curve then rises toward ambient);
/// [`Scenario`](super::Scenario) is where "coffee only cools" is enforced.
pub fn predict_temperature(
    initial_temperature: f64,
    ambient_temperature: f64,
    cooling_constant: f64,
    elapsed_time: f64,
) -> Result<f64> {
    ensure_finite("initial_temperature", initial_temperature)?;
    ensure_finite("ambient_temperature", ambient_temperature)?;
    ensure_positive("cooling_constant", cooling_constant)?;
    ensure_non_negative("elapsed_time", elapsed_time)?;

    Ok(decay(initial_temperature, ambient_temperature, cooling_constant, elapsed_time))
}

/// Unchecked closed form, for callers that validated their inputs already.
#[inline]
pub(crate) fn decay(initial: f64, ambient: f64, k: f64, t: f64) -> f64 {
    ambient + (initial - ambient) * (-k * t).exp()
}

/// Time for a body cooling from `initial_temperature` to reach `target_temperature`.
///
/// Inverts the cooling law:
///
/// ```text
/// t = -ln((T_target - T_ambient) / (T_0 - T_ambient)) / k
/// ```
///
/// The target must lie in `(ambient, initial]`: a body never gets below its
/// surroundings, so anything at or under ambient is unreachable.
pub fn cooling_time(
    initial_temperature: f64,
    ambient_temperature: f64,
    cooling_constant: f64,
    target_temperature: f64,
) -> Result<f64> {
    ensure_finite("initial_temperature", initial_temperature)?;
    ensure_finite("ambient_temperature", ambient_temperature)?;
    ensure_finite("target_temperature", target_temperature)?;
    ensure_positive("cooling_constant", cooling_constant)?;

    if target_temperature <= ambient_temperature {
        return Err(CoolingError::invalid(
            "target_temperature",
            target_temperature,
            "must be above ambient temperature to be reachable",
        ));
    }
    if target_temperature > initial_temperature {
        return Err(CoolingError::invalid(
            "target_temperature",
            target_temperature,
            "must not exceed the starting temperature",
        ));
    }

    let ratio = (target_temperature - ambient_temperature) / (initial_temperature - ambient_temperature);
    Ok(-ratio.ln() / cooling_constant)
}

/// `count` evenly spaced values from `start` to `end`, both ends included.
///
/// A `count` of 1 yields just `start`; 0 yields an empty grid.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Largest grid [`time_grid`] will build.
pub const MAX_GRID_POINTS: usize = 1_000_000;

/// Time grid from 0 to `duration` in increments of `step`, always ending at `duration`.
///
/// Fails when the grid would hold more than [`MAX_GRID_POINTS`] points.
pub fn time_grid(duration: f64, step: f64) -> Result<Vec<f64>> {
    ensure_non_negative("duration", duration)?;
    ensure_positive("step", step)?;

    let intervals = (duration / step).ceil();
    if !(intervals < MAX_GRID_POINTS as f64) {
        return Err(CoolingError::invalid(
            "step",
            step,
            "too small for the duration; the time grid would be too large",
        ));
    }

    // Multiples of `step` can round onto `duration` itself; keep it only once.
    let mut grid: Vec<f64> = (0..intervals as usize)
        .map(|i| i as f64 * step)
        .take_while(|&t| t < duration)
        .collect();
    grid.push(duration);
    Ok(grid)
}
