use serde::Serialize;

use super::comparison::ScenarioComparison;

/// How two scenarios fare while the coffee is still drinkable.
///
/// Scenario A is the reference (typically the room-temperature mug): both
/// averages are taken over the leading stretch of samples where A stays at or
/// above the threshold, so the numbers describe the same period of time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DrinkableWindow {
    pub threshold: f64,
    pub avg_temp_a: f64,
    pub avg_temp_b: f64,
    /// `avg_temp_b - avg_temp_a`
    pub temp_diff: f64,
    /// When A drops below the threshold; `None` if it never does within the samples.
    pub crossing_time_a: Option<f64>,
    pub crossing_time_b: Option<f64>,
}

/// Compute drinkable-window metrics from sampled comparison rows.
pub fn compute_drinkable_window(comparison: &ScenarioComparison<'_>, threshold: f64) -> DrinkableWindow {
    let series_a = comparison.series_a();
    let series_b = comparison.series_b();

    let avg_temp_a = average_while_above(&series_a, threshold);
    let avg_temp_b = average_during_window(&series_b, &series_a, threshold);
    DrinkableWindow {
        threshold,
        avg_temp_a,
        avg_temp_b,
        temp_diff: avg_temp_b - avg_temp_a,
        crossing_time_a: find_crossing_time_series(&series_a, threshold),
        crossing_time_b: find_crossing_time_series(&series_b, threshold),
    }
}

/// Find when a `(time, value)` series first crosses below `threshold`, linearly interpolated.
///
/// Returns `None` if the series never goes from at-or-above to below the threshold.
pub fn find_crossing_time_series(data: &[(f64, f64)], threshold: f64) -> Option<f64> {
    data.windows(2).find_map(|pair| {
        let (t_prev, v_prev) = pair[0];
        let (t_curr, v_curr) = pair[1];
        (v_prev >= threshold && v_curr < threshold).then(|| {
            let frac = (threshold - v_prev) / (v_curr - v_prev);
            t_prev + frac * (t_curr - t_prev)
        })
    })
}

/// Mean of the leading values that are `>= threshold`; 0.0 if the first is already below.
pub fn average_while_above(data: &[(f64, f64)], threshold: f64) -> f64 {
    let drinkable: Vec<f64> = data
        .iter()
        .map(|&(_, v)| v)
        .take_while(|v| *v >= threshold)
        .collect();
    if drinkable.is_empty() {
        return 0.0;
    }
    drinkable.iter().sum::<f64>() / drinkable.len() as f64
}

/// Average of `data` values over the window where `reference` stays above `threshold`.
///
/// Counts how many leading points in `reference` are >= threshold, then averages
/// the same number of leading points from `data`. Returns 0.0 if the reference
/// window is empty.
pub fn average_during_window(data: &[(f64, f64)], reference: &[(f64, f64)], threshold: f64) -> f64 {
    let ref_count = reference.iter().take_while(|(_, v)| *v >= threshold).count();
    let window: Vec<f64> = data.iter().take(ref_count).map(|&(_, v)| v).collect();
    if window.is_empty() {
        return 0.0;
    }
    window.iter().sum::<f64>() / window.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{compare_scenarios, time_grid, Scenario};

    // --- find_crossing_time_series ---

    #[test]
    fn test_crossing_exact_boundary() {
        // Value hits threshold exactly at a data point
        let data = vec![(0.0, 80.0), (1.0, 60.0), (2.0, 50.0)];
        let t = find_crossing_time_series(&data, 60.0).unwrap();
        assert!((t - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_crossing_interpolation() {
        // Linear drop from 80 to 40 over 1 minute crosses 60 at t=0.5
        let data = vec![(0.0, 80.0), (1.0, 40.0)];
        let t = find_crossing_time_series(&data, 60.0).unwrap();
        assert!((t - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_crossing_never_crosses() {
        let data = vec![(0.0, 90.0), (1.0, 80.0), (2.0, 70.0)];
        assert!(find_crossing_time_series(&data, 60.0).is_none());
    }

    #[test]
    fn test_crossing_starts_below() {
        let data = vec![(0.0, 50.0), (1.0, 40.0)];
        assert!(find_crossing_time_series(&data, 60.0).is_none());
    }

    #[test]
    fn test_crossing_degenerate_input() {
        assert!(find_crossing_time_series(&[], 60.0).is_none());
        assert!(find_crossing_time_series(&[(5.0, 70.0)], 60.0).is_none());
    }

    // --- averages ---

    #[test]
    fn test_avg_while_above_basic() {
        let data = vec![(0.0, 90.0), (1.0, 80.0), (2.0, 70.0), (3.0, 50.0), (4.0, 40.0)];
        let avg = average_while_above(&data, 60.0);
        // Leading segment: 90, 80, 70
        assert!((avg - 80.0).abs() < 1e-10);
    }

    #[test]
    fn test_avg_while_above_first_below() {
        let data = vec![(0.0, 50.0), (1.0, 80.0)];
        assert_eq!(average_while_above(&data, 60.0), 0.0);
        assert_eq!(average_while_above(&[], 60.0), 0.0);
    }

    #[test]
    fn test_avg_during_window_basic() {
        let reference = vec![(0.0, 90.0), (1.0, 80.0), (2.0, 70.0), (3.0, 50.0)];
        let data = vec![(0.0, 95.0), (1.0, 92.0), (2.0, 88.0), (3.0, 75.0)];
        let avg = average_during_window(&data, &reference, 60.0);
        // Reference has 3 leading points above 60: (95+92+88)/3
        assert!((avg - 91.666666).abs() < 0.001);
    }

    #[test]
    fn test_avg_during_window_short_data() {
        // Data shorter than the reference window only averages what's there
        let reference = vec![(0.0, 90.0), (1.0, 80.0), (2.0, 70.0)];
        let data = vec![(0.0, 100.0)];
        assert!((average_during_window(&data, &reference, 60.0) - 100.0).abs() < 1e-10);
        assert_eq!(average_during_window(&data, &[], 60.0), 0.0);
    }

    // --- compute_drinkable_window ---

    #[test]
    fn test_drinkable_window_preheated_wins() {
        let cold = Scenario::new("cold", 152.0, 70.0, 0.02).unwrap();
        let hot = Scenario::new("hot", 160.0, 70.0, 0.02).unwrap();
        let times = time_grid(60.0, 0.5).unwrap();
        let cmp = compare_scenarios(&cold, &hot, &times).unwrap();
        let window = compute_drinkable_window(&cmp, 113.0);

        assert!(window.temp_diff > 0.0);
        let a = window.crossing_time_a.unwrap();
        let b = window.crossing_time_b.unwrap();
        assert!(b > a, "hot ({b:.1}) should stay drinkable longer than cold ({a:.1})");

        // Interpolated crossing lands close to the closed-form answer
        let exact = cold.time_to_reach(113.0).unwrap();
        assert!((a - exact).abs() < 0.05, "interpolated {a:.3} vs exact {exact:.3}");
    }

    #[test]
    fn test_drinkable_window_identical() {
        let s = Scenario::new("s", 150.0, 70.0, 0.02).unwrap();
        let times = time_grid(60.0, 1.0).unwrap();
        let cmp = compare_scenarios(&s, &s, &times).unwrap();
        let window = compute_drinkable_window(&cmp, 113.0);
        assert!(window.temp_diff.abs() < 1e-10);
        assert_eq!(window.crossing_time_a, window.crossing_time_b);
    }
}
