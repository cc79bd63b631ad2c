mod comparison;
mod materials;
mod metrics;
mod mixing;
mod newton;
mod scenario;

pub use comparison::{
    compare_scenarios, summarize_residuals, validate_against_measurements, ComparisonIter,
    ComparisonRow, ResidualSummary, ScenarioComparison, ValidationRow,
};
pub use materials::{Mug, MugMaterial};
pub use metrics::{
    average_during_window, average_while_above, compute_drinkable_window,
    find_crossing_time_series, DrinkableWindow,
};
pub use mixing::{mix_creamer, settle_into_mug};
pub use newton::{cooling_time, linspace, predict_temperature, time_grid, MAX_GRID_POINTS};
pub use scenario::{Creamer, MeasurementPoint, Scenario};
