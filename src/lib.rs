//! Coffee cooling in preheated and room-temperature mugs.
//!
//! Newton's Law of Cooling, applied to coffee poured into a mug that is
//! either at room temperature or preheated, with optional creamer stirred in,
//! and checked against a stopwatch-and-thermometer run.
//!
//! ```
//! use coffee_cooling::physics::{predict_temperature, Scenario};
//!
//! let t = predict_temperature(180.0, 70.0, 0.02, 10.0).unwrap();
//! assert!(t < 180.0 && t > 70.0);
//!
//! let mug = Scenario::new("black", 180.0, 70.0, 0.02).unwrap();
//! assert!(mug.time_to_reach(120.0).unwrap() > 0.0);
//! ```

pub mod config;
pub mod error;
pub mod experiment;
pub mod physics;
pub mod report;

pub use error::{CoolingError, Result};
