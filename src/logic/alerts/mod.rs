pub mod cold;
pub mod engine;
pub mod heat;
pub mod humidity;
pub mod rain;
pub mod wind;

pub use engine::AlertEngine;

use crate::models::{WeatherAlert, WeatherReport};

/// A farm weather hazard check
pub trait AlertRule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Evaluate current conditions and forecast, returning an alert if the
    /// hazard is present
    fn evaluate(&self, report: &WeatherReport) -> Option<WeatherAlert>;
}
