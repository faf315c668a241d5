use super::AlertRule;
use crate::models::{AlertSeverity, WeatherAlert, WeatherReport};

/// Humidity ≥85% favours fungal disease
pub struct HighHumidityRule;

impl AlertRule for HighHumidityRule {
    fn id(&self) -> &'static str {
        "humidity"
    }

    fn name(&self) -> &'static str {
        "High Humidity"
    }

    fn evaluate(&self, report: &WeatherReport) -> Option<WeatherAlert> {
        let humidity = report.current.humidity_pct;
        if humidity < 85.0 {
            return None;
        }

        Some(
            WeatherAlert::new(
                "high-humidity",
                AlertSeverity::Warning,
                "High Humidity Alert",
                format!(
                    "Humidity at {:.0}%. Increased risk of fungal diseases.",
                    humidity
                ),
            )
            .with_advice(&[
                "Scout for fungal infections (powdery mildew, blight)",
                "Increase spacing for air circulation",
                "Apply preventive fungicides if needed",
                "Avoid overhead irrigation",
                "Harvest moisture-sensitive crops promptly",
            ]),
        )
    }
}

/// Humidity ≤25% together with ≥30°C means water stress
pub struct DryConditionsRule;

impl AlertRule for DryConditionsRule {
    fn id(&self) -> &'static str {
        "dry"
    }

    fn name(&self) -> &'static str {
        "Dry & Hot"
    }

    fn evaluate(&self, report: &WeatherReport) -> Option<WeatherAlert> {
        let current = &report.current;
        if current.humidity_pct > 25.0 || current.temperature_c < 30.0 {
            return None;
        }

        Some(
            WeatherAlert::new(
                "dry-conditions",
                AlertSeverity::Warning,
                "Dry & Hot Conditions",
                "Low humidity combined with high temperature increases water stress.",
            )
            .with_advice(&[
                "Increase irrigation frequency",
                "Apply mulch to conserve soil moisture",
                "Watch for spider mites (thrive in dry conditions)",
                "Avoid cultivating soil to prevent moisture loss",
            ]),
        )
    }
}
