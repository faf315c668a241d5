use super::AlertRule;
use crate::models::{AlertSeverity, WeatherAlert, WeatherReport};

/// Frost and cold warnings
///
/// - Danger: any forecast low at or below 0°C
/// - Warning: any forecast low at or below 4°C, or current temperature ≤8°C
pub struct ColdRule;

impl AlertRule for ColdRule {
    fn id(&self) -> &'static str {
        "cold"
    }

    fn name(&self) -> &'static str {
        "Frost & Cold"
    }

    fn evaluate(&self, report: &WeatherReport) -> Option<WeatherAlert> {
        let min_low = report.min_forecast_low();

        if min_low.is_some_and(|low| low <= 0.0) {
            return Some(
                WeatherAlert::new(
                    "frost-danger",
                    AlertSeverity::Danger,
                    "Frost Warning",
                    "Freezing temperatures expected. Severe risk to crops.",
                )
                .with_advice(&[
                    "Cover sensitive crops with frost cloth or plastic sheets",
                    "Harvest mature vegetables immediately",
                    "Apply mulch around plant bases for insulation",
                    "Water plants in late afternoon (wet soil retains heat)",
                    "Delay sowing of new seeds until frost passes",
                ]),
            );
        }

        let frost_risk = min_low.is_some_and(|low| low <= 4.0);
        let cold_now = report.current.temperature_c <= 8.0;

        if frost_risk || cold_now {
            let lowest = min_low.unwrap_or(report.current.temperature_c);
            return Some(
                WeatherAlert::new(
                    "cold-advisory",
                    AlertSeverity::Warning,
                    "Cold Weather Advisory",
                    format!(
                        "Low temperatures expected (down to {:.0}°C). Protect sensitive plants.",
                        lowest
                    ),
                )
                .with_advice(&[
                    "Cover tender plants overnight",
                    "Avoid pruning which stimulates new growth",
                    "Check for chilling injury in tropical crops",
                ]),
            );
        }

        None
    }
}
