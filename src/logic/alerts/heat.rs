use super::AlertRule;
use crate::models::{AlertSeverity, WeatherAlert, WeatherReport};

/// Heat warnings for field work, livestock and crops
///
/// - Danger: temperature ≥40°C or feels-like ≥42°C
/// - Warning: temperature ≥35°C or feels-like ≥38°C
pub struct HeatRule;

impl AlertRule for HeatRule {
    fn id(&self) -> &'static str {
        "heat"
    }

    fn name(&self) -> &'static str {
        "Heat Stress"
    }

    fn evaluate(&self, report: &WeatherReport) -> Option<WeatherAlert> {
        let current = &report.current;
        let temp = current.temperature_c;
        let feels_like = current.feels_like_c;

        if temp >= 40.0 || feels_like >= 42.0 {
            return Some(
                WeatherAlert::new(
                    "heatwave",
                    AlertSeverity::Danger,
                    "Extreme Heat Warning",
                    format!(
                        "Temperature is {:.0}°C (feels like {:.0}°C). Dangerous heat conditions.",
                        temp, feels_like
                    ),
                )
                .with_advice(&[
                    "Avoid outdoor work between 11 AM - 4 PM",
                    "Keep livestock in shaded areas with plenty of water",
                    "Irrigate crops early morning or late evening",
                    "Watch for heat stress in plants - wilting, leaf burn",
                    "Ensure farm workers stay hydrated",
                ]),
            );
        }

        if temp >= 35.0 || feels_like >= 38.0 {
            return Some(
                WeatherAlert::new(
                    "heat-advisory",
                    AlertSeverity::Warning,
                    "Heat Advisory",
                    format!(
                        "High temperature of {:.0}°C. Take precautions during outdoor activities.",
                        temp
                    ),
                )
                .with_advice(&[
                    "Schedule field work for cooler morning hours",
                    "Increase irrigation frequency for sensitive crops",
                    "Provide shade for young seedlings",
                    "Monitor crops for heat stress symptoms",
                ]),
            );
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::weather::fixtures::{current, report};

    #[test]
    fn extreme_heat_is_danger() {
        let alert = HeatRule.evaluate(&report(current(40.0, 30.0), vec![])).unwrap();
        assert_eq!(alert.id, "heatwave");
        assert_eq!(alert.severity, AlertSeverity::Danger);
        assert_eq!(alert.advice.len(), 5);
    }

    #[test]
    fn feels_like_alone_triggers() {
        let mut now = current(34.0, 70.0);
        now.feels_like_c = 42.0;
        let alert = HeatRule.evaluate(&report(now.clone(), vec![])).unwrap();
        assert_eq!(alert.severity, AlertSeverity::Danger);

        now.feels_like_c = 38.0;
        let alert = HeatRule.evaluate(&report(now, vec![])).unwrap();
        assert_eq!(alert.id, "heat-advisory");
    }

    #[test]
    fn below_threshold_is_quiet() {
        assert!(HeatRule.evaluate(&report(current(34.9, 50.0), vec![])).is_none());
    }
}
