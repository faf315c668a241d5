use super::AlertRule;
use crate::models::{AlertSeverity, WeatherAlert, WeatherReport};

/// Strong wind: ≥40 km/h is dangerous for standing crops, ≥25 km/h rules out
/// spraying
pub struct WindRule;

impl AlertRule for WindRule {
    fn id(&self) -> &'static str {
        "wind"
    }

    fn name(&self) -> &'static str {
        "Strong Wind"
    }

    fn evaluate(&self, report: &WeatherReport) -> Option<WeatherAlert> {
        let speed = report.current.wind_speed_kmh;

        if speed >= 40.0 {
            Some(
                WeatherAlert::new(
                    "strong-wind",
                    AlertSeverity::Danger,
                    "Strong Wind Warning",
                    format!(
                        "Wind speeds of {:.0} km/h detected. Risk of crop damage.",
                        speed
                    ),
                )
                .with_advice(&[
                    "Secure shade nets and polyhouse covers",
                    "Stake tall crops like maize, sugarcane, banana",
                    "Postpone pesticide spraying (drift risk)",
                    "Avoid working near trees",
                    "Check greenhouse structures for damage",
                ]),
            )
        } else if speed >= 25.0 {
            Some(
                WeatherAlert::new(
                    "wind-advisory",
                    AlertSeverity::Warning,
                    "Windy Conditions",
                    format!(
                        "Wind speed of {:.0} km/h. Take precautions with spraying.",
                        speed
                    ),
                )
                .with_advice(&[
                    "Avoid pesticide/herbicide spraying today",
                    "Secure loose coverings on stored materials",
                    "Support young transplants",
                ]),
            )
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::weather::fixtures::{current, report};

    fn windy(speed: f64) -> WeatherReport {
        let mut now = current(25.0, 50.0);
        now.wind_speed_kmh = speed;
        report(now, vec![])
    }

    #[test]
    fn wind_thresholds() {
        assert_eq!(WindRule.evaluate(&windy(40.0)).unwrap().id, "strong-wind");
        assert_eq!(WindRule.evaluate(&windy(25.0)).unwrap().id, "wind-advisory");
        assert!(WindRule.evaluate(&windy(24.0)).is_none());
    }
}
