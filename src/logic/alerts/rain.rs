use super::AlertRule;
use crate::models::{AlertSeverity, WeatherAlert, WeatherReport};

const HIGH_RAIN_CHANCE: f64 = 70.0;
const VERY_HIGH_RAIN_CHANCE: f64 = 85.0;
const WET_TODAY_RAIN_CHANCE: f64 = 80.0;

/// Heavy rain and waterlogging risk
///
/// - Danger: 2+ forecast days at ≥85% rain chance, or it is raining now and
///   today's rain chance is ≥80%
/// - Info: at least one day at ≥70% rain chance
pub struct RainRule;

impl AlertRule for RainRule {
    fn id(&self) -> &'static str {
        "rain"
    }

    fn name(&self) -> &'static str {
        "Heavy Rain"
    }

    fn evaluate(&self, report: &WeatherReport) -> Option<WeatherAlert> {
        let high_days = report.rainy_days(HIGH_RAIN_CHANCE);
        let very_high_days = report.rainy_days(VERY_HIGH_RAIN_CHANCE);
        let wet_today = report.current.is_wet()
            && report
                .forecast
                .first()
                .is_some_and(|d| d.rain_chance_pct >= WET_TODAY_RAIN_CHANCE);

        if very_high_days >= 2 || wet_today {
            return Some(
                WeatherAlert::new(
                    "heavy-rain",
                    AlertSeverity::Danger,
                    "Heavy Rain Alert",
                    format!(
                        "{} days with high rainfall expected. Risk of waterlogging and crop damage.",
                        very_high_days
                    ),
                )
                .with_advice(&[
                    "Clear drainage channels immediately",
                    "Postpone fertilizer and pesticide application",
                    "Harvest ripe crops before rain if possible",
                    "Prop up tall plants to prevent lodging",
                    "Avoid operating heavy machinery on wet soil",
                    "Watch for fungal disease outbreaks after rain",
                ]),
            );
        }

        if high_days >= 1 {
            return Some(
                WeatherAlert::new(
                    "rain-advisory",
                    AlertSeverity::Info,
                    "Rain Expected",
                    format!(
                        "{} day(s) with significant rain chance in the forecast.",
                        high_days
                    ),
                )
                .with_advice(&[
                    "Good opportunity to reduce irrigation",
                    "Complete spraying operations before rain",
                    "Prepare drainage for heavy runoff",
                ]),
            );
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::weather::fixtures::{current, day, report};

    #[test]
    fn two_very_wet_days_is_danger() {
        let r = report(
            current(26.0, 85.0),
            vec![day(0, 28.0, 22.0, 90.0), day(1, 27.0, 21.0, 86.0), day(2, 29.0, 22.0, 20.0)],
        );
        let alert = RainRule.evaluate(&r).unwrap();
        assert_eq!(alert.id, "heavy-rain");
        assert!(alert.description.starts_with("2 days"));
    }

    #[test]
    fn raining_now_with_wet_day_is_danger() {
        let mut now = current(24.0, 90.0);
        now.condition = "Rain".into();
        let r = report(now, vec![day(0, 27.0, 21.0, 80.0)]);
        assert_eq!(RainRule.evaluate(&r).unwrap().severity, AlertSeverity::Danger);
    }

    #[test]
    fn single_rainy_day_is_info() {
        let r = report(current(26.0, 60.0), vec![day(0, 28.0, 22.0, 75.0), day(1, 28.0, 22.0, 10.0)]);
        let alert = RainRule.evaluate(&r).unwrap();
        assert_eq!(alert.id, "rain-advisory");
        assert_eq!(alert.severity, AlertSeverity::Info);
    }

    #[test]
    fn dry_forecast_is_quiet() {
        let r = report(current(26.0, 60.0), vec![day(0, 28.0, 22.0, 30.0)]);
        assert!(RainRule.evaluate(&r).is_none());
    }
}
