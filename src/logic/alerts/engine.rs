use super::{
    cold::ColdRule, heat::HeatRule, humidity::DryConditionsRule, humidity::HighHumidityRule,
    rain::RainRule, wind::WindRule, AlertRule,
};
use crate::models::{WeatherAlert, WeatherReport};

pub struct AlertEngine {
    rules: Vec<Box<dyn AlertRule>>,
}

impl AlertEngine {
    pub fn new() -> Self {
        let rules: Vec<Box<dyn AlertRule>> = vec![
            Box::new(HeatRule),
            Box::new(ColdRule),
            Box::new(RainRule),
            Box::new(WindRule),
            Box::new(HighHumidityRule),
            Box::new(DryConditionsRule),
        ];

        Self { rules }
    }

    pub fn evaluate(&self, report: &WeatherReport) -> Vec<WeatherAlert> {
        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(report))
            .collect()
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::weather::fixtures::{current, day, report};

    #[test]
    fn mild_weather_raises_nothing() {
        let engine = AlertEngine::new();
        let r = report(current(26.0, 55.0), vec![day(0, 30.0, 18.0, 10.0)]);
        assert!(engine.evaluate(&r).is_empty());
    }

    #[test]
    fn alerts_follow_rule_order() {
        let engine = AlertEngine::new();
        let mut now = current(41.0, 20.0);
        now.wind_speed_kmh = 45.0;
        let r = report(now, vec![day(0, 43.0, 28.0, 0.0)]);

        let ids: Vec<_> = engine.evaluate(&r).into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["heatwave", "strong-wind", "dry-conditions"]);
    }

    #[test]
    fn rules_have_unique_ids() {
        let rules = AlertEngine::new().list_rules();
        let mut ids: Vec<_> = rules.iter().map(|(id, _)| *id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), rules.len());
    }
}
