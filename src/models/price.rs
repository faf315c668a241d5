use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Price assumed for a crop with no recorded observations (INR per quintal)
pub const DEFAULT_PRICE: f64 = 2000.0;

/// Index of the reference observation used for the price change, counted from
/// the most recent one
pub const REFERENCE_INDEX: usize = 7;

/// A single recorded market price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub crop_name: String,
    pub price: f64,
    pub recorded_at: DateTime<Utc>,
}

impl PricePoint {
    pub fn new(crop_name: impl Into<String>, price: f64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            crop_name: crop_name.into(),
            price,
            recorded_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceTrend {
    pub current_price: f64,
    pub change_percent: f64,
}

impl Default for PriceTrend {
    fn default() -> Self {
        Self {
            current_price: DEFAULT_PRICE,
            change_percent: 0.0,
        }
    }
}

impl PriceTrend {
    /// Derive the trend from a crop's observations.
    ///
    /// Observations are sorted newest-first (stable, so equal timestamps keep
    /// the order they were supplied in). The reference price is the 8th most
    /// recent observation, or the oldest one when fewer exist.
    pub fn from_observations(points: &[PricePoint]) -> Self {
        if points.is_empty() {
            return Self::default();
        }

        let mut ordered: Vec<&PricePoint> = points.iter().collect();
        ordered.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));

        let current_price = ordered[0].price;
        let reference_price = if ordered.len() > REFERENCE_INDEX {
            ordered[REFERENCE_INDEX].price
        } else {
            ordered[ordered.len() - 1].price
        };

        let change_percent = if reference_price > 0.0 {
            (current_price - reference_price) / reference_price * 100.0
        } else {
            0.0
        };

        Self {
            current_price,
            change_percent,
        }
    }
}

/// A normalized record from the government mandi price feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandiPrice {
    pub crop_name: String,
    pub market_name: String,
    pub district: String,
    pub price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub arrival_date: String,
    pub variety: String,
    pub unit: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn series(prices: &[f64]) -> Vec<PricePoint> {
        let now = Utc::now();
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| PricePoint::new("Onion", *p, now - Duration::days(i as i64)))
            .collect()
    }

    #[test]
    fn empty_history_uses_default() {
        let trend = PriceTrend::from_observations(&[]);
        assert_eq!(trend.current_price, 2000.0);
        assert_eq!(trend.change_percent, 0.0);
    }

    #[test]
    fn single_observation_has_no_change() {
        let trend = PriceTrend::from_observations(&series(&[1500.0]));
        assert_eq!(trend.current_price, 1500.0);
        assert_eq!(trend.change_percent, 0.0);
    }

    #[test]
    fn short_history_uses_oldest_as_reference() {
        let trend = PriceTrend::from_observations(&series(&[1100.0, 1050.0, 1000.0]));
        assert_eq!(trend.current_price, 1100.0);
        assert!((trend.change_percent - 10.0).abs() < 1e-9);
    }

    #[test]
    fn eighth_observation_is_reference_when_available() {
        let prices = [1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 800.0];
        let trend = PriceTrend::from_observations(&series(&prices));
        assert_eq!(trend.change_percent, 0.0);

        let prices = [1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 800.0, 1000.0];
        let trend = PriceTrend::from_observations(&series(&prices));
        assert!((trend.change_percent - 25.0).abs() < 1e-9);
    }

    #[test]
    fn seven_observations_use_oldest() {
        let prices = [1200.0, 1100.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0];
        let trend = PriceTrend::from_observations(&series(&prices));
        assert!((trend.change_percent - 20.0).abs() < 1e-9);
    }

    #[test]
    fn unordered_input_is_sorted_newest_first() {
        let mut points = series(&[1100.0, 1050.0, 1000.0]);
        points.reverse();
        let trend = PriceTrend::from_observations(&points);
        assert_eq!(trend.current_price, 1100.0);
        assert!((trend.change_percent - 10.0).abs() < 1e-9);
    }

    #[test]
    fn zero_reference_price_yields_no_change() {
        let trend = PriceTrend::from_observations(&series(&[1000.0, 0.0]));
        assert_eq!(trend.current_price, 1000.0);
        assert_eq!(trend.change_percent, 0.0);
    }
}
