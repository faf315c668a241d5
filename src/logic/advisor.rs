//! Crop advisory scoring.
//!
//! Combines current weather, the calendar month and recent price movement
//! into a ranked list of crop recommendations. Everything here is a pure
//! function of its inputs: no I/O, no clock, no shared state.

use crate::models::{
    CropProfile, CropRecommendation, PricePoint, PriceTrend, ReasonCode, Tier, WeatherSnapshot,
};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

/// Maximum number of recommendations returned by [`rank`]
pub const MAX_RECOMMENDATIONS: usize = 5;

const TEMPERATURE_PENALTY_PER_DEGREE: f64 = 5.0;
const HUMIDITY_PENALTY_PER_POINT: f64 = 0.5;
const SOWING_SEASON_BONUS: f64 = 15.0;
const DEMAND_CHANGE_THRESHOLD_PCT: f64 = 5.0;
const IDEAL_WEATHER_SCORE: f64 = 70.0;
const POOR_WEATHER_SCORE: f64 = 50.0;

/// Weather suitability of a crop, in [0, 100].
///
/// Out-of-band temperature and humidity distance are subtracted from 100 and
/// the result clamped before the sowing-season bonus is added (and capped).
pub fn weather_score(weather: &WeatherSnapshot, crop: &CropProfile, month: u32) -> f64 {
    let (min_temp, max_temp) = crop.ideal_temp_c;
    let mut score = 100.0;

    if weather.temperature_c < min_temp {
        score -= (min_temp - weather.temperature_c) * TEMPERATURE_PENALTY_PER_DEGREE;
    }
    if weather.temperature_c > max_temp {
        score -= (weather.temperature_c - max_temp) * TEMPERATURE_PENALTY_PER_DEGREE;
    }
    score -= (weather.humidity_pct - crop.ideal_humidity_pct).abs() * HUMIDITY_PENALTY_PER_POINT;
    score = score.clamp(0.0, 100.0);

    if crop.is_sowing_month(month) {
        score = (score + SOWING_SEASON_BONUS).min(100.0);
    }

    score
}

pub fn market_demand(change_percent: f64) -> Tier {
    if change_percent > DEMAND_CHANGE_THRESHOLD_PCT {
        Tier::High
    } else if change_percent < -DEMAND_CHANGE_THRESHOLD_PCT {
        Tier::Low
    } else {
        Tier::Medium
    }
}

pub fn profit_potential(weather_score: f64, demand: Tier) -> Tier {
    if weather_score > IDEAL_WEATHER_SCORE && demand == Tier::High {
        Tier::High
    } else if weather_score < POOR_WEATHER_SCORE || demand == Tier::Low {
        Tier::Low
    } else {
        Tier::Medium
    }
}

fn reasons(weather_score: f64, in_sowing_season: bool, demand: Tier) -> Vec<ReasonCode> {
    let mut reasons = Vec::new();
    if weather_score > IDEAL_WEATHER_SCORE {
        reasons.push(ReasonCode::IdealWeather);
    }
    if in_sowing_season {
        reasons.push(ReasonCode::SowingSeason);
    }
    if demand == Tier::High {
        reasons.push(ReasonCode::RisingPrices);
    }
    reasons
}

/// Score a single crop
pub fn recommend(
    weather: &WeatherSnapshot,
    month: u32,
    crop: &CropProfile,
    observations: &[PricePoint],
) -> CropRecommendation {
    let score = weather_score(weather, crop, month);
    let trend = PriceTrend::from_observations(observations);
    let demand = market_demand(trend.change_percent);

    CropRecommendation {
        crop: crop.canonical_name.clone(),
        localized_names: crop.localized_names.clone(),
        weather_score: score,
        market_demand: demand,
        profit_potential: profit_potential(score, demand),
        best_sowing_time: crop.sowing_time_label(),
        current_price: trend.current_price,
        price_change_percent: trend.change_percent,
        reasons: reasons(score, crop.is_sowing_month(month), demand),
    }
}

/// Rank the catalog for the given conditions.
///
/// Only catalog crops are scored; price history for unknown crops is ignored
/// and crops without history get the default trend. The result is sorted by
/// weather score plus demand bonus, descending, with catalog order kept for
/// equal scores, and capped at [`MAX_RECOMMENDATIONS`].
pub fn rank(
    weather: &WeatherSnapshot,
    reference_date: NaiveDate,
    catalog: &[CropProfile],
    price_history: &HashMap<String, Vec<PricePoint>>,
) -> Vec<CropRecommendation> {
    let month = reference_date.month();

    let mut recommendations: Vec<CropRecommendation> = catalog
        .iter()
        .map(|crop| {
            let observations = price_history
                .get(&crop.canonical_name)
                .map(Vec::as_slice)
                .unwrap_or_default();
            recommend(weather, month, crop, observations)
        })
        .collect();

    // sort_by is stable
    recommendations.sort_by(|a, b| b.combined_score().total_cmp(&a.combined_score()));
    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

/// A crop catalog bound to the advisory algorithm
pub struct CropAdvisor {
    catalog: Vec<CropProfile>,
}

impl CropAdvisor {
    pub fn new(catalog: Vec<CropProfile>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &[CropProfile] {
        &self.catalog
    }

    pub fn crop_names(&self) -> Vec<&str> {
        self.catalog
            .iter()
            .map(|c| c.canonical_name.as_str())
            .collect()
    }

    pub fn rank(
        &self,
        weather: &WeatherSnapshot,
        reference_date: NaiveDate,
        price_history: &HashMap<String, Vec<PricePoint>>,
    ) -> Vec<CropRecommendation> {
        rank(weather, reference_date, &self.catalog, price_history)
    }
}

impl Default for CropAdvisor {
    fn default() -> Self {
        Self::new(super::catalog::default_catalog())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::catalog::default_catalog;
    use crate::models::LocalizedNames;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn wheat() -> CropProfile {
        CropProfile::new(LocalizedNames::new("Wheat", "गेहूं", "गहू"), (10.0, 25.0), 50.0)
            .with_sowing_months(&[10, 11, 12])
    }

    fn crop(name: &str, temp: (f64, f64), humidity: f64, months: &[u32]) -> CropProfile {
        CropProfile::new(LocalizedNames::new(name, name, name), temp, humidity)
            .with_sowing_months(months)
    }

    fn date(month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, 15).unwrap()
    }

    fn history(crop: &str, prices: &[f64]) -> Vec<PricePoint> {
        let newest = Utc.with_ymd_and_hms(2024, 11, 15, 6, 0, 0).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| PricePoint::new(crop, *p, newest - Duration::days(i as i64)))
            .collect()
    }

    #[test]
    fn wheat_in_november_scenario() {
        let weather = WeatherSnapshot::new(15.0, 50.0);
        let recs = rank(&weather, date(11), &[wheat()], &HashMap::new());

        assert_eq!(recs.len(), 1);
        let rec = &recs[0];
        assert_eq!(rec.crop, "Wheat");
        assert_eq!(rec.weather_score, 100.0);
        assert_eq!(rec.market_demand, Tier::Medium);
        assert_eq!(rec.profit_potential, Tier::Medium);
        assert_eq!(rec.current_price, 2000.0);
        assert_eq!(rec.price_change_percent, 0.0);
        assert_eq!(rec.best_sowing_time, "Oct, Nov, Dec");
        assert_eq!(
            rec.reasons,
            vec![ReasonCode::IdealWeather, ReasonCode::SowingSeason]
        );
    }

    #[test]
    fn temperature_penalties() {
        let crop = wheat();
        // 5 degrees below band: -25
        assert_eq!(weather_score(&WeatherSnapshot::new(5.0, 50.0), &crop, 6), 75.0);
        // 4 degrees above band: -20
        assert_eq!(weather_score(&WeatherSnapshot::new(29.0, 50.0), &crop, 6), 80.0);
        // Band edges are not penalised
        assert_eq!(weather_score(&WeatherSnapshot::new(10.0, 50.0), &crop, 6), 100.0);
        assert_eq!(weather_score(&WeatherSnapshot::new(25.0, 50.0), &crop, 6), 100.0);
    }

    #[test]
    fn humidity_penalty_is_symmetric() {
        let crop = wheat();
        assert_eq!(weather_score(&WeatherSnapshot::new(15.0, 70.0), &crop, 6), 90.0);
        assert_eq!(weather_score(&WeatherSnapshot::new(15.0, 30.0), &crop, 6), 90.0);
    }

    #[test]
    fn score_clamped_before_sowing_bonus() {
        let crop = wheat();
        // 40 degrees: -75, humidity 0: -25 -> 0 before bonus
        let hot_dry = WeatherSnapshot::new(40.0, 0.0);
        assert_eq!(weather_score(&hot_dry, &crop, 6), 0.0);
        assert_eq!(weather_score(&hot_dry, &crop, 11), 15.0);

        // Far below zero still clamps to 0 before the bonus is applied
        let frozen = WeatherSnapshot::new(-30.0, 100.0);
        assert_eq!(weather_score(&frozen, &crop, 11), 15.0);
    }

    #[test]
    fn sowing_bonus_from_sixty() {
        let crop = wheat();
        // 6 degrees below band (-30) and 20 points of humidity (-10) gives 60
        let weather = WeatherSnapshot::new(4.0, 70.0);
        assert_eq!(weather_score(&weather, &crop, 6), 60.0);
        assert_eq!(weather_score(&weather, &crop, 11), 75.0);
    }

    #[test]
    fn sowing_bonus_capped_at_hundred() {
        let crop = wheat();
        let weather = WeatherSnapshot::new(20.0, 60.0);
        assert_eq!(weather_score(&weather, &crop, 6), 95.0);
        assert_eq!(weather_score(&weather, &crop, 12), 100.0);
    }

    #[test]
    fn demand_tiers() {
        assert_eq!(market_demand(6.0), Tier::High);
        assert_eq!(market_demand(-6.0), Tier::Low);
        assert_eq!(market_demand(0.0), Tier::Medium);
        // Thresholds are exclusive
        assert_eq!(market_demand(5.0), Tier::Medium);
        assert_eq!(market_demand(-5.0), Tier::Medium);
    }

    #[test]
    fn profit_tiers() {
        assert_eq!(profit_potential(71.0, Tier::High), Tier::High);
        assert_eq!(profit_potential(70.0, Tier::High), Tier::Medium);
        assert_eq!(profit_potential(49.0, Tier::High), Tier::Low);
        assert_eq!(profit_potential(95.0, Tier::Low), Tier::Low);
        assert_eq!(profit_potential(95.0, Tier::Medium), Tier::Medium);
        assert_eq!(profit_potential(50.0, Tier::Medium), Tier::Medium);
    }

    #[test]
    fn price_history_drives_demand() {
        let weather = WeatherSnapshot::new(15.0, 50.0);
        let flat = [1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 800.0];
        let rising = [1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 800.0, 1000.0];

        let mut prices = HashMap::new();
        prices.insert("Wheat".to_string(), history("Wheat", &flat));
        let rec = &rank(&weather, date(6), &[wheat()], &prices)[0];
        assert_eq!(rec.price_change_percent, 0.0);
        assert_eq!(rec.market_demand, Tier::Medium);

        prices.insert("Wheat".to_string(), history("Wheat", &rising));
        let rec = &rank(&weather, date(6), &[wheat()], &prices)[0];
        assert!((rec.price_change_percent - 25.0).abs() < 1e-9);
        assert_eq!(rec.current_price, 1000.0);
        assert_eq!(rec.market_demand, Tier::High);
        assert_eq!(rec.profit_potential, Tier::High);
        assert_eq!(
            rec.reasons,
            vec![ReasonCode::IdealWeather, ReasonCode::RisingPrices]
        );
    }

    #[test]
    fn falling_prices_mark_low_demand() {
        let weather = WeatherSnapshot::new(15.0, 50.0);
        let mut prices = HashMap::new();
        prices.insert("Wheat".to_string(), history("Wheat", &[900.0, 1000.0]));
        let rec = &rank(&weather, date(6), &[wheat()], &prices)[0];
        assert_eq!(rec.market_demand, Tier::Low);
        assert_eq!(rec.profit_potential, Tier::Low);
        assert_eq!(rec.reasons, vec![ReasonCode::IdealWeather]);
    }

    #[test]
    fn unknown_crops_in_history_are_ignored() {
        let weather = WeatherSnapshot::new(15.0, 50.0);
        let mut prices = HashMap::new();
        prices.insert("Saffron".to_string(), history("Saffron", &[90000.0, 10.0]));
        let recs = rank(&weather, date(6), &[wheat()], &prices);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].crop, "Wheat");
        assert_eq!(recs[0].current_price, 2000.0);
    }

    #[test]
    fn empty_history_list_treated_as_absent() {
        let weather = WeatherSnapshot::new(15.0, 50.0);
        let mut prices = HashMap::new();
        prices.insert("Wheat".to_string(), Vec::new());
        let rec = &rank(&weather, date(6), &[wheat()], &prices)[0];
        assert_eq!(rec.current_price, 2000.0);
        assert_eq!(rec.price_change_percent, 0.0);
    }

    #[test]
    fn empty_catalog_yields_nothing() {
        let weather = WeatherSnapshot::new(15.0, 50.0);
        assert!(rank(&weather, date(6), &[], &HashMap::new()).is_empty());
    }

    #[test]
    fn output_capped_at_five() {
        let weather = WeatherSnapshot::new(25.0, 55.0);
        let recs = rank(&weather, date(7), &default_catalog(), &HashMap::new());
        assert_eq!(recs.len(), MAX_RECOMMENDATIONS);
    }

    #[test]
    fn ties_keep_catalog_order() {
        let weather = WeatherSnapshot::new(20.0, 50.0);
        let catalog = vec![
            crop("A", (10.0, 30.0), 50.0, &[1]),
            crop("B", (10.0, 30.0), 50.0, &[1]),
            crop("C", (10.0, 30.0), 50.0, &[1]),
        ];
        let names: Vec<_> = rank(&weather, date(6), &catalog, &HashMap::new())
            .into_iter()
            .map(|r| r.crop)
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn demand_bonus_can_outrank_weather() {
        let weather = WeatherSnapshot::new(20.0, 50.0);
        let catalog = vec![
            crop("Steady", (10.0, 30.0), 50.0, &[]),
            crop("Hot", (10.0, 30.0), 70.0, &[]),
        ];
        // Steady: 100 + 0 (falling), Hot: 90 + 30 (rising)
        let mut prices = HashMap::new();
        prices.insert("Steady".to_string(), history("Steady", &[900.0, 1000.0]));
        prices.insert("Hot".to_string(), history("Hot", &[1100.0, 1000.0]));

        let recs = rank(&weather, date(6), &catalog, &prices);
        assert_eq!(recs[0].crop, "Hot");
        assert_eq!(recs[0].combined_score(), 120.0);
        assert_eq!(recs[1].crop, "Steady");
        assert_eq!(recs[1].combined_score(), 100.0);
    }

    #[test]
    fn advisor_wraps_catalog() {
        let advisor = CropAdvisor::default();
        assert_eq!(advisor.catalog().len(), 10);
        assert!(advisor.crop_names().contains(&"Maize"));

        let weather = WeatherSnapshot::new(15.0, 50.0);
        let recs = advisor.rank(&weather, date(11), &HashMap::new());
        assert_eq!(recs[0].crop, "Wheat");
    }

    fn arb_history() -> impl Strategy<Value = HashMap<String, Vec<PricePoint>>> {
        let names: Vec<String> = default_catalog()
            .into_iter()
            .map(|c| c.canonical_name)
            .collect();
        prop::collection::vec(prop::collection::vec(100.0f64..10000.0, 0..12), names.len())
            .prop_map(move |series| {
                names
                    .iter()
                    .zip(series)
                    .map(|(name, prices)| (name.clone(), history(name, &prices)))
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn rank_is_deterministic(
            temp in -20.0f64..50.0,
            humidity in 0.0f64..100.0,
            month in 1u32..=12,
            prices in arb_history(),
        ) {
            let weather = WeatherSnapshot::new(temp, humidity);
            let catalog = default_catalog();
            let first = rank(&weather, date(month), &catalog, &prices);
            let second = rank(&weather, date(month), &catalog, &prices);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn scores_bounded_sorted_and_capped(
            temp in -20.0f64..50.0,
            humidity in 0.0f64..100.0,
            month in 1u32..=12,
            size in 0usize..=10,
            prices in arb_history(),
        ) {
            let weather = WeatherSnapshot::new(temp, humidity);
            let catalog: Vec<_> = default_catalog().into_iter().take(size).collect();
            let recs = rank(&weather, date(month), &catalog, &prices);

            prop_assert_eq!(recs.len(), size.min(MAX_RECOMMENDATIONS));
            for rec in &recs {
                prop_assert!((0.0..=100.0).contains(&rec.weather_score));
            }
            for pair in recs.windows(2) {
                prop_assert!(pair[0].combined_score() >= pair[1].combined_score());
            }
        }

        #[test]
        fn missing_history_uses_default_trend(
            temp in -20.0f64..50.0,
            humidity in 0.0f64..100.0,
        ) {
            let weather = WeatherSnapshot::new(temp, humidity);
            let recs = rank(&weather, date(3), &[wheat()], &HashMap::new());
            prop_assert_eq!(recs[0].current_price, 2000.0);
            prop_assert_eq!(recs[0].price_change_percent, 0.0);
        }
    }
}
