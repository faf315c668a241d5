use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The two weather inputs consumed by the crop advisor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub humidity_pct: f64,
}

impl WeatherSnapshot {
    pub fn new(temperature_c: f64, humidity_pct: f64) -> Self {
        Self {
            temperature_c,
            humidity_pct,
        }
    }
}

/// Current conditions for a city, in metric units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    pub wind_speed_kmh: f64,
    pub visibility_km: f64,
    pub condition: String,
    pub description: String,
    pub observed_at: DateTime<Utc>,
}

impl CurrentWeather {
    pub fn snapshot(&self) -> WeatherSnapshot {
        WeatherSnapshot::new(self.temperature_c, self.humidity_pct)
    }

    /// True if the reported condition mentions rain or a storm
    pub fn is_wet(&self) -> bool {
        let condition = self.condition.to_lowercase();
        condition.contains("rain") || condition.contains("storm") || condition.contains("thunder")
    }
}

/// Aggregated daily forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub high_c: f64,
    pub low_c: f64,
    pub condition: String,
    /// Highest probability of precipitation during the day, 0-100
    pub rain_chance_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentWeather,
    pub forecast: Vec<DailyForecast>,
}

impl WeatherReport {
    pub fn min_forecast_low(&self) -> Option<f64> {
        self.forecast
            .iter()
            .map(|d| d.low_c)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Number of forecast days whose rain chance meets the threshold
    pub fn rainy_days(&self, min_chance_pct: f64) -> usize {
        self.forecast
            .iter()
            .filter(|d| d.rain_chance_pct >= min_chance_pct)
            .count()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn current(temperature_c: f64, humidity_pct: f64) -> CurrentWeather {
        CurrentWeather {
            city: "Pune".into(),
            country: "IN".into(),
            temperature_c,
            feels_like_c: temperature_c,
            humidity_pct,
            pressure_hpa: 1012.0,
            wind_speed_kmh: 10.0,
            visibility_km: 10.0,
            condition: "Clear".into(),
            description: "clear sky".into(),
            observed_at: Utc::now(),
        }
    }

    pub fn day(offset: i64, high_c: f64, low_c: f64, rain_chance_pct: f64) -> DailyForecast {
        DailyForecast {
            date: NaiveDate::from_ymd_opt(2024, 11, 1).unwrap() + chrono::Duration::days(offset),
            high_c,
            low_c,
            condition: "Clouds".into(),
            rain_chance_pct,
        }
    }

    pub fn report(current: CurrentWeather, forecast: Vec<DailyForecast>) -> WeatherReport {
        WeatherReport { current, forecast }
    }
}
