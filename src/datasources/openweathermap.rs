use crate::config::OpenWeatherMapConfig;
use crate::datasources::WeatherSource;
use crate::error::{AdvisorError, Result};
use crate::models::{CurrentWeather, DailyForecast, WeatherReport};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const MAX_FORECAST_DAYS: usize = 7;
const DEFAULT_VISIBILITY_M: f64 = 10_000.0;

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    config: OpenWeatherMapConfig,
    country_code: String,
}

// OpenWeatherMap API response structures
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    name: String,
    main: OwmMain,
    weather: Vec<OwmWeather>,
    wind: OwmWind,
    #[serde(default)]
    visibility: Option<f64>,
    sys: OwmSys,
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    main: OwmMain,
    weather: Vec<OwmWeather>,
    #[serde(default)]
    pop: f64, // probability of precipitation, 0..1
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    humidity: f64,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64, // m/s in metric units
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    #[serde(default)]
    country: String,
}

impl OpenWeatherMapClient {
    pub fn new(config: OpenWeatherMapConfig, country_code: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            country_code: country_code.into(),
        }
    }

    fn url(&self, endpoint: &str, city: &str) -> Result<reqwest::Url> {
        let location = format!("{},{}", city, self.country_code);
        reqwest::Url::parse_with_params(
            &format!("{}/{}", API_BASE_URL, endpoint),
            &[
                ("q", location.as_str()),
                ("appid", self.config.api_key.as_str()),
                ("units", "metric"),
            ],
        )
        .map_err(|e| AdvisorError::Config(format!("Invalid OpenWeatherMap URL: {}", e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, city: &str) -> Result<T> {
        let url = self.url(endpoint, city)?;

        let response =
            self.client.get(url).send().await.map_err(|e| {
                AdvisorError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AdvisorError::WeatherNotAvailable(city.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::DataSourceUnavailable(format!(
                "OpenWeatherMap returned {}: {}",
                status, body
            )));
        }

        response.json().await.map_err(|e| {
            AdvisorError::DataSourceUnavailable(format!(
                "Failed to parse OpenWeatherMap response: {}",
                e
            ))
        })
    }

    /// Current conditions and daily forecast, requested concurrently
    pub async fn fetch_report(&self, city: &str) -> Result<WeatherReport> {
        let (current, forecast): (OwmCurrentResponse, OwmForecastResponse) = tokio::try_join!(
            self.get_json("weather", city),
            self.get_json("forecast", city)
        )?;

        tracing::debug!(
            city,
            points = forecast.list.len(),
            "Fetched weather from OpenWeatherMap"
        );

        Ok(WeatherReport {
            current: convert_current(current),
            forecast: aggregate_daily(&forecast.list),
        })
    }

    /// Test connection to OpenWeatherMap API
    pub async fn test_connection(&self, city: &str) -> Result<bool> {
        let url = self.url("weather", city)?;

        let response =
            self.client.get(url).send().await.map_err(|e| {
                AdvisorError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        Ok(response.status().is_success())
    }
}

impl WeatherSource for OpenWeatherMapClient {
    async fn fetch(&self, city: &str) -> Result<WeatherReport> {
        self.fetch_report(city).await
    }
}

fn ms_to_kmh(speed: f64) -> f64 {
    (speed * 3.6).round()
}

fn convert_current(response: OwmCurrentResponse) -> CurrentWeather {
    let (condition, description) = response
        .weather
        .into_iter()
        .next()
        .map(|w| (w.main, w.description))
        .unwrap_or_default();

    CurrentWeather {
        city: response.name,
        country: response.sys.country,
        temperature_c: response.main.temp.round(),
        feels_like_c: response.main.feels_like.round(),
        humidity_pct: response.main.humidity,
        pressure_hpa: response.main.pressure,
        wind_speed_kmh: ms_to_kmh(response.wind.speed),
        visibility_km: (response.visibility.unwrap_or(DEFAULT_VISIBILITY_M) / 1000.0).round(),
        condition,
        description,
        observed_at: DateTime::from_timestamp(response.dt, 0).unwrap_or_else(Utc::now),
    }
}

fn aggregate_daily(points: &[OwmForecastItem]) -> Vec<DailyForecast> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&OwmForecastItem>> = BTreeMap::new();
    for point in points {
        let Some(timestamp) = DateTime::from_timestamp(point.dt, 0) else {
            continue;
        };
        by_date.entry(timestamp.date_naive()).or_default().push(point);
    }

    by_date
        .into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(date, points)| aggregate_day(date, &points))
        .collect()
}

fn aggregate_day(date: NaiveDate, points: &[&OwmForecastItem]) -> DailyForecast {
    let high_c = points
        .iter()
        .map(|p| p.main.temp)
        .fold(f64::NEG_INFINITY, f64::max);
    let low_c = points
        .iter()
        .map(|p| p.main.temp)
        .fold(f64::INFINITY, f64::min);
    let max_pop = points.iter().map(|p| p.pop).fold(0.0, f64::max);

    // Condition at the middle of the day's readings
    let condition = points
        .get(points.len() / 2)
        .and_then(|p| p.weather.first())
        .map(|w| w.main.clone())
        .unwrap_or_default();

    DailyForecast {
        date,
        high_c: high_c.round(),
        low_c: low_c.round(),
        condition,
        rain_chance_pct: (max_pop * 100.0).round(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> OpenWeatherMapConfig {
        OpenWeatherMapConfig {
            api_key: "test_key".to_string(),
            enabled: true,
        }
    }

    const CURRENT_JSON: &str = r#"{
        "coord": {"lon": 73.86, "lat": 18.52},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": 24.6, "feels_like": 25.2, "temp_min": 24.0, "temp_max": 25.0,
                 "pressure": 1009, "humidity": 83},
        "visibility": 6000,
        "wind": {"speed": 5.1, "deg": 250},
        "dt": 1730448000,
        "sys": {"country": "IN", "sunrise": 1730423000, "sunset": 1730464000},
        "name": "Pune",
        "cod": 200
    }"#;

    // 2024-11-01 00:00, 12:00, 21:00 and 2024-11-02 03:00 UTC
    const FORECAST_JSON: &str = r#"{
        "cod": "200",
        "list": [
            {"dt": 1730419200, "main": {"temp": 18.4, "humidity": 70},
             "weather": [{"main": "Clear"}], "pop": 0.0},
            {"dt": 1730462400, "main": {"temp": 29.6, "humidity": 40},
             "weather": [{"main": "Clouds"}], "pop": 0.35},
            {"dt": 1730494800, "main": {"temp": 21.2, "humidity": 60},
             "weather": [{"main": "Rain"}], "pop": 0.724},
            {"dt": 1730516400, "main": {"temp": 17.5, "humidity": 75},
             "weather": [{"main": "Clear"}]}
        ],
        "city": {"name": "Pune", "country": "IN"}
    }"#;

    #[test]
    fn client_creation() {
        let client = OpenWeatherMapClient::new(sample_config(), "IN");
        assert!(client.config.enabled);
        assert_eq!(client.country_code, "IN");
    }

    #[test]
    fn url_queries_city_in_metric_units() {
        let client = OpenWeatherMapClient::new(sample_config(), "IN");
        let url = client.url("forecast", "New Delhi").unwrap();

        assert_eq!(url.path(), "/data/2.5/forecast");
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("q".into(), "New Delhi,IN".into())));
        assert!(query.contains(&("units".into(), "metric".into())));
        assert!(query.contains(&("appid".into(), "test_key".into())));
    }

    #[test]
    fn current_conditions_are_converted() {
        let response: OwmCurrentResponse = serde_json::from_str(CURRENT_JSON).unwrap();
        let current = convert_current(response);

        assert_eq!(current.city, "Pune");
        assert_eq!(current.country, "IN");
        assert_eq!(current.temperature_c, 25.0);
        assert_eq!(current.feels_like_c, 25.0);
        assert_eq!(current.humidity_pct, 83.0);
        assert_eq!(current.pressure_hpa, 1009.0);
        // 5.1 m/s = 18.36 km/h
        assert_eq!(current.wind_speed_kmh, 18.0);
        assert_eq!(current.visibility_km, 6.0);
        assert_eq!(current.condition, "Rain");
        assert_eq!(current.description, "light rain");
        assert!(current.is_wet());
    }

    #[test]
    fn missing_visibility_defaults_to_ten_km() {
        let json = CURRENT_JSON.replace(r#""visibility": 6000,"#, "");
        let response: OwmCurrentResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(convert_current(response).visibility_km, 10.0);
    }

    #[test]
    fn forecast_grouped_by_utc_date() {
        let response: OwmForecastResponse = serde_json::from_str(FORECAST_JSON).unwrap();
        let days = aggregate_daily(&response.list);

        assert_eq!(days.len(), 2);

        let first = &days[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 11, 1).unwrap());
        assert_eq!(first.high_c, 30.0);
        assert_eq!(first.low_c, 18.0);
        assert_eq!(first.condition, "Clouds");
        assert_eq!(first.rain_chance_pct, 72.0);

        let second = &days[1];
        assert_eq!(second.date, NaiveDate::from_ymd_opt(2024, 11, 2).unwrap());
        assert_eq!(second.high_c, 18.0);
        assert_eq!(second.low_c, 18.0);
        assert_eq!(second.condition, "Clear");
        assert_eq!(second.rain_chance_pct, 0.0);
    }

    #[test]
    fn forecast_capped_at_seven_days() {
        let list: Vec<OwmForecastItem> = (0..10)
            .map(|day| OwmForecastItem {
                dt: 1730462400 + day * 86_400,
                main: OwmMain {
                    temp: 25.0,
                    feels_like: 25.0,
                    humidity: 50.0,
                    pressure: 1010.0,
                },
                weather: vec![],
                pop: 0.1,
            })
            .collect();

        let days = aggregate_daily(&list);
        assert_eq!(days.len(), 7);
        assert!(days.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(days[0].condition, "");
    }
}
