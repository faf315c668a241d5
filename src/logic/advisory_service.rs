use crate::config::AdvisoryConfig;
use crate::datasources::{PriceHistorySource, WeatherSource};
use crate::error::{AdvisorError, Result};
use crate::logic::advisor::CropAdvisor;
use crate::logic::alerts::AlertEngine;
use crate::models::{CropRecommendation, PricePoint, WeatherAlert, WeatherReport, WeatherSnapshot};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Everything shown for one city on one day
#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryReport {
    pub city: String,
    pub reference_date: NaiveDate,
    /// `None` when the weather source failed and fallback conditions were used
    pub weather: Option<WeatherReport>,
    pub snapshot: WeatherSnapshot,
    pub recommendations: Vec<CropRecommendation>,
    pub alerts: Vec<WeatherAlert>,
}

impl AdvisoryReport {
    pub fn used_fallback_weather(&self) -> bool {
        self.weather.is_none()
    }
}

/// Gathers weather and price history concurrently, then runs the advisor
pub struct AdvisoryService<W, P> {
    weather: Option<W>,
    prices: P,
    advisor: CropAdvisor,
    alerts: AlertEngine,
    fallback_weather: Option<WeatherSnapshot>,
    price_lookback: usize,
}

impl<W: WeatherSource, P: PriceHistorySource> AdvisoryService<W, P> {
    pub fn new(weather: Option<W>, prices: P, config: &AdvisoryConfig) -> Self {
        if weather.is_none() {
            tracing::info!("Weather source not configured - advisories will use fallback weather");
        }

        Self {
            weather,
            prices,
            advisor: CropAdvisor::default(),
            alerts: AlertEngine::new(),
            fallback_weather: config.fallback_weather,
            price_lookback: config.price_lookback,
        }
    }

    async fn fetch_weather(&self, city: &str) -> Result<WeatherReport> {
        match &self.weather {
            Some(source) => source.fetch(city).await,
            None => Err(AdvisorError::DataSourceUnavailable(
                "No weather source configured".into(),
            )),
        }
    }

    /// Recent observations for every catalog crop. A failed read leaves that
    /// crop without history.
    async fn price_history(&self) -> HashMap<String, Vec<PricePoint>> {
        let mut history = HashMap::new();

        for crop in self.advisor.crop_names() {
            match self.prices.recent(crop, self.price_lookback).await {
                Ok(points) => {
                    history.insert(crop.to_string(), points);
                }
                Err(e) => {
                    tracing::warn!(crop, "Failed to read price history: {}", e);
                }
            }
        }

        history
    }

    /// Produce the advisory for `city` as of `reference_date`.
    ///
    /// Fails only when the weather source fails and no fallback weather is
    /// configured.
    pub async fn advise(&self, city: &str, reference_date: NaiveDate) -> Result<AdvisoryReport> {
        let (weather, history) = tokio::join!(self.fetch_weather(city), self.price_history());

        let (weather, snapshot) = match weather {
            Ok(report) => {
                let snapshot = report.current.snapshot();
                (Some(report), snapshot)
            }
            Err(e) => match self.fallback_weather {
                Some(fallback) => {
                    tracing::warn!(city, "Weather unavailable, using fallback conditions: {}", e);
                    (None, fallback)
                }
                None => return Err(e),
            },
        };

        let recommendations = self.advisor.rank(&snapshot, reference_date, &history);
        let alerts = weather
            .as_ref()
            .map(|report| self.alerts.evaluate(report))
            .unwrap_or_default();

        tracing::debug!(
            city,
            recommendations = recommendations.len(),
            alerts = alerts.len(),
            "Advisory computed"
        );

        Ok(AdvisoryReport {
            city: city.to_string(),
            reference_date,
            weather,
            snapshot,
            recommendations,
            alerts,
        })
    }

    /// Current weather report and the alerts it triggers
    pub async fn alerts(&self, city: &str) -> Result<(WeatherReport, Vec<WeatherAlert>)> {
        let report = self.fetch_weather(city).await?;
        let alerts = self.alerts.evaluate(&report);
        Ok((report, alerts))
    }
}
