use crate::config::DataGovConfig;
use crate::error::{AdvisorError, Result};
use crate::logic::mandi::{self, MandiRecord};
use crate::models::MandiPrice;
use serde::Deserialize;
use std::time::Duration;

const API_BASE_URL: &str = "https://api.data.gov.in/resource";
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_STEP: Duration = Duration::from_secs(1);

/// Client for the data.gov.in daily commodity price feed
pub struct DataGovClient {
    client: reqwest::Client,
    config: DataGovConfig,
}

#[derive(Debug, Deserialize)]
struct DataGovResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    total: u64,
    #[serde(default)]
    records: Option<Vec<MandiRecord>>,
}

/// Optional filters applied server-side
#[derive(Debug, Clone, Default)]
pub struct PriceQuery {
    pub commodity: Option<String>,
    pub state: Option<String>,
}

impl DataGovClient {
    pub fn new(config: DataGovConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, query: &PriceQuery) -> Result<reqwest::Url> {
        let limit = self.config.limit.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("api-key", self.config.api_key.as_str()),
            ("format", "json"),
            ("limit", limit.as_str()),
        ];
        if let Some(commodity) = query.commodity.as_deref() {
            params.push(("filters[commodity]", commodity));
        }
        if let Some(state) = query.state.as_deref() {
            params.push(("filters[state]", state));
        }

        reqwest::Url::parse_with_params(
            &format!("{}/{}", API_BASE_URL, self.config.resource_id),
            &params,
        )
        .map_err(|e| AdvisorError::Config(format!("Invalid data.gov.in URL: {}", e)))
    }

    async fn send_with_retry(&self, url: reqwest::Url) -> Result<reqwest::Response> {
        let mut attempt = 1;
        loop {
            match self.client.get(url.clone()).send().await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < MAX_ATTEMPTS => {
                    tracing::warn!(attempt, "data.gov.in request failed: {}", e);
                    tokio::time::sleep(BACKOFF_STEP * attempt).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(AdvisorError::DataSourceUnavailable(format!(
                        "data.gov.in: network error after {} attempts: {}",
                        MAX_ATTEMPTS, e
                    )));
                }
            }
        }
    }

    /// Fetch raw records matching the query
    pub async fn fetch_records(&self, query: &PriceQuery) -> Result<Vec<MandiRecord>> {
        let response = self.send_with_retry(self.url(query)?).await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::DataSourceUnavailable(format!(
                "data.gov.in returned {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let records = parse_response(&body)?;
        tracing::info!(count = records.len(), "Received records from data.gov.in");
        Ok(records)
    }

    /// Fetch and normalize records onto known crops and districts
    pub async fn fetch_prices(&self, query: &PriceQuery) -> Result<Vec<MandiPrice>> {
        let records = self.fetch_records(query).await?;
        let prices = mandi::normalize_all(&records);
        tracing::info!(
            received = records.len(),
            matched = prices.len(),
            "Normalized mandi price records"
        );
        Ok(prices)
    }

    /// Test connection to the data.gov.in API
    pub async fn test_connection(&self) -> Result<bool> {
        let url = self.url(&PriceQuery::default())?;
        let response = self.client.get(url).send().await.map_err(|e| {
            AdvisorError::DataSourceUnavailable(format!("data.gov.in: {}", e))
        })?;
        Ok(response.status().is_success())
    }
}

fn parse_response(body: &str) -> Result<Vec<MandiRecord>> {
    let data: DataGovResponse = serde_json::from_str(body)?;

    match data.records {
        Some(records) if data.status == "ok" => {
            tracing::debug!(total = data.total, "data.gov.in response");
            Ok(records)
        }
        _ => Err(AdvisorError::DataSourceUnavailable(
            data.message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Invalid data.gov.in response".to_string()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> DataGovConfig {
        DataGovConfig {
            api_key: "test_key".to_string(),
            resource_id: "9ef84268-d588-465a-a308-a864a43d0070".to_string(),
            limit: 500,
            enabled: true,
        }
    }

    #[test]
    fn url_includes_filters() {
        let client = DataGovClient::new(sample_config());
        let url = client
            .url(&PriceQuery {
                commodity: Some("Onion".into()),
                state: Some("Maharashtra".into()),
            })
            .unwrap();

        assert_eq!(
            url.path(),
            "/resource/9ef84268-d588-465a-a308-a864a43d0070"
        );
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("limit".into(), "500".into())));
        assert!(query.contains(&("format".into(), "json".into())));
        assert!(query.contains(&("filters[commodity]".into(), "Onion".into())));
        assert!(query.contains(&("filters[state]".into(), "Maharashtra".into())));
    }

    #[test]
    fn url_without_filters() {
        let client = DataGovClient::new(sample_config());
        let url = client.url(&PriceQuery::default()).unwrap();
        assert!(!url.as_str().contains("filters"));
    }

    #[test]
    fn parses_ok_response() {
        let body = r#"{
            "status": "ok",
            "message": "Resource detail",
            "total": 2,
            "count": 2,
            "records": [
                {"state": "Maharashtra", "district": "Nashik", "market": "Lasalgaon",
                 "commodity": "Onion", "variety": "Red", "grade": "FAQ",
                 "arrival_date": "01/11/2024", "min_price": "1800",
                 "max_price": "2600", "modal_price": "2300"},
                {"state": "Kerala", "district": "Kollam", "market": "Kollam",
                 "commodity": "Coconut", "modal_price": "1500"}
            ]
        }"#;

        let records = parse_response(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].variety, "");

        let prices = mandi::normalize_all(&records);
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].crop_name, "Onion");
        assert_eq!(prices[0].price, 2300.0);
    }

    #[test]
    fn error_status_is_rejected() {
        let body = r#"{"status": "error", "message": "Invalid API key", "records": []}"#;
        match parse_response(body) {
            Err(AdvisorError::DataSourceUnavailable(msg)) => assert_eq!(msg, "Invalid API key"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_records_is_rejected() {
        let body = r#"{"status": "ok"}"#;
        assert!(matches!(
            parse_response(body),
            Err(AdvisorError::DataSourceUnavailable(_))
        ));
    }
}
