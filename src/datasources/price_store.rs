use crate::datasources::{MarketPriceClient, PriceHistorySource};
use crate::db::Database;
use crate::error::{AdvisorError, Result};
use crate::models::{MandiPrice, PricePoint};
use chrono::{DateTime, Duration, Utc};

/// Where price observations are read from and written to
pub enum PriceStore {
    Local(Database),
    Hosted(MarketPriceClient),
}

impl PriceStore {
    pub fn name(&self) -> &'static str {
        match self {
            PriceStore::Local(_) => "local SQLite",
            PriceStore::Hosted(_) => "hosted PostgreSQL",
        }
    }

    pub async fn insert_prices(
        &self,
        prices: &[MandiPrice],
        recorded_at: DateTime<Utc>,
    ) -> Result<usize> {
        match self {
            PriceStore::Local(db) => db.insert_prices(prices, recorded_at),
            PriceStore::Hosted(client) => client.insert_prices(prices, recorded_at).await,
        }
    }

    /// Remove observations older than `retention_days` before `now`
    pub async fn prune(&self, now: DateTime<Utc>, retention_days: u32) -> Result<usize> {
        let cutoff = Duration::try_days(i64::from(retention_days))
            .and_then(|age| now.checked_sub_signed(age))
            .ok_or_else(|| {
                AdvisorError::Config(format!(
                    "price retention of {} days is out of range",
                    retention_days
                ))
            })?;
        match self {
            PriceStore::Local(db) => db.prune_prices_before(cutoff),
            PriceStore::Hosted(client) => client.prune_prices_before(cutoff).await,
        }
    }
}

impl PriceHistorySource for PriceStore {
    async fn recent(&self, crop_name: &str, lookback: usize) -> Result<Vec<PricePoint>> {
        match self {
            PriceStore::Local(db) => db.recent(crop_name, lookback).await,
            PriceStore::Hosted(client) => client.recent(crop_name, lookback).await,
        }
    }
}
