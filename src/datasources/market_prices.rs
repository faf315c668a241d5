use crate::config::MarketDbConfig;
use crate::datasources::PriceHistorySource;
use crate::error::{AdvisorError, Result};
use crate::models::{MandiPrice, PricePoint};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

/// Hosted PostgreSQL `market_prices` table shared by all installations
pub struct MarketPriceClient {
    pool: PgPool,
}

impl MarketPriceClient {
    pub async fn connect(config: &MarketDbConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect_with(config.connect_options())
            .await
            .map_err(|e| {
                AdvisorError::DataSourceUnavailable(format!("Market price PostgreSQL: {}", e))
            })?;

        Ok(Self { pool })
    }

    pub async fn recent_prices(&self, crop_name: &str, limit: usize) -> Result<Vec<PricePoint>> {
        let rows = sqlx::query(
            r#"
            SELECT crop_name, price::float8 AS price, recorded_at
            FROM market_prices
            WHERE crop_name = $1
            ORDER BY recorded_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(crop_name)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let points = rows
            .iter()
            .map(|row| -> Result<PricePoint> {
                Ok(PricePoint {
                    crop_name: row.try_get("crop_name")?,
                    price: row.try_get("price")?,
                    recorded_at: row.try_get("recorded_at")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(points)
    }

    pub async fn insert_prices(
        &self,
        prices: &[MandiPrice],
        recorded_at: DateTime<Utc>,
    ) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        for p in prices {
            sqlx::query(
                r#"
                INSERT INTO market_prices (crop_name, market_name, district, price, unit, recorded_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&p.crop_name)
            .bind(&p.market_name)
            .bind(&p.district)
            .bind(p.price)
            .bind(&p.unit)
            .bind(recorded_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(prices.len())
    }

    pub async fn prune_prices_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let result = sqlx::query("DELETE FROM market_prices WHERE recorded_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() as usize)
    }

    pub async fn test_connection(&self) -> Result<bool> {
        let row = sqlx::query("SELECT 1 AS ok").fetch_one(&self.pool).await?;
        let ok: i32 = row.try_get("ok")?;
        Ok(ok == 1)
    }
}

impl PriceHistorySource for MarketPriceClient {
    async fn recent(&self, crop_name: &str, lookback: usize) -> Result<Vec<PricePoint>> {
        self.recent_prices(crop_name, lookback).await
    }
}
