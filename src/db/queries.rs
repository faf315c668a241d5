use crate::datasources::PriceHistorySource;
use crate::db::Database;
use crate::error::Result;
use crate::models::{MandiPrice, PricePoint};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Row};

fn timestamp(at: DateTime<Utc>) -> String {
    // Fixed width so text ordering matches chronological ordering
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| {
            tracing::warn!(value, "Unparseable recorded_at in price store");
            DateTime::<Utc>::UNIX_EPOCH
        })
}

// Price Observation Queries

impl Database {
    /// Store normalized records as observations taken at `recorded_at`.
    /// Returns the number of rows written.
    pub fn insert_prices(&self, prices: &[MandiPrice], recorded_at: DateTime<Utc>) -> Result<usize> {
        let recorded_at = timestamp(recorded_at);

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    r#"
                    INSERT INTO market_prices
                        (crop_name, market_name, district, price, min_price, max_price,
                         arrival_date, variety, unit, recorded_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                    "#,
                )?;

                for p in prices {
                    stmt.execute(params![
                        p.crop_name,
                        p.market_name,
                        p.district,
                        p.price,
                        p.min_price,
                        p.max_price,
                        p.arrival_date,
                        p.variety,
                        p.unit,
                        recorded_at,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(prices.len())
        })
    }

    /// Up to `limit` observations for a crop, most recent first
    pub fn recent_prices(&self, crop_name: &str, limit: usize) -> Result<Vec<PricePoint>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT crop_name, price, recorded_at FROM market_prices
                WHERE crop_name = ?1
                ORDER BY recorded_at DESC, id DESC
                LIMIT ?2
                "#,
            )?;

            let points = stmt
                .query_map(params![crop_name, limit as i64], row_to_price_point)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(points)
        })
    }

    /// Latest full market records for a crop, for display
    pub fn latest_market_prices(&self, crop_name: &str, limit: usize) -> Result<Vec<MandiPrice>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT crop_name, market_name, district, price, min_price, max_price,
                       arrival_date, variety, unit
                FROM market_prices
                WHERE crop_name = ?1
                ORDER BY recorded_at DESC, id DESC
                LIMIT ?2
                "#,
            )?;

            let prices = stmt
                .query_map(params![crop_name, limit as i64], row_to_mandi_price)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(prices)
        })
    }

    /// Delete observations recorded before `cutoff`. Returns the number removed.
    pub fn prune_prices_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM market_prices WHERE recorded_at < ?1",
                params![timestamp(cutoff)],
            )?;
            Ok(removed)
        })
    }

    pub fn last_recorded_at(&self) -> Result<Option<DateTime<Utc>>> {
        self.with_conn(|conn| {
            let latest: Option<String> =
                conn.query_row("SELECT MAX(recorded_at) FROM market_prices", [], |row| {
                    row.get(0)
                })?;
            Ok(latest.as_deref().map(parse_timestamp))
        })
    }
}

fn row_to_price_point(row: &Row) -> rusqlite::Result<PricePoint> {
    let recorded_at: String = row.get(2)?;
    Ok(PricePoint {
        crop_name: row.get(0)?,
        price: row.get(1)?,
        recorded_at: parse_timestamp(&recorded_at),
    })
}

fn row_to_mandi_price(row: &Row) -> rusqlite::Result<MandiPrice> {
    let price: f64 = row.get(3)?;
    Ok(MandiPrice {
        crop_name: row.get(0)?,
        market_name: row.get(1)?,
        district: row.get(2)?,
        price,
        min_price: row.get::<_, Option<f64>>(4)?.unwrap_or(price),
        max_price: row.get::<_, Option<f64>>(5)?.unwrap_or(price),
        arrival_date: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        variety: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        unit: row.get(8)?,
    })
}

impl PriceHistorySource for Database {
    async fn recent(&self, crop_name: &str, lookback: usize) -> Result<Vec<PricePoint>> {
        self.recent_prices(crop_name, lookback)
    }
}
