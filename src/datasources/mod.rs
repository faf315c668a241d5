pub mod datagov;
pub mod market_prices;
pub mod openweathermap;
pub mod price_store;

pub use datagov::DataGovClient;
pub use market_prices::MarketPriceClient;
pub use openweathermap::OpenWeatherMapClient;
pub use price_store::PriceStore;

use crate::error::Result;
use crate::models::{PricePoint, WeatherReport};

/// Current conditions and short-range forecast for a city.
///
/// An unknown city yields `AdvisorError::WeatherNotAvailable`.
#[allow(async_fn_in_trait)]
pub trait WeatherSource {
    async fn fetch(&self, city: &str) -> Result<WeatherReport>;
}

/// Recorded market prices for a crop.
///
/// Returns at most `lookback` observations, most recent first.
#[allow(async_fn_in_trait)]
pub trait PriceHistorySource {
    async fn recent(&self, crop_name: &str, lookback: usize) -> Result<Vec<PricePoint>>;
}
