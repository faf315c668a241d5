pub mod advisory;
pub mod weather;

pub use advisory::AdvisoryScreen;
pub use weather::WeatherScreen;
