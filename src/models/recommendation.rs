use super::LocalizedNames;
use serde::{Deserialize, Serialize};

/// Three-level classification used for market demand and profit potential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::High => "high",
            Tier::Medium => "medium",
            Tier::Low => "low",
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            Tier::High => Color::Green,
            Tier::Medium => Color::Yellow,
            Tier::Low => Color::Red,
        }
    }

    /// Ranking bonus added to the weather score when this tier describes
    /// market demand
    pub fn demand_bonus(&self) -> f64 {
        match self {
            Tier::High => 30.0,
            Tier::Medium => 15.0,
            Tier::Low => 0.0,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a crop was recommended. Text is resolved per language at display time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    IdealWeather,
    SowingSeason,
    RisingPrices,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRecommendation {
    pub crop: String,
    pub localized_names: LocalizedNames,
    pub weather_score: f64,
    pub market_demand: Tier,
    pub profit_potential: Tier,
    pub best_sowing_time: String,
    pub current_price: f64,
    pub price_change_percent: f64,
    pub reasons: Vec<ReasonCode>,
}

impl CropRecommendation {
    pub fn combined_score(&self) -> f64 {
        self.weather_score + self.market_demand.demand_bonus()
    }
}
