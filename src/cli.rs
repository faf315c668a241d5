use crate::models::Language;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "krishi-advisor",
    version,
    about = "Crop advisory combining weather, sowing calendar and mandi prices"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print ranked crop recommendations for a city
    Advise {
        /// City to advise for (defaults to the configured city)
        #[arg(long)]
        city: Option<String>,

        /// Output language: en, hi or mr
        #[arg(long, value_parser = parse_language)]
        lang: Option<Language>,

        /// Evaluate as if it were this month (1-12)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Emit the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show weather alerts for a city
    Alerts {
        #[arg(long)]
        city: Option<String>,
    },
    /// Show recorded market prices for a crop
    Prices {
        /// Crop name, e.g. Onion
        crop: String,

        /// Number of observations to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Fetch mandi prices from data.gov.in into the price store
    SyncPrices {
        /// Only fetch this commodity (as named by the feed)
        #[arg(long)]
        commodity: Option<String>,

        /// Only fetch this state
        #[arg(long)]
        state: Option<String>,
    },
    /// Re-run interactive setup
    Init,
    /// Validate config and test connections
    Check,
}

fn parse_language(value: &str) -> Result<Language, String> {
    Language::from_str(value).ok_or_else(|| format!("unknown language '{}' (use en, hi or mr)", value))
}
