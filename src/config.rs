use crate::error::{AdvisorError, Result};
use crate::logic::catalog::{state_for_city, DEFAULT_CITY, SUPPORTED_CITIES};
use crate::models::{Language, WeatherSnapshot};
use dialoguer::{Input, Password, Select};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use std::path::PathBuf;

const APP_DIR: &str = "krishi-advisor";
const DATA_GOV_PRICE_RESOURCE: &str = "9ef84268-d588-465a-a308-a864a43d0070";
const MAX_PRICE_RETENTION_DAYS: u32 = 36_500;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub advisory: AdvisoryConfig,
    pub openweathermap: OpenWeatherMapConfig,
    #[serde(default)]
    pub datagov: Option<DataGovConfig>,
    #[serde(default)]
    pub market_db: Option<MarketDbConfig>,
    #[serde(default = "default_retention_days")]
    pub price_retention_days: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdvisoryConfig {
    #[serde(default = "default_city")]
    pub default_city: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    /// Observations read per crop when deriving price trends
    #[serde(default = "default_price_lookback")]
    pub price_lookback: usize,
    /// Conditions to assume when the weather service cannot be reached
    #[serde(default)]
    pub fallback_weather: Option<WeatherSnapshot>,
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

fn default_country_code() -> String {
    "IN".to_string()
}

fn default_price_lookback() -> usize {
    30
}

fn default_retention_days() -> u32 {
    45
}

fn default_enabled() -> bool {
    true
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OpenWeatherMapConfig {
    pub api_key: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl std::fmt::Debug for OpenWeatherMapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherMapConfig")
            .field("api_key", &"[REDACTED]")
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct DataGovConfig {
    pub api_key: String,
    #[serde(default = "default_resource_id")]
    pub resource_id: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_resource_id() -> String {
    DATA_GOV_PRICE_RESOURCE.to_string()
}

fn default_limit() -> u32 {
    500
}

impl std::fmt::Debug for DataGovConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataGovConfig")
            .field("api_key", &"[REDACTED]")
            .field("resource_id", &self.resource_id)
            .field("limit", &self.limit)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Hosted PostgreSQL database holding the shared `market_prices` table
#[derive(Clone, Deserialize, Serialize)]
pub struct MarketDbConfig {
    pub host: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for MarketDbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

fn deserialize_port<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(n) => Ok(n),
        Port::Text(value) => value.parse::<u16>().map_err(|_| {
            D::Error::custom(format!(
                "invalid port '{}' - ensure MARKET_DB_PORT environment variable is set",
                value
            ))
        }),
    }
}

impl MarketDbConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

impl Config {
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p.clone(),
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(AdvisorError::Config(format!(
                "Config file not found at {:?}. Run `krishi-advisor init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| AdvisorError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    /// Parse a config document after substituting `${VAR}` references
    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| AdvisorError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if state_for_city(&self.advisory.default_city).is_none() {
            tracing::warn!(
                city = %self.advisory.default_city,
                "Default city is not in the supported list; weather lookups may fail"
            );
        }
        if self.advisory.price_lookback == 0 {
            return Err(AdvisorError::Config(
                "advisory.price_lookback must be at least 1".into(),
            ));
        }
        if self.price_retention_days > MAX_PRICE_RETENTION_DAYS {
            return Err(AdvisorError::Config(format!(
                "price_retention_days must be at most {}",
                MAX_PRICE_RETENTION_DAYS
            )));
        }
        Ok(())
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join(APP_DIR).join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/krishi-advisor/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AdvisorError::Config("Cannot determine config directory".into()))?
            .join(APP_DIR);
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        let input_err = |e: dialoguer::Error| AdvisorError::Config(format!("Input error: {}", e));

        println!();
        println!("No configuration found. Let's set up Krishi Advisor!");
        println!();

        // --- Advisory ---
        println!("Advisory");
        let city_labels: Vec<String> = SUPPORTED_CITIES
            .iter()
            .map(|(city, state)| format!("{}, {}", city, state))
            .collect();
        let default_index = SUPPORTED_CITIES
            .iter()
            .position(|(city, _)| *city == DEFAULT_CITY)
            .unwrap_or(0);
        let city_index = Select::new()
            .with_prompt("  Default city")
            .items(&city_labels)
            .default(default_index)
            .interact()
            .map_err(input_err)?;

        let language_labels: Vec<&str> = Language::ALL.iter().map(|l| l.as_str()).collect();
        let language_index = Select::new()
            .with_prompt("  Language")
            .items(&language_labels)
            .default(0)
            .interact()
            .map_err(input_err)?;

        println!();

        // --- OpenWeatherMap ---
        println!("OpenWeatherMap");
        let owm_api_key: String = Password::new()
            .with_prompt("  API key")
            .allow_empty_password(true)
            .interact()
            .map_err(input_err)?;

        println!();

        // --- data.gov.in (optional) ---
        println!("data.gov.in mandi prices (leave API key blank to skip)");
        let datagov_key: String = Input::new()
            .with_prompt("  API key")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(input_err)?;

        let datagov = if datagov_key.is_empty() {
            None
        } else {
            Some(DataGovConfig {
                api_key: datagov_key,
                resource_id: default_resource_id(),
                limit: default_limit(),
                enabled: true,
            })
        };

        println!();

        // --- Hosted market prices (optional) ---
        println!("Hosted market price database (leave host blank to use local storage)");
        let db_host: String = Input::new()
            .with_prompt("  Host")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(input_err)?;

        let market_db = if db_host.is_empty() {
            None
        } else {
            let port: u16 = Input::new()
                .with_prompt("  Port")
                .default(5432)
                .interact_text()
                .map_err(input_err)?;

            let database: String = Input::new()
                .with_prompt("  Database")
                .default("postgres".into())
                .interact_text()
                .map_err(input_err)?;

            let user: String = Input::new()
                .with_prompt("  User")
                .default("postgres".into())
                .interact_text()
                .map_err(input_err)?;

            let password: String = Password::new()
                .with_prompt("  Password")
                .allow_empty_password(true)
                .interact()
                .map_err(input_err)?;

            Some(MarketDbConfig {
                host: db_host,
                port,
                database,
                user,
                password,
            })
        };

        println!();

        let config = Config {
            advisory: AdvisoryConfig {
                default_city: SUPPORTED_CITIES[city_index].0.to_string(),
                language: Language::ALL[language_index],
                country_code: default_country_code(),
                price_lookback: default_price_lookback(),
                fallback_weather: Some(WeatherSnapshot::new(25.0, 50.0)),
            },
            openweathermap: OpenWeatherMapConfig {
                api_key: owm_api_key,
                enabled: true,
            },
            datagov,
            market_db,
            price_retention_days: default_retention_days(),
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| AdvisorError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# Krishi Advisor Configuration\n# Generated by `krishi-advisor init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| AdvisorError::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("KRISHI_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| AdvisorError::Config("Cannot determine data directory".into()))?
            .join(APP_DIR);

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("krishi.db"))
    }

    /// Log file used while the terminal UI owns stdout and stderr
    pub fn log_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("krishi.log"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            advisory: AdvisoryConfig {
                default_city: default_city(),
                language: Language::En,
                country_code: default_country_code(),
                price_lookback: default_price_lookback(),
                fallback_weather: None,
            },
            openweathermap: OpenWeatherMapConfig {
                api_key: String::new(),
                enabled: true,
            },
            datagov: None,
            market_db: None,
            price_retention_days: default_retention_days(),
        }
    }
}
