//! Configuration management for the agronomic decision engine
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with AGRO_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::aliases::FieldAliases;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Weather provider configuration
    pub weather: WeatherConfig,

    /// Knowledge-base fragment storage
    pub knowledge_base: KnowledgeBaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Current conditions and forecast API (e.g. https://api.openweathermap.org/data/2.5)
    pub api_endpoint: String,

    /// Direct geocoding API (e.g. https://api.openweathermap.org/geo/1.0)
    pub geocoding_endpoint: String,

    /// Weather API key
    pub api_key: String,

    /// Language of condition descriptions
    pub language: String,

    /// Timeout for forecast and geocoding requests
    pub request_timeout_secs: u64,

    /// Timeout for each radar point query
    pub radar_timeout_secs: u64,

    /// Radar probe offset from the center, in degrees
    pub radar_offset_degrees: Decimal,
}

impl WeatherConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn radar_timeout(&self) -> Duration {
        Duration::from_secs(self.radar_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct KnowledgeBaseConfig {
    /// Directory scanned recursively for `*.json` fragments
    pub root_dir: String,

    /// Alias table override; built-in aliases when absent
    #[serde(default)]
    pub aliases: Option<FieldAliases>,
}

impl KnowledgeBaseConfig {
    pub fn field_aliases(&self) -> FieldAliases {
        self.aliases.clone().unwrap_or_default()
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AGRO_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("weather.geocoding_endpoint", "https://api.openweathermap.org/geo/1.0")?
            .set_default("weather.api_key", "")?
            .set_default("weather.language", "pt_br")?
            .set_default("weather.request_timeout_secs", 5)?
            .set_default("weather.radar_timeout_secs", 3)?
            .set_default("weather.radar_offset_degrees", "0.15")?
            .set_default("knowledge_base.root_dir", "database")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AGRO_ prefix)
            .add_source(
                Environment::with_prefix("AGRO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "https://api.openweathermap.org/data/2.5".to_string(),
            geocoding_endpoint: "https://api.openweathermap.org/geo/1.0".to_string(),
            api_key: String::new(),
            language: "pt_br".to_string(),
            request_timeout_secs: 5,
            radar_timeout_secs: 3,
            radar_offset_degrees: Decimal::new(15, 2),
        }
    }
}
