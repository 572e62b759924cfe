//! Configuration management for `TrailPlanner`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TrailPlannerError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `TrailPlanner`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrailPlannerConfig {
    /// Upstream API configuration
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Trail aggregation settings
    #[serde(default)]
    pub aggregation: AggregationConfig,
    /// Lookup catalog location
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Base URL for the park service API
    #[serde(default = "default_nps_base_url")]
    pub nps_base_url: String,
    /// Park service API key
    pub nps_api_key: Option<String>,
    /// Base URL for the recreation facility API
    #[serde(default = "default_ridb_base_url")]
    pub ridb_base_url: String,
    /// Recreation facility API key
    pub ridb_api_key: Option<String>,
    /// Base URL for the weather forecast API
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Number of forecast days to request
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
}

/// Trail aggregation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Maximum concurrent per-trail detail fetches
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
    /// Stop issuing detail fetches after this many seconds
    pub enrichment_deadline_seconds: Option<u64>,
    /// Number of best days kept in a visit report
    #[serde(default = "default_top_days")]
    pub top_days: usize,
}

/// Lookup catalog settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog JSON file; the bundled tables are used when unset
    pub path: Option<PathBuf>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_nps_base_url() -> String {
    "https://developer.nps.gov/api/v1".to_string()
}

fn default_ridb_base_url() -> String {
    "https://ridb.recreation.gov/api/v1".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_forecast_days() -> u32 {
    7
}

fn default_max_concurrent_fetches() -> usize {
    6
}

fn default_top_days() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            nps_base_url: default_nps_base_url(),
            nps_api_key: None,
            ridb_base_url: default_ridb_base_url(),
            ridb_api_key: None,
            weather_base_url: default_weather_base_url(),
            timeout_seconds: default_timeout(),
            forecast_days: default_forecast_days(),
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: default_max_concurrent_fetches(),
            enrichment_deadline_seconds: None,
            top_days: default_top_days(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl TrailPlannerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRAILPLANNER_PROVIDERS__NPS_API_KEY=... style overrides
        builder = builder.add_source(
            Environment::with_prefix("TRAILPLANNER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TrailPlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("trailplanner").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.providers.nps_base_url.is_empty() {
            self.providers.nps_base_url = default_nps_base_url();
        }
        if self.providers.ridb_base_url.is_empty() {
            self.providers.ridb_base_url = default_ridb_base_url();
        }
        if self.providers.weather_base_url.is_empty() {
            self.providers.weather_base_url = default_weather_base_url();
        }
        if self.providers.timeout_seconds == 0 {
            self.providers.timeout_seconds = default_timeout();
        }
        if self.providers.forecast_days == 0 {
            self.providers.forecast_days = default_forecast_days();
        }
        if self.aggregation.max_concurrent_fetches == 0 {
            self.aggregation.max_concurrent_fetches = default_max_concurrent_fetches();
        }
        if self.aggregation.top_days == 0 {
            self.aggregation.top_days = default_top_days();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Keys are optional, but a configured key must not be blank
    pub fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("park service", &self.providers.nps_api_key),
            ("recreation facility", &self.providers.ridb_api_key),
        ];
        for (name, key) in keys {
            if key.as_ref().is_some_and(|k| k.trim().is_empty()) {
                return Err(TrailPlannerError::config(format!(
                    "The {name} API key cannot be empty if provided. Either remove it or provide a valid key."
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.providers.timeout_seconds > 300 {
            return Err(
                TrailPlannerError::config("Provider timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.providers.forecast_days > 16 {
            return Err(TrailPlannerError::config("Forecast days cannot exceed 16").into());
        }

        if self.aggregation.max_concurrent_fetches > 10 {
            return Err(TrailPlannerError::config(
                "Concurrent detail fetches cannot exceed 10",
            )
            .into());
        }

        if self.aggregation.enrichment_deadline_seconds == Some(0) {
            return Err(TrailPlannerError::config(
                "Enrichment deadline must be at least one second when set",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TrailPlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TrailPlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("Park service", &self.providers.nps_base_url),
            ("Recreation facility", &self.providers.ridb_base_url),
            ("Weather", &self.providers.weather_base_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TrailPlannerError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
