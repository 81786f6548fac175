//! Application configuration
//!
//! This module provides centralized configuration management using the `config` crate.
//! Configuration can be loaded from environment variables and config files.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::models::PeriodBounds;

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub billing: BillingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Subscriber directory configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryConfig {
    /// Base URL of the subscriber HTTP service
    #[serde(default = "default_directory_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Local JSON file with subscribers; when set, no HTTP lookup is made
    #[serde(default)]
    pub fixtures_path: Option<String>,
}

fn default_directory_url() -> String {
    "https://interview-brubank-api.herokuapp.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_directory_url(),
            timeout_secs: default_timeout(),
            fixtures_path: None,
        }
    }
}

/// What to do with a call record whose phone number is malformed
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvalidRecordPolicy {
    /// Fail the whole batch, naming the offending line
    #[default]
    Reject,
    /// Drop the record and keep going
    Skip,
}

/// Billing rules configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BillingConfig {
    /// Friend calls granted for free per invoice
    #[serde(default = "default_free_friend_calls")]
    pub free_friend_calls: u32,

    /// Destination country codes eligible for the Mercosur discount
    #[serde(default = "default_mercosur_codes")]
    pub mercosur_country_codes: Vec<String>,

    /// Discount applied to eligible international calls
    #[serde(default = "default_mercosur_discount")]
    pub mercosur_discount_percent: u32,

    /// Handling of records with malformed phone numbers
    #[serde(default)]
    pub invalid_records: InvalidRecordPolicy,

    /// Whether calls exactly on the period edges are billed
    #[serde(default)]
    pub period_bounds: PeriodBounds,
}

fn default_free_friend_calls() -> u32 {
    10
}

fn default_mercosur_codes() -> Vec<String> {
    vec!["54".to_string(), "60".to_string(), "12".to_string()]
}

fn default_mercosur_discount() -> u32 {
    50
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            free_friend_calls: default_free_friend_calls(),
            mercosur_country_codes: default_mercosur_codes(),
            mercosur_discount_percent: default_mercosur_discount(),
            invalid_records: InvalidRecordPolicy::default(),
            period_bounds: PeriodBounds::default(),
        }
    }
}

/// Log output format
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and optional config files
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Self::with_defaults(Config::builder())?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with PHONEBILL_ prefix
            .add_source(Self::environment())
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Self::with_defaults(Config::builder())?
            .add_source(File::with_name(path))
            .add_source(Self::environment())
            .build()?;

        config.try_deserialize()
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("directory.base_url", default_directory_url())?
            .set_default("directory.timeout_secs", default_timeout() as i64)?
            .set_default("billing.free_friend_calls", default_free_friend_calls() as i64)?
            .set_default("billing.mercosur_country_codes", default_mercosur_codes())?
            .set_default(
                "billing.mercosur_discount_percent",
                default_mercosur_discount() as i64,
            )?
            .set_default("billing.invalid_records", "reject")?
            .set_default("billing.period_bounds", "exclusive")?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", "pretty")
    }

    fn environment() -> Environment {
        Environment::with_prefix("PHONEBILL")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("billing.mercosur_country_codes")
            .try_parsing(true)
    }
}
