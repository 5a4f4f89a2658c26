//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Logging configuration
    pub log: LogSettings,

    /// Entity store configuration
    pub store: StoreSettings,

    /// Prometheus metrics configuration
    pub metrics: MetricsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Filter directives used when RUST_LOG is not set
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

/// Entity store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// Messages kept per channel before the oldest is evicted
    pub max_messages: usize,
}

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// Record event counters and latencies
    pub enabled: bool,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the message cap is zero.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("log.filter", "info,chat_state=debug")?
            .set_default("log.json", false)?
            .set_default("store.max_messages", 100_i64)?
            .set_default("metrics.enabled", true)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__STORE__MAX_MESSAGES=50 -> store.max_messages = 50
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("log.filter", std::env::var("LOG_FILTER").ok())?
            .build()?
            .try_deserialize()
            .and_then(Self::validate)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.store.max_messages == 0 {
            return Err(ConfigError::Message(
                "store.max_messages must be at least 1".into(),
            ));
        }
        Ok(self)
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".into(),
            json: false,
        }
    }
}
