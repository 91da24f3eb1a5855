//! Configuration management for the credential broker
//!
//! Values come from built-in defaults overridden by environment variables
//! prefixed with `CREDBROKER__`, using `__` as the nesting separator
//! (for example `CREDBROKER__MESSAGE_BUS__URL`).

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CREDBROKER";

/// URL scheme that selects the in-process message bus
pub const MEMORY_BUS_SCHEME: &str = "memory://";

/// Message bus configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MessageBusConfig {
    pub url: String,
    pub stream_name: Option<String>,
    pub subject_prefix: Option<String>,
}

impl MessageBusConfig {
    /// Whether the configured bus is the in-process one
    pub fn is_in_memory(&self) -> bool {
        self.url.starts_with(MEMORY_BUS_SCHEME)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Json,
    Console,
}

/// Broker configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    pub service_name: String,
    pub message_bus: MessageBusConfig,
    pub log_level: Option<String>,
    pub log_format: LogFormat,
}

impl BrokerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        Self::load(Self::environment())
    }

    /// Load configuration from defaults overlaid with the given environment source
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .set_default("service_name", "credential-broker")?
            .set_default("message_bus.url", "nats://localhost:4222")?
            .set_default("message_bus.stream_name", "credbroker-events")?
            .set_default("message_bus.subject_prefix", "credbroker")?
            .set_default("log_level", "info")?
            .set_default("log_format", "console")?
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Environment source used by [`BrokerConfig::from_env`]
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX).separator("__")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.message_bus.url.trim().is_empty() {
            return Err(ConfigError::Message(
                "message_bus.url must not be empty".to_string(),
            ));
        }
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::Message(
                "service_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Get message bus URL
    pub fn message_bus_url(&self) -> &str {
        &self.message_bus.url
    }

    /// Get subject prefix, defaulting to "credbroker"
    pub fn subject_prefix(&self) -> &str {
        self.message_bus.subject_prefix.as_deref().unwrap_or("credbroker")
    }

    /// Get log level, defaulting to "info"
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}
