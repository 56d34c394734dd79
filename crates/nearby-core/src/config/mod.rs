//! Application configuration schemas.
//!
//! All configuration structs are deserialized from a TOML file via the
//! `config` crate, overlaid with `NEARBY__`-prefixed environment
//! variables. Each sub-module represents a logical configuration section.

pub mod database;
pub mod dispatch;
pub mod logging;
pub mod sweeper;

use serde::{Deserialize, Serialize};

pub use self::database::DatabaseConfig;
pub use self::dispatch::{DispatchConfig, MAX_INSERT_CHUNK_SIZE};
pub use self::logging::LoggingConfig;
pub use self::sweeper::SweeperConfig;

use crate::error::AppError;

/// Environment variable holding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "NEARBY_CONFIG";

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Proximity dispatch settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Expiry sweeper settings.
    #[serde(default)]
    pub sweeper: SweeperConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// The file is optional; environment variables use the `NEARBY`
    /// prefix with `__` as the section separator, e.g.
    /// `NEARBY__DATABASE__URL`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("NEARBY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration path from the environment.
    pub fn path_from_env() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Reject values that would make the pipeline misbehave silently.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.url.trim().is_empty() {
            return Err(AppError::configuration("database.url must not be empty"));
        }
        if !(self.dispatch.default_radius_km.is_finite() && self.dispatch.default_radius_km > 0.0)
        {
            return Err(AppError::configuration(
                "dispatch.default_radius_km must be a positive number",
            ));
        }
        if self.dispatch.notification_ttl_days <= 0 {
            return Err(AppError::configuration(
                "dispatch.notification_ttl_days must be positive",
            ));
        }
        if self.dispatch.insert_chunk_size == 0
            || self.dispatch.insert_chunk_size > MAX_INSERT_CHUNK_SIZE
        {
            return Err(AppError::configuration(format!(
                "dispatch.insert_chunk_size must be between 1 and {MAX_INSERT_CHUNK_SIZE}"
            )));
        }
        if self.dispatch.max_concurrent == 0 || self.dispatch.max_attempts == 0 {
            return Err(AppError::configuration(
                "dispatch.max_concurrent and dispatch.max_attempts must be positive",
            ));
        }
        if self.dispatch.poll_interval_seconds == 0 || self.dispatch.max_deliveries == 0 {
            return Err(AppError::configuration(
                "dispatch.poll_interval_seconds and dispatch.max_deliveries must be positive",
            ));
        }
        let budget = u64::from(self.dispatch.max_attempts)
            * (self.dispatch.invocation_timeout_seconds + self.dispatch.retry_backoff_ms / 1000 + 1);
        if self.dispatch.claim_lease_seconds < budget {
            return Err(AppError::configuration(format!(
                "dispatch.claim_lease_seconds must cover every attempt of one dispatch ({budget}s)"
            )));
        }
        if self.sweeper.batch_limit == 0 {
            return Err(AppError::configuration("sweeper.batch_limit must be positive"));
        }
        Ok(())
    }
}
