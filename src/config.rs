//! # Health Service Configuration
//!
//! Layered configuration loading with the `config` crate:
//!
//! 1. built-in defaults
//! 2. an optional file (YAML, TOML or JSON, picked by extension)
//! 3. `TASKER_HEALTH__*` environment variables (`__` separates nesting)
//!
//! The `frontend` section is copied verbatim into health details, so it is read
//! straight from the file with the format's own parser. That keeps key case,
//! key order and value types, which the `config` crate would normalize.
//!
//! ```rust,no_run
//! use tasker_health::config::HealthServiceConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HealthServiceConfig::load(Some("config/tasker-health.yaml".as_ref()))?;
//! if let Some(database) = &config.database {
//!     println!("probing {} connections", database.max_connections);
//! }
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::constants::{
    DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DEFAULT_VALIDATION_TIMEOUT,
};
use crate::error::{Result, TaskerHealthError};
use crate::health::DatastoreProbeSettings;

const ENV_PREFIX: &str = "TASKER_HEALTH";
const FRONTEND_SECTION: &str = "frontend";

/// Root configuration for the health service.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct HealthServiceConfig {
    /// Name of the engine reported alongside the health payload
    #[serde(default)]
    pub engine_name: Option<String>,

    /// Datastore to probe; absent means no datastore is wired in
    #[serde(default)]
    pub database: Option<DatabaseProbeConfig>,

    /// Static frontend details; absent means the frontend reports "unknown"
    #[serde(default, skip_deserializing)]
    pub frontend: Option<Map<String, Value>>,
}

/// PostgreSQL probe configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DatabaseProbeConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,

    #[serde(default = "default_validation_timeout_ms")]
    pub validation_timeout_ms: u64,
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_acquire_timeout_ms() -> u64 {
    DEFAULT_ACQUIRE_TIMEOUT.as_millis() as u64
}

fn default_validation_timeout_ms() -> u64 {
    DEFAULT_VALIDATION_TIMEOUT.as_millis() as u64
}

impl DatabaseProbeConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            acquire_timeout_ms: default_acquire_timeout_ms(),
            validation_timeout_ms: default_validation_timeout_ms(),
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    pub fn validation_timeout(&self) -> Duration {
        Duration::from_millis(self.validation_timeout_ms)
    }

    pub fn probe_settings(&self) -> DatastoreProbeSettings {
        DatastoreProbeSettings {
            acquire_timeout: self.acquire_timeout(),
            validation_timeout: self.validation_timeout(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(TaskerHealthError::InvalidConfiguration(
                "database.url must not be empty".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(TaskerHealthError::InvalidConfiguration(
                "database.max_connections must be greater than 0".to_string(),
            ));
        }
        if self.acquire_timeout_ms == 0 || self.validation_timeout_ms == 0 {
            return Err(TaskerHealthError::InvalidConfiguration(
                "database timeouts must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl HealthServiceConfig {
    /// Load configuration from an optional file, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading health configuration file");
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let mut config: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if let Some(path) = path {
            config.frontend = read_frontend_section(path)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.engine_name {
            if name.trim().is_empty() {
                return Err(TaskerHealthError::InvalidConfiguration(
                    "engine_name must not be blank".to_string(),
                ));
            }
        }
        if let Some(database) = &self.database {
            database.validate()?;
        }
        Ok(())
    }
}

/// Read the `frontend` section of a config file without normalizing it.
fn read_frontend_section(path: &Path) -> Result<Option<Map<String, Value>>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        TaskerHealthError::ConfigurationError(format!("failed to read {}: {e}", path.display()))
    })?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let document: Value = match extension.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&contents).map_err(|e| {
            TaskerHealthError::ConfigurationError(format!("invalid YAML in {}: {e}", path.display()))
        })?,
        Some("toml") => toml::from_str(&contents).map_err(|e| {
            TaskerHealthError::ConfigurationError(format!("invalid TOML in {}: {e}", path.display()))
        })?,
        Some("json") => serde_json::from_str(&contents).map_err(|e| {
            TaskerHealthError::ConfigurationError(format!("invalid JSON in {}: {e}", path.display()))
        })?,
        _ => return Ok(None),
    };

    frontend_section(&document)
}

fn frontend_section(document: &Value) -> Result<Option<Map<String, Value>>> {
    match document.get(FRONTEND_SECTION) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(section)) => Ok(Some(section.clone())),
        Some(other) => Err(TaskerHealthError::InvalidConfiguration(format!(
            "frontend must be a mapping, found {other}"
        ))),
    }
}
