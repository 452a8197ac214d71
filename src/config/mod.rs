//! Configuration loading and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then `ANTON__`-prefixed environment variables (`ANTON__MONGO__URL`).

use config::{Config, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "ANTON";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load settings: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// Tracing filter directive, e.g. "info" or "anton=debug,tower_http=info"
    #[serde(default = "default_min_filter")]
    pub min_filter: String,
}

fn default_min_filter() -> String {
    "info".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            min_filter: default_min_filter(),
        }
    }
}

/// MongoDB connection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSettings {
    #[serde(default = "default_mongo_url")]
    pub url: String,

    #[serde(default = "default_mongo_db")]
    pub db: String,

    #[serde(default = "default_mongo_collection")]
    pub collection: String,
}

fn default_mongo_url() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_mongo_db() -> String {
    "anton".to_string()
}

fn default_mongo_collection() -> String {
    "players".to_string()
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            url: default_mongo_url(),
            db: default_mongo_db(),
            collection: default_mongo_collection(),
        }
    }
}

/// Which player store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Mongo,
    /// Process-local store, lost on exit
    Memory,
}

/// Store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Route `DELETE /player/{id}`
    #[serde(default)]
    pub enable_delete: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_delete: false,
        }
    }
}

/// Input validation switches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationSettings {
    /// Reject creates missing firstname, lastname, company or status
    #[serde(default)]
    pub require_fields: bool,
}

/// Main application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub log: LogSettings,

    #[serde(default)]
    pub mongo: MongoSettings,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub validation: ValidationSettings,
}

impl Settings {
    /// Load settings from an optional file plus the process environment.
    ///
    /// Not validated: callers apply their own overrides, then call [`Settings::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Load settings with an explicit variable map standing in for the process
    /// environment. `None` reads the real environment.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Parse settings from TOML text, without consulting the environment.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.store.backend == StoreBackend::Mongo {
            let mongo = &self.mongo;
            for (name, value) in [
                ("mongo.url", &mongo.url),
                ("mongo.db", &mongo.db),
                ("mongo.collection", &mongo.collection),
            ] {
                if value.trim().is_empty() {
                    return Err(ConfigError::ValidationError(format!(
                        "{} must not be empty",
                        name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Bind address for the HTTP server.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
