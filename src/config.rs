//! Configuration management for the library client

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub page_size: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub storage_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// Directory for the rolling log file; stderr only when unset
    pub file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix LIBRARY_)
            .add_source(
                Environment::with_prefix("LIBRARY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Override API base URL from LIBRARY_API_URL env var if present
            .set_override_option("api.base_url", env::var("LIBRARY_API_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api/v1".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { page_size: 8 }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(".library-client/session.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}
