use siteplan_core::config::LayeredConfig;
use siteplan_core::error::Result;
use std::env;
use std::path::PathBuf;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    /// Optional TOML file layered under the environment
    pub config_file: Option<PathBuf>,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("SITEPLAN_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3001);

        let cors_origin =
            env::var("SITEPLAN_CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let config_file = env::var("SITEPLAN_CONFIG").ok().map(PathBuf::from);

        Self {
            port,
            cors_origin,
            config_file,
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Application settings: defaults, then the config file, then the environment
    pub fn layered_config(&self) -> Result<LayeredConfig> {
        let config = LayeredConfig::with_defaults();
        let config = match &self.config_file {
            Some(path) => config.load_from_file(path)?,
            None => config,
        };
        Ok(config.load_from_env())
    }
}
