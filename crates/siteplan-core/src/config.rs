use crate::error::{Result, SiteplanError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the building footprints
pub const DEFAULT_DATA_PATH: &str = "data/OneNeighborhood.shp";

/// Default chat completion model
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Default chat completion endpoint root
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

/// System instruction prepended to every chat completion request
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an urban planning assistant.";

/// First turn of every new transcript
pub const DEFAULT_GREETING: &str = "Ask me anything about urban design...";

/// Initial map zoom level
pub const DEFAULT_ZOOM: u8 = 15;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for siteplan
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub data_path: ConfigValue<PathBuf>,
    pub model: ConfigValue<String>,
    pub api_base_url: ConfigValue<String>,
    pub system_prompt: ConfigValue<String>,
    pub greeting: ConfigValue<String>,
    pub zoom: ConfigValue<u8>,
    /// Map centre as `[lon, lat]` used when the data has no centroid
    pub default_center: ConfigValue<[f64; 2]>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            data_path: ConfigValue::new(PathBuf::from(DEFAULT_DATA_PATH), ConfigSource::Default),
            model: ConfigValue::new(DEFAULT_MODEL.to_string(), ConfigSource::Default),
            api_base_url: ConfigValue::new(
                DEFAULT_API_BASE_URL.to_string(),
                ConfigSource::Default,
            ),
            system_prompt: ConfigValue::new(
                DEFAULT_SYSTEM_PROMPT.to_string(),
                ConfigSource::Default,
            ),
            greeting: ConfigValue::new(DEFAULT_GREETING.to_string(), ConfigSource::Default),
            zoom: ConfigValue::new(DEFAULT_ZOOM, ConfigSource::Default),
            default_center: ConfigValue::new([0.0, 0.0], ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| SiteplanError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| SiteplanError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(data_path) = file_config.data_path {
            self.data_path.update(data_path, ConfigSource::File);
        }

        if let Some(model) = file_config.model {
            self.model.update(model, ConfigSource::File);
        }

        if let Some(api_base_url) = file_config.api_base_url {
            self.api_base_url.update(api_base_url, ConfigSource::File);
        }

        if let Some(system_prompt) = file_config.system_prompt {
            self.system_prompt.update(system_prompt, ConfigSource::File);
        }

        if let Some(greeting) = file_config.greeting {
            self.greeting.update(greeting, ConfigSource::File);
        }

        if let Some(zoom) = file_config.zoom {
            self.zoom.update(zoom, ConfigSource::File);
        }

        if let Some(center) = file_config.default_center {
            self.default_center.update(center, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // SITEPLAN_DATA_PATH
        if let Ok(path) = env::var("SITEPLAN_DATA_PATH") {
            self.data_path.update(PathBuf::from(path), ConfigSource::Environment);
        }

        // SITEPLAN_MODEL
        if let Ok(model) = env::var("SITEPLAN_MODEL") {
            self.model.update(model, ConfigSource::Environment);
        }

        // SITEPLAN_API_BASE_URL
        if let Ok(url) = env::var("SITEPLAN_API_BASE_URL") {
            self.api_base_url.update(url, ConfigSource::Environment);
        }

        // SITEPLAN_ZOOM
        if let Ok(zoom_str) = env::var("SITEPLAN_ZOOM") {
            match zoom_str.parse::<u8>() {
                Ok(zoom) => self.zoom.update(zoom, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid SITEPLAN_ZOOM value '{}': expected an integer zoom level",
                    zoom_str
                ),
            }
        }

        // SITEPLAN_DEFAULT_CENTER
        if let Ok(center_str) = env::var("SITEPLAN_DEFAULT_CENTER") {
            match parse_center(&center_str) {
                Ok(center) => self.default_center.update(center, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid SITEPLAN_DEFAULT_CENTER value '{}': expected 'lon,lat'",
                    center_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(data_path) = overrides.data_path {
            self.data_path.update(data_path, ConfigSource::Cli);
        }

        if let Some(model) = overrides.model {
            self.model.update(model, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "data_path".to_string(),
            (self.data_path.value.display().to_string(), self.data_path.source),
        );
        map.insert("model".to_string(), (self.model.value.clone(), self.model.source));
        map.insert(
            "api_base_url".to_string(),
            (self.api_base_url.value.clone(), self.api_base_url.source),
        );
        map.insert(
            "system_prompt".to_string(),
            (self.system_prompt.value.clone(), self.system_prompt.source),
        );
        map.insert("greeting".to_string(), (self.greeting.value.clone(), self.greeting.source));
        map.insert("zoom".to_string(), (self.zoom.value.to_string(), self.zoom.source));

        let [lon, lat] = self.default_center.value;
        map.insert(
            "default_center".to_string(),
            (format!("{},{}", lon, lat), self.default_center.source),
        );

        map
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    data_path: Option<PathBuf>,
    model: Option<String>,
    api_base_url: Option<String>,
    system_prompt: Option<String>,
    greeting: Option<String>,
    zoom: Option<u8>,
    default_center: Option<[f64; 2]>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub data_path: Option<PathBuf>,
    pub model: Option<String>,
}

/// Parse a `lon,lat` pair
pub fn parse_center(s: &str) -> Result<[f64; 2]> {
    let invalid = || SiteplanError::ConfigInvalid {
        key: "default_center".to_string(),
        reason: format!("Invalid center: {}. Use 'lon,lat'", s),
    };

    let (lon, lat) = s.split_once(',').ok_or_else(invalid)?;
    let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;

    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return Err(invalid());
    }

    Ok([lon, lat])
}
