use std::path::Path;
use thiserror::Error;

use super::types::CrossrateConfigFile;

/// Path of a config file to load instead of the embedded default
pub const CONFIG_PATH_ENV: &str = "CROSSRATE_CONFIG";
pub const REST_BASE_URL_ENV: &str = "CROSSRATE_REST_BASE_URL";
pub const WEBSOCKET_BASE_URL_ENV: &str = "CROSSRATE_WEBSOCKET_BASE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Load configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CrossrateConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: CrossrateConfigFile = serde_json::from_str(&content)?;
    Ok(config)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<CrossrateConfigFile, ConfigError> {
    let config: CrossrateConfigFile = serde_json::from_str(json)?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<CrossrateConfigFile, ConfigError> {
    let default_config = include_str!("crossrate_config.json");
    load_config_from_str(default_config)
}

/// Load the file named by `CROSSRATE_CONFIG` (or the embedded default),
/// apply URL overrides from the environment and validate the result
pub fn load_config_from_env() -> Result<CrossrateConfigFile, ConfigError> {
    let mut config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => load_config(path)?,
        _ => load_default_config()?,
    };
    config.apply_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

impl CrossrateConfigFile {
    /// Replace the base URLs with non-blank values from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = present(REST_BASE_URL_ENV) {
            self.rest_base_url = url;
        }
        if let Some(url) = present(WEBSOCKET_BASE_URL_ENV) {
            self.websocket_base_url = url;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));
        let stream = &self.stream;

        if self.rest_base_url.trim().is_empty() {
            return invalid("rest_base_url is empty");
        }
        if self.websocket_base_url.trim().is_empty() {
            return invalid("websocket_base_url is empty");
        }

        let durations = [
            ("stream.reconnect_delay_ms", stream.reconnect_delay_ms),
            ("stream.max_reconnect_delay_ms", stream.max_reconnect_delay_ms),
            ("stream.ping_interval_ms", stream.ping_interval_ms),
            ("stream.inactivity_timeout_ms", stream.inactivity_timeout_ms),
            ("stream.connect_timeout_ms", stream.connect_timeout_ms),
            ("discovery.timeout_ms", self.discovery.timeout_ms),
            ("discovery.request_timeout_ms", self.discovery.request_timeout_ms),
        ];
        if let Some((name, _)) = durations.iter().find(|(_, ms)| *ms == 0) {
            return Err(ConfigError::Invalid(format!("{name} must be positive")));
        }

        if stream.inactivity_timeout_ms <= stream.ping_interval_ms {
            return invalid("stream.inactivity_timeout_ms must exceed stream.ping_interval_ms");
        }
        if stream.max_reconnect_delay_ms < stream.reconnect_delay_ms {
            return invalid("stream.max_reconnect_delay_ms is below stream.reconnect_delay_ms");
        }
        if !(0.0..=1.0).contains(&stream.reconnect_jitter) {
            return invalid("stream.reconnect_jitter must be within [0, 1]");
        }

        let conversion = &self.conversion;
        if conversion.source_pair.trim().is_empty() || conversion.target_pair.trim().is_empty() {
            return invalid("conversion pairs must not be empty");
        }
        if conversion.source_pair == conversion.target_pair {
            return invalid("conversion.source_pair and conversion.target_pair are identical");
        }

        Ok(())
    }
}
