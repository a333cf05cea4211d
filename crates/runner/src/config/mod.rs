pub mod loader;
pub mod types;

pub use loader::{
    CONFIG_PATH_ENV, ConfigError, REST_BASE_URL_ENV, WEBSOCKET_BASE_URL_ENV, load_config,
    load_config_from_env, load_config_from_str, load_default_config,
};
pub use types::{
    ConversionConfig, CrossrateConfigFile, DiscoveryConfig, LoggingConfig, SinkConfig,
    StreamSettings,
};
