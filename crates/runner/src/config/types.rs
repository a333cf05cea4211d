use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crossrate_core::ConversionRoute;
use crossrate_gateway::StreamConfig;

/// Root configuration for the streamer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossrateConfigFile {
    /// REST base URL used for pair discovery
    #[serde(default = "default_rest_base_url")]
    pub rest_base_url: String,
    /// WebSocket base URL; the order-book path is appended per pair
    #[serde(default = "default_websocket_base_url")]
    pub websocket_base_url: String,
    #[serde(default)]
    pub stream: StreamSettings,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub conversion: ConversionConfig,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Per-connection timing shared by every supervisor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamSettings {
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,
    #[serde(default = "default_max_reconnect_delay")]
    pub max_reconnect_delay_ms: u64,
    #[serde(default = "default_ping_interval")]
    pub ping_interval_ms: u64,
    #[serde(default = "default_inactivity_timeout")]
    pub inactivity_timeout_ms: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
    /// Fraction of each backoff delay added at random (0 disables)
    #[serde(default = "default_reconnect_jitter")]
    pub reconnect_jitter: f64,
}

impl Default for StreamSettings {
    fn default() -> Self {
        StreamSettings {
            reconnect_delay_ms: default_reconnect_delay(),
            max_reconnect_delay_ms: default_max_reconnect_delay(),
            ping_interval_ms: default_ping_interval(),
            inactivity_timeout_ms: default_inactivity_timeout(),
            connect_timeout_ms: default_connect_timeout(),
            reconnect_jitter: default_reconnect_jitter(),
        }
    }
}

/// Pair discovery over REST
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Bound on the whole discovery step
    #[serde(default = "default_discovery_timeout")]
    pub timeout_ms: u64,
    /// Bound on the single HTTP request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig {
            timeout_ms: default_discovery_timeout(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl DiscoveryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// The two pairs the cross rate is derived from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    #[serde(default = "default_source_pair")]
    pub source_pair: String,
    #[serde(default = "default_target_pair")]
    pub target_pair: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        ConversionConfig {
            source_pair: default_source_pair(),
            target_pair: default_target_pair(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// JSON-lines file rates are appended to
    #[serde(default = "default_sink_path")]
    pub path: PathBuf,
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig {
            path: default_sink_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

impl CrossrateConfigFile {
    /// Convert to the gateway's connection settings
    pub fn to_stream_config(&self) -> StreamConfig {
        let stream = &self.stream;
        StreamConfig::new(self.websocket_base_url.clone())
            .with_reconnect_delay(Duration::from_millis(stream.reconnect_delay_ms))
            .with_max_reconnect_delay(Duration::from_millis(stream.max_reconnect_delay_ms))
            .with_reconnect_jitter(stream.reconnect_jitter)
            .with_ping_interval(Duration::from_millis(stream.ping_interval_ms))
            .with_inactivity_timeout(Duration::from_millis(stream.inactivity_timeout_ms))
            .with_connect_timeout(Duration::from_millis(stream.connect_timeout_ms))
    }

    pub fn conversion_route(&self) -> ConversionRoute {
        ConversionRoute::new(
            self.conversion.source_pair.as_str(),
            self.conversion.target_pair.as_str(),
        )
    }
}

// Default value functions for serde
fn default_rest_base_url() -> String {
    "https://coinmate.io".to_string()
}

fn default_websocket_base_url() -> String {
    "wss://coinmate.io".to_string()
}

fn default_reconnect_delay() -> u64 {
    5000
}

fn default_max_reconnect_delay() -> u64 {
    60000
}

fn default_ping_interval() -> u64 {
    20000
}

fn default_inactivity_timeout() -> u64 {
    45000
}

fn default_connect_timeout() -> u64 {
    10000
}

fn default_reconnect_jitter() -> f64 {
    0.5
}

fn default_discovery_timeout() -> u64 {
    30000
}

fn default_request_timeout() -> u64 {
    10000
}

fn default_source_pair() -> String {
    ConversionRoute::DEFAULT_SOURCE.to_string()
}

fn default_target_pair() -> String {
    ConversionRoute::DEFAULT_TARGET.to_string()
}

fn default_sink_path() -> PathBuf {
    PathBuf::from("exchange_rates.jsonl")
}
