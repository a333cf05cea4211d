use std::time::Duration;

use crossrate_core::PairId;

/// Path of the per-pair order-book channel under the WebSocket base URL
const ORDER_BOOK_CHANNEL: &str = "/api/websocket/channel/order-book/";

/// Connection settings for a stream supervisor
/// Injected by the caller; the supervisor never reads configuration itself
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// WebSocket base URL, e.g. `wss://coinmate.io`
    pub websocket_base_url: String,
    /// Delay before the first reconnect attempt
    pub reconnect_delay: Duration,
    /// Ceiling for the doubling reconnect delay
    pub max_reconnect_delay: Duration,
    /// Random extra delay as a fraction of the backoff (0 disables)
    pub reconnect_jitter: f64,
    /// Interval between outbound ping frames
    pub ping_interval: Duration,
    /// Maximum silence on the inbound side before the link is declared dead
    pub inactivity_timeout: Duration,
    /// Bound on a single connection attempt
    pub connect_timeout: Duration,
}

impl StreamConfig {
    pub fn new(websocket_base_url: impl Into<String>) -> Self {
        StreamConfig {
            websocket_base_url: websocket_base_url.into(),
            reconnect_delay: Duration::from_secs(5),
            max_reconnect_delay: Duration::from_secs(60),
            reconnect_jitter: 0.0,
            ping_interval: Duration::from_secs(20),
            inactivity_timeout: Duration::from_secs(45),
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_max_reconnect_delay(mut self, delay: Duration) -> Self {
        self.max_reconnect_delay = delay;
        self
    }

    pub fn with_reconnect_jitter(mut self, jitter: f64) -> Self {
        self.reconnect_jitter = jitter;
        self
    }

    pub fn with_ping_interval(mut self, interval: Duration) -> Self {
        self.ping_interval = interval;
        self
    }

    pub fn with_inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.inactivity_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// `{base}/api/websocket/channel/order-book/{pair}`
    pub fn stream_url(&self, pair: &PairId) -> String {
        format!(
            "{}{}{}",
            self.websocket_base_url.trim_end_matches('/'),
            ORDER_BOOK_CHANNEL,
            pair
        )
    }
}
