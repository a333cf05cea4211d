use std::time::Duration;

use super::config::StreamConfig;

/// Doubling reconnect delay with a ceiling and optional jitter
///
/// There is no attempt limit: the stream is expected to recover eventually.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    jitter: f64,
    failures: u32,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration, jitter: f64) -> Self {
        Backoff {
            initial,
            max: max.max(initial),
            jitter: jitter.clamp(0.0, 1.0),
            failures: 0,
        }
    }

    pub fn from_config(config: &StreamConfig) -> Self {
        Backoff::new(
            config.reconnect_delay,
            config.max_reconnect_delay,
            config.reconnect_jitter,
        )
    }

    /// Delay to wait after the current failure; counts the failure.
    ///
    /// Jitter adds up to `jitter * base` on top of the doubled delay but
    /// never lifts it past the ceiling.
    pub fn next_delay(&mut self) -> Duration {
        let base = self.base_delay();
        self.failures = self.failures.saturating_add(1);

        if self.jitter > 0.0 {
            let extra = base.as_secs_f64() * self.jitter * rand::random::<f64>();
            (base + Duration::from_secs_f64(extra)).min(self.max)
        } else {
            base
        }
    }

    /// Called once a connection has proved healthy by delivering a snapshot
    pub fn reset(&mut self) {
        self.failures = 0;
    }

    /// Consecutive failures since the last reset
    pub fn failures(&self) -> u32 {
        self.failures
    }

    fn base_delay(&self) -> Duration {
        self.initial
            .saturating_mul(2u32.saturating_pow(self.failures))
            .min(self.max)
    }
}
