use std::sync::Arc;
use std::time::Duration;

use crossrate_core::{OrderBookSnapshot, PairId};
use crossrate_ports::{Clock, SnapshotWriter};
use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::time::{Instant, sleep, timeout};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use super::backoff::Backoff;
use super::config::StreamConfig;
use super::heartbeat::{self, WsStream};
use super::state::{StreamState, StreamStats};
use crate::error::StreamError;
use crate::parser::SnapshotParser;

/// Invoked after each accepted snapshot has been stored
pub type SnapshotCallback = Arc<dyn Fn(&OrderBookSnapshot) + Send + Sync>;

/// Time given to the heartbeat to send its close frame on teardown
const HEARTBEAT_SHUTDOWN: Duration = Duration::from_millis(500);

/// Keeps one pair's order-book stream alive until cancelled.
///
/// Each connection runs a ping heartbeat on the write half and an
/// inactivity watchdog on the read half. Any failure tears the connection
/// down and retries after an exponential backoff; only cancellation stops
/// the loop.
pub struct StreamSupervisor {
    pair: PairId,
    url: String,
    config: StreamConfig,
    parser: SnapshotParser,
    store: Arc<dyn SnapshotWriter>,
    on_snapshot: Option<SnapshotCallback>,
    state: watch::Sender<StreamState>,
    stats: Arc<StreamStats>,
}

impl StreamSupervisor {
    pub fn new(
        pair: PairId,
        config: StreamConfig,
        store: Arc<dyn SnapshotWriter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let url = config.stream_url(&pair);
        let (state, _) = watch::channel(StreamState::Disconnected);

        StreamSupervisor {
            pair,
            url,
            config,
            parser: SnapshotParser::new(clock),
            store,
            on_snapshot: None,
            state,
            stats: Arc::new(StreamStats::default()),
        }
    }

    pub fn with_callback(mut self, callback: SnapshotCallback) -> Self {
        self.on_snapshot = Some(callback);
        self
    }

    pub fn pair(&self) -> &PairId {
        &self.pair
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Subscribe to state transitions
    pub fn state(&self) -> watch::Receiver<StreamState> {
        self.state.subscribe()
    }

    pub fn stats(&self) -> Arc<StreamStats> {
        Arc::clone(&self.stats)
    }

    /// Run until `cancel` fires.
    ///
    /// Ends in `StreamState::Cancelled`; no connection is retried afterwards.
    pub async fn run(self, cancel: CancellationToken) {
        let mut backoff = Backoff::from_config(&self.config);
        let mut attempt: u32 = 0;

        tracing::info!(pair = %self.pair, url = %self.url, "Starting order book stream");

        loop {
            if cancel.is_cancelled() {
                break;
            }

            attempt = attempt.saturating_add(1);
            self.transition(StreamState::Connecting { attempt });

            let connected = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                result = self.connect() => result,
            };

            let error = match connected {
                Ok(ws) => {
                    self.stats.record_connect();
                    self.transition(StreamState::Connected);
                    tracing::info!(pair = %self.pair, attempt, "Order book stream connected");

                    match self.drive(ws, &cancel, &mut backoff).await {
                        Ok(()) => break,
                        Err(e) => {
                            self.record_loss(&e);
                            e
                        }
                    }
                }
                Err(e) => e,
            };

            if cancel.is_cancelled() {
                break;
            }

            tracing::warn!(pair = %self.pair, error = %error, "Order book stream lost");
            self.transition(StreamState::Errored {
                reason: error.to_string(),
            });

            let delay = backoff.next_delay();
            self.stats.record_backoff_wait();
            self.transition(StreamState::BackoffWait { delay });
            tracing::info!(pair = %self.pair, delay_ms = delay.as_millis() as u64, "Reconnecting after backoff");

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = sleep(delay) => {}
            }
        }

        self.transition(StreamState::Cancelled);
        tracing::info!(pair = %self.pair, "Order book stream stopped");
    }

    async fn connect(&self) -> Result<WsStream, StreamError> {
        match timeout(self.config.connect_timeout, connect_async(self.url.as_str())).await {
            Ok(Ok((ws, _response))) => Ok(ws),
            Ok(Err(e)) => Err(StreamError::Connect(e)),
            Err(_) => Err(StreamError::ConnectTimeout(self.config.connect_timeout)),
        }
    }

    /// Pump one open connection.
    ///
    /// `Ok(())` means cancellation was requested; every other exit is an error
    /// that sends the supervisor through backoff. The backoff only restarts
    /// from `reconnect_delay` once the connection has delivered a snapshot,
    /// so an endpoint that accepts and drops straight away keeps doubling.
    async fn drive(
        &self,
        ws: WsStream,
        cancel: &CancellationToken,
        backoff: &mut Backoff,
    ) -> Result<(), StreamError> {
        let (sink, mut read) = ws.split();

        let stop = cancel.child_token();
        let mut pinger = tokio::spawn(heartbeat::run(
            sink,
            self.config.ping_interval,
            stop.clone(),
            Arc::clone(&self.stats),
            self.pair.clone(),
        ));

        let inactivity = self.config.inactivity_timeout;
        let watchdog = sleep(inactivity);
        tokio::pin!(watchdog);

        let mut healthy = false;

        let outcome = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break Ok(()),
                joined = &mut pinger => {
                    break Err(match joined {
                        Ok(Err(e)) => e,
                        _ => StreamError::HeartbeatStopped,
                    });
                }
                frame = read.next() => {
                    // Any inbound frame, control frames included, proves the link is alive
                    watchdog.as_mut().reset(Instant::now() + inactivity);

                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            if self.handle_text(text.as_str()) && !healthy {
                                healthy = true;
                                backoff.reset();
                            }
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let reason = frame
                                .map(|f| f.reason.as_str().to_string())
                                .filter(|r| !r.is_empty());
                            break Err(StreamError::RemoteClosed(reason));
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => break Err(StreamError::Read(e)),
                        None => break Err(StreamError::RemoteClosed(None)),
                    }
                }
                _ = &mut watchdog => break Err(StreamError::Inactive(inactivity)),
            }
        };

        stop.cancel();
        if !pinger.is_finished() && timeout(HEARTBEAT_SHUTDOWN, &mut pinger).await.is_err() {
            pinger.abort();
        }

        outcome
    }

    /// Counts one lost connection exactly once, whatever ended it
    fn record_loss(&self, error: &StreamError) {
        self.stats.record_disconnect();
        if error.is_inactivity() {
            self.stats.record_inactivity_timeout();
        } else if error.is_remote_close() {
            self.stats.record_remote_close();
        }
    }

    /// Returns whether the frame produced a snapshot
    fn handle_text(&self, text: &str) -> bool {
        match self.parser.parse(&self.pair, text) {
            Ok(snapshot) => {
                tracing::debug!(
                    pair = %self.pair,
                    bid = ?snapshot.best_bid_price(),
                    ask = ?snapshot.best_ask_price(),
                    "Order book snapshot"
                );
                self.stats.record_snapshot();
                self.store.replace(snapshot.clone());
                if let Some(callback) = &self.on_snapshot {
                    callback(&snapshot);
                }
                true
            }
            Err(rejection) => {
                self.stats.record_rejected_frame();
                if rejection.is_malformed() {
                    tracing::warn!(pair = %self.pair, reason = %rejection, "Dropping order book frame");
                } else {
                    tracing::debug!(pair = %self.pair, reason = %rejection, "Dropping order book frame");
                }
                false
            }
        }
    }

    fn transition(&self, next: StreamState) {
        tracing::debug!(pair = %self.pair, state = next.name(), "Stream state change");
        self.state.send_replace(next);
    }
}
