use std::sync::Arc;
use std::time::Duration;

use crossrate_core::PairId;
use futures_util::SinkExt;
use futures_util::stream::SplitSink;
use tokio::net::TcpStream;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use super::state::StreamStats;
use crate::error::StreamError;

pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
pub(crate) type WsSink = SplitSink<WsStream, Message>;

/// Ping frames carry a single byte
const PING_PAYLOAD: [u8; 1] = [1];

/// Upper bound on the close handshake once the connection is torn down
const CLOSE_TIMEOUT: Duration = Duration::from_millis(500);

/// Owns the write half of one connection.
///
/// Sends a ping every `period` until `stop` fires, then sends a close frame.
/// Returns an error only when a ping could not be written.
pub(crate) async fn run(
    mut sink: WsSink,
    period: Duration,
    stop: CancellationToken,
    stats: Arc<StreamStats>,
    pair: PairId,
) -> Result<(), StreamError> {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::debug!(pair = %pair, "Starting ping heartbeat");

    loop {
        tokio::select! {
            biased;
            _ = stop.cancelled() => {
                let close = async {
                    let _ = sink.send(Message::Close(None)).await;
                    let _ = sink.close().await;
                };
                let _ = tokio::time::timeout(CLOSE_TIMEOUT, close).await;
                return Ok(());
            }
            _ = ticker.tick() => {
                if let Err(e) = sink.send(Message::Ping(PING_PAYLOAD.to_vec().into())).await {
                    tracing::debug!(pair = %pair, error = %e, "Ping send failed");
                    return Err(StreamError::Send(e));
                }
                stats.record_ping();
                tracing::trace!(pair = %pair, "Ping sent");
            }
        }
    }
}
