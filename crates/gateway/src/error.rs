//! Error types for the gateway crate

use std::time::Duration;

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Transport-level errors
///
/// Every variant ends the current connection and sends the supervisor
/// through backoff; none of them stops the stream.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Connection failed: {0}")]
    Connect(#[source] tungstenite::Error),

    #[error("Connection attempt timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("Read failed: {0}")]
    Read(#[source] tungstenite::Error),

    #[error("Send failed: {0}")]
    Send(#[source] tungstenite::Error),

    #[error("Remote closed the connection{}", .0.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
    RemoteClosed(Option<String>),

    #[error("No inbound activity for {0:?}")]
    Inactive(Duration),

    #[error("Heartbeat stopped")]
    HeartbeatStopped,
}

impl StreamError {
    pub fn is_inactivity(&self) -> bool {
        matches!(self, StreamError::Inactive(_))
    }

    pub fn is_remote_close(&self) -> bool {
        matches!(self, StreamError::RemoteClosed(_))
    }
}

/// Why a text frame produced no snapshot
///
/// Rejections never end the stream; the frame is dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Malformed frame: {0}")]
    Malformed(String),

    #[error("Ignored event: {0}")]
    NotData(String),

    #[error("Frame has no payload")]
    MissingPayload,

    #[error("No numeric bid price")]
    NoBid,

    #[error("No numeric ask price")]
    NoAsk,
}

impl Rejection {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Rejection::Malformed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_closed_display() {
        assert_eq!(
            StreamError::RemoteClosed(None).to_string(),
            "Remote closed the connection"
        );
        assert_eq!(
            StreamError::RemoteClosed(Some("going away".to_string())).to_string(),
            "Remote closed the connection: going away"
        );
    }

    #[test]
    fn test_classification() {
        assert!(StreamError::Inactive(Duration::from_secs(45)).is_inactivity());
        assert!(!StreamError::HeartbeatStopped.is_inactivity());
        assert!(StreamError::RemoteClosed(None).is_remote_close());
        assert!(Rejection::Malformed("eof".into()).is_malformed());
        assert!(!Rejection::NoBid.is_malformed());
    }
}
