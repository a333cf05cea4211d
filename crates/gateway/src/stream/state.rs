use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Lifecycle state of one pair's stream
/// Published on a watch channel every time the supervisor transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamState {
    /// Not yet started
    Disconnected,
    /// Opening the WebSocket (1-based attempt since the supervisor started)
    Connecting { attempt: u32 },
    /// Heartbeat and inbound processing running
    Connected,
    /// Connection lost: transport error, inactivity, or remote close
    Errored { reason: String },
    /// Waiting before the next connection attempt
    BackoffWait { delay: Duration },
    /// Stopped by cancellation; never left
    Cancelled,
}

impl StreamState {
    pub fn name(&self) -> &'static str {
        match self {
            StreamState::Disconnected => "disconnected",
            StreamState::Connecting { .. } => "connecting",
            StreamState::Connected => "connected",
            StreamState::Errored { .. } => "errored",
            StreamState::BackoffWait { .. } => "backoff_wait",
            StreamState::Cancelled => "cancelled",
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, StreamState::Connected)
    }
}

/// Running counters for one supervisor
/// Shared with observers while the supervisor runs
#[derive(Debug, Default)]
pub struct StreamStats {
    connects: AtomicU64,
    disconnects: AtomicU64,
    inactivity_timeouts: AtomicU64,
    remote_closes: AtomicU64,
    backoff_waits: AtomicU64,
    snapshots: AtomicU64,
    rejected_frames: AtomicU64,
    pings_sent: AtomicU64,
}

impl StreamStats {
    /// Successful handshakes
    pub fn connects(&self) -> u64 {
        self.connects.load(Ordering::Relaxed)
    }

    /// Connections that left `Connected` through any error path
    pub fn disconnects(&self) -> u64 {
        self.disconnects.load(Ordering::Relaxed)
    }

    pub fn inactivity_timeouts(&self) -> u64 {
        self.inactivity_timeouts.load(Ordering::Relaxed)
    }

    pub fn remote_closes(&self) -> u64 {
        self.remote_closes.load(Ordering::Relaxed)
    }

    /// Entries into `BackoffWait`, one per failed connection or attempt
    pub fn backoff_waits(&self) -> u64 {
        self.backoff_waits.load(Ordering::Relaxed)
    }

    /// Frames that produced a snapshot
    pub fn snapshots(&self) -> u64 {
        self.snapshots.load(Ordering::Relaxed)
    }

    /// Text frames dropped by the parser
    pub fn rejected_frames(&self) -> u64 {
        self.rejected_frames.load(Ordering::Relaxed)
    }

    pub fn pings_sent(&self) -> u64 {
        self.pings_sent.load(Ordering::Relaxed)
    }

    pub(crate) fn record_connect(&self) {
        self.connects.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_disconnect(&self) {
        self.disconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_inactivity_timeout(&self) {
        self.inactivity_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_remote_close(&self) {
        self.remote_closes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_backoff_wait(&self) {
        self.backoff_waits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_snapshot(&self) {
        self.snapshots.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected_frame(&self) {
        self.rejected_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_ping(&self) {
        self.pings_sent.fetch_add(1, Ordering::Relaxed);
    }
}
