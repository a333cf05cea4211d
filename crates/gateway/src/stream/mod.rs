//! Per-pair streaming connection management
//!
//! ```text
//! Disconnected ─► Connecting ─► Connected ─► Errored ─► BackoffWait ─┐
//!                     ▲              │ (close, read error,           │
//!                     │              │  inactivity, heartbeat)      │
//!                     └──────────────┴───────────────────────────────┘
//!
//!          cancellation from any state ─► Cancelled (no further retries)
//! ```

mod backoff;
mod config;
mod heartbeat;
mod state;
mod supervisor;

pub use backoff::Backoff;
pub use config::StreamConfig;
pub use state::{StreamState, StreamStats};
pub use supervisor::{SnapshotCallback, StreamSupervisor};
