//! Crossrate Gateway
//!
//! Everything that talks to the exchange:
//! - Per-pair order-book WebSocket supervision (heartbeat, inactivity
//!   watchdog, backoff reconnects)
//! - Frame parsing into best bid/ask snapshots
//! - Trading-pair discovery over REST
//!
//! ## Architecture
//!
//! ```text
//!   /api/tradingPairs ──► RestPairSource ──► pair list
//!
//!   order-book/{pair} ──► StreamSupervisor ──► SnapshotParser ──► SnapshotWriter
//!        (one per pair)          │                                     │
//!                                └── ping heartbeat          SnapshotCallback
//! ```

pub mod error;
pub mod parser;
pub mod rest;
pub mod stream;

pub use error::{Rejection, StreamError};
pub use parser::SnapshotParser;
pub use rest::{ApiResponse, RestPairSource, TradingPair, pair_names};
pub use stream::{
    Backoff, SnapshotCallback, StreamConfig, StreamState, StreamStats, StreamSupervisor,
};
