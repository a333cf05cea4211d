//! Crossrate Conversion
//!
//! The consuming side of the streams:
//!
//! ```text
//! supervisors ──replace──► SnapshotStore ◄──latest── RateComputer ──append──► ExchangeRateSink
//!  (one per pair)           (per-pair entries)        (two pairs, X and Y)     (JSON lines / memory)
//! ```
//!
//! The computer reads the two pairs independently; a rate may combine
//! snapshots that were never simultaneously the latest.

pub mod computer;
pub mod format;
pub mod sink;
pub mod store;

pub use computer::{RATE_PRECISION, RateComputer};
pub use format::format_decimal;
pub use sink::{JsonLinesSink, MemorySink};
pub use store::SnapshotStore;
