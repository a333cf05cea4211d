//! Crossrate Core Domain
//!
//! Pure domain types for the crossrate streamer: per-pair best bid/ask
//! snapshots and the directional exchange rates derived from two of them.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod rate;
pub mod snapshot;
pub mod values;

// Re-export commonly used types at crate root
pub use rate::{ConversionDirection, ConversionRoute, ExchangeRate};
pub use snapshot::{BookLevel, OrderBookSnapshot};
pub use values::{PairId, Price, Quantity, Timestamp};
