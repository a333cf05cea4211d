//! Crossrate Ports
//!
//! Port definitions (traits) for the crossrate streamer.
//! These define the boundaries between the streaming core and the
//! collaborators it is wired to: time, snapshot storage, the rate sink and
//! trading-pair discovery.

mod clock;
mod error;
mod pairs;
mod sink;
mod snapshots;

pub use clock::Clock;
pub use error::{PairSourceError, SinkError};
pub use pairs::PairSource;
pub use sink::ExchangeRateSink;
pub use snapshots::{SnapshotReader, SnapshotWriter};
