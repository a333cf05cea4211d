use crossrate_core::{OrderBookSnapshot, PairId};

/// Write side of the latest-snapshot table
/// Supervisors depend on this abstraction, not on the concrete store
pub trait SnapshotWriter: Send + Sync {
    /// Last-writer-wins replace of the pair's entry
    fn replace(&self, snapshot: OrderBookSnapshot);
}

/// Read side of the latest-snapshot table
/// Handed to the rate computer, which never writes
pub trait SnapshotReader: Send + Sync {
    fn latest(&self, pair: &PairId) -> Option<OrderBookSnapshot>;
}
