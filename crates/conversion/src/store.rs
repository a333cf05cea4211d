use dashmap::DashMap;

use crossrate_core::{OrderBookSnapshot, PairId};
use crossrate_ports::{SnapshotReader, SnapshotWriter};

/// Latest snapshot per pair.
///
/// `DashMap` shards by pair, so supervisors writing different pairs never
/// block each other and a reader only contends with the writer of the key
/// it reads. Entries are replaced whole, never merged.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshots: DashMap<PairId, OrderBookSnapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        SnapshotStore {
            snapshots: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Pairs with at least one stored snapshot, sorted
    pub fn pairs(&self) -> Vec<PairId> {
        let mut pairs: Vec<PairId> = self.snapshots.iter().map(|e| e.key().clone()).collect();
        pairs.sort();
        pairs
    }
}

impl SnapshotWriter for SnapshotStore {
    fn replace(&self, snapshot: OrderBookSnapshot) {
        self.snapshots.insert(snapshot.pair.clone(), snapshot);
    }
}

impl SnapshotReader for SnapshotStore {
    fn latest(&self, pair: &PairId) -> Option<OrderBookSnapshot> {
        self.snapshots.get(pair).map(|entry| entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crossrate_core::BookLevel;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::thread;

    fn snapshot(pair: &str, bid: rust_decimal::Decimal) -> OrderBookSnapshot {
        OrderBookSnapshot::new(
            PairId::from(pair),
            BookLevel::price_only(bid),
            BookLevel::price_only(bid + dec!(1)),
            Utc::now(),
        )
    }

    #[test]
    fn test_latest_is_none_before_first_write() {
        let store = SnapshotStore::new();
        assert!(store.latest(&PairId::from("BTC_EUR")).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_supersedes_whole_entry() {
        let store = SnapshotStore::new();
        store.replace(snapshot("BTC_EUR", dec!(100)));

        let mut second = snapshot("BTC_EUR", dec!(200));
        second.best_ask = None;
        store.replace(second.clone());

        // Invalid snapshots are still stored; the old ask is not carried over
        let latest = store.latest(&PairId::from("BTC_EUR")).unwrap();
        assert_eq!(latest, second);
        assert!(!latest.is_valid());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_pairs_are_independent() {
        let store = SnapshotStore::new();
        store.replace(snapshot("BTC_EUR", dec!(100)));
        store.replace(snapshot("BTC_CZK", dec!(2500)));

        assert_eq!(
            store.pairs(),
            vec![PairId::from("BTC_CZK"), PairId::from("BTC_EUR")]
        );
        assert_eq!(
            store
                .latest(&PairId::from("BTC_CZK"))
                .and_then(|s| s.best_bid_price()),
            Some(dec!(2500))
        );
    }

    #[test]
    fn test_concurrent_writers_on_separate_keys() {
        let store = Arc::new(SnapshotStore::new());
        let handles: Vec<_> = ["BTC_EUR", "BTC_CZK", "LTC_EUR", "ETH_EUR"]
            .into_iter()
            .map(|pair| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 1..=500 {
                        store.replace(snapshot(pair, rust_decimal::Decimal::from(i)));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 4);
        for pair in store.pairs() {
            assert_eq!(
                store.latest(&pair).and_then(|s| s.best_bid_price()),
                Some(dec!(500))
            );
        }
    }
}
