use serde::{Deserialize, Serialize};

use crate::values::{PairId, Price, Quantity, Timestamp};

/// One side's best price level as picked from a book frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: Price,
    /// Only carried when the frame gave a numeric amount for this level
    pub amount: Option<Quantity>,
}

impl BookLevel {
    pub fn new(price: Price, amount: Option<Quantity>) -> Self {
        BookLevel { price, amount }
    }

    pub fn price_only(price: Price) -> Self {
        BookLevel {
            price,
            amount: None,
        }
    }
}

/// Best bid/ask summary for one pair at one point in time
///
/// Immutable once built. A newer snapshot for the same pair supersedes it
/// entirely; fields are never merged across snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub pair: PairId,
    pub best_bid: Option<BookLevel>,
    pub best_ask: Option<BookLevel>,
    pub received_at: Timestamp,
}

impl OrderBookSnapshot {
    pub fn new(
        pair: PairId,
        best_bid: BookLevel,
        best_ask: BookLevel,
        received_at: Timestamp,
    ) -> Self {
        OrderBookSnapshot {
            pair,
            best_bid: Some(best_bid),
            best_ask: Some(best_ask),
            received_at,
        }
    }

    pub fn best_bid_price(&self) -> Option<Price> {
        self.best_bid.map(|level| level.price)
    }

    pub fn best_bid_amount(&self) -> Option<Quantity> {
        self.best_bid.and_then(|level| level.amount)
    }

    pub fn best_ask_price(&self) -> Option<Price> {
        self.best_ask.map(|level| level.price)
    }

    pub fn best_ask_amount(&self) -> Option<Quantity> {
        self.best_ask.and_then(|level| level.amount)
    }

    /// Both prices present and strictly positive.
    ///
    /// Consumers must ignore snapshots for which this is false, even when
    /// they are the latest stored value for the pair.
    pub fn is_valid(&self) -> bool {
        matches!(
            (self.best_bid_price(), self.best_ask_price()),
            (Some(bid), Some(ask)) if bid > Price::ZERO && ask > Price::ZERO
        )
    }
}
