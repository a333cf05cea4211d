use std::sync::Arc;

use rust_decimal::RoundingStrategy;

use crossrate_core::{ConversionRoute, ExchangeRate, OrderBookSnapshot, PairId, Price};
use crossrate_ports::{Clock, ExchangeRateSink, SnapshotReader};

use crate::format::format_decimal;

/// Significant digits kept in every emitted rate
pub const RATE_PRECISION: u32 = 16;

/// Derives the two directional cross rates from the route's pairs.
///
/// With X = source (BTC priced in EUR) and Y = target (BTC priced in CZK):
///
/// ```text
/// EUR_TO_CZK = Y.bid / X.ask    buy BTC with EUR, sell it for CZK
/// CZK_TO_EUR = Y.ask / X.bid    buy BTC with CZK, sell it for EUR
/// ```
///
/// Direction labels come from the route's quote currencies, so a
/// `BTC_USD`/`BTC_GBP` route emits `USD_TO_GBP` and `GBP_TO_USD`.
///
/// X and Y are read one after the other without a common lock.
pub struct RateComputer {
    reader: Arc<dyn SnapshotReader>,
    sink: Arc<dyn ExchangeRateSink>,
    clock: Arc<dyn Clock>,
    route: ConversionRoute,
}

impl RateComputer {
    pub fn new(
        reader: Arc<dyn SnapshotReader>,
        sink: Arc<dyn ExchangeRateSink>,
        clock: Arc<dyn Clock>,
        route: ConversionRoute,
    ) -> Self {
        RateComputer {
            reader,
            sink,
            clock,
            route,
        }
    }

    pub fn route(&self) -> &ConversionRoute {
        &self.route
    }

    /// Run one computation cycle after `pair` received a snapshot.
    ///
    /// Returns the emitted records, or `None` when either route pair has no
    /// valid snapshot. Sink failures are logged and do not change the result.
    pub fn on_snapshot_update(&self, pair: &PairId) -> Option<[ExchangeRate; 2]> {
        if let Some(updated) = self.reader.latest(pair) {
            log_book(&updated);
        }

        let source = self.reader.latest(&self.route.source).filter(|s| s.is_valid())?;
        let target = self.reader.latest(&self.route.target).filter(|s| s.is_valid())?;

        let rates = self.compute(&source, &target)?;
        self.log_rates(&source, &target, &rates);

        for rate in &rates {
            if let Err(e) = self.sink.append(rate) {
                tracing::warn!(direction = %rate.direction, error = %e, "Failed to persist exchange rate");
            }
        }

        Some(rates)
    }

    fn compute(
        &self,
        source: &OrderBookSnapshot,
        target: &OrderBookSnapshot,
    ) -> Option<[ExchangeRate; 2]> {
        let source_bid = source.best_bid_price()?;
        let source_ask = source.best_ask_price()?;
        let target_bid = target.best_bid_price()?;
        let target_ask = target.best_ask_price()?;

        let forward = divide(target_bid, source_ask)?;
        let backward = divide(target_ask, source_bid)?;
        let computed_at = self.clock.now();

        Some([
            ExchangeRate {
                direction: self.route.forward(),
                rate: forward,
                source_bid_amount: target.best_bid_amount(),
                source_ask_amount: source.best_ask_amount(),
                computed_at,
            },
            ExchangeRate {
                direction: self.route.backward(),
                rate: backward,
                source_bid_amount: source.best_bid_amount(),
                source_ask_amount: target.best_ask_amount(),
                computed_at,
            },
        ])
    }

    fn log_rates(
        &self,
        source: &OrderBookSnapshot,
        target: &OrderBookSnapshot,
        rates: &[ExchangeRate; 2],
    ) {
        let from = self.route.source.quote_currency();
        let to = self.route.target.quote_currency();
        let base = self.route.base_currency();
        let fmt = |price: Option<Price>| price.map(format_decimal).unwrap_or_default();

        tracing::info!(
            "{from}→{to} via {base}: 1 {from} ≈ {} {to} (buy {base} @ {} {from}, sell {base} @ {} {to})",
            format_decimal(rates[0].rate),
            fmt(source.best_ask_price()),
            fmt(target.best_bid_price()),
        );
        tracing::info!(
            "{to}→{from} via {base}: 1 {from} ≈ {} {to} (buy {base} @ {} {to}, sell {base} @ {} {from})",
            format_decimal(rates[1].rate),
            fmt(target.best_ask_price()),
            fmt(source.best_bid_price()),
        );
    }
}

/// Division rounded to `RATE_PRECISION` significant digits, half away from zero
fn divide(numerator: Price, denominator: Price) -> Option<Price> {
    numerator
        .checked_div(denominator)?
        .round_sf_with_strategy(RATE_PRECISION, RoundingStrategy::MidpointAwayFromZero)
        .map(|rate| rate.normalize())
}

fn log_book(snapshot: &OrderBookSnapshot) {
    if let (Some(bid), Some(ask)) = (snapshot.best_bid_price(), snapshot.best_ask_price()) {
        tracing::info!(
            "order_book [{}] bid={} ask={}",
            snapshot.pair,
            format_decimal(bid),
            format_decimal(ask)
        );
    }
}
