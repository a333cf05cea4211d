use std::str::FromStr;
use std::sync::Arc;

use crossrate_core::{BookLevel, OrderBookSnapshot, PairId, Price};
use crossrate_ports::Clock;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::Rejection;

/// Event name carried by frames with book data
const DATA_EVENT: &str = "data";

#[derive(Debug, Clone, Copy)]
enum BookSide {
    Bid,
    Ask,
}

/// Decodes order-book text frames into best bid/ask snapshots
///
/// Stateless apart from the clock used to stamp `received_at`.
/// Frame shape:
///
/// ```json
/// { "event": "data", "payload": { "bids": [{"price": 1, "amount": 2}], "asks": [...] } }
/// ```
#[derive(Clone)]
pub struct SnapshotParser {
    clock: Arc<dyn Clock>,
}

impl SnapshotParser {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        SnapshotParser { clock }
    }

    /// Parse one raw frame for `pair`.
    ///
    /// Returns the reason for rejection instead of a snapshot when the frame
    /// is not book data, is malformed, or lacks a numeric price on either side.
    pub fn parse(&self, pair: &PairId, raw: &str) -> Result<OrderBookSnapshot, Rejection> {
        let root: Value =
            serde_json::from_str(raw).map_err(|e| Rejection::Malformed(e.to_string()))?;

        if let Some(event) = root.get("event").filter(|v| !v.is_null()) {
            let is_data = event
                .as_str()
                .is_some_and(|name| name.eq_ignore_ascii_case(DATA_EVENT));
            if !is_data {
                let name = event
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| event.to_string());
                return Err(Rejection::NotData(name));
            }
        }

        let payload = root.get("payload").ok_or(Rejection::MissingPayload)?;

        let best_bid = pick_best(payload.get("bids"), BookSide::Bid).ok_or(Rejection::NoBid)?;
        let best_ask = pick_best(payload.get("asks"), BookSide::Ask).ok_or(Rejection::NoAsk)?;

        Ok(OrderBookSnapshot::new(
            pair.clone(),
            best_bid,
            best_ask,
            self.clock.now(),
        ))
    }
}

/// Highest bid or lowest ask among entries with a numeric price.
/// Equal prices keep the first entry seen.
fn pick_best(levels: Option<&Value>, side: BookSide) -> Option<BookLevel> {
    let levels = levels?.as_array()?;
    let mut best: Option<BookLevel> = None;

    for level in levels {
        let Some(price) = level.get("price").and_then(decimal_from_json) else {
            continue;
        };

        let improves = match (best, side) {
            (None, _) => true,
            (Some(current), BookSide::Bid) => price > current.price,
            (Some(current), BookSide::Ask) => price < current.price,
        };

        if improves {
            let amount = level.get("amount").and_then(decimal_from_json);
            best = Some(BookLevel::new(price, amount));
        }
    }

    best
}

/// JSON numbers only; numeric strings are not accepted
fn decimal_from_json(value: &Value) -> Option<Price> {
    let Value::Number(number) = value else {
        return None;
    };

    if let Some(i) = number.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = number.as_u64() {
        return Some(Decimal::from(u));
    }

    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crossrate_clock::FixedClock;
    use rust_decimal_macros::dec;

    fn parser() -> SnapshotParser {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        SnapshotParser::new(Arc::new(FixedClock::new(at)))
    }

    fn pair() -> PairId {
        PairId::from("BTC_EUR")
    }

    #[test]
    fn test_picks_highest_bid_and_lowest_ask() {
        let frame = r#"{
            "event": "data",
            "payload": {
                "bids": [{"price": 100}, {"price": 105}, {"price": 90}],
                "asks": [{"price": 110}, {"price": 108}]
            }
        }"#;

        let snapshot = parser().parse(&pair(), frame).unwrap();
        assert_eq!(snapshot.pair, pair());
        assert_eq!(snapshot.best_bid_price(), Some(dec!(105)));
        assert_eq!(snapshot.best_ask_price(), Some(dec!(108)));
        assert_eq!(
            snapshot.received_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_amount_follows_chosen_level() {
        let frame = r#"{
            "event": "data",
            "payload": {
                "bids": [{"price": 99.5, "amount": 0.25}, {"price": 101.25, "amount": 1.5}],
                "asks": [{"price": 102, "amount": "n/a"}, {"price": 103, "amount": 4}]
            }
        }"#;

        let snapshot = parser().parse(&pair(), frame).unwrap();
        assert_eq!(snapshot.best_bid_price(), Some(dec!(101.25)));
        assert_eq!(snapshot.best_bid_amount(), Some(dec!(1.5)));
        // Non-numeric amount leaves the amount absent but keeps the price
        assert_eq!(snapshot.best_ask_price(), Some(dec!(102)));
        assert_eq!(snapshot.best_ask_amount(), None);
    }

    #[test]
    fn test_non_data_event_is_rejected() {
        for event in ["subscribe_success", "ping", "error", "DATAX"] {
            let frame = format!(
                r#"{{"event":"{event}","payload":{{"bids":[{{"price":1}}],"asks":[{{"price":2}}]}}}}"#
            );
            assert_eq!(
                parser().parse(&pair(), &frame),
                Err(Rejection::NotData(event.to_string()))
            );
        }
    }

    #[test]
    fn test_non_string_event_is_rejected() {
        let frame = r#"{"event": 7, "payload": {"bids": [{"price": 1}], "asks": [{"price": 2}]}}"#;
        assert_eq!(
            parser().parse(&pair(), frame),
            Err(Rejection::NotData("7".to_string()))
        );
    }

    #[test]
    fn test_event_match_is_case_insensitive() {
        let frame = r#"{"event": "DATA", "payload": {"bids": [{"price": 1}], "asks": [{"price": 2}]}}"#;
        assert!(parser().parse(&pair(), frame).is_ok());
    }

    #[test]
    fn test_absent_event_is_treated_as_data() {
        let frame = r#"{"payload": {"bids": [{"price": 1}], "asks": [{"price": 2}]}}"#;
        assert!(parser().parse(&pair(), frame).is_ok());

        let frame = r#"{"event": null, "payload": {"bids": [{"price": 1}], "asks": [{"price": 2}]}}"#;
        assert!(parser().parse(&pair(), frame).is_ok());
    }

    #[test]
    fn test_missing_payload_is_rejected() {
        assert_eq!(
            parser().parse(&pair(), r#"{"event": "data"}"#),
            Err(Rejection::MissingPayload)
        );
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let frame = r#"{
            "event": "data",
            "payload": {
                "bids": [{"price": "120"}, {"amount": 3}, {"price": null}, {"price": 95}],
                "asks": [{"price": true}, {"price": 97}]
            }
        }"#;

        let snapshot = parser().parse(&pair(), frame).unwrap();
        assert_eq!(snapshot.best_bid_price(), Some(dec!(95)));
        assert_eq!(snapshot.best_ask_price(), Some(dec!(97)));
    }

    #[test]
    fn test_side_without_numeric_price_rejects_frame() {
        let no_bids = r#"{"event": "data", "payload": {"bids": [{"price": "x"}], "asks": [{"price": 2}]}}"#;
        assert_eq!(parser().parse(&pair(), no_bids), Err(Rejection::NoBid));

        let empty_asks = r#"{"event": "data", "payload": {"bids": [{"price": 1}], "asks": []}}"#;
        assert_eq!(parser().parse(&pair(), empty_asks), Err(Rejection::NoAsk));

        let asks_not_array = r#"{"event": "data", "payload": {"bids": [{"price": 1}], "asks": {}}}"#;
        assert_eq!(parser().parse(&pair(), asks_not_array), Err(Rejection::NoAsk));
    }

    #[test]
    fn test_ties_keep_first_entry() {
        let frame = r#"{
            "event": "data",
            "payload": {
                "bids": [{"price": 100, "amount": 1}, {"price": 100, "amount": 2}],
                "asks": [{"price": 101, "amount": 3}, {"price": 101.0, "amount": 4}]
            }
        }"#;

        let snapshot = parser().parse(&pair(), frame).unwrap();
        assert_eq!(snapshot.best_bid_amount(), Some(dec!(1)));
        assert_eq!(snapshot.best_ask_amount(), Some(dec!(3)));
    }

    #[test]
    fn test_malformed_frames_are_rejected_not_raised() {
        for raw in ["", "not json", "{\"event\":", "[1,2,3]", "42"] {
            let result = parser().parse(&pair(), raw);
            assert!(result.is_err(), "expected rejection for {raw:?}");
        }
        assert!(parser().parse(&pair(), "not json").unwrap_err().is_malformed());
    }

    #[test]
    fn test_decimal_precision_is_kept() {
        let frame = r#"{"event":"data","payload":{"bids":[{"price":1234567.12345678}],"asks":[{"price":0.00000001}]}}"#;
        let snapshot = parser().parse(&pair(), frame).unwrap();
        assert_eq!(snapshot.best_bid_price(), Some(dec!(1234567.12345678)));
        assert_eq!(snapshot.best_ask_price(), Some(dec!(0.00000001)));
    }
}
