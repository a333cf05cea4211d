use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Price value - uses Decimal for precision
pub type Price = Decimal;

/// Quantity value - uses Decimal for precision
pub type Quantity = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Identifier of a tradable pair as the exchange names it (e.g. `BTC_EUR`)
///
/// The identifier is kept verbatim: it is interpolated into the stream URL,
/// so no case folding is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairId(String);

impl PairId {
    pub fn new(id: impl Into<String>) -> Self {
        PairId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `BTC` for `BTC_EUR`; the whole id when it has no separator
    pub fn base_currency(&self) -> &str {
        self.0.split_once('_').map_or(self.as_str(), |(base, _)| base)
    }

    /// `EUR` for `BTC_EUR`; the whole id when it has no separator
    pub fn quote_currency(&self) -> &str {
        self.0.rsplit_once('_').map_or(self.as_str(), |(_, quote)| quote)
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PairId {
    fn from(s: &str) -> Self {
        PairId::new(s)
    }
}

impl From<String> for PairId {
    fn from(s: String) -> Self {
        PairId::new(s)
    }
}

impl AsRef<str> for PairId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
