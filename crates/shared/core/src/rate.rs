use serde::{Deserialize, Serialize};
use std::fmt;

use crate::values::{PairId, Price, Quantity, Timestamp};

/// Named conversion direction between two quote currencies
///
/// Serialized as a single label such as `EUR_TO_CZK`. A route yields exactly
/// two of them, see [`ConversionRoute::forward`] and
/// [`ConversionRoute::backward`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ConversionDirection {
    from: String,
    to: String,
}

impl ConversionDirection {
    const SEPARATOR: &'static str = "_TO_";

    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        ConversionDirection {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn from_currency(&self) -> &str {
        &self.from
    }

    pub fn to_currency(&self) -> &str {
        &self.to
    }

    pub fn reversed(&self) -> Self {
        ConversionDirection::new(self.to.clone(), self.from.clone())
    }
}

impl fmt::Display for ConversionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.from, Self::SEPARATOR, self.to)
    }
}

impl From<ConversionDirection> for String {
    fn from(direction: ConversionDirection) -> Self {
        direction.to_string()
    }
}

impl TryFrom<String> for ConversionDirection {
    type Error = String;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        match label.split_once(Self::SEPARATOR) {
            Some((from, to)) if !from.is_empty() && !to.is_empty() => {
                Ok(ConversionDirection::new(from, to))
            }
            _ => Err(format!("invalid conversion direction: {label}")),
        }
    }
}

/// The two distinguished pairs a cross rate is derived from
///
/// Both pairs share a base asset; `source` is priced in the currency being
/// converted from (X), `target` in the currency being converted to (Y).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRoute {
    pub source: PairId,
    pub target: PairId,
}

impl ConversionRoute {
    pub const DEFAULT_SOURCE: &'static str = "BTC_EUR";
    pub const DEFAULT_TARGET: &'static str = "BTC_CZK";

    pub fn new(source: impl Into<PairId>, target: impl Into<PairId>) -> Self {
        ConversionRoute {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Intermediate asset bought on one book and sold on the other
    pub fn base_currency(&self) -> &str {
        self.source.base_currency()
    }

    /// Source quote currency into target quote currency (`EUR_TO_CZK`)
    pub fn forward(&self) -> ConversionDirection {
        ConversionDirection::new(self.source.quote_currency(), self.target.quote_currency())
    }

    /// Target quote currency into source quote currency (`CZK_TO_EUR`)
    pub fn backward(&self) -> ConversionDirection {
        self.forward().reversed()
    }
}

impl Default for ConversionRoute {
    fn default() -> Self {
        ConversionRoute::new(Self::DEFAULT_SOURCE, Self::DEFAULT_TARGET)
    }
}

/// One emitted directional rate
///
/// The amounts are those of the two book levels the direction trades
/// against, so they differ between the two directions of one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub direction: ConversionDirection,
    pub rate: Price,
    pub source_bid_amount: Option<Quantity>,
    pub source_ask_amount: Option<Quantity>,
    pub computed_at: Timestamp,
}
