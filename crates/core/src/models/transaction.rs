use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "Buy"),
            Side::Sell => write!(f, "Sell"),
        }
    }
}

/// What produced a ledger entry.
///
/// Brokers book a stock split as a same-day sell of the old quantity and a
/// buy of the new one, tagged so it can be told apart from real trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransactionKind {
    #[default]
    Trade,
    Split,
}

/// A single broker-sourced ledger entry. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub instrument_id: String,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub kind: TransactionKind,
    pub side: Side,
    /// Quantity as reported by the broker. Its sign is not trusted;
    /// use [`Transaction::signed_quantity`].
    pub quantity: f64,
    /// Execution price per unit, in `currency`
    pub price: f64,
    pub currency: String,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        instrument_id: impl Into<String>,
        timestamp: NaiveDateTime,
        kind: TransactionKind,
        side: Side,
        quantity: f64,
        price: f64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            instrument_id: instrument_id.into(),
            timestamp,
            kind,
            side,
            quantity,
            price,
            currency: currency.into().to_uppercase(),
        }
    }

    /// Convenience constructor for a regular buy.
    pub fn buy(
        id: impl Into<String>,
        instrument_id: impl Into<String>,
        timestamp: NaiveDateTime,
        quantity: f64,
        price: f64,
        currency: impl Into<String>,
    ) -> Self {
        Self::new(id, instrument_id, timestamp, TransactionKind::Trade, Side::Buy, quantity, price, currency)
    }

    /// Convenience constructor for a regular sell.
    pub fn sell(
        id: impl Into<String>,
        instrument_id: impl Into<String>,
        timestamp: NaiveDateTime,
        quantity: f64,
        price: f64,
        currency: impl Into<String>,
    ) -> Self {
        Self::new(id, instrument_id, timestamp, TransactionKind::Trade, Side::Sell, quantity, price, currency)
    }

    /// Buys are positive, sells negative.
    #[must_use]
    pub fn signed_quantity(&self) -> f64 {
        match self.side {
            Side::Buy => self.quantity.abs(),
            Side::Sell => -self.quantity.abs(),
        }
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    #[must_use]
    pub fn is_split(&self) -> bool {
        self.kind == TransactionKind::Split
    }
}
