use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle stage of a dividend event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DividendType {
    Paid,
    Announced,
    Forecasted,
    /// Ex-dividend date marker; carries no cash
    ExDividend,
}

impl DividendType {
    /// Announced and forecasted dividends are expected but not yet received.
    #[must_use]
    pub fn is_projected(&self) -> bool {
        matches!(self, DividendType::Announced | DividendType::Forecasted)
    }
}

impl std::fmt::Display for DividendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DividendType::Paid => write!(f, "PAID"),
            DividendType::Announced => write!(f, "ANNOUNCED"),
            DividendType::Forecasted => write!(f, "FORECASTED"),
            DividendType::ExDividend => write!(f, "EX_DIVIDEND"),
        }
    }
}

/// One raw dividend line as booked by a broker.
///
/// A dividend and its withholding tax arrive as separate lines on the same
/// date: the payout positive, the tax negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendFlow {
    pub dividend_type: DividendType,
    pub payment_date: NaiveDate,
    pub symbol: String,
    pub name: String,
    pub currency: String,
    pub change: f64,
}

impl DividendFlow {
    pub fn new(
        dividend_type: DividendType,
        payment_date: NaiveDate,
        symbol: impl Into<String>,
        name: impl Into<String>,
        currency: impl Into<String>,
        change: f64,
    ) -> Self {
        Self {
            dividend_type,
            payment_date,
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            currency: currency.into().to_uppercase(),
            change,
        }
    }
}

/// A dividend with its taxes folded in, one per (payment date, symbol).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dividend {
    pub dividend_type: DividendType,
    pub payment_date: NaiveDate,
    pub symbol: String,
    pub name: String,
    pub currency: String,
    /// Gross payout (sum of positive flows), in `currency`
    pub amount: f64,
    /// Withheld taxes (sum of |negative flows|), in `currency`
    pub taxes: f64,
    /// `amount` in the base currency; `None` when no FX rate was available
    pub base_currency_amount: Option<f64>,
    /// `taxes` in the base currency, at the same rate
    #[serde(default)]
    pub base_currency_taxes: Option<f64>,
}

/// Dividends paid or expected on a single day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    pub day: u32,
    pub total: f64,
    pub dividends: Vec<Dividend>,
}

/// One calendar month. Months without any dividend are present with zero totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    /// `YYYY-MM`
    pub key: String,
    /// Received dividends, base currency
    pub paid_total: f64,
    /// Announced + forecasted dividends, base currency
    pub projected_total: f64,
    /// Withheld taxes on received dividends, base currency
    pub taxes_total: f64,
    pub days: BTreeMap<u32, DayBucket>,
}

impl CalendarMonth {
    pub fn empty(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            key: format!("{year:04}-{month:02}"),
            paid_total: 0.0,
            projected_total: 0.0,
            taxes_total: 0.0,
            days: BTreeMap::new(),
        }
    }

    /// Everything the month is expected to bring in.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.paid_total + self.projected_total
    }
}

/// Continuous month-by-month dividend calendar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DividendCalendar {
    pub base_currency: String,
    pub months: Vec<CalendarMonth>,
}

/// Year → 12 monthly totals (index 0 = January).
pub type DividendGrowth = BTreeMap<i32, [f64; 12]>;

/// Share of received dividends coming from one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversificationSlice {
    pub symbol: String,
    pub name: String,
    /// Total received, base currency
    pub total: f64,
    /// total / Σ totals × 100
    pub percentage: f64,
}
