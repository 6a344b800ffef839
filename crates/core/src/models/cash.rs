use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::series::DailySeries;

/// A deposit (positive) or withdrawal (negative) on a broker account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashMovement {
    pub date: NaiveDate,
    pub change: f64,
    pub currency: String,
}

impl CashMovement {
    pub fn new(date: NaiveDate, change: f64, currency: impl Into<String>) -> Self {
        Self {
            date,
            change,
            currency: currency.into().to_uppercase(),
        }
    }
}

/// End-of-day cash balance of one currency on a broker account.
///
/// The series is forward-filled by the collaborator; lookups still fall back
/// to the most recent earlier date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashBalance {
    pub currency: String,
    pub balances: DailySeries,
}

impl CashBalance {
    pub fn new(currency: impl Into<String>, balances: DailySeries) -> Self {
        Self {
            currency: currency.into().to_uppercase(),
            balances,
        }
    }
}
