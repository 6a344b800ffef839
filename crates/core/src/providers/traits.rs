use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::cash::{CashBalance, CashMovement};
use crate::models::dividend::DividendFlow;
use crate::models::fetched::Fetched;
use crate::models::fx::RatePoint;
use crate::models::instrument::Instrument;
use crate::models::quotation::QuotationSeries;
use crate::models::transaction::Transaction;

/// Data interface of one broker account (DeGiro, Bitvavo, IBKR, ...).
///
/// Implementations own connectivity, auth, persistence and retries. When the
/// broker is unreachable they may serve their last local copy wrapped in
/// [`Fetched::cached`]; `Err` is reserved for data that cannot be produced at all.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait BrokerSource: Send + Sync {
    /// Human-readable name of this broker (for logs/errors).
    fn name(&self) -> &str;

    /// Every instrument the account ever held.
    async fn instruments(&self) -> Result<Fetched<Vec<Instrument>>, CoreError>;

    /// Ledger entries for one instrument, in any order.
    async fn transactions(&self, instrument_id: &str) -> Result<Fetched<Vec<Transaction>>, CoreError>;

    /// Gap-filled daily closing prices for one instrument.
    async fn quotations(&self, instrument_id: &str) -> Result<Fetched<QuotationSeries>, CoreError>;

    /// Forward-filled end-of-day cash balance, one series per currency.
    async fn cash_balance_by_date(&self) -> Result<Fetched<Vec<CashBalance>>, CoreError>;

    /// Deposits (positive) and withdrawals (negative).
    async fn cash_deposits(&self) -> Result<Fetched<Vec<CashMovement>>, CoreError>;

    /// Raw dividend and dividend-tax lines.
    async fn dividends(&self) -> Result<Fetched<Vec<DividendFlow>>, CoreError>;
}

/// Historical currency conversion oracle.
///
/// Synchronous on purpose: the valuation pipeline calls it once per
/// instrument per day. Rates are loaded up front (see [`FxRateProvider`]).
pub trait CurrencyConverter: Send + Sync {
    /// Convert `amount` from one currency to another at the rate of `date`.
    fn convert(
        &self,
        amount: f64,
        from_currency: &str,
        to_currency: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError>;
}

/// Source of historical exchange rates, used to fill a `RateTable`.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait FxRateProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Daily rates `base → target` between `from` and `to` (inclusive),
    /// sorted by date. Days without a published rate are simply absent.
    async fn get_rate_range(
        &self,
        base: &str,
        target: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RatePoint>, CoreError>;
}
