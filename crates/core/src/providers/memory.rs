use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::cash::{CashBalance, CashMovement};
use crate::models::dividend::DividendFlow;
use crate::models::fetched::Fetched;
use crate::models::instrument::Instrument;
use crate::models::quotation::QuotationSeries;
use crate::models::series::DailySeries;
use crate::models::transaction::Transaction;
use super::traits::BrokerSource;

/// Broker source serving a pre-loaded ledger from memory.
///
/// Used for offline valuation of exported data and as the test double for
/// the engine. `cached_as_of` makes every response report itself as a
/// cached fallback; `unavailable` makes every call fail.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBroker {
    name: String,
    instruments: Vec<Instrument>,
    transactions: HashMap<String, Vec<Transaction>>,
    quotations: HashMap<String, QuotationSeries>,
    cash_balances: Vec<CashBalance>,
    deposits: Vec<CashMovement>,
    dividends: Vec<DividendFlow>,
    cached_as_of: Option<NaiveDateTime>,
    unavailable: bool,
}

impl InMemoryBroker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_instrument(mut self, instrument: Instrument) -> Self {
        self.instruments.push(instrument);
        self
    }

    pub fn with_transactions(mut self, transactions: impl IntoIterator<Item = Transaction>) -> Self {
        for tx in transactions {
            self.transactions
                .entry(tx.instrument_id.clone())
                .or_default()
                .push(tx);
        }
        self
    }

    pub fn with_quotations(mut self, quotations: QuotationSeries) -> Self {
        self.quotations
            .insert(quotations.instrument_id.clone(), quotations);
        self
    }

    pub fn with_cash_balance(mut self, currency: &str, balances: DailySeries) -> Self {
        self.cash_balances.push(CashBalance::new(currency, balances));
        self
    }

    pub fn with_deposits(mut self, deposits: impl IntoIterator<Item = CashMovement>) -> Self {
        self.deposits.extend(deposits);
        self
    }

    pub fn with_dividends(mut self, dividends: impl IntoIterator<Item = DividendFlow>) -> Self {
        self.dividends.extend(dividends);
        self
    }

    /// Report all data as a cached fallback taken at `as_of`.
    pub fn cached_as_of(mut self, as_of: NaiveDateTime) -> Self {
        self.cached_as_of = Some(as_of);
        self
    }

    /// Fail every call, as a broker with no local copy would.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    fn respond<T>(&self, data: T) -> Result<Fetched<T>, CoreError> {
        if self.unavailable {
            return Err(CoreError::Broker {
                broker: self.name.clone(),
                message: "broker unavailable and no local data".into(),
            });
        }
        Ok(match self.cached_as_of {
            Some(as_of) => Fetched::cached(data, as_of),
            None => Fetched::live(data),
        })
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl BrokerSource for InMemoryBroker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn instruments(&self) -> Result<Fetched<Vec<Instrument>>, CoreError> {
        self.respond(self.instruments.clone())
    }

    async fn transactions(&self, instrument_id: &str) -> Result<Fetched<Vec<Transaction>>, CoreError> {
        self.respond(self.transactions.get(instrument_id).cloned().unwrap_or_default())
    }

    async fn quotations(&self, instrument_id: &str) -> Result<Fetched<QuotationSeries>, CoreError> {
        let quotes = match self.quotations.get(instrument_id) {
            Some(q) => q.clone(),
            None => {
                let currency = self
                    .instruments
                    .iter()
                    .find(|i| i.id == instrument_id)
                    .map(|i| i.currency.clone())
                    .unwrap_or_default();
                QuotationSeries::new(instrument_id, currency, DailySeries::new())
            }
        };
        self.respond(quotes)
    }

    async fn cash_balance_by_date(&self) -> Result<Fetched<Vec<CashBalance>>, CoreError> {
        self.respond(self.cash_balances.clone())
    }

    async fn cash_deposits(&self) -> Result<Fetched<Vec<CashMovement>>, CoreError> {
        self.respond(self.deposits.clone())
    }

    async fn dividends(&self) -> Result<Fetched<Vec<DividendFlow>>, CoreError> {
        self.respond(self.dividends.clone())
    }
}
