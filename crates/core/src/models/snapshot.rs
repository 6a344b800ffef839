use std::collections::HashMap;

use super::cash::{CashBalance, CashMovement};
use super::dividend::DividendFlow;
use super::instrument::Instrument;
use super::quotation::QuotationSeries;
use super::transaction::Transaction;

/// Everything one broker supplied for a single valuation request.
///
/// Built fresh per request by the engine; the pure services only ever see
/// this, never the collaborator itself.
#[derive(Debug, Clone, Default)]
pub struct BrokerSnapshot {
    pub broker: String,
    pub instruments: Vec<Instrument>,
    /// instrument id → ledger
    pub transactions: HashMap<String, Vec<Transaction>>,
    /// instrument id → closing prices
    pub quotations: HashMap<String, QuotationSeries>,
    pub cash_balances: Vec<CashBalance>,
    pub deposits: Vec<CashMovement>,
    pub dividends: Vec<DividendFlow>,
    /// Set when any part of the snapshot came from a cached fallback
    pub stale: bool,
}

impl BrokerSnapshot {
    pub fn new(broker: impl Into<String>) -> Self {
        Self {
            broker: broker.into(),
            ..Self::default()
        }
    }

    /// Every ledger entry of the broker, across all instruments.
    pub fn all_transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.values().flatten()
    }

    #[must_use]
    pub fn instrument(&self, instrument_id: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.id == instrument_id)
    }
}
