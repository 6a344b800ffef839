use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::models::holding::PortfolioEntry;
use crate::models::instrument::Instrument;
use crate::models::quotation::QuotationSeries;
use crate::models::settings::EngineSettings;
use crate::models::snapshot::BrokerSnapshot;
use crate::models::summary::TotalPortfolio;
use crate::models::transaction::{Side, Transaction, TransactionKind};
use crate::providers::traits::CurrencyConverter;
use crate::services::currency_service::CurrencyService;
use crate::services::merge_service::roi;
use crate::services::quantity_service::QUANTITY_EPSILON;
use crate::services::split_service::SplitService;

/// Running position state while replaying a ledger.
#[derive(Debug, Default, Clone, Copy)]
struct Position {
    shares: f64,
    cost: f64,
    realized: f64,
    last_trade_price: Option<f64>,
}

impl Position {
    fn break_even(&self) -> f64 {
        if self.shares.abs() < QUANTITY_EPSILON {
            0.0
        } else {
            self.cost / self.shares
        }
    }

    fn is_open(&self) -> bool {
        self.shares != 0.0
    }

    fn apply(&mut self, tx: &Transaction) {
        let qty = tx.quantity.abs();
        match (tx.kind, tx.side) {
            // Splits change the share count, never the money invested. The
            // sell leg may pass through zero shares before the buy leg lands.
            (TransactionKind::Split, _) => {
                self.shares += tx.signed_quantity();
                if self.shares.abs() < QUANTITY_EPSILON {
                    self.shares = 0.0;
                }
                return;
            }
            (TransactionKind::Trade, Side::Buy) => {
                self.cost += qty * tx.price;
                self.shares += qty;
                self.last_trade_price = Some(tx.price);
            }
            (TransactionKind::Trade, Side::Sell) => {
                let break_even = self.break_even();
                self.realized += qty * (tx.price - break_even);
                self.cost -= qty * break_even;
                self.shares -= qty;
                self.last_trade_price = Some(tx.price);
            }
        }

        if self.shares.abs() < QUANTITY_EPSILON {
            self.shares = 0.0;
            self.cost = 0.0;
        }
    }
}

/// Computes per-broker holdings and the headline summary.
///
/// Cost basis is the weighted-average break-even price; realized gains are
/// measured against it at the time of each sell.
pub struct HoldingsService {
    currency_service: CurrencyService,
    split_service: SplitService,
}

impl HoldingsService {
    pub fn new() -> Self {
        Self {
            currency_service: CurrencyService::new(),
            split_service: SplitService::new(),
        }
    }

    /// Ledger per instrument id, with renamed splits folded in.
    ///
    /// Everything the old id booked up to a split date (on or before
    /// `today`) is replayed under the new id, so cost basis and realized
    /// gains follow the shares. Chained renames are handled oldest first.
    pub fn ledgers(&self, snapshot: &BrokerSnapshot, today: NaiveDate) -> HashMap<String, Vec<Transaction>> {
        let mut ledgers = snapshot.transactions.clone();
        let splits = self.split_service.detect_splits(snapshot.all_transactions());

        for event in splits.events() {
            if event.sell_instrument_id == event.buy_instrument_id || event.date > today {
                continue;
            }
            let Some(old) = ledgers.get_mut(&event.sell_instrument_id) else {
                continue;
            };
            let (carried, kept): (Vec<Transaction>, Vec<Transaction>) =
                std::mem::take(old).into_iter().partition(|tx| tx.date() <= event.date);
            *old = kept;

            debug!(
                from = %event.sell_instrument_id,
                to = %event.buy_instrument_id,
                carried = carried.len(),
                "Carrying cost basis across renamed split"
            );
            ledgers
                .entry(event.buy_instrument_id.clone())
                .or_default()
                .extend(carried);
        }
        ledgers
    }

    /// Holding of one instrument as of `today`. `None` if it was never traded.
    pub fn build_entry(
        &self,
        instrument: &Instrument,
        transactions: &[Transaction],
        quotes: Option<&QuotationSeries>,
        converter: &dyn CurrencyConverter,
        base_currency: &str,
        today: NaiveDate,
    ) -> Option<PortfolioEntry> {
        let mut ordered: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| tx.date() <= today)
            .collect();
        if ordered.is_empty() {
            return None;
        }
        ordered.sort_by_key(|tx| tx.timestamp);

        let mut position = Position::default();
        for tx in ordered {
            position.apply(tx);
        }

        let quoted = quotes.and_then(|q| q.prices.value_at_or_before(today));
        let price = match (quoted, position.last_trade_price) {
            (Some(p), _) => p,
            (None, Some(p)) => {
                if position.is_open() {
                    warn!(instrument = %instrument.id, "No quotation, using last trade price");
                }
                p
            }
            (None, None) => 0.0,
        };

        let currency = quotes
            .map(|q| q.currency.as_str())
            .filter(|c| !c.is_empty())
            .unwrap_or(instrument.currency.as_str());
        let break_even = position.break_even();
        let value = position.shares * price;

        let base_value = self
            .currency_service
            .convert_or_warn(converter, value, currency, base_currency, today)
            .unwrap_or(value);
        let base_break_even = self
            .currency_service
            .convert_or_warn(converter, break_even, currency, base_currency, today)
            .unwrap_or(break_even);

        Some(PortfolioEntry {
            symbol: instrument.symbol.clone(),
            name: instrument.name.clone(),
            product_type: instrument.product_type,
            shares: position.shares,
            price,
            break_even_price: break_even,
            base_currency_break_even_price: base_break_even,
            value,
            base_currency_value: base_value,
            is_open: position.is_open(),
            unrealized_gain: (price - break_even) * position.shares,
            realized_gain: position.realized,
            currency: currency.to_string(),
            base_currency: base_currency.to_string(),
        })
    }

    /// All holdings of one broker (securities, then one CASH entry per currency).
    ///
    /// An instrument renamed away by a split no longer appears; its history
    /// lives on under the new id.
    pub fn holdings(
        &self,
        snapshot: &BrokerSnapshot,
        converter: &dyn CurrencyConverter,
        settings: &EngineSettings,
    ) -> Vec<PortfolioEntry> {
        let today = settings.valuation_date();
        let base = settings.base_currency.as_str();
        let ledgers = self.ledgers(snapshot, today);

        let mut entries: Vec<PortfolioEntry> = snapshot
            .instruments
            .iter()
            .filter_map(|instrument| {
                let transactions = ledgers.get(&instrument.id)?;
                self.build_entry(
                    instrument,
                    transactions,
                    snapshot.quotations.get(&instrument.id),
                    converter,
                    base,
                    today,
                )
            })
            .collect();

        for balance in &snapshot.cash_balances {
            let amount = balance.balances.value_at_or_before(today).unwrap_or(0.0);
            let base_value = self
                .currency_service
                .convert_or_warn(converter, amount, &balance.currency, base, today)
                .unwrap_or(amount);
            entries.push(PortfolioEntry::cash(&balance.currency, amount, base_value, base));
        }
        entries
    }

    /// Headline summary derived from the broker's holdings and deposit ledger.
    ///
    /// ROI is reported as 0 (with a warning) when nothing was ever deposited.
    pub fn summary(
        &self,
        entries: &[PortfolioEntry],
        snapshot: &BrokerSnapshot,
        converter: &dyn CurrencyConverter,
        settings: &EngineSettings,
    ) -> TotalPortfolio {
        let base = settings.base_currency.as_str();
        let current_value: f64 = entries.iter().map(|e| e.base_currency_value).sum();
        let total_cash: f64 = entries
            .iter()
            .filter(|e| e.is_cash())
            .map(|e| e.base_currency_value)
            .sum();
        let total_deposit_withdrawal: f64 = snapshot
            .deposits
            .iter()
            .filter_map(|d| {
                self.currency_service
                    .convert_or_warn(converter, d.change, &d.currency, base, d.date)
            })
            .sum();

        let total_roi = roi(current_value, total_deposit_withdrawal).unwrap_or_else(|_| {
            warn!(broker = %snapshot.broker, "No net deposits, reporting ROI as 0");
            0.0
        });

        TotalPortfolio {
            base_currency: base.to_string(),
            total_pl: current_value - total_deposit_withdrawal,
            total_cash,
            current_value,
            total_roi,
            total_deposit_withdrawal,
        }
    }
}

impl Default for HoldingsService {
    fn default() -> Self {
        Self::new()
    }
}
