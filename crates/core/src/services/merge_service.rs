use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::models::holding::PortfolioEntry;
use crate::models::series::DailySeries;
use crate::models::settings::BreakEvenPolicy;
use crate::models::summary::TotalPortfolio;

/// Combines per-broker results into single cross-broker views.
///
/// Every merge is a field-wise sum, so broker order does not change the
/// result. The one exception is the `FirstOpen` break-even policy when the
/// same symbol is open at two brokers: the first operand's price is kept.
pub struct MergeService {
    break_even_policy: BreakEvenPolicy,
}

impl MergeService {
    pub fn new(break_even_policy: BreakEvenPolicy) -> Self {
        Self { break_even_policy }
    }

    /// Merge two holdings of the same symbol.
    pub fn merge_entries(&self, a: &PortfolioEntry, b: &PortfolioEntry) -> Result<PortfolioEntry, CoreError> {
        if a.symbol != b.symbol {
            return Err(CoreError::SymbolMismatch {
                left: a.symbol.clone(),
                right: b.symbol.clone(),
            });
        }

        let mut merged = a.clone();
        merged.value = a.value + b.value;
        merged.base_currency_value = a.base_currency_value + b.base_currency_value;

        if a.is_cash() {
            merged.shares = a.shares + b.shares;
            merged.is_open = a.is_open || b.is_open;
            return Ok(merged);
        }

        merged.shares = a.shares + b.shares;
        merged.unrealized_gain = a.unrealized_gain + b.unrealized_gain;
        merged.realized_gain = a.realized_gain + b.realized_gain;
        merged.is_open = a.is_open || b.is_open;

        let (break_even, base_break_even) = match (a.is_open, b.is_open) {
            (true, true) => self.open_break_even(a, b),
            (false, true) => (b.break_even_price, b.base_currency_break_even_price),
            _ => (a.break_even_price, a.base_currency_break_even_price),
        };
        merged.break_even_price = break_even;
        merged.base_currency_break_even_price = base_break_even;

        if !a.is_open && b.is_open {
            merged.price = b.price;
        }
        Ok(merged)
    }

    fn open_break_even(&self, a: &PortfolioEntry, b: &PortfolioEntry) -> (f64, f64) {
        match self.break_even_policy {
            BreakEvenPolicy::FirstOpen => (a.break_even_price, a.base_currency_break_even_price),
            BreakEvenPolicy::SharesWeighted => {
                let shares = a.shares + b.shares;
                if shares == 0.0 {
                    return (a.break_even_price, a.base_currency_break_even_price);
                }
                (
                    (a.break_even_price * a.shares + b.break_even_price * b.shares) / shares,
                    (a.base_currency_break_even_price * a.shares
                        + b.base_currency_break_even_price * b.shares)
                        / shares,
                )
            }
        }
    }

    /// Merge holdings of several brokers by symbol. Output is sorted by symbol.
    pub fn merge_holdings(&self, per_broker: &[Vec<PortfolioEntry>]) -> Result<Vec<PortfolioEntry>, CoreError> {
        let mut by_symbol: BTreeMap<String, PortfolioEntry> = BTreeMap::new();
        for entry in per_broker.iter().flatten() {
            let merged = match by_symbol.get(&entry.symbol) {
                Some(existing) => self.merge_entries(existing, entry)?,
                None => entry.clone(),
            };
            by_symbol.insert(entry.symbol.clone(), merged);
        }
        Ok(by_symbol.into_values().collect())
    }

    /// Union of dates; each date is the sum of the brokers that have it.
    pub fn merge_daily_values(&self, per_broker: &[DailySeries]) -> DailySeries {
        let mut merged = DailySeries::new();
        for series in per_broker {
            for (date, value) in series.iter() {
                merged.add(date, value);
            }
        }
        merged
    }

    /// Sum the raw totals and recompute ROI from the sums.
    ///
    /// Averaging per-broker ROI would ignore the different capital bases.
    /// A single summary is returned unchanged.
    pub fn merge_total_portfolios(&self, summaries: &[TotalPortfolio]) -> Result<TotalPortfolio, CoreError> {
        let (first, rest) = summaries
            .split_first()
            .ok_or(CoreError::EmptyMerge("portfolio summaries"))?;
        if rest.is_empty() {
            return Ok(first.clone());
        }

        let mut merged = first.clone();
        for summary in rest {
            if summary.base_currency != merged.base_currency {
                return Err(CoreError::CurrencyMismatch {
                    left: merged.base_currency.clone(),
                    right: summary.base_currency.clone(),
                });
            }
            merged.total_pl += summary.total_pl;
            merged.total_cash += summary.total_cash;
            merged.current_value += summary.current_value;
            merged.total_deposit_withdrawal += summary.total_deposit_withdrawal;
        }
        merged.total_roi = roi(merged.current_value, merged.total_deposit_withdrawal)?;
        Ok(merged)
    }
}

impl Default for MergeService {
    fn default() -> Self {
        Self::new(BreakEvenPolicy::default())
    }
}

/// `(current_value / deposits − 1) × 100`; zero deposits is an error.
pub fn roi(current_value: f64, deposits: f64) -> Result<f64, CoreError> {
    if deposits == 0.0 {
        return Err(CoreError::DivisionByZero("total ROI"));
    }
    Ok((current_value / deposits - 1.0) * 100.0)
}
