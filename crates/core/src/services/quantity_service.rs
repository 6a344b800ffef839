use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::quantity::QuantityHistory;
use crate::models::series::DailySeries;
use crate::models::transaction::Transaction;

/// Quantities this close to zero count as a closed position.
pub const QUANTITY_EPSILON: f64 = 1e-9;

/// Turns a transaction ledger into quantity-held histories.
///
/// Pure; never touches a collaborator.
pub struct QuantityService;

impl QuantityService {
    pub fn new() -> Self {
        Self
    }

    /// Build the sparse quantity history of a single instrument.
    ///
    /// Transactions are replayed in timestamp order (stable for equal
    /// timestamps). Each transaction date records the running total after
    /// that transaction, so with several trades on one day the last one wins,
    /// which already folds in the earlier ones.
    pub fn build_history(&self, instrument_id: &str, transactions: &[Transaction]) -> QuantityHistory {
        let mut ordered: Vec<&Transaction> = transactions.iter().collect();
        ordered.sort_by_key(|tx| tx.timestamp);

        let mut history = QuantityHistory::new(instrument_id);
        let mut total = 0.0;
        for tx in ordered {
            total += tx.signed_quantity();
            history.points.insert(tx.date(), total);
        }
        history
    }

    /// Build one history per instrument id found in a mixed ledger.
    pub fn build_all(&self, transactions: &[Transaction]) -> BTreeMap<String, QuantityHistory> {
        let mut by_instrument: BTreeMap<String, Vec<Transaction>> = BTreeMap::new();
        for tx in transactions {
            by_instrument
                .entry(tx.instrument_id.clone())
                .or_default()
                .push(tx.clone());
        }

        by_instrument
            .into_iter()
            .map(|(id, txs)| {
                let history = self.build_history(&id, &txs);
                (id, history)
            })
            .collect()
    }

    /// Expand a sparse history into one forward-filled entry per calendar day.
    ///
    /// The series starts at the first recorded date. It ends on the last
    /// recorded date when the position is closed there, otherwise on `today`
    /// (or the last recorded date, if that lies after `today`).
    /// An empty history yields an empty series.
    pub fn expand_daily(&self, history: &QuantityHistory, today: NaiveDate) -> DailySeries {
        let (Some(start), Some((last_date, last_qty))) = (history.first_date(), history.last()) else {
            return DailySeries::new();
        };

        let end = if last_qty.abs() < QUANTITY_EPSILON {
            last_date
        } else {
            today.max(last_date)
        };

        let mut series = DailySeries::new();
        let mut carried = 0.0;
        let mut day = start;
        while day <= end {
            if let Some(q) = history.get(day) {
                carried = q;
            }
            series.insert(day, carried);
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        series
    }
}

impl Default for QuantityService {
    fn default() -> Self {
        Self::new()
    }
}

