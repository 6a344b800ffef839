use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::warn;

use crate::models::quantity::QuantityHistory;
use crate::models::split::{SplitEvent, SplitIndex};
use crate::models::transaction::{Side, Transaction};

/// Detects stock splits in the ledger and rescales quantity histories so
/// that pre-split dates are expressed in post-split shares.
///
/// Brokers book a 2-for-1 split as "sell 100 old, buy 200 new" on the same
/// day. Quote providers back-adjust historical prices, so the quantity held
/// before the split has to be scaled by the same ratio for
/// quantity × price to stay correct.
pub struct SplitService;

impl SplitService {
    pub fn new() -> Self {
        Self
    }

    /// Find split events among the transactions tagged as splits.
    ///
    /// A date qualifies only with exactly one buy and one sell (the ids may
    /// differ when the instrument was renamed). Anything else is ambiguous
    /// and skipped with a warning rather than guessed.
    pub fn detect_splits<'a>(&self, transactions: impl IntoIterator<Item = &'a Transaction>) -> SplitIndex {
        let mut by_date: BTreeMap<NaiveDate, Vec<&Transaction>> = BTreeMap::new();
        for tx in transactions.into_iter().filter(|tx| tx.is_split()) {
            by_date.entry(tx.date()).or_default().push(tx);
        }

        let mut index = SplitIndex::new();
        for (date, txs) in by_date {
            let buys: Vec<&Transaction> = txs.iter().copied().filter(|t| t.side == Side::Buy).collect();
            let sells: Vec<&Transaction> = txs.iter().copied().filter(|t| t.side == Side::Sell).collect();

            let (buy, sell) = match (buys.as_slice(), sells.as_slice()) {
                ([buy], [sell]) => (*buy, *sell),
                _ => {
                    warn!(
                        %date,
                        buys = buys.len(),
                        sells = sells.len(),
                        "Ambiguous split transactions, skipping date"
                    );
                    continue;
                }
            };

            let ratio = buy.quantity.abs() / sell.quantity.abs();
            if !ratio.is_finite() || ratio <= 0.0 {
                warn!(
                    %date,
                    sell_instrument = %sell.instrument_id,
                    buy_instrument = %buy.instrument_id,
                    "Split with non-positive ratio, skipping date"
                );
                continue;
            }

            index.insert(SplitEvent {
                sell_instrument_id: sell.instrument_id.clone(),
                buy_instrument_id: buy.instrument_id.clone(),
                date,
                ratio,
            });
        }
        index
    }

    /// Rescale every recorded quantity strictly before each split date by the
    /// product of the ratios of all splits after it.
    ///
    /// Splits are walked most recent first, so a date between two splits
    /// only picks up the later one.
    pub fn apply_splits(&self, history: &QuantityHistory, splits: &[SplitEvent]) -> QuantityHistory {
        let mut adjusted = history.clone();
        if splits.is_empty() {
            return adjusted;
        }

        let mut ordered: Vec<&SplitEvent> = splits.iter().collect();
        ordered.sort_by(|a, b| b.date.cmp(&a.date));
        ordered.dedup_by(|a, b| a.date == b.date && a.sell_instrument_id == b.sell_instrument_id && a.buy_instrument_id == b.buy_instrument_id);

        let mut factor = 1.0;
        for (i, split) in ordered.iter().enumerate() {
            factor *= split.ratio;
            let range = match ordered.get(i + 1) {
                Some(older) => adjusted.points.range_mut(older.date..split.date),
                None => adjusted.points.range_mut(..split.date),
            };
            for (_, quantity) in range {
                *quantity *= factor;
            }
        }
        adjusted
    }
}

impl Default for SplitService {
    fn default() -> Self {
        Self::new()
    }
}
