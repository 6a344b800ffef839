use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sparse `date → cumulative quantity` history for one instrument.
///
/// Only transaction dates are present. The value at a date is the sum of
/// every signed quantity up to and including that date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantityHistory {
    pub instrument_id: String,
    pub points: BTreeMap<NaiveDate, f64>,
}

impl QuantityHistory {
    pub fn new(instrument_id: impl Into<String>) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            points: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points.get(&date).copied()
    }

    #[must_use]
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.keys().next().copied()
    }

    /// Last recorded date and the quantity held from then on.
    #[must_use]
    pub fn last(&self) -> Option<(NaiveDate, f64)> {
        self.points.iter().next_back().map(|(d, q)| (*d, *q))
    }
}
