use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::providers::traits::CurrencyConverter;

/// A single exchange rate data point: 1 unit of base = `rate` units of target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub rate: f64,
}

/// Table key: (base_currency, target_currency) e.g., ("USD", "EUR")
pub type RatePairKey = (String, String);

/// In-memory table of historical exchange rates.
///
/// Serves as the conversion oracle for the valuation pipeline:
/// - lookups are by the value's own date, falling back to the most recent
///   earlier rate (ECB publishes nothing on weekends and holidays);
/// - a pair missing in one direction is answered from its inverse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateTable {
    /// (base, target) → Vec of RatePoints sorted by date
    pub entries: HashMap<RatePairKey, Vec<RatePoint>>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a rate. Keeps each pair sorted by date (binary search insert).
    pub fn set_rate(&mut self, base: &str, target: &str, date: NaiveDate, rate: f64) {
        let key = (base.to_uppercase(), target.to_uppercase());
        let entries = self.entries.entry(key).or_default();

        match entries.binary_search_by_key(&date, |p| p.date) {
            Ok(idx) => entries[idx].rate = rate,
            Err(idx) => entries.insert(idx, RatePoint { date, rate }),
        }
    }

    /// Insert multiple rate points at once (e.g., from a time-series API call).
    pub fn set_rates(&mut self, base: &str, target: &str, points: &[RatePoint]) {
        for point in points {
            self.set_rate(base, target, point.date, point.rate);
        }
    }

    /// Rate on `date` or the latest earlier one, trying the inverse pair when
    /// the direct pair has nothing. Same currency is always 1.0.
    #[must_use]
    pub fn get_rate(&self, base: &str, target: &str, date: NaiveDate) -> Option<f64> {
        let base = base.to_uppercase();
        let target = target.to_uppercase();
        if base == target {
            return Some(1.0);
        }

        if let Some(rate) = Self::lookup(self.entries.get(&(base.clone(), target.clone())), date) {
            return Some(rate);
        }

        Self::lookup(self.entries.get(&(target, base)), date)
            .filter(|r| *r != 0.0)
            .map(|r| 1.0 / r)
    }

    fn lookup(points: Option<&Vec<RatePoint>>, date: NaiveDate) -> Option<f64> {
        let points = points?;
        match points.binary_search_by_key(&date, |p| p.date) {
            Ok(idx) => Some(points[idx].rate),
            Err(0) => None,
            Err(idx) => Some(points[idx - 1].rate),
        }
    }

    /// Total number of stored rate points across all pairs.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Number of distinct (base, target) pairs stored.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.entries.len()
    }
}

impl CurrencyConverter for RateTable {
    fn convert(
        &self,
        amount: f64,
        from_currency: &str,
        to_currency: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError> {
        self.get_rate(from_currency, to_currency, date)
            .map(|rate| amount * rate)
            .ok_or_else(|| CoreError::RateNotAvailable {
                from: from_currency.to_uppercase(),
                to: to_currency.to_uppercase(),
                date: date.to_string(),
            })
    }
}
