use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Date format used for every outward-facing date key.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single point in a chart-ready series.
///
/// `x` is the date as `YYYY-MM-DD`, `y` the value (money, shares or a
/// cumulative return, depending on the series).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: String,
    pub y: f64,
}

impl DataPoint {
    pub fn new(date: NaiveDate, y: f64) -> Self {
        Self {
            x: date.format(DATE_FORMAT).to_string(),
            y,
        }
    }
}

/// Ordered `date → value` mapping with daily granularity.
///
/// Used for both quantity series (shares held) and value series (money).
/// Dense or sparse depending on who built it: the series expander guarantees
/// one entry per calendar day, quotation and cash series are whatever the
/// collaborator supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    points: BTreeMap<NaiveDate, f64>,
}

impl DailySeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Insert a value, replacing any existing value for that date.
    pub fn insert(&mut self, date: NaiveDate, value: f64) {
        self.points.insert(date, value);
    }

    /// Add `value` to whatever is already stored at `date` (0 if absent).
    pub fn add(&mut self, date: NaiveDate, value: f64) {
        *self.points.entry(date).or_insert(0.0) += value;
    }

    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points.get(&date).copied()
    }

    /// Value at `date`, or the most recent earlier value. Never looks forward.
    #[must_use]
    pub fn value_at_or_before(&self, date: NaiveDate) -> Option<f64> {
        self.points.range(..=date).next_back().map(|(_, v)| *v)
    }

    #[must_use]
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.keys().next().copied()
    }

    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.keys().next_back().copied()
    }

    #[must_use]
    pub fn last_value(&self) -> Option<f64> {
        self.points.values().next_back().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NaiveDate, f64)> + '_ {
        self.points.iter().map(|(d, v)| (*d, *v))
    }

    pub fn dates(&self) -> impl DoubleEndedIterator<Item = NaiveDate> + '_ {
        self.points.keys().copied()
    }

    /// Chart-ready representation, oldest first.
    #[must_use]
    pub fn to_data_points(&self) -> Vec<DataPoint> {
        self.iter().map(|(d, v)| DataPoint::new(d, v)).collect()
    }
}

impl FromIterator<(NaiveDate, f64)> for DailySeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        Self::from_points(iter)
    }
}
