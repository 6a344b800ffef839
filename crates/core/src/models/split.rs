use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A detected stock split.
///
/// The two instrument ids differ when the broker renamed the instrument
/// as part of the split (old id sold, new id bought).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitEvent {
    pub sell_instrument_id: String,
    pub buy_instrument_id: String,
    pub date: NaiveDate,
    /// New shares per old share (`buy_quantity / |sell_quantity|`), always > 0
    pub ratio: f64,
}

/// Split events indexed by every instrument id they concern.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitIndex {
    by_instrument: HashMap<String, Vec<SplitEvent>>,
}

impl SplitIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event under its sell-side and buy-side ids (once if equal).
    pub fn insert(&mut self, event: SplitEvent) {
        if event.sell_instrument_id != event.buy_instrument_id {
            self.by_instrument
                .entry(event.buy_instrument_id.clone())
                .or_default()
                .push(event.clone());
        }
        self.by_instrument
            .entry(event.sell_instrument_id.clone())
            .or_default()
            .push(event);
    }

    /// All splits affecting `instrument_id`, in no particular order.
    #[must_use]
    pub fn for_instrument(&self, instrument_id: &str) -> &[SplitEvent] {
        self.by_instrument
            .get(instrument_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Distinct events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<&SplitEvent> {
        let mut seen = std::collections::HashSet::new();
        let mut events: Vec<&SplitEvent> = self
            .by_instrument
            .values()
            .flatten()
            .filter(|e| seen.insert((e.sell_instrument_id.as_str(), e.buy_instrument_id.as_str(), e.date)))
            .collect();
        events.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.sell_instrument_id.cmp(&b.sell_instrument_id))
        });
        events
    }

    /// Number of distinct events (not index entries).
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_instrument.is_empty()
    }
}
