use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// How current the data returned by a collaborator is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Freshness {
    /// Fetched from the broker during this request
    Live,
    /// Broker unreachable; last locally stored copy, taken at `as_of`
    Cached { as_of: NaiveDateTime },
}

/// Data returned by a collaborator, possibly stale.
///
/// Hard failures travel as `Err(CoreError)`; a broker that fell back to its
/// local copy returns `Ok(Fetched::cached(..))` instead, and the engine
/// computes on it like on live data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fetched<T> {
    pub data: T,
    pub freshness: Freshness,
}

impl<T> Fetched<T> {
    pub fn live(data: T) -> Self {
        Self {
            data,
            freshness: Freshness::Live,
        }
    }

    pub fn cached(data: T, as_of: NaiveDateTime) -> Self {
        Self {
            data,
            freshness: Freshness::Cached { as_of },
        }
    }

    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self.freshness, Freshness::Cached { .. })
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}
