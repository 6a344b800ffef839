use serde::{Deserialize, Serialize};

use super::series::DailySeries;

/// Daily closing prices for one instrument in one currency.
///
/// Gaps (weekends, holidays) are expected to be filled by the collaborator
/// that supplies the series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotationSeries {
    pub instrument_id: String,
    pub currency: String,
    pub prices: DailySeries,
}

impl QuotationSeries {
    pub fn new(
        instrument_id: impl Into<String>,
        currency: impl Into<String>,
        prices: DailySeries,
    ) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            currency: currency.into().to_uppercase(),
            prices,
        }
    }
}
