use chrono::NaiveDate;
use tracing::debug;

use crate::models::cash::CashMovement;
use crate::models::series::DailySeries;
use crate::providers::traits::CurrencyConverter;
use crate::services::currency_service::CurrencyService;
use crate::services::valuation_service::is_weekend;

/// Computes the Time-Weighted Return curve of a portfolio.
///
/// Sub-period returns are chained geometrically,
/// `Π(1 + r_i) − 1`, which removes the effect of deposit/withdrawal timing.
pub struct PerformanceService {
    currency_service: CurrencyService,
}

impl PerformanceService {
    pub fn new() -> Self {
        Self {
            currency_service: CurrencyService::new(),
        }
    }

    /// Net cash flow per date in base currency; same-day movements are summed.
    /// Movements without an exchange rate are dropped with a warning.
    pub fn cash_flows(
        &self,
        converter: &dyn CurrencyConverter,
        movements: &[CashMovement],
        base_currency: &str,
    ) -> DailySeries {
        let mut flows = DailySeries::new();
        for movement in movements {
            if let Some(change) = self.currency_service.convert_or_warn(
                converter,
                movement.change,
                &movement.currency,
                base_currency,
                movement.date,
            ) {
                flows.add(movement.date, change);
            }
        }
        flows
    }

    /// Cumulative TWR per business day.
    ///
    /// Walks Monday–Friday across the union of both series' date ranges:
    /// - the first day only seeds `initial_value` with that day's cash flow;
    /// - each later day computes
    ///   `rate = (end_value − initial_value − cash_flow) / initial_value`,
    ///   chains it, emits `cumulative − 1` and rolls `initial_value` forward;
    /// - a day with `initial_value == 0` is skipped (nothing emitted) but
    ///   still rolls `initial_value` forward;
    /// - a day before the first value is skipped and its flow carries into
    ///   the first valued day.
    ///
    /// Gaps inside the value series use the most recent earlier value.
    /// Weekend flows are carried into the next business day.
    pub fn time_weighted_return(&self, values: &DailySeries, cash_flows: &DailySeries) -> DailySeries {
        let mut performance = DailySeries::new();

        let start = min_date(values.first_date(), cash_flows.first_date());
        let end = max_date(values.last_date(), cash_flows.last_date());
        let (Some(start), Some(end)) = (start, end) else {
            return performance;
        };

        let mut initial_value = 0.0;
        let mut cumulative = 1.0;
        let mut pending_flow = 0.0;
        let mut bootstrapped = false;
        let mut skipped = 0usize;

        let mut day = start;
        while day <= end {
            pending_flow += cash_flows.get(day).unwrap_or(0.0);

            if !is_weekend(day) {
                match (bootstrapped, values.value_at_or_before(day)) {
                    (false, _) => {
                        initial_value = std::mem::take(&mut pending_flow);
                        bootstrapped = true;
                    }
                    // No value yet; the flow waits for the first valued day
                    (true, None) => skipped += 1,
                    (true, Some(end_value)) if initial_value == 0.0 => {
                        pending_flow = 0.0;
                        skipped += 1;
                        initial_value = end_value;
                    }
                    (true, Some(end_value)) => {
                        let flow = std::mem::take(&mut pending_flow);
                        let rate = (end_value - initial_value - flow) / initial_value;
                        cumulative *= 1.0 + rate;
                        performance.insert(day, cumulative - 1.0);
                        initial_value = end_value;
                    }
                }
            }

            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        debug!(
            days = performance.len(),
            skipped,
            cumulative = cumulative - 1.0,
            "Computed time-weighted return"
        );
        performance
    }
}

impl Default for PerformanceService {
    fn default() -> Self {
        Self::new()
    }
}

fn min_date(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn max_date(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}
