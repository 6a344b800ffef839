use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::fx::RateTable;
use crate::models::series::DailySeries;
use crate::providers::traits::{CurrencyConverter, FxRateProvider};

/// Handles conversion of values into the base currency.
///
/// Conversions always use the rate of the value's own date, never the
/// valuation date, so historical series stay historically accurate.
pub struct CurrencyService;

impl CurrencyService {
    pub fn new() -> Self {
        Self
    }

    /// Convert a daily value series from `currency` to `base_currency`.
    ///
    /// Same currency → returned unchanged. Dates without an exchange rate are
    /// dropped and reported in a single warning.
    pub fn normalize_series(
        &self,
        converter: &dyn CurrencyConverter,
        series: &DailySeries,
        currency: &str,
        base_currency: &str,
    ) -> DailySeries {
        if currency.eq_ignore_ascii_case(base_currency) {
            return series.clone();
        }

        let mut normalized = DailySeries::new();
        let mut missing: Vec<NaiveDate> = Vec::new();
        for (date, value) in series.iter() {
            match converter.convert(value, currency, base_currency, date) {
                Ok(converted) => normalized.insert(date, converted),
                Err(_) => missing.push(date),
            }
        }

        if let (Some(first), Some(last)) = (missing.first(), missing.last()) {
            warn!(
                from = currency,
                to = base_currency,
                dropped = missing.len(),
                %first,
                %last,
                "No exchange rate for some dates, values dropped"
            );
        }
        normalized
    }

    /// Convert a single amount, logging and returning `None` when no rate exists.
    pub fn convert_or_warn(
        &self,
        converter: &dyn CurrencyConverter,
        amount: f64,
        currency: &str,
        base_currency: &str,
        date: NaiveDate,
    ) -> Option<f64> {
        if currency.eq_ignore_ascii_case(base_currency) {
            return Some(amount);
        }
        match converter.convert(amount, currency, base_currency, date) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(error = %e, "Currency conversion failed");
                None
            }
        }
    }

    /// Fill `table` with `currency → base_currency` rates for every currency
    /// in `currencies` over `[from, to]`.
    ///
    /// Fails on the first provider error: a table with silently missing pairs
    /// would turn into dropped values much later in the pipeline.
    pub async fn load_rates(
        &self,
        provider: &dyn FxRateProvider,
        table: &mut RateTable,
        currencies: &[String],
        base_currency: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<usize, CoreError> {
        let mut loaded = 0;
        for currency in currencies {
            if currency.eq_ignore_ascii_case(base_currency) {
                continue;
            }
            let points = provider
                .get_rate_range(currency, base_currency, from, to)
                .await?;
            debug!(
                provider = provider.name(),
                pair = %format!("{currency}/{base_currency}"),
                points = points.len(),
                "Loaded exchange rates"
            );
            loaded += points.len();
            table.set_rates(currency, base_currency, &points);
        }
        Ok(loaded)
    }
}

impl Default for CurrencyService {
    fn default() -> Self {
        Self::new()
    }
}
