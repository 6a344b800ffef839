use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::models::cash::CashBalance;
use crate::models::instrument::Instrument;
use crate::models::quotation::QuotationSeries;
use crate::models::series::DailySeries;
use crate::models::settings::EngineSettings;
use crate::models::snapshot::BrokerSnapshot;
use crate::models::split::SplitIndex;
use crate::models::transaction::Transaction;
use crate::providers::traits::CurrencyConverter;
use crate::services::currency_service::CurrencyService;
use crate::services::quantity_service::QuantityService;
use crate::services::split_service::SplitService;

/// Generates the daily portfolio value series of one broker.
///
/// Per instrument: ledger → quantity history → split adjustment → dense
/// daily quantities → × closing price → base currency. Then all instruments
/// are summed per date and the cash balance of that day is added.
pub struct ValuationService {
    quantity_service: QuantityService,
    split_service: SplitService,
    currency_service: CurrencyService,
}

impl ValuationService {
    pub fn new() -> Self {
        Self {
            quantity_service: QuantityService::new(),
            split_service: SplitService::new(),
            currency_service: CurrencyService::new(),
        }
    }

    /// Multiply quantity by price on every date both series define.
    ///
    /// Dates with a quantity but no quote are dropped (not zeroed, which
    /// would drag the total down) and reported in one warning.
    /// With `exclude_weekends`, Saturday and Sunday are skipped silently;
    /// used for crypto so 24/7 quotes line up with the equity calendar.
    pub fn merge_quotations(
        &self,
        instrument_id: &str,
        quantities: &DailySeries,
        quotes: &DailySeries,
        exclude_weekends: bool,
    ) -> DailySeries {
        let mut values = DailySeries::new();
        let mut missing: Vec<NaiveDate> = Vec::new();

        for (date, quantity) in quantities.iter() {
            if exclude_weekends && is_weekend(date) {
                continue;
            }
            match quotes.get(date) {
                Some(price) => values.insert(date, quantity * price),
                None => missing.push(date),
            }
        }

        if let (Some(first), Some(last)) = (missing.first(), missing.last()) {
            warn!(
                instrument = instrument_id,
                dropped = missing.len(),
                %first,
                %last,
                "No quotation for some dates, values dropped"
            );
        }
        values
    }

    /// Sum instrument series date by date, then add that day's cash.
    ///
    /// The output covers the union of the instrument dates plus the cash
    /// dates outside their range (cash-only days before the first trade or
    /// after the last position closed). Cash comes from the exact date or the
    /// most recent earlier one (never a later one).
    /// Without any instrument series the cash series is returned as is.
    pub fn aggregate(&self, instrument_values: &[DailySeries], cash: &DailySeries) -> DailySeries {
        if instrument_values.iter().all(DailySeries::is_empty) {
            return cash.clone();
        }

        let mut total = DailySeries::new();
        for series in instrument_values {
            for (date, value) in series.iter() {
                total.add(date, value);
            }
        }

        if let (Some(first), Some(last)) = (total.first_date(), total.last_date()) {
            for date in cash.dates().filter(|d| *d < first || *d > last) {
                total.add(date, 0.0);
            }
        }

        total
            .iter()
            .map(|(date, value)| (date, value + cash.value_at_or_before(date).unwrap_or(0.0)))
            .collect()
    }

    /// Base-currency daily value series of one instrument.
    ///
    /// Returns an empty series for an instrument without transactions.
    #[allow(clippy::too_many_arguments)]
    pub fn instrument_values(
        &self,
        instrument: &Instrument,
        transactions: &[Transaction],
        splits: &SplitIndex,
        quotes: &QuotationSeries,
        converter: &dyn CurrencyConverter,
        settings: &EngineSettings,
        today: NaiveDate,
    ) -> DailySeries {
        let history = self.quantity_service.build_history(&instrument.id, transactions);
        if history.is_empty() {
            debug!(instrument = %instrument.id, "No transactions, instrument inactive");
            return DailySeries::new();
        }

        let adjusted = self
            .split_service
            .apply_splits(&history, splits.for_instrument(&instrument.id));
        let quantities = self.quantity_service.expand_daily(&adjusted, today);

        let exclude_weekends = instrument.is_crypto() && settings.exclude_crypto_weekends;
        let values = self.merge_quotations(&instrument.id, &quantities, &quotes.prices, exclude_weekends);

        let currency = if quotes.currency.is_empty() {
            instrument.currency.as_str()
        } else {
            quotes.currency.as_str()
        };
        self.currency_service
            .normalize_series(converter, &values, currency, &settings.base_currency)
    }

    /// Cash of every currency on the account, in base currency, per date.
    pub fn cash_series(
        &self,
        converter: &dyn CurrencyConverter,
        balances: &[CashBalance],
        base_currency: &str,
    ) -> DailySeries {
        let normalized: Vec<DailySeries> = balances
            .iter()
            .map(|b| {
                self.currency_service
                    .normalize_series(converter, &b.balances, &b.currency, base_currency)
            })
            .collect();

        if normalized.len() == 1 {
            return normalized.into_iter().next().unwrap_or_default();
        }

        let dates: BTreeSet<NaiveDate> = normalized.iter().flat_map(|s| s.dates()).collect();
        dates
            .into_iter()
            .map(|date| {
                let total = normalized
                    .iter()
                    .filter_map(|s| s.value_at_or_before(date))
                    .sum::<f64>();
                (date, total)
            })
            .collect()
    }

    /// Full daily portfolio value series (securities + cash) of one broker.
    pub fn daily_values(
        &self,
        snapshot: &BrokerSnapshot,
        converter: &dyn CurrencyConverter,
        settings: &EngineSettings,
    ) -> DailySeries {
        let today = settings.valuation_date();
        let splits = self.split_service.detect_splits(snapshot.all_transactions());

        let mut instrument_series = Vec::with_capacity(snapshot.instruments.len());
        for instrument in &snapshot.instruments {
            let Some(transactions) = snapshot.transactions.get(&instrument.id) else {
                continue;
            };
            let quotes = snapshot
                .quotations
                .get(&instrument.id)
                .cloned()
                .unwrap_or_else(|| QuotationSeries::new(&instrument.id, &instrument.currency, DailySeries::new()));

            instrument_series.push(self.instrument_values(
                instrument,
                transactions,
                &splits,
                &quotes,
                converter,
                settings,
                today,
            ));
        }

        let cash = self.cash_series(converter, &snapshot.cash_balances, &settings.base_currency);
        let total = self.aggregate(&instrument_series, &cash);
        debug!(
            broker = %snapshot.broker,
            instruments = instrument_series.len(),
            days = total.len(),
            "Computed daily portfolio values"
        );
        total
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
