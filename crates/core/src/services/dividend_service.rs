use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::models::dividend::{
    CalendarMonth, DayBucket, Dividend, DividendCalendar, DividendFlow, DividendGrowth, DividendType,
    DiversificationSlice,
};
use crate::providers::traits::CurrencyConverter;
use crate::services::currency_service::CurrencyService;

/// Builds the dividend calendar, growth and diversification views.
pub struct DividendService {
    currency_service: CurrencyService,
}

impl DividendService {
    pub fn new() -> Self {
        Self {
            currency_service: CurrencyService::new(),
        }
    }

    /// Fold dividend and dividend-tax lines sharing (payment date, symbol)
    /// into one record: positive changes add to `amount`, negative ones add
    /// their absolute value to `taxes`. Output is sorted by date, then symbol.
    ///
    /// `base_currency_amount` and `base_currency_taxes` are filled from the
    /// payment date's rate; when no rate exists they stay `None` and the
    /// dividend is left out of totals.
    pub fn merge_flows(
        &self,
        converter: &dyn CurrencyConverter,
        flows: &[DividendFlow],
        base_currency: &str,
    ) -> Vec<Dividend> {
        let mut merged: BTreeMap<(NaiveDate, String), Dividend> = BTreeMap::new();
        for flow in flows {
            let entry = merged
                .entry((flow.payment_date, flow.symbol.clone()))
                .or_insert_with(|| Dividend {
                    dividend_type: flow.dividend_type,
                    payment_date: flow.payment_date,
                    symbol: flow.symbol.clone(),
                    name: flow.name.clone(),
                    currency: flow.currency.clone(),
                    amount: 0.0,
                    taxes: 0.0,
                    base_currency_amount: None,
                    base_currency_taxes: None,
                });
            if flow.change >= 0.0 {
                entry.amount += flow.change;
            } else {
                entry.taxes += flow.change.abs();
            }
        }

        merged
            .into_values()
            .map(|mut dividend| {
                let to_base = |value: f64| {
                    self.currency_service.convert_or_warn(
                        converter,
                        value,
                        &dividend.currency,
                        base_currency,
                        dividend.payment_date,
                    )
                };
                let (amount, taxes) = (to_base(dividend.amount), to_base(dividend.taxes));
                dividend.base_currency_amount = amount;
                dividend.base_currency_taxes = taxes;
                dividend
            })
            .collect()
    }

    /// One bucket per month from the first to the last dividend month,
    /// empty months included with zero totals.
    pub fn calendar(&self, dividends: &[Dividend], base_currency: &str) -> DividendCalendar {
        let mut calendar = DividendCalendar {
            base_currency: base_currency.to_string(),
            months: Vec::new(),
        };

        let first = dividends.iter().map(|d| d.payment_date).min();
        let last = dividends.iter().map(|d| d.payment_date).max();
        let (Some(first), Some(last)) = (first, last) else {
            return calendar;
        };

        let mut index: HashMap<(i32, u32), usize> = HashMap::new();
        let (mut year, mut month) = (first.year(), first.month());
        while (year, month) <= (last.year(), last.month()) {
            index.insert((year, month), calendar.months.len());
            calendar.months.push(CalendarMonth::empty(year, month));
            (year, month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        }

        for dividend in dividends {
            let date = dividend.payment_date;
            let Some(&slot) = index.get(&(date.year(), date.month())) else {
                continue;
            };
            let bucket_month = &mut calendar.months[slot];
            let day = bucket_month.days.entry(date.day()).or_insert_with(|| DayBucket {
                day: date.day(),
                ..DayBucket::default()
            });
            day.dividends.push(dividend.clone());

            if dividend.dividend_type == DividendType::ExDividend {
                continue;
            }
            let Some(amount) = dividend.base_currency_amount else {
                warn!(symbol = %dividend.symbol, %date, "Dividend without exchange rate left out of totals");
                continue;
            };
            day.total += amount;
            match dividend.dividend_type {
                DividendType::Paid => {
                    bucket_month.paid_total += amount;
                    bucket_month.taxes_total += dividend.base_currency_taxes.unwrap_or(0.0);
                }
                t if t.is_projected() => bucket_month.projected_total += amount,
                _ => {}
            }
        }
        calendar
    }

    /// Year → 12 monthly totals, read straight from the calendar.
    pub fn growth(&self, calendar: &DividendCalendar) -> DividendGrowth {
        let mut growth = DividendGrowth::new();
        for month in &calendar.months {
            let year = growth.entry(month.year).or_insert([0.0; 12]);
            year[(month.month - 1) as usize] += month.total();
        }
        growth
    }

    /// Share of received dividends per symbol, largest first.
    pub fn diversification(&self, dividends: &[Dividend]) -> Vec<DiversificationSlice> {
        let mut by_symbol: BTreeMap<&str, (String, f64)> = BTreeMap::new();
        for dividend in dividends.iter().filter(|d| d.dividend_type == DividendType::Paid) {
            if let Some(amount) = dividend.base_currency_amount {
                let slot = by_symbol
                    .entry(dividend.symbol.as_str())
                    .or_insert_with(|| (dividend.name.clone(), 0.0));
                slot.1 += amount;
            }
        }

        let grand_total: f64 = by_symbol.values().map(|(_, t)| t).sum();
        let mut slices: Vec<DiversificationSlice> = by_symbol
            .into_iter()
            .map(|(symbol, (name, total))| DiversificationSlice {
                symbol: symbol.to_string(),
                name,
                total,
                percentage: if grand_total > 0.0 {
                    total / grand_total * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        slices.sort_by(|a, b| {
            b.total
                .partial_cmp(&a.total)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        slices
    }
}

impl Default for DividendService {
    fn default() -> Self {
        Self::new()
    }
}
