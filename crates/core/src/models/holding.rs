use serde::{Deserialize, Serialize};

use super::instrument::ProductType;

/// One merged (or per-broker) holding, keyed by `symbol`.
///
/// Recomputed on every valuation request; has no identity beyond the symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub symbol: String,
    pub name: String,
    pub product_type: ProductType,

    /// Units held (0 for closed positions)
    pub shares: f64,

    /// Latest price per unit, in `currency`
    pub price: f64,

    /// Weighted-average cost per unit, in `currency`
    pub break_even_price: f64,

    /// Weighted-average cost per unit, in `base_currency`
    pub base_currency_break_even_price: f64,

    /// shares × price, in `currency`
    pub value: f64,

    /// `value` converted to `base_currency`
    pub base_currency_value: f64,

    pub is_open: bool,

    /// (price − break_even_price) × shares, in `currency`
    pub unrealized_gain: f64,

    /// Gains locked in by sells, in `currency`
    pub realized_gain: f64,

    pub currency: String,
    pub base_currency: String,
}

impl PortfolioEntry {
    #[must_use]
    pub fn is_cash(&self) -> bool {
        self.product_type == ProductType::Cash
    }

    /// A cash position: value only, no cost basis.
    pub fn cash(currency: impl Into<String>, amount: f64, base_currency_value: f64, base_currency: impl Into<String>) -> Self {
        let currency = currency.into().to_uppercase();
        Self {
            symbol: currency.clone(),
            name: currency.clone(),
            product_type: ProductType::Cash,
            shares: amount,
            price: 1.0,
            break_even_price: 0.0,
            base_currency_break_even_price: 0.0,
            value: amount,
            base_currency_value,
            is_open: amount != 0.0,
            unrealized_gain: 0.0,
            realized_gain: 0.0,
            currency,
            base_currency: base_currency.into().to_uppercase(),
        }
    }
}
