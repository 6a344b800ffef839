use serde::{Deserialize, Serialize};

/// Headline figures of a portfolio (one broker or all of them).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalPortfolio {
    /// Currency used for all monetary values
    pub base_currency: String,

    /// current_value − total_deposit_withdrawal
    pub total_pl: f64,

    /// Cash held across all cash positions
    pub total_cash: f64,

    /// Securities plus cash
    pub current_value: f64,

    /// (current_value / total_deposit_withdrawal − 1) × 100
    pub total_roi: f64,

    /// Net money put in (deposits minus withdrawals)
    pub total_deposit_withdrawal: f64,
}
