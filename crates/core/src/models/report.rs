use serde::{Deserialize, Serialize};

use super::holding::PortfolioEntry;
use super::series::{DailySeries, DataPoint};
use super::summary::TotalPortfolio;

/// Everything computed for one broker in one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerValuation {
    pub broker: String,
    /// Some of the broker's data came from a cached fallback
    pub stale: bool,
    pub daily_values: DailySeries,
    pub cash_flows: DailySeries,
    pub holdings: Vec<PortfolioEntry>,
    pub summary: TotalPortfolio,
}

/// Cross-broker dashboard data, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub holdings: Vec<PortfolioEntry>,
    pub summary: TotalPortfolio,
    pub daily_values: Vec<DataPoint>,
    /// Cumulative time-weighted return per business day
    pub performance: Vec<DataPoint>,
    /// Brokers whose figures are based on cached data
    pub stale_brokers: Vec<String>,
}
