pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use models::{
    dividend::{Dividend, DividendCalendar, DividendGrowth, DiversificationSlice},
    fetched::Fetched,
    holding::PortfolioEntry,
    report::{BrokerValuation, PortfolioReport},
    series::{DailySeries, DataPoint},
    settings::EngineSettings,
    snapshot::BrokerSnapshot,
    summary::TotalPortfolio,
};
use providers::{
    registry::BrokerRegistry,
    traits::{BrokerSource, CurrencyConverter},
};
use services::{
    dividend_service::DividendService, holdings_service::HoldingsService,
    merge_service::MergeService, performance_service::PerformanceService,
    valuation_service::ValuationService,
};
use tracing::{debug, warn};

use errors::CoreError;

/// Main entry point for the portfolio engine.
///
/// Holds the explicitly injected collaborators (brokers, FX oracle) and
/// settings. Every call fetches fresh data from the brokers and recomputes
/// from scratch; nothing is cached between calls, so a shared engine can
/// serve concurrent requests.
#[must_use]
pub struct PortfolioEngine {
    settings: EngineSettings,
    brokers: BrokerRegistry,
    converter: Box<dyn CurrencyConverter>,
    valuation_service: ValuationService,
    holdings_service: HoldingsService,
    merge_service: MergeService,
    performance_service: PerformanceService,
    dividend_service: DividendService,
}

impl std::fmt::Debug for PortfolioEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioEngine")
            .field("settings", &self.settings)
            .field("brokers", &self.brokers.names())
            .finish()
    }
}

impl PortfolioEngine {
    pub fn new(
        settings: EngineSettings,
        brokers: BrokerRegistry,
        converter: Box<dyn CurrencyConverter>,
    ) -> Self {
        let merge_service = MergeService::new(settings.break_even_policy);
        Self {
            settings,
            brokers,
            converter,
            valuation_service: ValuationService::new(),
            holdings_service: HoldingsService::new(),
            merge_service,
            performance_service: PerformanceService::new(),
            dividend_service: DividendService::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    #[must_use]
    pub fn broker_names(&self) -> Vec<String> {
        self.brokers.names()
    }

    // ── Per-broker ──────────────────────────────────────────────────

    /// Fetch everything one broker has to offer for a valuation.
    pub async fn fetch_snapshot(&self, broker: &dyn BrokerSource) -> Result<BrokerSnapshot, CoreError> {
        let mut snapshot = BrokerSnapshot::new(broker.name());

        let instruments = broker.instruments().await?;
        snapshot.stale |= instruments.is_stale();
        snapshot.instruments = instruments.into_inner();

        for instrument in &snapshot.instruments {
            let transactions = broker.transactions(&instrument.id).await?;
            snapshot.stale |= transactions.is_stale();
            let transactions = transactions.into_inner();
            if transactions.is_empty() {
                continue;
            }
            snapshot
                .transactions
                .insert(instrument.id.clone(), transactions);

            let quotes = broker.quotations(&instrument.id).await?;
            snapshot.stale |= quotes.is_stale();
            snapshot
                .quotations
                .insert(instrument.id.clone(), quotes.into_inner());
        }

        snapshot.cash_balances = take(broker.cash_balance_by_date().await?, &mut snapshot.stale);
        snapshot.deposits = take(broker.cash_deposits().await?, &mut snapshot.stale);
        snapshot.dividends = take(broker.dividends().await?, &mut snapshot.stale);

        if snapshot.stale {
            warn!(broker = broker.name(), "Broker unavailable, valuing cached data");
        }
        debug!(
            broker = broker.name(),
            instruments = snapshot.instruments.len(),
            traded = snapshot.transactions.len(),
            "Fetched broker snapshot"
        );
        Ok(snapshot)
    }

    /// Value a single snapshot: daily series, cash flows, holdings and summary.
    pub fn value_snapshot(&self, snapshot: &BrokerSnapshot) -> BrokerValuation {
        let converter = self.converter.as_ref();
        let daily_values = self
            .valuation_service
            .daily_values(snapshot, converter, &self.settings);
        let cash_flows = self.performance_service.cash_flows(
            converter,
            &snapshot.deposits,
            &self.settings.base_currency,
        );
        let holdings = self
            .holdings_service
            .holdings(snapshot, converter, &self.settings);
        let summary = self
            .holdings_service
            .summary(&holdings, snapshot, converter, &self.settings);

        BrokerValuation {
            broker: snapshot.broker.clone(),
            stale: snapshot.stale,
            daily_values,
            cash_flows,
            holdings,
            summary,
        }
    }

    /// Fetch and value one broker by name.
    pub async fn value_broker(&self, name: &str) -> Result<BrokerValuation, CoreError> {
        let broker = self
            .brokers
            .get(name)
            .ok_or_else(|| CoreError::BrokerNotFound(name.to_string()))?;
        let snapshot = self.fetch_snapshot(broker).await?;
        Ok(self.value_snapshot(&snapshot))
    }

    /// Fetch and value every registered broker, in registration order.
    pub async fn value_all(&self) -> Result<Vec<BrokerValuation>, CoreError> {
        let mut valuations = Vec::with_capacity(self.brokers.len());
        for broker in self.brokers.iter() {
            let snapshot = self.fetch_snapshot(broker).await?;
            valuations.push(self.value_snapshot(&snapshot));
        }
        Ok(valuations)
    }

    // ── Cross-broker views ──────────────────────────────────────────

    /// Build the whole dashboard from a single round of fetches.
    pub async fn report(&self) -> Result<PortfolioReport, CoreError> {
        let valuations = self.value_all().await?;
        self.merge_valuations(&valuations)
    }

    /// Merge already computed per-broker valuations into the dashboard.
    pub fn merge_valuations(&self, valuations: &[BrokerValuation]) -> Result<PortfolioReport, CoreError> {
        let holdings: Vec<Vec<PortfolioEntry>> =
            valuations.iter().map(|v| v.holdings.clone()).collect();
        let summaries: Vec<TotalPortfolio> = valuations.iter().map(|v| v.summary.clone()).collect();
        let values: Vec<DailySeries> = valuations.iter().map(|v| v.daily_values.clone()).collect();
        let flows: Vec<DailySeries> = valuations.iter().map(|v| v.cash_flows.clone()).collect();

        let daily_values = self.merge_service.merge_daily_values(&values);
        let cash_flows = self.merge_service.merge_daily_values(&flows);
        let performance = self
            .performance_service
            .time_weighted_return(&daily_values, &cash_flows);

        Ok(PortfolioReport {
            holdings: self.merge_service.merge_holdings(&holdings)?,
            summary: self.merge_service.merge_total_portfolios(&summaries)?,
            daily_values: daily_values.to_data_points(),
            performance: performance.to_data_points(),
            stale_brokers: valuations
                .iter()
                .filter(|v| v.stale)
                .map(|v| v.broker.clone())
                .collect(),
        })
    }

    /// Total portfolio value per day, across all brokers.
    pub async fn daily_values(&self) -> Result<Vec<DataPoint>, CoreError> {
        let valuations = self.value_all().await?;
        let values: Vec<DailySeries> = valuations.into_iter().map(|v| v.daily_values).collect();
        Ok(self.merge_service.merge_daily_values(&values).to_data_points())
    }

    /// Holdings merged across brokers by symbol.
    pub async fn holdings(&self) -> Result<Vec<PortfolioEntry>, CoreError> {
        let valuations = self.value_all().await?;
        let holdings: Vec<Vec<PortfolioEntry>> = valuations.into_iter().map(|v| v.holdings).collect();
        self.merge_service.merge_holdings(&holdings)
    }

    /// Headline totals across brokers. Fails when no broker is registered.
    pub async fn total_portfolio(&self) -> Result<TotalPortfolio, CoreError> {
        let valuations = self.value_all().await?;
        let summaries: Vec<TotalPortfolio> = valuations.into_iter().map(|v| v.summary).collect();
        self.merge_service.merge_total_portfolios(&summaries)
    }

    /// Cumulative time-weighted return per business day, across brokers.
    pub async fn performance(&self) -> Result<Vec<DataPoint>, CoreError> {
        let valuations = self.value_all().await?;
        let values: Vec<DailySeries> = valuations.iter().map(|v| v.daily_values.clone()).collect();
        let flows: Vec<DailySeries> = valuations.iter().map(|v| v.cash_flows.clone()).collect();
        let performance = self.performance_service.time_weighted_return(
            &self.merge_service.merge_daily_values(&values),
            &self.merge_service.merge_daily_values(&flows),
        );
        Ok(performance.to_data_points())
    }

    // ── Dividends ───────────────────────────────────────────────────

    /// Merged dividend records of all brokers, sorted by date then symbol.
    pub async fn dividends(&self) -> Result<Vec<Dividend>, CoreError> {
        let mut flows = Vec::new();
        for broker in self.brokers.iter() {
            let fetched = broker.dividends().await?;
            if fetched.is_stale() {
                warn!(broker = broker.name(), "Broker unavailable, using cached dividends");
            }
            flows.extend(fetched.into_inner());
        }
        Ok(self.dividend_service.merge_flows(
            self.converter.as_ref(),
            &flows,
            &self.settings.base_currency,
        ))
    }

    pub async fn dividend_calendar(&self) -> Result<DividendCalendar, CoreError> {
        let dividends = self.dividends().await?;
        Ok(self
            .dividend_service
            .calendar(&dividends, &self.settings.base_currency))
    }

    /// Year → monthly totals, derived from the calendar.
    pub async fn dividend_growth(&self) -> Result<DividendGrowth, CoreError> {
        let calendar = self.dividend_calendar().await?;
        Ok(self.dividend_service.growth(&calendar))
    }

    pub async fn dividend_diversification(&self) -> Result<Vec<DiversificationSlice>, CoreError> {
        let dividends = self.dividends().await?;
        Ok(self.dividend_service.diversification(&dividends))
    }
}

fn take<T>(fetched: Fetched<T>, stale: &mut bool) -> T {
    *stale |= fetched.is_stale();
    fetched.into_inner()
}
