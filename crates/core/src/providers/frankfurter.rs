use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::fx::RatePoint;
use crate::models::series::DATE_FORMAT;
use super::traits::FxRateProvider;

const BASE_URL: &str = "https://api.frankfurter.dev/v1";

/// Frankfurter API provider for historical fiat exchange rates.
///
/// - **Free**: No API key, no rate limits, open-source.
/// - **Source**: European Central Bank (ECB) data, business days only.
/// - **Endpoint used**: `/{start}..{end}?base=..&symbols=..`
pub struct FrankfurterProvider {
    client: Client,
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the provider at another Frankfurter deployment (self-hosted mirror).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Parse a `/{start}..{end}` response body into sorted rate points for `target`.
    pub fn parse_time_series(body: &str, target: &str) -> Result<Vec<RatePoint>, CoreError> {
        let resp: TimeSeriesResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
            provider: "Frankfurter".into(),
            message: format!("Failed to parse time series: {e}"),
        })?;
        Ok(Self::collect_points(resp, &target.to_uppercase()))
    }

    fn collect_points(resp: TimeSeriesResponse, target: &str) -> Vec<RatePoint> {
        let mut points: Vec<RatePoint> = resp
            .rates
            .iter()
            .filter_map(|(date_str, rates)| {
                let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT).ok()?;
                let rate = rates.get(target)?;
                Some(RatePoint { date, rate: *rate })
            })
            .collect();

        points.sort_by_key(|p| p.date);
        points
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Frankfurter API response types ──────────────────────────────────

#[derive(Deserialize)]
struct TimeSeriesResponse {
    rates: HashMap<String, HashMap<String, f64>>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FxRateProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        "Frankfurter"
    }

    async fn get_rate_range(
        &self,
        base: &str,
        target: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RatePoint>, CoreError> {
        let base = base.to_uppercase();
        let target = target.to_uppercase();

        if base == target {
            let mut points = Vec::new();
            let mut d = from;
            while d <= to {
                points.push(RatePoint { date: d, rate: 1.0 });
                match d.succ_opt() {
                    Some(next) => d = next,
                    None => break,
                }
            }
            return Ok(points);
        }

        let from_str = from.format(DATE_FORMAT);
        let to_str = to.format(DATE_FORMAT);
        let url = format!(
            "{}/{from_str}..{to_str}?base={base}&symbols={target}",
            self.base_url
        );

        let resp: TimeSeriesResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Frankfurter".into(),
                message: format!("Failed to parse time series for {base}/{target}: {e}"),
            })?;

        Ok(Self::collect_points(resp, &target))
    }
}
