use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// How the break-even price is chosen when two open positions in the same
/// symbol are merged across brokers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakEvenPolicy {
    /// Keep the first operand's break-even price
    #[default]
    FirstOpen,
    /// Average of both break-even prices weighted by shares
    SharesWeighted,
}

/// Engine configuration, passed in explicitly at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// The currency in which all totals are reported (e.g., "EUR", "USD").
    pub base_currency: String,

    /// Drop Saturday/Sunday values of crypto instruments so they line up
    /// with equity and cash series.
    #[serde(default = "default_true")]
    pub exclude_crypto_weekends: bool,

    #[serde(default)]
    pub break_even_policy: BreakEvenPolicy,

    /// Fixed valuation date. `None` means the current UTC date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

fn default_true() -> bool {
    true
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            base_currency: "EUR".to_string(),
            exclude_crypto_weekends: true,
            break_even_policy: BreakEvenPolicy::default(),
            today: None,
        }
    }
}

impl EngineSettings {
    pub fn new(base_currency: impl Into<String>) -> Result<Self, CoreError> {
        let settings = Self {
            base_currency: base_currency.into(),
            ..Self::default()
        };
        settings.validated()
    }

    /// Parse settings from JSON. Missing optional fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validated()
    }

    /// Load settings from a JSON file on disk.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_break_even_policy(mut self, policy: BreakEvenPolicy) -> Self {
        self.break_even_policy = policy;
        self
    }

    pub fn with_crypto_weekends(mut self, exclude: bool) -> Self {
        self.exclude_crypto_weekends = exclude;
        self
    }

    /// The valuation date: the fixed `today` if set, otherwise the current UTC date.
    #[must_use]
    pub fn valuation_date(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| chrono::Utc::now().date_naive())
    }

    /// Currency code must be a 3-letter alphabetic string; it is stored uppercased.
    fn validated(mut self) -> Result<Self, CoreError> {
        let trimmed = self.base_currency.trim().to_uppercase();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::InvalidSettings(format!(
                "Invalid base currency '{}': must be exactly 3 ASCII letters (e.g., EUR, USD)",
                self.base_currency
            )));
        }
        self.base_currency = trimmed;
        Ok(self)
    }
}
