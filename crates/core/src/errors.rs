use thiserror::Error;

/// Unified error type for the entire portfolio-engine-core library.
/// Every public function returns `Result<T, CoreError>`.
///
/// Missing quotes, FX rates and cash balances are NOT errors: the pipeline
/// drops or forward-fills them and logs a warning. Only collaborator failures
/// and broken merge invariants surface here.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Settings file error: {0}")]
    FileIO(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Collaborators / Network ─────────────────────────────────────
    #[error("Broker '{broker}' failed: {message}")]
    Broker { broker: String, message: String },

    #[error("Broker not registered: {0}")]
    BrokerNotFound(String),

    #[error("API error ({provider}): {message}")]
    Api { provider: String, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Exchange rate not available for {from}/{to} on {date}")]
    RateNotAvailable {
        from: String,
        to: String,
        date: String,
    },

    // ── Invariant violations (caller misuse) ────────────────────────
    #[error("Cannot merge an empty list of {0}")]
    EmptyMerge(&'static str),

    #[error("Cannot merge holdings with different symbols: '{left}' and '{right}'")]
    SymbolMismatch { left: String, right: String },

    #[error("Cannot merge summaries in different base currencies: '{left}' and '{right}'")]
    CurrencyMismatch { left: String, right: String },

    #[error("Division by zero while computing {0}")]
    DivisionByZero(&'static str),
}

impl CoreError {
    /// `true` when the error indicates a bug in the caller (broken merge
    /// invariant), `false` when it comes from degraded external data or
    /// configuration.
    #[must_use]
    pub fn is_caller_misuse(&self) -> bool {
        matches!(
            self,
            CoreError::EmptyMerge(_)
                | CoreError::SymbolMismatch { .. }
                | CoreError::CurrencyMismatch { .. }
                | CoreError::DivisionByZero(_)
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; keep query strings out of logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
