use thiserror::Error;

/// Unified error type for the entire boussibroke-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Backtest ────────────────────────────────────────────────────
    #[error("Degenerate plan: {0}; adjust your plan")]
    DegeneratePlan(String),

    #[error("Missing FX data to convert {asset} from {currency}")]
    MissingFxData { asset: String, currency: String },

    #[error("Empty basket: no constituent has usable price data")]
    EmptyBasket,

    #[error("Alignment failed: {0}")]
    Alignment(String),

    #[error("Benchmark {symbol} has no data on or after {start_date}")]
    BenchmarkUnavailable { symbol: String, start_date: String },

    // ── Configuration / Input ───────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out after {seconds}s fetching {symbol} from {provider}")]
    Timeout {
        provider: String,
        symbol: String,
        seconds: u64,
    },

    #[error("No provider available for asset type: {0}")]
    NoProvider(String),

    #[error("Price not available for {symbol} ({detail})")]
    PriceNotAvailable { symbol: String, detail: String },
}

impl CoreError {
    /// True for failures the dashboard can degrade around (skip a constituent,
    /// omit the benchmark) instead of aborting the whole computation.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoreError::MissingFxData { .. }
                | CoreError::BenchmarkUnavailable { .. }
                | CoreError::PriceNotAvailable { .. }
                | CoreError::Api { .. }
                | CoreError::Network(_)
                | CoreError::Timeout { .. }
                | CoreError::NoProvider(_)
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
        // Strip query parameters from URLs so request details never leak into messages.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
