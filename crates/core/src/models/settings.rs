use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::CoreError;
use super::asset::Asset;
use super::currency::{CurrencyCode, CurrencyTable, FxPair, FxQuote};
use super::plan::{Frequency, FrequencyTable, PlanEntry};

/// Longest history window a backtest may request (10 years).
pub const MAX_HISTORY_YEARS: u32 = 10;

/// Upper bound on how long fetched series may stay cached (one week).
pub const MAX_CACHE_TTL_SECS: u64 = 7 * 24 * 3600;

/// Dashboard configuration.
///
/// Every field has a default, so a JSON file only needs to list what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The currency every curve and amount is reported in (e.g., "EUR").
    pub reporting_currency: CurrencyCode,

    /// How many years of daily history a backtest fetches.
    pub history_years: u32,

    /// Timeout for a single provider call, in seconds.
    pub fetch_timeout_secs: u64,

    /// How long fetched series stay cached, in seconds.
    pub cache_ttl_secs: u64,

    /// Serve deterministic synthetic prices instead of calling market-data APIs.
    pub demo_mode: bool,

    /// Seed for the synthetic feed.
    pub demo_seed: u64,

    /// Ticker of the reference index for backtests.
    pub benchmark_symbol: String,

    /// Tickers shown as dashboard tiles, in display order.
    pub watchlist: Vec<String>,

    /// Known instruments with their type and quote currency.
    pub instruments: Vec<Asset>,

    /// Which rate series converts each foreign currency.
    pub fx_pairs: Vec<FxPair>,

    /// Occurrences per month for each purchase frequency.
    pub frequencies: FrequencyTable,

    /// Plan shown before the user edits anything.
    pub default_plan: Vec<PlanEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        let eur = CurrencyCode::known("EUR");
        let usd = CurrencyCode::known("USD");
        Self {
            reporting_currency: eur.clone(),
            history_years: 5,
            fetch_timeout_secs: 5,
            cache_ttl_secs: 3600,
            demo_mode: false,
            demo_seed: 42,
            benchmark_symbol: "^GSPC".to_string(),
            watchlist: vec![
                "PLTR".to_string(),
                "AAPL".to_string(),
                "TSLA".to_string(),
                "AI.PA".to_string(),
                "^GSPC".to_string(),
            ],
            instruments: vec![
                Asset::stock("PLTR", "Palantir", usd.clone()),
                Asset::stock("AAPL", "Apple", usd.clone()),
                Asset::stock("TSLA", "Tesla", usd.clone()),
                Asset::stock("AI.PA", "Air Liquide", eur.clone()),
                Asset::etf("CW8.PA", "Amundi MSCI World", eur),
                Asset::index("^GSPC", "S&P 500", usd),
            ],
            fx_pairs: vec![
                FxPair {
                    currency: CurrencyCode::known("USD"),
                    symbol: "EURUSD=X".to_string(),
                    quote: FxQuote::ForeignPerReporting,
                },
                FxPair {
                    currency: CurrencyCode::known("GBP"),
                    symbol: "EURGBP=X".to_string(),
                    quote: FxQuote::ForeignPerReporting,
                },
            ],
            frequencies: FrequencyTable::default(),
            default_plan: vec![
                PlanEntry::new("CW8.PA", 100.0, Frequency::Monthly),
                PlanEntry::new("AI.PA", 25.0, Frequency::Weekly),
                PlanEntry::new("AAPL", 50.0, Frequency::Biweekly),
                PlanEntry::new("PLTR", 20.0, Frequency::TwiceMonthly),
            ],
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize settings: {e}")))
    }

    /// Check cross-field consistency.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.history_years == 0 || self.history_years > MAX_HISTORY_YEARS {
            return Err(CoreError::ValidationError(format!(
                "history_years must be between 1 and {MAX_HISTORY_YEARS}, got {}",
                self.history_years
            )));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(CoreError::ValidationError(
                "fetch_timeout_secs must be positive".into(),
            ));
        }
        if self.cache_ttl_secs == 0 || self.cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(CoreError::ValidationError(format!(
                "cache_ttl_secs must be between 1 and {MAX_CACHE_TTL_SECS}, got {}",
                self.cache_ttl_secs
            )));
        }

        let mut seen = HashSet::new();
        for asset in &self.instruments {
            if asset.symbol.is_empty() {
                return Err(CoreError::ValidationError("Instrument with empty symbol".into()));
            }
            if !seen.insert(asset.symbol.to_ascii_uppercase()) {
                return Err(CoreError::ValidationError(format!(
                    "Instrument {} is listed more than once",
                    asset.symbol
                )));
            }
        }

        let mut fx_seen = HashSet::new();
        for pair in &self.fx_pairs {
            if pair.currency == self.reporting_currency {
                return Err(CoreError::ValidationError(format!(
                    "FX pair {} converts the reporting currency {} into itself",
                    pair.symbol, pair.currency
                )));
            }
            if !fx_seen.insert(&pair.currency) {
                return Err(CoreError::ValidationError(format!(
                    "More than one FX pair configured for {}",
                    pair.currency
                )));
            }
        }

        for (frequency, coefficient) in self.frequencies.iter() {
            if !coefficient.is_finite() || *coefficient <= 0.0 {
                return Err(CoreError::ValidationError(format!(
                    "Coefficient for {frequency} must be finite and positive, got {coefficient}"
                )));
            }
        }

        if self.benchmark_symbol.trim().is_empty() {
            return Err(CoreError::ValidationError("benchmark_symbol is empty".into()));
        }

        Ok(())
    }

    /// Set the reporting currency (must be a 3-letter alphabetic code).
    pub fn set_reporting_currency(&mut self, currency: &str) -> Result<(), CoreError> {
        self.reporting_currency = CurrencyCode::new(currency)?;
        Ok(())
    }

    /// The configured instrument for `symbol`, if any (case-insensitive).
    pub fn instrument(&self, symbol: &str) -> Option<&Asset> {
        let symbol = symbol.trim();
        self.instruments
            .iter()
            .find(|a| a.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Symbol → quote currency for every configured instrument.
    pub fn currency_table(&self) -> CurrencyTable {
        self.instruments
            .iter()
            .map(|a| (a.symbol.as_str(), a.currency.clone()))
            .collect()
    }

    /// The configured rate series for a foreign currency.
    pub fn fx_pair_for(&self, currency: &CurrencyCode) -> Option<&FxPair> {
        self.fx_pairs.iter().find(|p| &p.currency == currency)
    }

    pub fn history_window(&self) -> Duration {
        Duration::days(i64::from(self.history_years) * 365)
    }

    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        // Bounded by MAX_CACHE_TTL_SECS, so the cast cannot truncate.
        Duration::seconds(self.cache_ttl_secs.min(MAX_CACHE_TTL_SECS) as i64)
    }
}
