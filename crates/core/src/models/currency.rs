use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::CoreError;
use super::price::PriceSeries;

/// ISO-4217 style currency code: exactly three ASCII letters, uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: &str) -> Result<Self, CoreError> {
        let trimmed = code.trim().to_uppercase();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::ValidationError(format!(
                "Invalid currency code '{code}': must be exactly 3 ASCII letters (e.g., USD, EUR, GBP)"
            )));
        }
        Ok(Self(trimmed))
    }

    /// Built-in codes used by the default configuration.
    pub(crate) fn known(code: &'static str) -> Self {
        Self(code.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// Quoting convention of an FX series relative to the reporting currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FxQuote {
    /// Units of the foreign currency per one unit of reporting currency
    /// (Yahoo `EURUSD=X` with EUR reporting). Native prices are divided by the rate.
    ForeignPerReporting,
    /// Units of reporting currency per one unit of the foreign currency
    /// (Yahoo `USDEUR=X` with EUR reporting). Native prices are multiplied by the rate.
    ReportingPerForeign,
}

impl FxQuote {
    /// Convert one native-currency price at the given rate.
    #[must_use]
    pub fn apply(self, price: f64, rate: f64) -> f64 {
        match self {
            FxQuote::ForeignPerReporting => price / rate,
            FxQuote::ReportingPerForeign => price * rate,
        }
    }
}

/// Configuration entry: which ticker supplies the rate for a foreign currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxPair {
    /// The foreign currency this pair converts from
    pub currency: CurrencyCode,

    /// Provider symbol for the rate series (e.g., "EURUSD=X")
    pub symbol: String,

    /// How the rate is quoted relative to the reporting currency
    pub quote: FxQuote,
}

/// A rate series for one foreign currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxSeries {
    pub currency: CurrencyCode,
    pub quote: FxQuote,
    pub rates: PriceSeries,
}

/// All FX series available for one computation, keyed by foreign currency.
#[derive(Debug, Clone)]
pub struct FxTable {
    reporting: CurrencyCode,
    series: HashMap<CurrencyCode, FxSeries>,
}

impl FxTable {
    pub fn new(reporting: CurrencyCode) -> Self {
        Self {
            reporting,
            series: HashMap::new(),
        }
    }

    pub fn reporting_currency(&self) -> &CurrencyCode {
        &self.reporting
    }

    /// Add or replace the rate series for `fx.currency`.
    pub fn insert(&mut self, fx: FxSeries) {
        self.series.insert(fx.currency.clone(), fx);
    }

    pub fn get(&self, currency: &CurrencyCode) -> Option<&FxSeries> {
        self.series.get(currency)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Immutable symbol → quote currency lookup, built once from the instrument list.
#[derive(Debug, Clone, Default)]
pub struct CurrencyTable {
    by_symbol: HashMap<String, CurrencyCode>,
}

impl CurrencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, symbol: &str, currency: CurrencyCode) -> Self {
        self.by_symbol.insert(symbol.trim().to_uppercase(), currency);
        self
    }

    pub fn get(&self, symbol: &str) -> Option<&CurrencyCode> {
        self.by_symbol.get(&symbol.trim().to_uppercase())
    }
}

impl<'a> FromIterator<(&'a str, CurrencyCode)> for CurrencyTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, CurrencyCode)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |table, (symbol, currency)| table.with(symbol, currency))
    }
}

/// Split a Yahoo-style pair symbol (`EURUSD=X`) into (base, quote) currencies.
pub fn parse_pair_symbol(symbol: &str) -> Option<(CurrencyCode, CurrencyCode)> {
    let upper = symbol.trim().to_uppercase();
    let pair = upper.strip_suffix("=X").unwrap_or(&upper);
    if pair.len() != 6 || !pair.is_ascii() {
        return None;
    }
    let base = CurrencyCode::new(&pair[..3]).ok()?;
    let quote = CurrencyCode::new(&pair[3..]).ok()?;
    Some((base, quote))
}
