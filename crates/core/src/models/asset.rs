use serde::{Deserialize, Deserializer, Serialize};

use super::currency::CurrencyCode;

/// The type/category of a quoted instrument.
/// Determines which price provider to use for fetching market data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    /// Single equities (AAPL, PLTR, AI.PA)
    Stock,
    /// Exchange-traded funds (CW8.PA, VOO)
    Etf,
    /// Market indices used as benchmarks (^GSPC, ^FCHI)
    Index,
    /// Currency pairs in Yahoo notation (EURUSD=X)
    Fx,
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetType::Stock => write!(f, "Stock"),
            AssetType::Etf => write!(f, "ETF"),
            AssetType::Index => write!(f, "Index"),
            AssetType::Fx => write!(f, "FX"),
        }
    }
}

/// A quoted instrument together with the currency its prices are denominated in.
///
/// **Equality and hashing** are based solely on `(symbol, asset_type)`,
/// NOT on `name` or `currency`, so lookups stay stable regardless of the
/// display name used when creating the asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Ticker symbol, uppercased (e.g., "AAPL", "AI.PA", "^GSPC", "EURUSD=X")
    #[serde(deserialize_with = "normalized_symbol")]
    pub symbol: String,

    /// Human-readable name (e.g., "Apple", "Air Liquide", "S&P 500")
    pub name: String,

    /// Instrument category; determines which API provider to use
    pub asset_type: AssetType,

    /// Currency the provider quotes this instrument in
    pub currency: CurrencyCode,
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol && self.asset_type == other.asset_type
    }
}

impl Eq for Asset {}

impl std::hash::Hash for Asset {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
        self.asset_type.hash(state);
    }
}

impl Asset {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        asset_type: AssetType,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            symbol: symbol.into().trim().to_uppercase(),
            name: name.into(),
            asset_type,
            currency,
        }
    }

    /// Convenience constructors for common asset types
    pub fn stock(symbol: impl Into<String>, name: impl Into<String>, currency: CurrencyCode) -> Self {
        Self::new(symbol, name, AssetType::Stock, currency)
    }

    pub fn etf(symbol: impl Into<String>, name: impl Into<String>, currency: CurrencyCode) -> Self {
        Self::new(symbol, name, AssetType::Etf, currency)
    }

    pub fn index(symbol: impl Into<String>, name: impl Into<String>, currency: CurrencyCode) -> Self {
        Self::new(symbol, name, AssetType::Index, currency)
    }

    /// An FX pair quoted as units of `currency` per one unit of the pair's base.
    pub fn fx(symbol: impl Into<String>, currency: CurrencyCode) -> Self {
        let symbol = symbol.into();
        let name = symbol.clone();
        Self::new(symbol, name, AssetType::Fx, currency)
    }
}

/// Symbols read from configuration get the same trim + uppercase as `Asset::new`.
fn normalized_symbol<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_uppercase())
}
