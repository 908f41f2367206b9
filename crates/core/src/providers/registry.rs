use crate::models::asset::AssetType;

use super::frankfurter::FrankfurterProvider;
use super::synthetic::SyntheticProvider;
use super::traits::PriceProvider;
#[cfg(not(target_arch = "wasm32"))]
use super::yahoo_finance::YahooFinanceProvider;

/// Registry of all available price providers.
///
/// Routes requests to the correct provider based on `AssetType`.
/// Registration order is fallback order.
pub struct PriceProviderRegistry {
    providers: Vec<Box<dyn PriceProvider>>,
}

impl PriceProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with the live market-data providers.
    pub fn new_with_defaults() -> Self {
        let mut registry = Self::new();

        // Yahoo Finance: stocks, ETFs, indices and FX pairs (primary)
        // Not available on WASM (uses native reqwest/tokio connectors)
        #[cfg(not(target_arch = "wasm32"))]
        {
            match YahooFinanceProvider::new() {
                Ok(yahoo) => registry.register(Box::new(yahoo)),
                Err(e) => log::warn!("Yahoo Finance provider unavailable: {e}"),
            }
        }

        // Frankfurter: ECB reference rates, FX fallback
        registry.register(Box::new(FrankfurterProvider::new()));

        registry
    }

    /// Create a registry serving deterministic synthetic prices for every type.
    pub fn new_demo(seed: u64) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SyntheticProvider::new(seed)));
        registry
    }

    /// Register a new price provider.
    pub fn register(&mut self, provider: Box<dyn PriceProvider>) {
        self.providers.push(provider);
    }

    /// Find the first provider that supports the given asset type.
    pub fn get_provider_for(&self, asset_type: &AssetType) -> Option<&dyn PriceProvider> {
        self.providers
            .iter()
            .find(|p| p.supported_asset_types().contains(asset_type))
            .map(|p| p.as_ref())
    }

    /// Return ALL providers that support the given asset type, ordered by registration priority.
    pub fn get_providers_for(&self, asset_type: &AssetType) -> Vec<&dyn PriceProvider> {
        self.providers
            .iter()
            .filter(|p| p.supported_asset_types().contains(asset_type))
            .map(|p| p.as_ref())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for PriceProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
