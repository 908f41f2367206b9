use chrono::{Duration, NaiveDate, Utc};
use futures::future::join_all;
use log::{debug, info, warn};
use std::collections::HashSet;

use crate::errors::CoreError;
use crate::models::asset::{Asset, AssetType};
use crate::models::price::{CacheKey, FetchResult, PriceSeries, SeriesCache};
use crate::providers::registry::PriceProviderRegistry;

/// Default timeout for a single provider call.
pub const DEFAULT_FETCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Fetches daily price series from API providers.
///
/// Failures are per ticker: a ticker that cannot be resolved, times out or
/// returns nothing usable maps to `None`, and the rest of the batch is kept.
/// Tickers are fetched concurrently; each provider call has its own timeout.
///
/// Cache strategy (when a `SeriesCache` is passed):
/// - keyed by (ticker set, window length), expiring after the cache's TTL;
/// - expired entries are pruned on every fetch;
/// - only complete batches are stored, so a later call can retry failures.
///
/// Per-call timeouts apply on native targets only; on wasm32 the call is
/// awaited as-is and the host runtime bounds it.
pub struct PriceService {
    registry: PriceProviderRegistry,
    timeout: std::time::Duration,
}

impl PriceService {
    pub fn new(registry: PriceProviderRegistry) -> Self {
        Self {
            registry,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> std::time::Duration {
        self.timeout
    }

    /// Check if at least one provider is available for a given asset type.
    pub fn has_provider_for(&self, asset_type: &AssetType) -> bool {
        self.registry.get_provider_for(asset_type).is_some()
    }

    /// Get the names of all providers available for a given asset type.
    pub fn get_provider_names(&self, asset_type: &AssetType) -> Vec<String> {
        self.registry
            .get_providers_for(asset_type)
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Fetch the last `period` of daily closes for every asset, using `cache`.
    pub async fn fetch(
        &self,
        cache: &mut SeriesCache,
        assets: &[Asset],
        period: Duration,
    ) -> FetchResult {
        let now = Utc::now();
        let symbols: Vec<&str> = assets.iter().map(|a| a.symbol.as_str()).collect();
        let key = CacheKey::new(&symbols, period.num_days());

        let pruned = cache.prune_expired(now);
        if pruned > 0 {
            debug!("Pruned {pruned} expired cached batch(es)");
        }

        if let Some(hit) = cache.get(&key, now) {
            debug!("Cache hit for {} ticker(s) over {} days", key.symbols().len(), key.window_days());
            return hit.clone();
        }

        let to = now.date_naive();
        let from = to - period;
        let result = self.fetch_range(assets, from, to).await;

        if result.values().all(Option::is_some) {
            cache.insert(key, result.clone(), now);
        }
        result
    }

    /// Fetch `[from, to]` for every asset, bypassing any cache.
    pub async fn fetch_range(&self, assets: &[Asset], from: NaiveDate, to: NaiveDate) -> FetchResult {
        let mut seen = HashSet::new();
        let unique: Vec<&Asset> = assets
            .iter()
            .filter(|a| seen.insert(a.symbol.as_str()))
            .collect();

        let fetches = unique.iter().map(|asset| async move {
            let outcome = self.fetch_one(asset, from, to).await;
            (asset.symbol.clone(), outcome)
        });

        let mut result = FetchResult::new();
        let mut failed = 0;
        for (symbol, outcome) in join_all(fetches).await {
            match outcome {
                Ok(series) => {
                    result.insert(symbol, Some(series));
                }
                Err(e) => {
                    warn!("No data for {symbol}: {e}");
                    failed += 1;
                    result.insert(symbol, None);
                }
            }
        }

        info!(
            "Fetched {} of {} ticker(s) for {from}..{to}",
            result.len() - failed,
            result.len()
        );
        result
    }

    /// Fetch one series with automatic provider fallback.
    ///
    /// Tries providers in registration order; a provider that errors, times out
    /// or returns no usable prices hands over to the next one.
    pub async fn fetch_one(
        &self,
        asset: &Asset,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PriceSeries, CoreError> {
        let providers = self.registry.get_providers_for(&asset.asset_type);
        if providers.is_empty() {
            return Err(CoreError::NoProvider(asset.asset_type.to_string()));
        }

        let mut last_error = None;
        for provider in &providers {
            let call = provider.get_price_range(&asset.symbol, from, to);
            #[cfg(not(target_arch = "wasm32"))]
            let outcome = match tokio::time::timeout(self.timeout, call).await {
                Ok(outcome) => outcome,
                Err(_) => Err(CoreError::Timeout {
                    provider: provider.name().to_string(),
                    symbol: asset.symbol.clone(),
                    seconds: self.timeout.as_secs(),
                }),
            };
            #[cfg(target_arch = "wasm32")]
            let outcome = call.await;

            match outcome {
                Ok(points) => {
                    let raw = points.len();
                    let series = PriceSeries::from_points(&asset.symbol, points);
                    if series.is_empty() {
                        last_error = Some(CoreError::PriceNotAvailable {
                            symbol: asset.symbol.clone(),
                            detail: format!("{} returned no usable prices", provider.name()),
                        });
                        continue;
                    }
                    if series.len() < raw {
                        debug!(
                            "{}: dropped {} invalid or duplicate point(s) from {}",
                            asset.symbol,
                            raw - series.len(),
                            provider.name()
                        );
                    }
                    return Ok(series);
                }
                Err(e) => {
                    debug!("{} failed for {}: {e}", provider.name(), asset.symbol);
                    last_error = Some(e);
                    // Try next provider
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoProvider(asset.asset_type.to_string())))
    }
}
