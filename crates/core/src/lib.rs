pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::Duration;
use log::{info, warn};
use models::{
    analytics::{BacktestReport, BenchmarkComparison, QuoteSummary},
    asset::Asset,
    chart::CompositeCurve,
    currency::{CurrencyTable, FxTable},
    plan::PlanEntry,
    price::{PriceSeries, SeriesCache},
    projection::{Projection, ProjectionInput},
    settings::Settings,
};
use providers::registry::PriceProviderRegistry;
use services::{
    analytics_service::AnalyticsService, basket_service::BasketService,
    benchmark_service::BenchmarkService, currency_service::CurrencyService,
    plan_service::PlanService, price_service::PriceService,
    projection_service::ProjectionService,
};
use std::collections::{HashMap, HashSet};

use errors::CoreError;

/// Calendar days of history fetched for dashboard tiles.
const QUOTE_WINDOW_DAYS: i64 = 45;

/// Main entry point for the BoussiBroke core library.
///
/// Holds the configuration, the price feed with its short-lived cache, and
/// the engines. Each call is an independent computation over freshly fetched
/// (or cached) series; no user state survives between calls.
#[must_use]
pub struct Dashboard {
    settings: Settings,
    price_service: PriceService,
    cache: SeriesCache,
    plan_service: PlanService,
    currency_service: CurrencyService,
    basket_service: BasketService,
    benchmark_service: BenchmarkService,
    projection_service: ProjectionService,
    analytics_service: AnalyticsService,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("reporting_currency", &self.settings.reporting_currency)
            .field("demo_mode", &self.settings.demo_mode)
            .field("cached_batches", &self.cache.len())
            .finish()
    }
}

impl Dashboard {
    /// Create a dashboard backed by the live providers, or by the synthetic
    /// feed when `settings.demo_mode` is set.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        let registry = if settings.demo_mode {
            PriceProviderRegistry::new_demo(settings.demo_seed)
        } else {
            PriceProviderRegistry::new_with_defaults()
        };
        Self::with_registry(settings, registry)
    }

    /// Create a dashboard with a custom provider registry.
    pub fn with_registry(
        settings: Settings,
        registry: PriceProviderRegistry,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        let price_service = PriceService::new(registry).with_timeout(settings.fetch_timeout());
        let cache = SeriesCache::new(settings.cache_ttl());

        Ok(Self {
            settings,
            price_service,
            cache,
            plan_service: PlanService::new(),
            currency_service: CurrencyService::new(),
            basket_service: BasketService::new(),
            benchmark_service: BenchmarkService::new(),
            projection_service: ProjectionService::new(),
            analytics_service: AnalyticsService::new(),
        })
    }

    /// Load settings from a JSON file and create a dashboard (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_config_file(path: &str) -> Result<Self, CoreError> {
        Self::new(Settings::load_from_file(path)?)
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The plan shown before the user edits anything.
    #[must_use]
    pub fn default_plan(&self) -> Vec<PlanEntry> {
        self.settings.default_plan.clone()
    }

    // ── Backtest ────────────────────────────────────────────────────

    /// Backtest a DCA plan against the configured benchmark.
    ///
    /// 1. Weight the plan.
    /// 2. Fetch constituents, the FX pairs they need and the benchmark.
    /// 3. Rebuild the composite in the reporting currency.
    /// 4. Align the benchmark; if that fails the report carries a note instead.
    pub async fn run_backtest(&mut self, entries: &[PlanEntry]) -> Result<BacktestReport, CoreError> {
        let weights = self
            .plan_service
            .compute_weights(entries, &self.settings.frequencies)?;

        let constituents: Vec<Asset> = weights.iter().map(|w| self.asset_for(&w.asset_id)).collect();
        let benchmark = self.asset_for(&self.settings.benchmark_symbol);

        let mut to_fetch = constituents.clone();
        to_fetch.push(benchmark.clone());
        let fx_assets = self.fx_assets_for(&to_fetch);
        to_fetch.extend(fx_assets);

        let fetched = self
            .price_service
            .fetch(&mut self.cache, &to_fetch, self.settings.history_window())
            .await;

        let reporting = self.settings.reporting_currency.clone();
        let fx_table = self
            .currency_service
            .build_fx_table(&reporting, &self.settings.fx_pairs, &fetched);
        let prices: HashMap<String, PriceSeries> = fetched
            .into_iter()
            .filter_map(|(symbol, series)| series.map(|s| (symbol, s)))
            .collect();
        let currencies: CurrencyTable = to_fetch
            .iter()
            .map(|a| (a.symbol.as_str(), a.currency.clone()))
            .collect();

        let basket = self
            .basket_service
            .reconstruct(&weights, &prices, &currencies, &fx_table)?;

        let (benchmark_comparison, benchmark_note) =
            match self.compare_benchmark(&benchmark, &basket.curve, &prices, &fx_table) {
                Ok(comparison) => {
                    let note = comparison.starts_late().then(|| {
                        format!(
                            "Benchmark history starts on {}, after the composite start {}",
                            comparison.benchmark_start, comparison.composite_start
                        )
                    });
                    (Some(comparison), note)
                }
                Err(e) if e.is_recoverable() => {
                    warn!("Benchmark comparison omitted: {e}");
                    (None, Some(format!("Benchmark comparison unavailable: {e}")))
                }
                Err(e) => return Err(e),
            };

        info!(
            "Backtest done: {} of {} plan entries included, composite {:+.1}%",
            basket.constituents.len(),
            weights.len(),
            basket.curve.total_return_pct().unwrap_or(0.0)
        );

        Ok(BacktestReport {
            reporting_currency: reporting,
            weights,
            basket,
            benchmark: benchmark_comparison,
            benchmark_note,
        })
    }

    /// Backtest the configured default plan.
    pub async fn run_default_backtest(&mut self) -> Result<BacktestReport, CoreError> {
        let plan = self.default_plan();
        self.run_backtest(&plan).await
    }

    // ── Projection ──────────────────────────────────────────────────

    /// Compound-interest projection of a DCA plan.
    pub fn project(&self, input: &ProjectionInput) -> Result<Projection, CoreError> {
        self.projection_service.project(input)
    }

    // ── Dashboard tiles ─────────────────────────────────────────────

    /// Latest close and day change for every watch-list ticker, in watch-list order.
    /// Tickers without enough data are left out (and logged).
    pub async fn quote_tiles(&mut self) -> Vec<QuoteSummary> {
        let assets: Vec<Asset> = self
            .settings
            .watchlist
            .iter()
            .map(|symbol| self.asset_for(symbol))
            .collect();

        let fetched = self
            .price_service
            .fetch(&mut self.cache, &assets, Duration::days(QUOTE_WINDOW_DAYS))
            .await;

        assets
            .iter()
            .filter_map(|asset| {
                let Some(Some(series)) = fetched.get(&asset.symbol) else {
                    warn!("No tile for {}: no price data", asset.symbol);
                    return None;
                };
                match self.analytics_service.summarize(asset, series) {
                    Ok(summary) => Some(summary),
                    Err(e) => {
                        warn!("No tile for {}: {e}", asset.symbol);
                        None
                    }
                }
            })
            .collect()
    }

    // ── Cache Management ────────────────────────────────────────────

    /// Number of cached fetch batches.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop expired batches. Returns the number removed.
    pub fn cache_prune_expired(&mut self) -> usize {
        self.cache.prune_expired(chrono::Utc::now())
    }

    pub fn cache_clear(&mut self) {
        self.cache.clear();
    }

    // ── Internal ────────────────────────────────────────────────────

    /// The configured instrument for `symbol`, or a stock quoted in the
    /// reporting currency when the symbol is not configured.
    fn asset_for(&self, symbol: &str) -> Asset {
        match self.settings.instrument(symbol) {
            Some(asset) => asset.clone(),
            None => {
                warn!(
                    "{symbol} is not a configured instrument; assuming a stock quoted in {}",
                    self.settings.reporting_currency
                );
                Asset::stock(symbol, symbol, self.settings.reporting_currency.clone())
            }
        }
    }

    /// FX pair instruments needed to convert `assets` into the reporting currency.
    fn fx_assets_for(&self, assets: &[Asset]) -> Vec<Asset> {
        let mut needed = HashSet::new();
        let mut fx_assets = Vec::new();
        for asset in assets {
            if asset.currency == self.settings.reporting_currency || !needed.insert(&asset.currency) {
                continue;
            }
            match self.settings.fx_pair_for(&asset.currency) {
                Some(pair) => fx_assets.push(Asset::fx(&pair.symbol, pair.currency.clone())),
                None => warn!(
                    "No FX pair configured for {}; {} cannot be converted",
                    asset.currency, asset.symbol
                ),
            }
        }
        fx_assets
    }

    fn compare_benchmark(
        &self,
        benchmark: &Asset,
        composite: &CompositeCurve,
        prices: &HashMap<String, PriceSeries>,
        fx_table: &FxTable,
    ) -> Result<BenchmarkComparison, CoreError> {
        let start_date = composite
            .start_date()
            .map(|d| d.to_string())
            .unwrap_or_default();
        let raw = prices
            .get(&benchmark.symbol)
            .ok_or_else(|| CoreError::BenchmarkUnavailable {
                symbol: benchmark.symbol.clone(),
                start_date,
            })?;
        let converted = self
            .currency_service
            .to_reporting_currency(raw, &benchmark.currency, fx_table)?;
        self.benchmark_service.align_benchmark(&converted, composite)
    }
}
