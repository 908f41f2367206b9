// ═══════════════════════════════════════════════════════════════════
// Integration Tests — Dashboard end to end over a mock price feed
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use boussibroke_core::errors::CoreError;
use boussibroke_core::models::analytics::SkipReason;
use boussibroke_core::models::asset::AssetType;
use boussibroke_core::models::currency::CurrencyCode;
use boussibroke_core::models::plan::{Frequency, PlanEntry};
use boussibroke_core::models::price::PricePoint;
use boussibroke_core::models::projection::ProjectionInput;
use boussibroke_core::models::settings::Settings;
use boussibroke_core::providers::registry::PriceProviderRegistry;
use boussibroke_core::providers::traits::PriceProvider;
use boussibroke_core::Dashboard;

// ═══════════════════════════════════════════════════════════════════
// Mock Price Provider (for testing without real API calls)
// ═══════════════════════════════════════════════════════════════════

struct MockMarket {
    series: HashMap<String, Vec<PricePoint>>,
    calls: Arc<AtomicUsize>,
}

impl MockMarket {
    fn new() -> Self {
        Self {
            series: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Ten consecutive days from 2024-01-01, linear from `start` by `step`.
    fn with(mut self, symbol: &str, start: f64, step: f64) -> Self {
        let points = (0..10)
            .map(|i| PricePoint {
                date: d(2024, 1, 1) + Duration::days(i),
                price: start + step * i as f64,
            })
            .collect();
        self.series.insert(symbol.to_string(), points);
        self
    }

    fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    fn into_registry(self) -> PriceProviderRegistry {
        let mut registry = PriceProviderRegistry::new();
        registry.register(Box::new(self));
        registry
    }
}

#[async_trait]
impl PriceProvider for MockMarket {
    fn name(&self) -> &str {
        "Mock"
    }

    fn supported_asset_types(&self) -> Vec<AssetType> {
        vec![AssetType::Stock, AssetType::Etf, AssetType::Index, AssetType::Fx]
    }

    async fn get_price_range(
        &self,
        symbol: &str,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.series
            .get(symbol)
            .cloned()
            .ok_or_else(|| CoreError::PriceNotAvailable {
                symbol: symbol.to_string(),
                detail: "not in mock".into(),
            })
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn full_market() -> MockMarket {
    MockMarket::new()
        .with("CW8.PA", 400.0, 2.0)
        .with("AAPL", 180.0, 1.0)
        .with("EURUSD=X", 1.10, 0.0)
        .with("^GSPC", 4700.0, 10.0)
}

fn plan() -> Vec<PlanEntry> {
    vec![
        PlanEntry::new("CW8.PA", 100.0, Frequency::Monthly),
        PlanEntry::new("AAPL", 25.0, Frequency::Weekly),
    ]
}

fn dashboard(market: MockMarket) -> Dashboard {
    Dashboard::with_registry(Settings::default(), market.into_registry()).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Backtest
// ═══════════════════════════════════════════════════════════════════

mod backtest {
    use super::*;

    #[tokio::test]
    async fn full_report_in_reporting_currency() {
        let mut dash = dashboard(full_market());
        let report = dash.run_backtest(&plan()).await.unwrap();

        assert_eq!(report.reporting_currency, CurrencyCode::new("EUR").unwrap());
        assert_eq!(report.weights.len(), 2);
        assert_eq!(report.basket.constituents.len(), 2);
        assert_eq!(report.basket.constituents[1].currency, CurrencyCode::new("USD").unwrap());
        assert!((report.basket.included_weight - 1.0).abs() < 1e-12);
        assert_eq!(report.composite().start_date(), Some(d(2024, 1, 1)));
        assert_eq!(report.composite().points[0].value, 100.0);
        assert!(report.composite_return_pct() > 0.0);

        let benchmark = report.benchmark.as_ref().unwrap();
        assert_eq!(benchmark.benchmark.start_date(), Some(d(2024, 1, 1)));
        assert_eq!(benchmark.benchmark.points[0].value, 100.0);
        assert!(!benchmark.starts_late());
        assert!(report.benchmark_note.is_none());
        assert!(!report.is_degraded());
    }

    #[tokio::test]
    async fn report_exports_to_json() {
        let mut dash = dashboard(full_market());
        let report = dash.run_backtest(&plan()).await.unwrap();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"BASKET\""));
        assert!(json.contains("\"^GSPC\""));
        assert!(json.contains("\"included_weight\""));
    }

    #[tokio::test]
    async fn missing_fx_degrades_instead_of_failing() {
        let market = MockMarket::new()
            .with("CW8.PA", 400.0, 2.0)
            .with("AAPL", 180.0, 1.0)
            .with("^GSPC", 4700.0, 10.0);
        let mut dash = dashboard(market);
        let report = dash.run_backtest(&plan()).await.unwrap();

        assert_eq!(report.basket.constituents.len(), 1);
        assert_eq!(report.basket.skipped[0].asset_id, "AAPL");
        assert_eq!(
            report.basket.skipped[0].reason,
            SkipReason::MissingFxData {
                currency: CurrencyCode::new("USD").unwrap()
            }
        );
        assert!(report.basket.included_weight < 1.0);

        // ^GSPC is quoted in USD too, so the comparison is dropped with a note
        assert!(report.benchmark.is_none());
        assert!(report.benchmark_note.as_deref().unwrap().contains("USD"));
        assert!(report.is_degraded());
    }

    #[tokio::test]
    async fn missing_benchmark_keeps_the_composite() {
        let market = MockMarket::new()
            .with("CW8.PA", 400.0, 2.0)
            .with("AAPL", 180.0, 1.0)
            .with("EURUSD=X", 1.10, 0.0);
        let mut dash = dashboard(market);
        let report = dash.run_backtest(&plan()).await.unwrap();

        assert!(report.basket.skipped.is_empty());
        assert!(report.benchmark.is_none());
        let note = report.benchmark_note.unwrap();
        assert!(note.starts_with("Benchmark comparison unavailable"));
        assert!(note.contains("^GSPC"));
    }

    #[tokio::test]
    async fn unconfigured_symbol_is_priced_in_reporting_currency() {
        let market = full_market().with("MSFT", 370.0, 1.5);
        let mut dash = dashboard(market);
        let report = dash
            .run_backtest(&[PlanEntry::new("msft", 50.0, Frequency::Monthly)])
            .await
            .unwrap();
        assert_eq!(report.basket.constituents[0].asset_id, "MSFT");
        assert_eq!(report.basket.constituents[0].currency, CurrencyCode::new("EUR").unwrap());
    }

    #[tokio::test]
    async fn lowercase_instrument_from_json_keeps_its_currency() {
        let json = r#"{"instruments":[{"symbol":"msft","name":"Microsoft","asset_type":"Stock","currency":"USD"}]}"#;
        let settings = Settings::from_json_str(json).unwrap();
        let market = full_market().with("MSFT", 370.0, 1.5);
        let mut dash = Dashboard::with_registry(settings, market.into_registry()).unwrap();

        let report = dash
            .run_backtest(&[PlanEntry::new("MSFT", 50.0, Frequency::Monthly)])
            .await
            .unwrap();
        assert_eq!(report.basket.constituents[0].asset_id, "MSFT");
        assert_eq!(report.basket.constituents[0].currency, CurrencyCode::new("USD").unwrap());
    }

    #[tokio::test]
    async fn late_benchmark_is_flagged_in_the_note() {
        let mut market = full_market();
        // ^GSPC only from 2024-01-04
        market.series.get_mut("^GSPC").unwrap().drain(..3);
        let mut dash = dashboard(market);
        let report = dash.run_backtest(&plan()).await.unwrap();

        let benchmark = report.benchmark.as_ref().unwrap();
        assert!(benchmark.starts_late());
        assert_eq!(benchmark.composite_start, d(2024, 1, 1));
        assert_eq!(benchmark.benchmark_start, d(2024, 1, 4));
        let note = report.benchmark_note.as_deref().unwrap();
        assert!(note.contains("2024-01-04"));
        assert!(note.contains("2024-01-01"));
    }

    #[tokio::test]
    async fn degenerate_plan_is_an_error() {
        let mut dash = dashboard(full_market());
        let err = dash
            .run_backtest(&[PlanEntry::new("CW8.PA", 0.0, Frequency::Monthly)])
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::DegeneratePlan(_)));
    }

    #[tokio::test]
    async fn no_data_at_all_is_empty_basket() {
        let mut dash = dashboard(MockMarket::new());
        let err = dash.run_backtest(&plan()).await.unwrap_err();
        assert!(matches!(err, CoreError::EmptyBasket));
    }

    #[tokio::test]
    async fn second_run_is_served_from_cache() {
        let market = full_market();
        let calls = market.counter();
        let mut dash = dashboard(market);

        let first = dash.run_backtest(&plan()).await.unwrap();
        let after_first = calls.load(Ordering::SeqCst);
        let second = dash.run_backtest(&plan()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), after_first);
        assert_eq!(dash.cache_len(), 1);
        assert_eq!(dash.cache_prune_expired(), 0);

        dash.cache_clear();
        assert_eq!(dash.cache_len(), 0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Tiles, projection, configuration
// ═══════════════════════════════════════════════════════════════════

mod dashboard {
    use super::*;

    #[tokio::test]
    async fn quote_tiles_follow_watchlist_order() {
        let market = MockMarket::new()
            .with("^GSPC", 4700.0, 10.0)
            .with("AAPL", 180.0, 1.0)
            .with("PLTR", 20.0, -0.5);
        let mut dash = dashboard(market);

        let tiles = dash.quote_tiles().await;
        let symbols: Vec<&str> = tiles.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["PLTR", "AAPL", "^GSPC"]);

        let aapl = &tiles[1];
        assert_eq!(aapl.last_price, 189.0);
        assert_eq!(aapl.previous_close, 188.0);
        assert_eq!(aapl.currency, CurrencyCode::new("USD").unwrap());
        assert_eq!(aapl.history.len(), 10);
    }

    #[test]
    fn project_uses_the_simulator() {
        let dash = dashboard(MockMarket::new());
        let projection = dash.project(&ProjectionInput::default()).unwrap();
        assert_eq!(projection.rows.len(), 20);
        assert!(projection.future_value > projection.total_contributed);
    }

    #[test]
    fn default_plan_comes_from_settings() {
        let dash = dashboard(MockMarket::new());
        assert_eq!(dash.default_plan(), Settings::default().default_plan);
        assert_eq!(dash.settings().benchmark_symbol, "^GSPC");
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let settings = Settings {
            history_years: 0,
            ..Settings::default()
        };
        let err = Dashboard::with_registry(settings, PriceProviderRegistry::new()).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let err = Dashboard::from_config_file("/nonexistent/boussibroke/settings.json").unwrap_err();
        assert!(matches!(err, CoreError::FileIO(_)));
    }

    #[test]
    fn debug_shows_state_not_internals() {
        let dash = dashboard(MockMarket::new());
        let debug = format!("{dash:?}");
        assert!(debug.contains("Dashboard"));
        assert!(debug.contains("demo_mode: false"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Demo mode (synthetic feed, no network)
// ═══════════════════════════════════════════════════════════════════

mod demo_mode {
    use super::*;

    fn demo_settings() -> Settings {
        Settings {
            demo_mode: true,
            history_years: 1,
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn default_backtest_runs_offline() {
        let mut dash = Dashboard::new(demo_settings()).unwrap();
        let report = dash.run_default_backtest().await.unwrap();

        assert_eq!(report.basket.constituents.len(), 4);
        assert!(report.basket.skipped.is_empty());
        assert_eq!(report.composite().points[0].value, 100.0);
        assert!(report.benchmark.is_some());
    }

    #[tokio::test]
    async fn same_seed_same_report() {
        let mut a = Dashboard::new(demo_settings()).unwrap();
        let mut b = Dashboard::new(demo_settings()).unwrap();
        let ra = a.run_default_backtest().await.unwrap();
        let rb = b.run_default_backtest().await.unwrap();
        assert_eq!(ra.composite(), rb.composite());
    }

    #[tokio::test]
    async fn tiles_for_every_watchlist_entry() {
        let mut dash = Dashboard::new(demo_settings()).unwrap();
        let tiles = dash.quote_tiles().await;
        assert_eq!(tiles.len(), 5);
        assert!(tiles.iter().all(|t| t.last_price > 0.0));
    }
}
