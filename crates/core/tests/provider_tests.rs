// ═══════════════════════════════════════════════════════════════════
// Provider Tests — Registry routing, Frankfurter, Yahoo, synthetic feed
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};

use boussibroke_core::errors::CoreError;
use boussibroke_core::models::asset::AssetType;
use boussibroke_core::models::price::PricePoint;
use boussibroke_core::providers::frankfurter::FrankfurterProvider;
use boussibroke_core::providers::registry::PriceProviderRegistry;
use boussibroke_core::providers::synthetic::SyntheticProvider;
use boussibroke_core::providers::traits::PriceProvider;
use boussibroke_core::providers::yahoo_finance::YahooFinanceProvider;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — Mock Providers
// ═══════════════════════════════════════════════════════════════════

/// A mock provider that supports only the specified asset types.
struct MockProvider {
    name: String,
    types: Vec<AssetType>,
}

impl MockProvider {
    fn new(name: &str, types: Vec<AssetType>) -> Self {
        Self {
            name: name.to_string(),
            types,
        }
    }
}

#[async_trait]
impl PriceProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_asset_types(&self) -> Vec<AssetType> {
        self.types.clone()
    }

    async fn get_price_range(
        &self,
        _symbol: &str,
        from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        Ok(vec![PricePoint { date: from, price: 100.0 }])
    }
}

// ═══════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════

mod registry {
    use super::*;

    #[test]
    fn new_registry_is_empty() {
        let registry = PriceProviderRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get_provider_for(&AssetType::Stock).is_none());
        assert!(registry.get_providers_for(&AssetType::Fx).is_empty());
    }

    #[test]
    fn default_is_empty() {
        assert_eq!(PriceProviderRegistry::default().len(), 0);
    }

    #[test]
    fn routes_by_asset_type() {
        let mut registry = PriceProviderRegistry::new();
        registry.register(Box::new(MockProvider::new("Equities", vec![AssetType::Stock, AssetType::Etf])));
        registry.register(Box::new(MockProvider::new("Rates", vec![AssetType::Fx])));

        assert_eq!(registry.get_provider_for(&AssetType::Etf).unwrap().name(), "Equities");
        assert_eq!(registry.get_provider_for(&AssetType::Fx).unwrap().name(), "Rates");
        assert!(registry.get_provider_for(&AssetType::Index).is_none());
    }

    #[test]
    fn registration_order_is_fallback_order() {
        let mut registry = PriceProviderRegistry::new();
        registry.register(Box::new(MockProvider::new("Primary", vec![AssetType::Fx])));
        registry.register(Box::new(MockProvider::new("Stocks", vec![AssetType::Stock])));
        registry.register(Box::new(MockProvider::new("Secondary", vec![AssetType::Fx])));

        let names: Vec<&str> = registry
            .get_providers_for(&AssetType::Fx)
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(names, vec!["Primary", "Secondary"]);
    }

    #[test]
    fn defaults_cover_every_asset_type() {
        let registry = PriceProviderRegistry::new_with_defaults();
        for t in [AssetType::Stock, AssetType::Etf, AssetType::Index, AssetType::Fx] {
            assert!(registry.get_provider_for(&t).is_some(), "no provider for {t}");
        }
    }

    #[test]
    fn defaults_fall_back_to_frankfurter_for_fx() {
        let registry = PriceProviderRegistry::new_with_defaults();
        let names: Vec<&str> = registry
            .get_providers_for(&AssetType::Fx)
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(names.last(), Some(&"Frankfurter"));
    }

    #[test]
    fn demo_registry_is_synthetic_only() {
        let registry = PriceProviderRegistry::new_demo(7);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get_provider_for(&AssetType::Index).unwrap().name(), "Synthetic");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Frankfurter
// ═══════════════════════════════════════════════════════════════════

mod frankfurter {
    use super::*;

    #[test]
    fn name_and_types() {
        let p = FrankfurterProvider::new();
        assert_eq!(p.name(), "Frankfurter");
        assert_eq!(p.supported_asset_types(), vec![AssetType::Fx]);
    }

    #[tokio::test]
    async fn rejects_non_pair_symbol() {
        let p = FrankfurterProvider::new();
        let err = p
            .get_price_range("AAPL", d(2024, 1, 1), d(2024, 1, 5))
            .await
            .unwrap_err();
        match err {
            CoreError::Api { provider, message } => {
                assert_eq!(provider, "Frankfurter");
                assert!(message.contains("AAPL"));
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn same_currency_pair_is_flat() {
        let p = FrankfurterProvider::new();
        let points = p
            .get_price_range("EUREUR=X", d(2024, 1, 1), d(2024, 1, 3))
            .await
            .unwrap();
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|pt| pt.price == 1.0));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Yahoo Finance
// ═══════════════════════════════════════════════════════════════════

mod yahoo {
    use super::*;

    #[test]
    fn name_and_types() {
        let p = YahooFinanceProvider::new().unwrap();
        assert_eq!(p.name(), "Yahoo Finance");
        let types = p.supported_asset_types();
        for t in [AssetType::Stock, AssetType::Etf, AssetType::Index, AssetType::Fx] {
            assert!(types.contains(&t));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Synthetic demo feed
// ═══════════════════════════════════════════════════════════════════

mod synthetic {
    use super::*;

    #[tokio::test]
    async fn same_seed_same_series() {
        let a = SyntheticProvider::new(42);
        let b = SyntheticProvider::new(42);
        let from = d(2024, 1, 1);
        let to = d(2024, 3, 31);
        let pa = a.get_price_range("PLTR", from, to).await.unwrap();
        let pb = b.get_price_range("pltr", from, to).await.unwrap();
        assert_eq!(pa, pb);
    }

    #[tokio::test]
    async fn symbols_get_distinct_walks() {
        let p = SyntheticProvider::new(42);
        let from = d(2024, 1, 1);
        let to = d(2024, 1, 31);
        let aapl = p.get_price_range("AAPL", from, to).await.unwrap();
        let tsla = p.get_price_range("TSLA", from, to).await.unwrap();
        assert_ne!(aapl, tsla);
    }

    #[tokio::test]
    async fn different_seed_changes_series() {
        let from = d(2024, 1, 1);
        let to = d(2024, 1, 31);
        let a = SyntheticProvider::new(1).get_price_range("AAPL", from, to).await.unwrap();
        let b = SyntheticProvider::new(2).get_price_range("AAPL", from, to).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn weekdays_only_and_in_range() {
        let p = SyntheticProvider::new(42);
        // 2024-01-01 is a Monday; four full weeks
        let points = p.get_price_range("AI.PA", d(2024, 1, 1), d(2024, 1, 28)).await.unwrap();
        assert_eq!(points.len(), 20);
        assert!(points
            .iter()
            .all(|pt| !matches!(pt.date.weekday(), Weekday::Sat | Weekday::Sun)));
        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[tokio::test]
    async fn equity_walk_starts_between_100_and_200() {
        let p = SyntheticProvider::new(42);
        let points = p.get_price_range("CW8.PA", d(2024, 1, 1), d(2024, 12, 31)).await.unwrap();
        let first = points[0].price;
        assert!((100.0..200.0).contains(&first), "start {first}");
        assert!(points.iter().all(|pt| pt.price >= 1.0));
    }

    #[tokio::test]
    async fn fx_walk_looks_like_a_rate() {
        let p = SyntheticProvider::new(42);
        let points = p.get_price_range("EURUSD=X", d(2024, 1, 1), d(2024, 1, 31)).await.unwrap();
        let first = points[0].price;
        assert!((0.8..1.4).contains(&first), "start {first}");
        assert!(points.iter().all(|pt| pt.price > 0.0 && pt.price < 2.0));
    }

    #[tokio::test]
    async fn empty_range() {
        let p = SyntheticProvider::new(42);
        let points = p.get_price_range("AAPL", d(2024, 1, 5), d(2024, 1, 1)).await.unwrap();
        assert!(points.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Thread safety
// ═══════════════════════════════════════════════════════════════════

mod thread_safety {
    use super::*;

    #[test]
    fn providers_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FrankfurterProvider>();
        assert_send_sync::<SyntheticProvider>();
        assert_send_sync::<YahooFinanceProvider>();
        assert_send_sync::<PriceProviderRegistry>();
    }
}
