use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::asset::AssetType;
use crate::models::price::PricePoint;

/// Trait abstraction for all market-data providers.
///
/// Each source (Yahoo Finance, Frankfurter, the synthetic demo feed)
/// implements this trait. If an API stops working or changes, only that
/// implementation is replaced; the engines never see provider details.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Which instrument types this provider can handle.
    fn supported_asset_types(&self) -> Vec<AssetType>;

    /// Daily closes for `symbol` between `from` and `to` (inclusive), in the
    /// instrument's native currency. Order and duplicates are not guaranteed;
    /// callers normalize through `PriceSeries::from_points`.
    async fn get_price_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError>;
}
