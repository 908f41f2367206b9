use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::asset::AssetType;
use crate::models::currency::parse_pair_symbol;
use crate::models::price::PricePoint;
use super::traits::PriceProvider;

const BASE_URL: &str = "https://api.frankfurter.dev/v1";

/// Frankfurter API provider for fiat exchange rates.
///
/// - **Free**: No API key, no rate limits, open-source.
/// - **Source**: European Central Bank (ECB) reference rates.
/// - **Endpoints used**: `/{start}..{end}?base=..&symbols=..`
///
/// Accepts Yahoo-style pair symbols so it can stand in for Yahoo on FX:
/// `EURUSD=X` is served as "USD per 1 EUR".
pub struct FrankfurterProvider {
    client: Client,
}

impl FrankfurterProvider {
    pub fn new() -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Frankfurter API response types ──────────────────────────────────

#[derive(Deserialize)]
struct TimeSeriesResponse {
    rates: HashMap<String, HashMap<String, f64>>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PriceProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        "Frankfurter"
    }

    fn supported_asset_types(&self) -> Vec<AssetType> {
        vec![AssetType::Fx]
    }

    async fn get_price_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let (base, target) = parse_pair_symbol(symbol).ok_or_else(|| CoreError::Api {
            provider: "Frankfurter".into(),
            message: format!("'{symbol}' is not a currency pair (expected e.g. EURUSD=X)"),
        })?;

        if base == target {
            // Flat 1.0 on every calendar day
            let mut points = Vec::new();
            let mut d = from;
            while d <= to {
                points.push(PricePoint { date: d, price: 1.0 });
                match d.succ_opt() {
                    Some(next) => d = next,
                    None => break,
                }
            }
            return Ok(points);
        }

        let from_str = from.format("%Y-%m-%d");
        let to_str = to.format("%Y-%m-%d");
        let url = format!("{BASE_URL}/{from_str}..{to_str}?base={base}&symbols={target}");

        let resp: TimeSeriesResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Frankfurter".into(),
                message: format!("Failed to parse time series for {base}/{target}: {e}"),
            })?;

        let target_key = target.as_str();
        let mut points: Vec<PricePoint> = resp
            .rates
            .iter()
            .filter_map(|(date_str, rates)| {
                let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
                let price = rates.get(target_key)?;
                Some(PricePoint { date, price: *price })
            })
            .collect();

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}
