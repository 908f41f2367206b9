use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::errors::CoreError;
use crate::models::asset::AssetType;
use crate::models::currency::parse_pair_symbol;
use crate::models::price::PricePoint;
use super::traits::PriceProvider;

/// Smallest price the random walk may reach; keeps every series strictly positive.
const PRICE_FLOOR: f64 = 1.0;
const RATE_FLOOR: f64 = 0.05;

/// Offline demo feed: a seeded Gaussian random walk per symbol on weekdays.
///
/// Equities start uniformly in [100, 200) and move by N(0, 1) per day;
/// currency pairs start in [0.8, 1.4) and move by N(0, 0.005).
/// The same `(seed, symbol, from, to)` always yields the same series.
pub struct SyntheticProvider {
    seed: u64,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Mix the symbol into the seed (FNV-1a), so each ticker gets its own walk.
    fn symbol_seed(&self, symbol: &str) -> u64 {
        symbol
            .to_uppercase()
            .bytes()
            .fold(self.seed ^ 0xcbf2_9ce4_8422_2325, |acc, b| {
                (acc ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
            })
    }

    fn walk(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<PricePoint>, CoreError> {
        let is_fx = parse_pair_symbol(symbol).is_some() && symbol.to_uppercase().ends_with("=X");
        let (start_range, sigma, floor) = if is_fx {
            (0.8..1.4, 0.005, RATE_FLOOR)
        } else {
            (100.0..200.0, 1.0, PRICE_FLOOR)
        };

        let normal = Normal::new(0.0, sigma).map_err(|e| CoreError::Api {
            provider: "Synthetic".into(),
            message: format!("Invalid distribution for {symbol}: {e}"),
        })?;
        let mut rng = StdRng::seed_from_u64(self.symbol_seed(symbol));
        let mut price: f64 = rng.gen_range(start_range);

        let mut points = Vec::new();
        let mut date = from;
        while date <= to {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                points.push(PricePoint { date, price });
                price = (price + normal.sample(&mut rng)).max(floor);
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        Ok(points)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PriceProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "Synthetic"
    }

    fn supported_asset_types(&self) -> Vec<AssetType> {
        vec![AssetType::Stock, AssetType::Etf, AssetType::Index, AssetType::Fx]
    }

    async fn get_price_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        self.walk(symbol, from, to)
    }
}
