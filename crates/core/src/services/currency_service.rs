use log::{debug, warn};

use crate::errors::CoreError;
use crate::models::currency::{CurrencyCode, FxPair, FxSeries, FxTable};
use crate::models::price::{FetchResult, PricePoint, PriceSeries};

/// Converts native-currency price series into the reporting currency.
///
/// Conversion is an inner join on dates: a price is converted only with the
/// rate of the same day. Dates without a rate are dropped, never filled with
/// a stale or assumed rate.
pub struct CurrencyService;

impl CurrencyService {
    pub fn new() -> Self {
        Self
    }

    /// Express `series` (quoted in `currency`) in the table's reporting currency.
    ///
    /// - Same currency → the series is returned unchanged.
    /// - No FX series for `currency` → `MissingFxData`.
    /// - No FX rate on any date of `series` → also `MissingFxData`.
    pub fn to_reporting_currency(
        &self,
        series: &PriceSeries,
        currency: &CurrencyCode,
        fx_table: &FxTable,
    ) -> Result<PriceSeries, CoreError> {
        if currency == fx_table.reporting_currency() {
            return Ok(series.clone());
        }

        let fx = fx_table.get(currency).ok_or_else(|| CoreError::MissingFxData {
            asset: series.symbol().to_string(),
            currency: currency.to_string(),
        })?;

        let prices = series.points();
        let rates = fx.rates.points();
        let mut converted = Vec::with_capacity(prices.len().min(rates.len()));

        // Both sides are sorted and unique by date: merge-walk them.
        let (mut i, mut j) = (0, 0);
        while i < prices.len() && j < rates.len() {
            match prices[i].date.cmp(&rates[j].date) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    converted.push(PricePoint {
                        date: prices[i].date,
                        price: fx.quote.apply(prices[i].price, rates[j].price),
                    });
                    i += 1;
                    j += 1;
                }
            }
        }

        if converted.is_empty() && !prices.is_empty() {
            return Err(CoreError::MissingFxData {
                asset: series.symbol().to_string(),
                currency: currency.to_string(),
            });
        }

        let dropped = prices.len() - converted.len();
        if dropped > 0 {
            debug!(
                "{}: {dropped} of {} prices had no {} rate on the same day",
                series.symbol(),
                prices.len(),
                currency
            );
        }

        Ok(PriceSeries::from_points(series.symbol(), converted))
    }

    /// Collect the configured FX series that were fetched successfully.
    pub fn build_fx_table(
        &self,
        reporting: &CurrencyCode,
        pairs: &[FxPair],
        fetched: &FetchResult,
    ) -> FxTable {
        let mut table = FxTable::new(reporting.clone());
        for pair in pairs {
            match fetched.get(&pair.symbol.to_uppercase()) {
                Some(Some(rates)) if !rates.is_empty() => table.insert(FxSeries {
                    currency: pair.currency.clone(),
                    quote: pair.quote,
                    rates: rates.clone(),
                }),
                Some(_) => warn!(
                    "No rates for {} ({}); {} instruments cannot be converted",
                    pair.symbol, pair.currency, pair.currency
                ),
                None => {}
            }
        }
        table
    }
}

impl Default for CurrencyService {
    fn default() -> Self {
        Self::new()
    }
}
