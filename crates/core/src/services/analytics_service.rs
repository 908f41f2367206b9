use crate::errors::CoreError;
use crate::models::analytics::QuoteSummary;
use crate::models::asset::Asset;
use crate::models::price::PriceSeries;

/// Number of closes kept for a dashboard tile's sparkline.
pub const SPARKLINE_POINTS: usize = 30;

/// Computes dashboard tiles: latest close, day-over-day change and recent history.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Summarize the tail of `series` for `asset`.
    ///
    /// Needs at least two closes; otherwise `PriceNotAvailable`.
    pub fn summarize(&self, asset: &Asset, series: &PriceSeries) -> Result<QuoteSummary, CoreError> {
        let points = series.points();
        let [.., previous, last] = points else {
            return Err(CoreError::PriceNotAvailable {
                symbol: asset.symbol.clone(),
                detail: format!("need two closes for a day change, have {}", points.len()),
            });
        };

        let change_pct = (last.price - previous.price) / previous.price * 100.0;
        let tail_start = points.len().saturating_sub(SPARKLINE_POINTS);

        Ok(QuoteSummary {
            symbol: asset.symbol.clone(),
            name: asset.name.clone(),
            currency: asset.currency.clone(),
            as_of: last.date,
            last_price: last.price,
            previous_close: previous.price,
            change_pct,
            history: points[tail_start..].iter().map(|p| p.price).collect(),
        })
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
