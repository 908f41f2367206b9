use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::chart::{CurvePoint, IndexCurve};
use crate::models::price::PriceSeries;

/// Decides where curves start and rebases them to 100.
///
/// The only component allowed to truncate or rebase a series it did not fetch.
pub struct AlignmentService;

impl AlignmentService {
    pub fn new() -> Self {
        Self
    }

    /// The first date on which every constituent has started: the latest of
    /// their first valid dates. `None` when there are no constituents.
    pub fn global_start_date<I>(&self, first_valid_dates: I) -> Option<NaiveDate>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        first_valid_dates.into_iter().max()
    }

    /// Truncate `series` to `[start_date, end]`, then scale it so that the
    /// first remaining value is exactly 100.
    pub fn rebase_to_100(
        &self,
        series: &PriceSeries,
        start_date: NaiveDate,
    ) -> Result<IndexCurve, CoreError> {
        let window = series.since(start_date);
        let first = window.first().ok_or_else(|| {
            CoreError::Alignment(format!(
                "{} has no data on or after {start_date}",
                series.symbol()
            ))
        })?;

        let base = first.price;
        if !base.is_finite() || base <= 0.0 {
            return Err(CoreError::Alignment(format!(
                "{} starts at a non-positive value ({base}) on {}",
                series.symbol(),
                first.date
            )));
        }

        let points = window
            .iter()
            .map(|p| CurvePoint {
                date: p.date,
                value: p.price / base * 100.0,
            })
            .collect();

        Ok(IndexCurve {
            label: series.symbol().to_string(),
            points,
        })
    }
}

impl Default for AlignmentService {
    fn default() -> Self {
        Self::new()
    }
}
