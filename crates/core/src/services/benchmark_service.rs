use log::warn;

use crate::errors::CoreError;
use crate::models::analytics::BenchmarkComparison;
use crate::models::chart::CompositeCurve;
use crate::models::price::PriceSeries;
use crate::services::alignment_service::AlignmentService;

/// Lines a reference index up with a composite curve for side-by-side display.
pub struct BenchmarkService {
    alignment_service: AlignmentService,
}

impl BenchmarkService {
    pub fn new() -> Self {
        Self {
            alignment_service: AlignmentService::new(),
        }
    }

    /// Rebase `benchmark_raw` to 100 on the composite's start date and compute
    /// both total returns (`last − 100`, in percent).
    ///
    /// A benchmark whose history begins later is still compared; the
    /// comparison records both start dates (see `starts_late`).
    ///
    /// Fails with `BenchmarkUnavailable` when the benchmark has no data on or
    /// after that date; the composite itself stays valid.
    pub fn align_benchmark(
        &self,
        benchmark_raw: &PriceSeries,
        composite: &CompositeCurve,
    ) -> Result<BenchmarkComparison, CoreError> {
        let (Some(start_date), Some(composite_return_pct)) =
            (composite.start_date(), composite.total_return_pct())
        else {
            return Err(CoreError::Alignment(
                "cannot compare a benchmark against an empty composite".into(),
            ));
        };

        let benchmark = self
            .alignment_service
            .rebase_to_100(benchmark_raw, start_date)
            .map_err(|_| CoreError::BenchmarkUnavailable {
                symbol: benchmark_raw.symbol().to_string(),
                start_date: start_date.to_string(),
            })?;

        let benchmark_start = benchmark.start_date().unwrap_or(start_date);
        if benchmark_start > start_date {
            warn!(
                "{} first trades on {benchmark_start}, after the composite start {start_date}",
                benchmark.label
            );
        }

        let benchmark_return_pct = benchmark.total_return_pct().unwrap_or(0.0);

        Ok(BenchmarkComparison {
            benchmark,
            composite_return_pct,
            benchmark_return_pct,
            composite_start: start_date,
            benchmark_start,
        })
    }
}

impl Default for BenchmarkService {
    fn default() -> Self {
        Self::new()
    }
}
