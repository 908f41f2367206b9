use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use super::chart::{BenchmarkCurve, CompositeCurve};
use super::currency::CurrencyCode;
use super::plan::WeightedPlan;

/// Format a percentage with an explicit sign and one decimal (`+34.5%`).
pub fn format_pct(pct: f64) -> String {
    format!("{pct:+.1}%")
}

/// Why a plan entry did not make it into the basket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The feed returned nothing usable for the ticker
    NoPriceData,
    /// The quote currency needs an FX series that was not available
    MissingFxData { currency: CurrencyCode },
    /// Prices and FX rates never overlapped on a single date
    NoFxOverlap { currency: CurrencyCode },
    /// The entry's weight is zero, so it cannot contribute
    ZeroWeight,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoPriceData => write!(f, "no price data"),
            SkipReason::MissingFxData { currency } => write!(f, "no {currency} FX series"),
            SkipReason::NoFxOverlap { currency } => {
                write!(f, "no date shared with the {currency} FX series")
            }
            SkipReason::ZeroWeight => write!(f, "zero weight"),
        }
    }
}

/// A plan entry left out of the composite, with its (unused) weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedConstituent {
    pub asset_id: String,
    pub weight: f64,
    pub reason: SkipReason,
}

/// A plan entry that contributed to the composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constituent {
    pub asset_id: String,
    pub weight: f64,
    pub currency: CurrencyCode,

    /// Earliest date with a usable price after currency normalization
    pub first_valid_date: NaiveDate,
}

/// Output of the basket engine: the composite plus what went into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketReconstruction {
    pub curve: CompositeCurve,
    pub constituents: Vec<Constituent>,
    pub skipped: Vec<SkippedConstituent>,

    /// Σ weight over contributing constituents. Below 1.0 when entries were skipped;
    /// survivors are not renormalized.
    pub included_weight: f64,

    /// The date the last-to-appear constituent started contributing
    pub global_start_date: NaiveDate,
}

/// Composite vs benchmark, both rebased to 100 on the same start date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub benchmark: BenchmarkCurve,

    /// Composite total return since start, in percent
    pub composite_return_pct: f64,

    /// Benchmark total return since the same start, in percent
    pub benchmark_return_pct: f64,

    /// First date of the composite curve
    pub composite_start: NaiveDate,

    /// First date the benchmark has data on or after `composite_start`
    pub benchmark_start: NaiveDate,
}

impl BenchmarkComparison {
    /// Composite minus benchmark, in percentage points.
    pub fn excess_return_pct(&self) -> f64 {
        self.composite_return_pct - self.benchmark_return_pct
    }

    /// True when the benchmark only starts trading after the composite start,
    /// so its return covers a shorter period.
    pub fn starts_late(&self) -> bool {
        self.benchmark_start > self.composite_start
    }

    pub fn composite_return_label(&self) -> String {
        format_pct(self.composite_return_pct)
    }

    pub fn benchmark_return_label(&self) -> String {
        format_pct(self.benchmark_return_pct)
    }
}

/// Everything the UI needs to render one backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub reporting_currency: CurrencyCode,
    pub weights: Vec<WeightedPlan>,
    pub basket: BasketReconstruction,

    /// `None` when the benchmark could not be aligned; see `benchmark_note`
    pub benchmark: Option<BenchmarkComparison>,

    /// Visible note explaining why the comparison is missing or starts late
    pub benchmark_note: Option<String>,
}

impl BacktestReport {
    pub fn composite(&self) -> &CompositeCurve {
        &self.basket.curve
    }

    /// Composite total return since start, in percent.
    pub fn composite_return_pct(&self) -> f64 {
        self.basket.curve.total_return_pct().unwrap_or(0.0)
    }

    /// True when something was left out (skipped constituents or missing benchmark).
    pub fn is_degraded(&self) -> bool {
        !self.basket.skipped.is_empty() || self.benchmark.is_none()
    }

    /// Export as pretty JSON for the rendering layer.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize report: {e}")))
    }
}

/// One dashboard tile: latest close, day change, and the recent history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub symbol: String,
    pub name: String,
    pub currency: CurrencyCode,
    pub as_of: NaiveDate,
    pub last_price: f64,
    pub previous_close: f64,

    /// (last − previous) / previous × 100
    pub change_pct: f64,

    /// Closing prices for the sparkline, oldest first
    pub history: Vec<f64>,
}

impl QuoteSummary {
    pub fn change_label(&self) -> String {
        format!("{:+.2}%", self.change_pct)
    }
}
