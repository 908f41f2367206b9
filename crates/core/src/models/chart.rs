use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single data point of an index curve.
///
/// The core computes these; the frontend only renders them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A dated index series rebased so that its first value is exactly 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexCurve {
    /// What the curve tracks ("BASKET" for the composite, the ticker for a benchmark)
    pub label: String,

    /// Points ascending by date; `points[0].value == 100.0`
    pub points: Vec<CurvePoint>,
}

/// The reconstructed basket curve.
pub type CompositeCurve = IndexCurve;

/// A reference index aligned to a composite's start date.
pub type BenchmarkCurve = IndexCurve;

impl IndexCurve {
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    /// Total return since the start, in percent: `last − 100`.
    pub fn total_return_pct(&self) -> Option<f64> {
        self.last_value().map(|v| v - 100.0)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Plain values, in date order (for sparkline-style rendering).
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}
