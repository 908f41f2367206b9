use serde::{Deserialize, Serialize};

/// Inputs of the compound-interest simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Starting capital
    pub initial: f64,

    /// Contribution per month
    pub monthly: f64,

    /// Expected yearly return, in percent (8.0 means 8 %)
    pub annual_rate_pct: f64,

    /// Horizon in whole years
    pub years: u32,
}

impl Default for ProjectionInput {
    fn default() -> Self {
        Self {
            initial: 1000.0,
            monthly: 200.0,
            annual_rate_pct: 8.0,
            years: 20,
        }
    }
}

/// End-of-year state of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub year: u32,
    pub total_contributed: f64,
    pub value: f64,
    pub gains: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub input: ProjectionInput,
    pub future_value: f64,
    pub total_contributed: f64,
    pub total_gains: f64,
    pub rows: Vec<ProjectionRow>,
}
