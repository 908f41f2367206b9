use crate::errors::CoreError;
use crate::models::projection::{Projection, ProjectionInput, ProjectionRow};

/// Longest horizon the simulator accepts.
pub const MAX_PROJECTION_YEARS: u32 = 100;

/// Closed-form compound-interest projections for a DCA plan.
///
/// Yearly compounding; the twelve monthly contributions of a year are added
/// as one annuity payment:
///
/// `FV = initial·(1+r)^y + 12·monthly·((1+r)^y − 1) / r`
///
/// with the `r = 0` limit `initial + 12·monthly·y`.
pub struct ProjectionService;

impl ProjectionService {
    pub fn new() -> Self {
        Self
    }

    /// Future value after `input.years` years.
    pub fn future_value(&self, input: &ProjectionInput) -> Result<f64, CoreError> {
        Self::validate(input)?;
        Ok(Self::value_after(input, input.years))
    }

    /// Full projection with one row per year.
    pub fn project(&self, input: &ProjectionInput) -> Result<Projection, CoreError> {
        Self::validate(input)?;

        let rows: Vec<ProjectionRow> = (1..=input.years)
            .map(|year| {
                let value = Self::value_after(input, year);
                let total_contributed = Self::contributed_after(input, year);
                ProjectionRow {
                    year,
                    total_contributed,
                    value,
                    gains: value - total_contributed,
                }
            })
            .collect();

        let future_value = Self::value_after(input, input.years);
        let total_contributed = Self::contributed_after(input, input.years);

        Ok(Projection {
            input: *input,
            future_value,
            total_contributed,
            total_gains: future_value - total_contributed,
            rows,
        })
    }

    fn value_after(input: &ProjectionInput, year: u32) -> f64 {
        let r = input.annual_rate_pct / 100.0;
        let annual = input.monthly * 12.0;
        if r == 0.0 {
            return input.initial + annual * f64::from(year);
        }
        // years are bounded by MAX_PROJECTION_YEARS
        let growth = (1.0 + r).powi(year as i32);
        input.initial * growth + annual * (growth - 1.0) / r
    }

    fn contributed_after(input: &ProjectionInput, year: u32) -> f64 {
        input.initial + input.monthly * 12.0 * f64::from(year)
    }

    fn validate(input: &ProjectionInput) -> Result<(), CoreError> {
        if !input.initial.is_finite() || input.initial < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Starting capital must be a finite, non-negative number, got {}",
                input.initial
            )));
        }
        if !input.monthly.is_finite() || input.monthly < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Monthly contribution must be a finite, non-negative number, got {}",
                input.monthly
            )));
        }
        if !input.annual_rate_pct.is_finite() || input.annual_rate_pct <= -100.0 {
            return Err(CoreError::ValidationError(format!(
                "Annual rate must be finite and above -100%, got {}%",
                input.annual_rate_pct
            )));
        }
        if input.years == 0 || input.years > MAX_PROJECTION_YEARS {
            return Err(CoreError::ValidationError(format!(
                "Horizon must be between 1 and {MAX_PROJECTION_YEARS} years, got {}",
                input.years
            )));
        }
        Ok(())
    }
}

impl Default for ProjectionService {
    fn default() -> Self {
        Self::new()
    }
}
