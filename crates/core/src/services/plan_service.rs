use log::warn;

use crate::errors::CoreError;
use crate::models::plan::{FrequencyTable, PlanEntry, WeightedPlan, FALLBACK_COEFFICIENT};

/// Turns recurring purchase instructions into a normalized weight vector.
///
/// Pure business logic. No I/O, no API calls.
pub struct PlanService;

impl PlanService {
    pub fn new() -> Self {
        Self
    }

    /// Compute `monthly_budget = amount × coefficient(frequency)` and
    /// `weight = monthly_budget / Σ monthly_budget` for every entry, in input order.
    ///
    /// Unknown frequency labels use `FALLBACK_COEFFICIENT` and are flagged on the
    /// returned entry. Fails with `DegeneratePlan` when the plan is empty or its
    /// total monthly budget is zero.
    pub fn compute_weights(
        &self,
        entries: &[PlanEntry],
        frequencies: &FrequencyTable,
    ) -> Result<Vec<WeightedPlan>, CoreError> {
        if entries.is_empty() {
            return Err(CoreError::DegeneratePlan("the plan has no entries".into()));
        }

        let mut weighted = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.asset_id.trim().is_empty() {
                return Err(CoreError::ValidationError(
                    "Plan entry with an empty asset symbol".into(),
                ));
            }
            if !entry.amount.is_finite() || entry.amount < 0.0 {
                return Err(CoreError::ValidationError(format!(
                    "Amount for {} must be a finite, non-negative number, got {}",
                    entry.asset_id, entry.amount
                )));
            }

            let (coefficient, frequency_fallback) = match frequencies.coefficient(&entry.frequency) {
                Some(c) => (c, false),
                None => {
                    warn!(
                        "Unknown frequency '{}' for {}; assuming {FALLBACK_COEFFICIENT} purchase per month",
                        entry.frequency, entry.asset_id
                    );
                    (FALLBACK_COEFFICIENT, true)
                }
            };

            weighted.push(WeightedPlan {
                asset_id: entry.asset_id.trim().to_uppercase(),
                amount: entry.amount,
                frequency: entry.frequency.clone(),
                coefficient,
                frequency_fallback,
                monthly_budget: entry.amount * coefficient,
                weight: 0.0, // filled below
            });
        }

        let total_budget: f64 = weighted.iter().map(|w| w.monthly_budget).sum();
        if !total_budget.is_finite() {
            return Err(CoreError::ValidationError(
                "The total monthly budget overflows".into(),
            ));
        }
        if total_budget <= 0.0 {
            return Err(CoreError::DegeneratePlan(
                "the total monthly budget is zero".into(),
            ));
        }

        for w in &mut weighted {
            w.weight = w.monthly_budget / total_budget;
        }

        Ok(weighted)
    }

    /// Total monthly budget of a weighted plan, in reporting currency.
    pub fn monthly_total(&self, weighted: &[WeightedPlan]) -> f64 {
        weighted.iter().map(|w| w.monthly_budget).sum()
    }
}

impl Default for PlanService {
    fn default() -> Self {
        Self::new()
    }
}
