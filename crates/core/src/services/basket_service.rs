use chrono::NaiveDate;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};

use crate::errors::CoreError;
use crate::models::analytics::{BasketReconstruction, Constituent, SkipReason, SkippedConstituent};
use crate::models::currency::{CurrencyTable, FxTable};
use crate::models::plan::WeightedPlan;
use crate::models::price::{PricePoint, PriceSeries};
use crate::services::alignment_service::AlignmentService;
use crate::services::currency_service::CurrencyService;

/// Label of the reconstructed composite curve.
pub const BASKET_LABEL: &str = "BASKET";

/// Rebuilds a weighted, currency-normalized basket index from raw price series.
///
/// Each constituent is first expressed relative to its **last** price (so every
/// constituent ends at 1.0), then weighted and summed per date. A constituent
/// missing on a date contributes nothing on that date. The sum is cut at the
/// date the last constituent appears and rebased to 100.
///
/// Pure and deterministic: constituents are folded in plan order and dates in
/// ascending order, so identical inputs give bit-identical curves.
pub struct BasketService {
    currency_service: CurrencyService,
    alignment_service: AlignmentService,
}

impl BasketService {
    pub fn new() -> Self {
        Self {
            currency_service: CurrencyService::new(),
            alignment_service: AlignmentService::new(),
        }
    }

    /// Reconstruct the composite curve.
    ///
    /// Per-constituent problems (no prices, no FX series, zero weight) skip that
    /// constituent and are listed in `skipped`; surviving weights are kept as-is.
    /// Symbols absent from `currencies` are treated as quoted in the reporting currency.
    ///
    /// Fails with `EmptyBasket` when nothing contributes and with `Alignment`
    /// when the aligned composite is unusable.
    pub fn reconstruct(
        &self,
        weighted_plan: &[WeightedPlan],
        price_series: &HashMap<String, PriceSeries>,
        currencies: &CurrencyTable,
        fx_table: &FxTable,
    ) -> Result<BasketReconstruction, CoreError> {
        let reporting = fx_table.reporting_currency();
        let mut composite: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        let mut constituents = Vec::new();
        let mut skipped = Vec::new();

        let mut skip = |entry: &WeightedPlan, reason: SkipReason| {
            warn!("Skipping {} (weight {:.4}): {reason}", entry.asset_id, entry.weight);
            skipped.push(SkippedConstituent {
                asset_id: entry.asset_id.clone(),
                weight: entry.weight,
                reason,
            });
        };

        for entry in weighted_plan {
            if entry.weight <= 0.0 {
                skip(entry, SkipReason::ZeroWeight);
                continue;
            }

            let Some(raw) = price_series.get(&entry.asset_id).filter(|s| !s.is_empty()) else {
                skip(entry, SkipReason::NoPriceData);
                continue;
            };

            let currency = match currencies.get(&entry.asset_id) {
                Some(c) => c.clone(),
                None => {
                    debug!(
                        "No quote currency known for {}; assuming {reporting}",
                        entry.asset_id
                    );
                    reporting.clone()
                }
            };

            let normalized =
                match self
                    .currency_service
                    .to_reporting_currency(raw, &currency, fx_table)
                {
                    Ok(series) => series,
                    Err(CoreError::MissingFxData { .. }) => {
                        let reason = if fx_table.get(&currency).is_some() {
                            SkipReason::NoFxOverlap { currency }
                        } else {
                            SkipReason::MissingFxData { currency }
                        };
                        skip(entry, reason);
                        continue;
                    }
                    Err(e) => return Err(e),
                };

            let (Some(first), Some(last)) = (normalized.first(), normalized.last()) else {
                skip(entry, SkipReason::NoPriceData);
                continue;
            };

            for point in normalized.iter() {
                *composite.entry(point.date).or_insert(0.0) += entry.weight * (point.price / last.price);
            }

            constituents.push(Constituent {
                asset_id: entry.asset_id.clone(),
                weight: entry.weight,
                currency,
                first_valid_date: first.date,
            });
        }

        let global_start_date = self
            .alignment_service
            .global_start_date(constituents.iter().map(|c| c.first_valid_date))
            .ok_or(CoreError::EmptyBasket)?;

        let accumulated = PriceSeries::from_points(
            BASKET_LABEL,
            composite
                .into_iter()
                .map(|(date, price)| PricePoint { date, price })
                .collect(),
        );
        let curve = self
            .alignment_service
            .rebase_to_100(&accumulated, global_start_date)?;

        let included_weight: f64 = constituents.iter().map(|c| c.weight).sum();
        info!(
            "Basket rebuilt from {} constituent(s), {} skipped; starts {global_start_date}, {} points",
            constituents.len(),
            skipped.len(),
            curve.len()
        );

        Ok(BasketReconstruction {
            curve,
            constituents,
            skipped,
            included_weight,
            global_start_date,
        })
    }
}

impl Default for BasketService {
    fn default() -> Self {
        Self::new()
    }
}
