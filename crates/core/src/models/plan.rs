use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Occurrences per month applied when a frequency label is not recognised.
pub const FALLBACK_COEFFICIENT: f64 = 1.0;

/// How often a recurring purchase happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    TwiceMonthly,
    ThriceMonthly,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
        Frequency::TwiceMonthly,
        Frequency::ThriceMonthly,
    ];

    /// Canonical label, as shown in the plan editor.
    pub fn label(self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::TwiceMonthly => "twice-monthly",
            Frequency::ThriceMonthly => "thrice-monthly",
        }
    }

    /// Parse a user-supplied label. Case, spaces, `_` and `-` are ignored.
    pub fn parse(label: &str) -> Option<Self> {
        let normalized: String = label
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();
        match normalized.as_str() {
            "weekly" | "hebdomadaire" => Some(Frequency::Weekly),
            "biweekly" | "fortnightly" | "every2weeks" => Some(Frequency::Biweekly),
            "monthly" | "mensuel" => Some(Frequency::Monthly),
            "twicemonthly" | "semimonthly" | "2xmonth" => Some(Frequency::TwiceMonthly),
            "thricemonthly" | "3xmonth" => Some(Frequency::ThriceMonthly),
            _ => None,
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable frequency → occurrences-per-month lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTable {
    coefficients: HashMap<Frequency, f64>,
}

impl FrequencyTable {
    pub fn new(coefficients: HashMap<Frequency, f64>) -> Self {
        Self { coefficients }
    }

    /// Coefficient for a known frequency.
    pub fn get(&self, frequency: Frequency) -> Option<f64> {
        self.coefficients.get(&frequency).copied()
    }

    /// Resolve a raw label. `None` when the label is unknown or has no coefficient.
    pub fn coefficient(&self, label: &str) -> Option<f64> {
        Frequency::parse(label).and_then(|f| self.get(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Frequency, &f64)> {
        self.coefficients.iter()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        let coefficients = HashMap::from([
            (Frequency::Weekly, 4.33),
            (Frequency::Biweekly, 2.16),
            (Frequency::Monthly, 1.0),
            (Frequency::TwiceMonthly, 2.0),
            (Frequency::ThriceMonthly, 3.0),
        ]);
        Self { coefficients }
    }
}

/// One recurring purchase instruction, as edited in the plan table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Ticker symbol of the instrument bought
    pub asset_id: String,

    /// Amount per occurrence, in reporting currency
    pub amount: f64,

    /// Raw frequency label (resolved through a `FrequencyTable`)
    pub frequency: String,
}

impl PlanEntry {
    pub fn new(asset_id: impl Into<String>, amount: f64, frequency: Frequency) -> Self {
        Self {
            asset_id: asset_id.into().trim().to_uppercase(),
            amount,
            frequency: frequency.label().to_string(),
        }
    }

    /// Entry with a free-form frequency label (e.g., straight from the UI).
    pub fn with_label(asset_id: impl Into<String>, amount: f64, label: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into().trim().to_uppercase(),
            amount,
            frequency: label.into(),
        }
    }
}

/// A plan entry enriched with its monthly budget and normalized weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedPlan {
    pub asset_id: String,
    pub amount: f64,
    pub frequency: String,

    /// Occurrences per month used for this entry
    pub coefficient: f64,

    /// True when the frequency label was unknown and `FALLBACK_COEFFICIENT` was applied
    pub frequency_fallback: bool,

    /// amount × coefficient
    pub monthly_budget: f64,

    /// monthly_budget / Σ monthly_budget
    pub weight: f64,
}
