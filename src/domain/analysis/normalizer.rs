//! Cost Normalizer - collapses a component's billing rule into a monthly cost.

use crate::domain::costing::{Component, CostRule};

/// Converts components into a single normalized monthly cost.
///
/// Total and deterministic: every component maps to a number, nothing is
/// rounded, and invalid arithmetic (NaN inputs) propagates rather than fails.
pub struct CostNormalizer;

impl CostNormalizer {
    /// Returns the normalized monthly cost of a component.
    ///
    /// - Unit based: `price / denominator * quantity`, the denominator
    ///   falling back to 1 when absent, zero or NaN.
    /// - Fixed recurring: the price, divided by 12 when billed yearly.
    /// - One time: the price at full face value, not amortized.
    /// - Unrecognized: 0.
    pub fn monthly_cost(component: &Component) -> f64 {
        Self::monthly_cost_of_rule(&component.rule)
    }

    /// Same as [`CostNormalizer::monthly_cost`] for a bare rule.
    pub fn monthly_cost_of_rule(rule: &CostRule) -> f64 {
        match rule {
            CostRule::UnitBased {
                quantity,
                price_per_unit,
                unit_denominator,
                ..
            } => (price_per_unit / Self::effective_denominator(*unit_denominator)) * quantity,
            CostRule::FixedRecurring {
                price_per_unit,
                recurrence,
            } => price_per_unit / recurrence.unwrap_or_default().months(),
            // Folded into the monthly total as this month's burn.
            CostRule::OneTime { price_per_unit } => *price_per_unit,
            CostRule::Unrecognized { .. } => 0.0,
        }
    }

    /// Denominator actually divided by: 1 unless a usable value is present.
    pub fn effective_denominator(unit_denominator: Option<f64>) -> f64 {
        match unit_denominator {
            Some(d) if d != 0.0 && !d.is_nan() => d,
            _ => 1.0,
        }
    }
}
