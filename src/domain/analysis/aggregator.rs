//! Scenario Aggregator - totals and per-component breakdown.

use serde::{Deserialize, Serialize};

use super::CostNormalizer;
use crate::domain::costing::{CostType, Scenario};

/// One positive-cost line of a scenario breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub name: String,
    /// Normalized monthly cost, always > 0.
    pub cost: f64,
    /// Share of the scenario total, 0 when the total is not positive.
    pub percent: f64,
    #[serde(rename = "type")]
    pub cost_type: CostType,
}

/// Aggregated view of a single scenario.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Sum of every component's normalized cost, including non-positive ones.
    pub total_cost: f64,
    /// Positive-cost components in scenario order.
    pub breakdown: Vec<BreakdownEntry>,
}

impl AnalysisResult {
    /// Breakdown entries ordered by descending cost, for chart display.
    ///
    /// Ties keep scenario order.
    pub fn sorted_by_cost(&self) -> Vec<&BreakdownEntry> {
        let mut entries: Vec<&BreakdownEntry> = self.breakdown.iter().collect();
        entries.sort_by(|a, b| b.cost.total_cmp(&a.cost));
        entries
    }

    /// The largest cost in the breakdown, if any.
    pub fn primary_driver(&self) -> Option<&BreakdownEntry> {
        self.sorted_by_cost().into_iter().next()
    }

    /// Whether the scenario has anything worth analysing.
    pub fn has_cost(&self) -> bool {
        self.total_cost > 0.0
    }
}

/// Builds [`AnalysisResult`]s from scenarios.
pub struct ScenarioAggregator;

impl ScenarioAggregator {
    /// Normalizes every component and sums them.
    ///
    /// Components with a normalized cost of zero or less (and NaN) count
    /// toward the total but are left out of the breakdown.
    pub fn aggregate(scenario: &Scenario) -> AnalysisResult {
        let costs: Vec<f64> = scenario
            .components
            .iter()
            .map(CostNormalizer::monthly_cost)
            .collect();

        let total_cost = sum_costs(costs.iter().copied());

        let breakdown = scenario
            .components
            .iter()
            .zip(&costs)
            .filter(|(_, cost)| **cost > 0.0)
            .filter_map(|(component, &cost)| {
                Some(BreakdownEntry {
                    name: component.name.clone(),
                    cost,
                    percent: Self::percent_of(cost, total_cost),
                    cost_type: component.cost_type()?,
                })
            })
            .collect();

        AnalysisResult {
            total_cost,
            breakdown,
        }
    }

    /// Sum of every component's normalized cost; `0.0` for no components.
    pub fn total_cost(scenario: &Scenario) -> f64 {
        sum_costs(scenario.components.iter().map(CostNormalizer::monthly_cost))
    }

    fn percent_of(cost: f64, total: f64) -> f64 {
        if total > 0.0 {
            (cost / total) * 100.0
        } else {
            0.0
        }
    }
}

// Starts from +0.0; an empty total is never negative zero.
fn sum_costs(costs: impl Iterator<Item = f64>) -> f64 {
    costs.fold(0.0, |acc, cost| acc + cost)
}
