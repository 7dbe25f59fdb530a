//! Analysis Module - pure cost computations over the costing model.
//!
//! # Components
//!
//! - `CostNormalizer` - one component to a normalized monthly cost
//! - `ScenarioAggregator` - scenario total and positive-cost breakdown
//! - `ScenarioComparator` - component-name by scenario matrix
//! - `ScenarioSelection` - which scenarios are being compared
//! - `format_currency` - magnitude-aware currency display
//!
//! Everything here is synchronous and side-effect free.

mod aggregator;
mod comparator;
mod currency;
mod normalizer;
mod selection;

pub use aggregator::{AnalysisResult, BreakdownEntry, ScenarioAggregator};
pub use comparator::{
    ComparisonColumn, ComparisonMatrix, ComparisonRow, MatrixCell, ScenarioComparator, NO_VALUE,
};
pub use currency::format_currency;
pub use normalizer::CostNormalizer;
pub use selection::{ScenarioSelection, SelectionError, Toggle, DEFAULT_SELECTION_SIZE};

use crate::domain::costing::{Component, Scenario};

/// Normalized monthly cost of a component.
pub fn normalize(component: &Component) -> f64 {
    CostNormalizer::monthly_cost(component)
}

/// Total and breakdown of a scenario.
pub fn aggregate(scenario: &Scenario) -> AnalysisResult {
    ScenarioAggregator::aggregate(scenario)
}

/// Comparison matrix of the selected scenarios.
pub fn compare(scenarios: &[Scenario], selection: &ScenarioSelection) -> ComparisonMatrix {
    ScenarioComparator::compare(scenarios, selection)
}
