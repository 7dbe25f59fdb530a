//! Scenario Comparator - component-by-scenario cost matrix.

use std::fmt;

use serde::Serialize;

use super::{format_currency, CostNormalizer, ScenarioAggregator, ScenarioSelection};
use crate::domain::costing::Scenario;
use crate::domain::foundation::ScenarioId;

/// Text shown for a cell with no positive cost.
pub const NO_VALUE: &str = "-";

/// One cell of the comparison matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "Option<f64>")]
pub enum MatrixCell {
    /// Positive normalized cost of the first component with the row name.
    Cost(f64),
    /// No such component, or its cost is not positive.
    NoValue,
}

impl MatrixCell {
    fn from_cost(cost: f64) -> Self {
        if cost > 0.0 {
            MatrixCell::Cost(cost)
        } else {
            MatrixCell::NoValue
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            MatrixCell::Cost(cost) => Some(*cost),
            MatrixCell::NoValue => None,
        }
    }

    /// Display text: the formatted cost, or `-`.
    pub fn render(&self, symbol: &str) -> String {
        match self {
            MatrixCell::Cost(cost) => format_currency(*cost, symbol),
            MatrixCell::NoValue => NO_VALUE.to_string(),
        }
    }
}

impl From<MatrixCell> for Option<f64> {
    fn from(cell: MatrixCell) -> Self {
        cell.value()
    }
}

impl fmt::Display for MatrixCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixCell::Cost(cost) => write!(f, "{}", cost),
            MatrixCell::NoValue => f.write_str(NO_VALUE),
        }
    }
}

/// A compared scenario and its total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonColumn {
    pub scenario_id: ScenarioId,
    pub scenario_name: String,
    pub total_cost: f64,
}

/// A component name and its cell in each column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub name: String,
    /// One cell per column, in column order.
    pub cells: Vec<MatrixCell>,
}

/// Component-name by scenario grid of normalized costs.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ComparisonMatrix {
    /// Selected scenarios in project order.
    pub columns: Vec<ComparisonColumn>,
    /// Distinct component names in UTF-16 code unit order.
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonMatrix {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Row names in display order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.name.as_str())
    }

    /// Total cost of a compared scenario.
    pub fn total(&self, scenario_id: &ScenarioId) -> Option<f64> {
        self.columns
            .iter()
            .find(|c| &c.scenario_id == scenario_id)
            .map(|c| c.total_cost)
    }

    /// Cell for a component name in a compared scenario.
    pub fn cell(&self, name: &str, scenario_id: &ScenarioId) -> Option<MatrixCell> {
        let column = self
            .columns
            .iter()
            .position(|c| &c.scenario_id == scenario_id)?;
        let row = self.rows.iter().find(|r| r.name == name)?;
        row.cells.get(column).copied()
    }
}

/// Builds [`ComparisonMatrix`] values.
pub struct ScenarioComparator;

impl ScenarioComparator {
    /// Compares the selected scenarios.
    ///
    /// Columns follow scenario order, not selection order. Each cell uses the
    /// first component with the row's exact name; later duplicates are
    /// ignored there but still count toward the column total. Names are
    /// ordered by UTF-16 code units, the order stored projects were shown in.
    pub fn compare(scenarios: &[Scenario], selection: &ScenarioSelection) -> ComparisonMatrix {
        let selected: Vec<&Scenario> = scenarios
            .iter()
            .filter(|s| selection.contains(&s.id))
            .collect();

        let mut names: Vec<&str> = selected
            .iter()
            .flat_map(|s| s.components.iter().map(|c| c.name.as_str()))
            .collect();
        names.sort_by(|a, b| a.encode_utf16().cmp(b.encode_utf16()));
        names.dedup();

        let columns = selected
            .iter()
            .map(|scenario| ComparisonColumn {
                scenario_id: scenario.id.clone(),
                scenario_name: scenario.name.clone(),
                total_cost: ScenarioAggregator::total_cost(scenario),
            })
            .collect();

        let rows = names
            .into_iter()
            .map(|name| ComparisonRow {
                name: name.to_string(),
                cells: selected
                    .iter()
                    .map(|scenario| {
                        scenario
                            .first_named(name)
                            .map(|c| MatrixCell::from_cost(CostNormalizer::monthly_cost(c)))
                            .unwrap_or(MatrixCell::NoValue)
                    })
                    .collect(),
            })
            .collect();

        ComparisonMatrix { columns, rows }
    }
}
