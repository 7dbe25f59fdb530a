//! Cost type and recurrence period enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a component's cost behaves relative to the business.
///
/// Serialized with the labels stored project records use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostType {
    /// Costs that grow with every unit sold or used (e.g. API tokens).
    #[serde(rename = "Unit Based Cost")]
    UnitBased,
    /// Recurring costs that stay stable regardless of volume (e.g. a server subscription).
    #[serde(rename = "Fixed Recurring Cost")]
    FixedRecurring,
    /// Upfront setup fees or single-purchase assets.
    #[serde(rename = "One Time Cost")]
    OneTime,
}

impl CostType {
    /// Returns all cost types in the order a picker offers them.
    pub fn all() -> &'static [CostType] {
        &[CostType::UnitBased, CostType::FixedRecurring, CostType::OneTime]
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            CostType::UnitBased => "Unit Based Cost",
            CostType::FixedRecurring => "Fixed Recurring Cost",
            CostType::OneTime => "One Time Cost",
        }
    }

    /// Parses a stored label.
    pub fn from_label(label: &str) -> Option<CostType> {
        Self::all().iter().copied().find(|t| t.label() == label)
    }

    /// Returns the short noun used when describing a price ("per unit" vs "per item").
    pub fn price_noun(&self) -> &'static str {
        match self {
            CostType::UnitBased => "unit",
            CostType::FixedRecurring | CostType::OneTime => "item",
        }
    }
}

impl fmt::Display for CostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Billing period of a fixed recurring cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecurrencePeriod {
    #[default]
    Monthly,
    Yearly,
}

impl RecurrencePeriod {
    /// Number of months one billing period covers.
    pub fn months(&self) -> f64 {
        match self {
            RecurrencePeriod::Monthly => 1.0,
            RecurrencePeriod::Yearly => 12.0,
        }
    }
}

impl fmt::Display for RecurrencePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrencePeriod::Monthly => f.write_str("Monthly"),
            RecurrencePeriod::Yearly => f.write_str("Yearly"),
        }
    }
}
