//! Costing module - the unit-economics data model.
//!
//! # Components
//!
//! - `CostType` / `RecurrencePeriod` - closed billing enumerations
//! - `Component` / `CostRule` - a cost line item; the rule carries only the
//!   fields its cost type reads
//! - `ComponentDraft` - raw form input, validated into a `Component`
//! - `Scenario` - a named set of components
//! - `Project` - a named set of scenarios
//!
//! Records serialize to the camelCase JSON layout stored projects use.

mod component;
mod cost_type;
mod draft;
mod project;
mod rule_record;
mod scenario;

pub use component::{Component, CostRule, CustomField, CustomFieldType, InvalidComponent};
pub use cost_type::{CostType, RecurrencePeriod};
pub use draft::{parse_amount, ComponentDraft};
pub use project::{FlaggedComponent, Project, DEFAULT_CURRENCY_SYMBOL, NEW_PROJECT_NAME};
pub use scenario::{Scenario, INITIAL_SCENARIO_DESCRIPTION, INITIAL_SCENARIO_NAME};
