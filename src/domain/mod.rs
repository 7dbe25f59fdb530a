//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, validation errors)
//! - `costing` - Projects, scenarios and cost components
//! - `analysis` - Pure cost services (normalize, aggregate, compare)

pub mod analysis;
pub mod costing;
pub mod foundation;
