//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, and error types that form the
//! vocabulary of the Monarch domain.

mod errors;
mod ids;
mod timestamp;

pub(crate) use errors::ensure_finite;
pub use errors::ValidationError;
pub use ids::{ComponentId, CustomFieldId, ProjectId, ScenarioId};
pub use timestamp::Timestamp;
