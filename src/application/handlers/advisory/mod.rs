//! Advisory handlers - AI-written commentary on a scenario's cost structure.

mod request_advice;
mod tracker;

pub use request_advice::{
    build_prompt, Advice, AdviceOutcome, AdviceSource, AdvisoryError, AdvisoryHandler,
    RequestAdviceCommand, ADVISORY_EMPTY, ADVISORY_UNAVAILABLE,
};
pub use tracker::{AdviceTracker, RequestToken};
