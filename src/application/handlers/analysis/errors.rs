//! Errors shared by the analysis query handlers.

use thiserror::Error;

use crate::domain::foundation::{ProjectId, ScenarioId};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(ScenarioId),

    #[error("Project {0} has no scenarios")]
    NoScenarios(ProjectId),
}
