//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Reads (analysis, comparison) are separated from writes (workspace) and
//! from the advisory call.

pub mod handlers;
mod services;

pub use handlers::{
    // Analysis queries
    AnalysisError, AnalyzeScenarioHandler, AnalyzeScenarioQuery, CompareScenariosHandler,
    CompareScenariosQuery, ScenarioAnalysis, ScenarioComparison,
    // Advisory
    Advice, AdviceOutcome, AdviceSource, AdvisoryError, AdvisoryHandler, RequestAdviceCommand,
    // Workspace
    NewProject, PendingWrite, ProjectWorkspace, WorkspaceError,
};
pub use services::{Services, ServicesError};
