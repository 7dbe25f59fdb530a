//! Application handlers.
//!
//! Query handlers read the workspace's projects; command handlers change them or call
//! out to the advisory provider.

pub mod advisory;
pub mod analysis;
pub mod project;

pub use advisory::{
    Advice, AdviceOutcome, AdviceSource, AdviceTracker, AdvisoryError, AdvisoryHandler,
    RequestAdviceCommand, RequestToken,
};
pub use analysis::{
    AnalysisError, AnalyzeScenarioHandler, AnalyzeScenarioQuery, CompareScenariosHandler,
    CompareScenariosQuery, ScenarioAnalysis, ScenarioComparison,
};
pub use project::{NewProject, PendingWrite, ProjectWorkspace, WorkspaceError};
