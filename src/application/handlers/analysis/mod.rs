//! Analysis handlers - read-side queries over the workspace's projects.

mod analyze_scenario;
mod compare_scenarios;
mod errors;

pub use analyze_scenario::{AnalyzeScenarioHandler, AnalyzeScenarioQuery, ScenarioAnalysis};
pub use compare_scenarios::{CompareScenariosHandler, CompareScenariosQuery, ScenarioComparison};
pub use errors::AnalysisError;
