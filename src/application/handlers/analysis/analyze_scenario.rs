//! AnalyzeScenarioHandler - Query handler for a single scenario's cost analysis.

use super::AnalysisError;
use crate::application::handlers::project::ProjectWorkspace;
use crate::domain::analysis::{format_currency, AnalysisResult, ScenarioAggregator};
use crate::domain::foundation::{ProjectId, ScenarioId};

/// Query to analyse one scenario of a workspace project.
#[derive(Debug, Clone)]
pub struct AnalyzeScenarioQuery {
    pub project_id: ProjectId,
    pub scenario_id: ScenarioId,
}

/// Aggregated scenario plus what a caller needs to display it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioAnalysis {
    pub scenario_id: ScenarioId,
    pub scenario_name: String,
    pub currency_symbol: String,
    pub result: AnalysisResult,
}

impl ScenarioAnalysis {
    /// Total cost formatted with the project's currency symbol.
    pub fn formatted_total(&self) -> String {
        format_currency(self.result.total_cost, &self.currency_symbol)
    }
}

/// Handler for analysing a scenario.
///
/// Reads the workspace's in-memory project, so results reflect edits whose
/// writes are still pending or have failed.
pub struct AnalyzeScenarioHandler {
    workspace: ProjectWorkspace,
}

impl AnalyzeScenarioHandler {
    pub fn new(workspace: ProjectWorkspace) -> Self {
        Self { workspace }
    }

    pub async fn handle(&self, query: AnalyzeScenarioQuery) -> Result<ScenarioAnalysis, AnalysisError> {
        let project = self
            .workspace
            .project(&query.project_id)
            .await
            .ok_or_else(|| AnalysisError::ProjectNotFound(query.project_id.clone()))?;

        let scenario = project
            .scenario(&query.scenario_id)
            .ok_or_else(|| AnalysisError::ScenarioNotFound(query.scenario_id.clone()))?;

        let result = ScenarioAggregator::aggregate(scenario);
        tracing::debug!(
            project_id = %project.id,
            scenario_id = %scenario.id,
            total_cost = result.total_cost,
            breakdown_len = result.breakdown.len(),
            "Scenario analysed"
        );

        Ok(ScenarioAnalysis {
            scenario_id: scenario.id.clone(),
            scenario_name: scenario.name.clone(),
            currency_symbol: project.currency_symbol().to_string(),
            result,
        })
    }
}
