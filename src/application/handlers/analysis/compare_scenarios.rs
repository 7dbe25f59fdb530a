//! CompareScenariosHandler - Query handler for the scenario comparison matrix.
//!
//! Without an explicit selection the first three scenarios are compared.

use super::AnalysisError;
use crate::application::handlers::project::ProjectWorkspace;
use crate::domain::analysis::{ComparisonMatrix, ScenarioComparator, ScenarioSelection};
use crate::domain::foundation::{ProjectId, ScenarioId};

/// Query to compare scenarios of a workspace project.
#[derive(Debug, Clone)]
pub struct CompareScenariosQuery {
    pub project_id: ProjectId,
    /// Scenarios to compare; `None` uses the default selection.
    pub scenario_ids: Option<Vec<ScenarioId>>,
}

/// Result of a comparison query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioComparison {
    pub matrix: ComparisonMatrix,
    /// Selection actually used, after dropping unknown ids.
    pub selection: ScenarioSelection,
    pub currency_symbol: String,
}

/// Handler for comparing scenarios.
pub struct CompareScenariosHandler {
    workspace: ProjectWorkspace,
}

impl CompareScenariosHandler {
    pub fn new(workspace: ProjectWorkspace) -> Self {
        Self { workspace }
    }

    pub async fn handle(
        &self,
        query: CompareScenariosQuery,
    ) -> Result<ScenarioComparison, AnalysisError> {
        let project = self
            .workspace
            .project(&query.project_id)
            .await
            .ok_or_else(|| AnalysisError::ProjectNotFound(query.project_id.clone()))?;

        if project.scenarios.is_empty() {
            return Err(AnalysisError::NoScenarios(project.id));
        }

        let mut selection = match query.scenario_ids {
            Some(ids) => ScenarioSelection::from_ids(ids),
            None => ScenarioSelection::initial(&project.scenarios),
        };
        selection.reconcile(&project.scenarios);

        let matrix = ScenarioComparator::compare(&project.scenarios, &selection);
        tracing::debug!(
            project_id = %project.id,
            columns = matrix.columns.len(),
            rows = matrix.rows.len(),
            "Scenarios compared"
        );

        Ok(ScenarioComparison {
            matrix,
            selection,
            currency_symbol: project.currency_symbol().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryProjectRepository;
    use crate::domain::analysis::MatrixCell;
    use crate::domain::costing::{Component, Project, RecurrencePeriod, Scenario};
    use std::sync::Arc;

    fn project_with(scenarios: Vec<Scenario>) -> Project {
        scenarios
            .into_iter()
            .fold(Project::new("P", ""), Project::with_scenario)
    }

    async fn handler_for(project: &Project) -> CompareScenariosHandler {
        let repo = InMemoryProjectRepository::with_projects(vec![project.clone()]);
        let workspace = ProjectWorkspace::new(Arc::new(repo));
        workspace.load().await;
        CompareScenariosHandler::new(workspace)
    }

    #[tokio::test]
    async fn filled_and_empty_scenarios_compare() {
        let full = Scenario::new("Full", "")
            .with_component(Component::unit_based("A", 0.002, 50_000.0).with_denominator(1000.0))
            .with_component(Component::fixed_recurring("B", 120.0, RecurrencePeriod::Yearly))
            .with_component(Component::one_time("C", 500.0));
        let empty = Scenario::new("Empty", "");
        let project = project_with(vec![full.clone(), empty.clone()]);

        let comparison = handler_for(&project)
            .await
            .handle(CompareScenariosQuery {
                project_id: project.id.clone(),
                scenario_ids: None,
            })
            .await
            .unwrap();

        let matrix = &comparison.matrix;
        assert!((matrix.total(&full.id).unwrap() - 510.1).abs() < 1e-9);
        assert_eq!(matrix.total(&empty.id), Some(0.0));
        assert_eq!(matrix.cell("C", &full.id), Some(MatrixCell::Cost(500.0)));
        assert_eq!(matrix.cell("C", &empty.id), Some(MatrixCell::NoValue));
        assert_eq!(comparison.currency_symbol, "$");
    }

    #[tokio::test]
    async fn default_selection_is_first_three() {
        let scenarios: Vec<_> = (1..=5).map(|i| Scenario::new(format!("S{}", i), "")).collect();
        let project = project_with(scenarios);

        let comparison = handler_for(&project)
            .await
            .handle(CompareScenariosQuery {
                project_id: project.id.clone(),
                scenario_ids: None,
            })
            .await
            .unwrap();

        assert_eq!(comparison.matrix.columns.len(), 3);
        assert_eq!(comparison.selection.len(), 3);
    }

    #[tokio::test]
    async fn unknown_ids_are_dropped() {
        let a = Scenario::new("A", "");
        let b = Scenario::new("B", "");
        let project = project_with(vec![a.clone(), b.clone()]);

        let comparison = handler_for(&project)
            .await
            .handle(CompareScenariosQuery {
                project_id: project.id.clone(),
                scenario_ids: Some(vec![ScenarioId::new(), b.id.clone()]),
            })
            .await
            .unwrap();

        assert_eq!(comparison.selection.ids(), &[b.id.clone()]);
        assert_eq!(comparison.matrix.columns[0].scenario_name, "B");
    }

    #[tokio::test]
    async fn project_without_scenarios_is_rejected() {
        let project = Project::new("Empty", "");

        let result = handler_for(&project)
            .await
            .handle(CompareScenariosQuery {
                project_id: project.id.clone(),
                scenario_ids: None,
            })
            .await;

        assert!(matches!(result, Err(AnalysisError::NoScenarios(_))));
    }

    #[tokio::test]
    async fn unknown_project_is_reported() {
        let project = Project::new("Other", "");

        let result = handler_for(&project)
            .await
            .handle(CompareScenariosQuery {
                project_id: ProjectId::new(),
                scenario_ids: None,
            })
            .await;

        assert!(matches!(result, Err(AnalysisError::ProjectNotFound(_))));
    }
}
