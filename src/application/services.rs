//! Services - handlers wired to the adapters chosen by configuration.

use std::sync::Arc;

use thiserror::Error;

use crate::adapters::ai::{GeminiConfig, GeminiProvider};
use crate::adapters::storage::{FileProjectRepository, InMemoryProjectRepository};
use crate::application::handlers::{
    AdvisoryHandler, AnalyzeScenarioHandler, CompareScenariosHandler, PendingWrite,
    ProjectWorkspace, WorkspaceError,
};
use crate::config::{AppConfig, StorageBackend, ValidationError};
use crate::domain::foundation::{ProjectId, ScenarioId};
use crate::ports::{AIError, AIProvider, ProjectRepository};

#[derive(Debug, Error)]
pub enum ServicesError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("Advisory provider could not be created: {0}")]
    Provider(#[from] AIError),
}

/// Everything a front end needs, sharing one workspace.
pub struct Services {
    pub workspace: ProjectWorkspace,
    pub analyze: AnalyzeScenarioHandler,
    pub compare: CompareScenariosHandler,
    /// Present only when advisory is enabled and a key is configured.
    pub advisory: Option<AdvisoryHandler>,
}

impl Services {
    /// Validates the configuration and builds the services.
    pub fn from_config(config: &AppConfig) -> Result<Self, ServicesError> {
        config.validate()?;

        let repository = project_repository(config);
        let advisory = if config.advisory_enabled() {
            advisory_provider(config)?.map(AdvisoryHandler::new)
        } else {
            None
        };

        tracing::info!(
            backend = ?config.storage.backend,
            advisory = advisory.is_some(),
            "Services configured"
        );

        Ok(Self::with_repository(
            repository,
            advisory,
            &config.features.default_currency_symbol,
        ))
    }

    /// Builds the services over an existing repository.
    pub fn with_repository(
        repository: Arc<dyn ProjectRepository>,
        advisory: Option<AdvisoryHandler>,
        default_currency_symbol: &str,
    ) -> Self {
        let workspace =
            ProjectWorkspace::new(repository).with_default_currency_symbol(default_currency_symbol);
        Self {
            analyze: AnalyzeScenarioHandler::new(workspace.clone()),
            compare: CompareScenariosHandler::new(workspace.clone()),
            workspace,
            advisory,
        }
    }

    /// Deletes a scenario and drops its advice.
    pub async fn delete_scenario(
        &self,
        project_id: &ProjectId,
        scenario_id: &ScenarioId,
    ) -> Result<PendingWrite, WorkspaceError> {
        let write = self.workspace.delete_scenario(project_id, scenario_id).await?;
        if let Some(advisory) = &self.advisory {
            advisory.forget(scenario_id).await;
        }
        Ok(write)
    }

    /// Deletes a project and drops the advice of all its scenarios.
    pub async fn delete_project(&self, project_id: &ProjectId) -> Result<PendingWrite, WorkspaceError> {
        let scenario_ids: Vec<ScenarioId> = self
            .workspace
            .project(project_id)
            .await
            .map(|project| project.scenarios.into_iter().map(|s| s.id).collect())
            .unwrap_or_default();

        let write = self.workspace.delete_project(project_id).await?;
        if let Some(advisory) = &self.advisory {
            for scenario_id in &scenario_ids {
                advisory.forget(scenario_id).await;
            }
        }
        Ok(write)
    }
}

fn project_repository(config: &AppConfig) -> Arc<dyn ProjectRepository> {
    match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryProjectRepository::new()),
        StorageBackend::File => Arc::new(FileProjectRepository::new(&config.storage.data_dir)),
    }
}

fn advisory_provider(config: &AppConfig) -> Result<Option<Arc<dyn AIProvider>>, AIError> {
    let Some(gemini) = GeminiConfig::from_ai_config(&config.ai) else {
        return Ok(None);
    };
    let provider: Arc<dyn AIProvider> = Arc::new(GeminiProvider::new(gemini)?);
    Ok(Some(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockAIProvider;
    use crate::application::{AnalyzeScenarioQuery, NewProject, RequestAdviceCommand};
    use crate::domain::costing::{ComponentDraft, CostType};
    use secrecy::Secret;
    use tempfile::TempDir;

    fn memory_services(
        repo: &InMemoryProjectRepository,
        advisory: Option<AdvisoryHandler>,
    ) -> Services {
        Services::with_repository(Arc::new(repo.clone()), advisory, "$")
    }

    #[tokio::test]
    async fn default_config_uses_memory_and_no_advisory() {
        let services = Services::from_config(&AppConfig::default()).unwrap();

        assert!(services.advisory.is_none());
        assert_eq!(services.workspace.load().await, 0);
    }

    #[tokio::test]
    async fn file_backend_persists_workspace_writes() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::File;
        config.storage.data_dir = temp_dir.path().to_path_buf();
        config.features.default_currency_symbol = "€".to_string();

        let services = Services::from_config(&config).unwrap();
        let (project, write) = services.workspace.create_project(NewProject::named("Disk")).await;
        ProjectWorkspace::settle([write]).await;

        let reopened = Services::from_config(&config).unwrap();
        assert_eq!(reopened.workspace.load().await, 1);
        let loaded = reopened.workspace.project(&project.id).await.unwrap();
        assert_eq!(loaded.currency_symbol(), "€");
        assert!(FileProjectRepository::new(temp_dir.path())
            .find(&project.id)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn analysis_sees_edits_whose_write_failed() {
        let repo = InMemoryProjectRepository::new();
        let services = memory_services(&repo, None);
        let (project, write) = services.workspace.create_project(NewProject::named("P")).await;
        ProjectWorkspace::settle([write]).await;
        let scenario_id = project.scenarios[0].id.clone();

        repo.set_fail_writes(true);
        let (_, write) = services
            .workspace
            .add_component(
                &project.id,
                &scenario_id,
                ComponentDraft::new("Setup", CostType::OneTime).with_price(500.0),
            )
            .await
            .unwrap();
        ProjectWorkspace::settle([write]).await;

        let analysis = services
            .analyze
            .handle(AnalyzeScenarioQuery {
                project_id: project.id.clone(),
                scenario_id,
            })
            .await
            .unwrap();
        assert_eq!(analysis.result.total_cost, 500.0);
        assert!(repo.find(&project.id).await.unwrap().scenarios[0].components.is_empty());
    }

    #[tokio::test]
    async fn deleting_scenarios_and_projects_drops_advice() {
        let provider = Arc::new(
            MockAIProvider::new()
                .with_response("first")
                .with_response("second"),
        );
        let repo = InMemoryProjectRepository::new();
        let services = memory_services(&repo, Some(AdvisoryHandler::new(provider)));
        let advisory = services.advisory.as_ref().unwrap();

        let (project, _) = services.workspace.create_project(NewProject::named("P")).await;
        let (second_id, _) = services.workspace.add_scenario(&project.id).await.unwrap();
        let first_id = project.scenarios[0].id.clone();
        for scenario_id in [&first_id, &second_id] {
            services
                .workspace
                .add_component(
                    &project.id,
                    scenario_id,
                    ComponentDraft::new("Setup", CostType::OneTime).with_price(10.0),
                )
                .await
                .unwrap();
            let scenario = services
                .workspace
                .project(&project.id)
                .await
                .unwrap()
                .scenario(scenario_id)
                .cloned()
                .unwrap();
            advisory.handle(RequestAdviceCommand::new(scenario)).await.unwrap();
        }

        services.delete_scenario(&project.id, &first_id).await.unwrap();
        assert!(advisory.current(&first_id).await.is_none());
        assert!(advisory.current(&second_id).await.is_some());

        let write = services.delete_project(&project.id).await.unwrap();
        ProjectWorkspace::settle([write]).await;
        assert!(advisory.current(&second_id).await.is_none());
        assert!(services.workspace.projects().await.is_empty());
    }

    #[test]
    fn advisory_is_built_when_enabled_with_key() {
        let mut config = AppConfig::default();
        config.features.enable_advisory = true;
        config.ai.gemini_api_key = Some(Secret::new("test-key".to_string()));

        let services = Services::from_config(&config).unwrap();
        assert!(services.advisory.is_some());
    }

    #[test]
    fn advisory_without_key_is_rejected() {
        let mut config = AppConfig::default();
        config.features.enable_advisory = true;

        let result = Services::from_config(&config);
        assert!(matches!(result, Err(ServicesError::Config(ValidationError::MissingRequired(_)))));
    }
}
