//! ProjectWorkspace - the in-memory project list with optimistic persistence.
//!
//! Every mutation is applied to memory first. The resulting project snapshot
//! is then written in a spawned task whose handle is returned to the caller;
//! write failures are logged and never retried.
//!
//! Writes carry a revision number. A write that reaches the repository after
//! a newer write for the same project has already been issued is skipped, so
//! a late save cannot bring back a deleted project. A project's ledger entry
//! is dropped once none of its writes are in flight.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::domain::costing::{
    Component, ComponentDraft, FlaggedComponent, InvalidComponent, Project, Scenario,
};
use crate::domain::foundation::{ComponentId, ProjectId, ScenarioId};
use crate::ports::ProjectRepository;

/// Handle to a dispatched repository write.
pub type PendingWrite = JoinHandle<()>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkspaceError {
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(ScenarioId),

    #[error("Component not found: {0}")]
    ComponentNotFound(ComponentId),

    #[error("Scenario {0} is the project's last scenario")]
    LastScenario(ScenarioId),

    #[error(transparent)]
    InvalidComponent(#[from] InvalidComponent),
}

/// Fields for a new project.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub currency_symbol: Option<String>,
}

impl NewProject {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
enum Write {
    Save(Project),
    Delete(ProjectId),
}

impl Write {
    fn project_id(&self) -> &ProjectId {
        match self {
            Write::Save(project) => &project.id,
            Write::Delete(id) => id,
        }
    }

    fn operation(&self) -> &'static str {
        match self {
            Write::Save(_) => "save",
            Write::Delete(_) => "delete",
        }
    }
}

#[derive(Debug, Default)]
struct State {
    projects: Vec<Project>,
    revision: u64,
    /// Dispatched writes not yet finished, per project.
    in_flight: HashMap<ProjectId, usize>,
}

impl State {
    /// Allocates the revision for a write about to be dispatched.
    fn issue(&mut self, id: &ProjectId) -> u64 {
        *self.in_flight.entry(id.clone()).or_default() += 1;
        self.revision += 1;
        self.revision
    }

    /// Records a finished write. Returns true when none remain for the project.
    fn finish(&mut self, id: &ProjectId) -> bool {
        match self.in_flight.get_mut(id) {
            Some(count) if *count > 1 => {
                *count -= 1;
                false
            }
            _ => {
                self.in_flight.remove(id);
                true
            }
        }
    }
}

/// In-memory project list backed by a repository.
#[derive(Clone)]
pub struct ProjectWorkspace {
    repository: Arc<dyn ProjectRepository>,
    state: Arc<RwLock<State>>,
    /// Highest revision handed to the repository, per project.
    written: Arc<Mutex<HashMap<ProjectId, u64>>>,
    default_currency_symbol: Option<String>,
}

impl ProjectWorkspace {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self {
            repository,
            state: Arc::new(RwLock::new(State::default())),
            written: Arc::new(Mutex::new(HashMap::new())),
            default_currency_symbol: None,
        }
    }

    /// Currency symbol given to new projects that do not set one.
    pub fn with_default_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.default_currency_symbol = Some(symbol.into());
        self
    }

    /// Replaces the in-memory list with the repository's projects.
    ///
    /// A failed listing is logged and leaves the workspace empty.
    pub async fn load(&self) -> usize {
        let loaded = match self.repository.list().await {
            Ok(projects) => projects,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load projects");
                Vec::new()
            }
        };

        let count = loaded.len();
        let flagged = loaded.iter().map(|p| p.invalid_components().len()).sum::<usize>();
        self.state.write().await.projects = loaded;
        tracing::info!(count, flagged, "Projects loaded");
        count
    }

    /// Snapshot of all projects in workspace order.
    pub async fn projects(&self) -> Vec<Project> {
        self.state.read().await.projects.clone()
    }

    pub async fn project(&self, id: &ProjectId) -> Option<Project> {
        self.state
            .read()
            .await
            .projects
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }

    /// Components that fail validation, such as stored records with a
    /// cleared number. They stay in place until edited or removed.
    pub async fn invalid_components(&self) -> Vec<FlaggedComponent> {
        self.state
            .read()
            .await
            .projects
            .iter()
            .flat_map(Project::invalid_components)
            .collect()
    }

    /// Creates a project with one initial scenario, appended at the end.
    pub async fn create_project(&self, new: NewProject) -> (Project, PendingWrite) {
        let mut project = Project::from_template();
        project.name = new.name;
        project.description = new.description;
        project.currency_symbol = new
            .currency_symbol
            .or_else(|| self.default_currency_symbol.clone());

        let revision = {
            let mut state = self.state.write().await;
            state.projects.push(project.clone());
            state.issue(&project.id)
        };

        tracing::info!(project_id = %project.id, "Project created");
        let write = self.dispatch(revision, Write::Save(project.clone()));
        (project, write)
    }

    /// Replaces a project wholesale.
    ///
    /// Components already flagged in the current project may stay invalid;
    /// any other invalid component is rejected.
    pub async fn update_project(&self, project: Project) -> Result<PendingWrite, WorkspaceError> {
        let id = project.id.clone();
        self.mutate_project(&id, move |current| {
            let known: HashSet<ComponentId> = current
                .invalid_components()
                .into_iter()
                .map(|flagged| flagged.component_id)
                .collect();
            if let Some(flagged) = project
                .invalid_components()
                .into_iter()
                .find(|flagged| !known.contains(&flagged.component_id))
            {
                return Err(flagged.error.into());
            }
            *current = project;
            Ok(())
        })
        .await
        .map(|((), write)| write)
    }

    /// Removes a project from memory and deletes its record.
    pub async fn delete_project(&self, id: &ProjectId) -> Result<PendingWrite, WorkspaceError> {
        let revision = {
            let mut state = self.state.write().await;
            let index = state
                .projects
                .iter()
                .position(|p| &p.id == id)
                .ok_or_else(|| WorkspaceError::ProjectNotFound(id.clone()))?;
            state.projects.remove(index);
            state.issue(id)
        };

        tracing::info!(project_id = %id, "Project deleted");
        Ok(self.dispatch(revision, Write::Delete(id.clone())))
    }

    /// Appends an empty scenario named "Scenario {n}".
    pub async fn add_scenario(
        &self,
        project_id: &ProjectId,
    ) -> Result<(ScenarioId, PendingWrite), WorkspaceError> {
        self.mutate_project(project_id, |project| {
            let scenario = Scenario::new(format!("Scenario {}", project.scenarios.len() + 1), "");
            let id = scenario.id.clone();
            project.scenarios.push(scenario);
            Ok(id)
        })
        .await
    }

    /// Appends a copy of a scenario with fresh ids.
    pub async fn duplicate_scenario(
        &self,
        project_id: &ProjectId,
        scenario_id: &ScenarioId,
    ) -> Result<(ScenarioId, PendingWrite), WorkspaceError> {
        self.mutate_project(project_id, |project| {
            let copy = scenario_in(project, scenario_id)?.duplicate();
            let id = copy.id.clone();
            project.scenarios.push(copy);
            Ok(id)
        })
        .await
    }

    /// Renames a scenario and replaces its description.
    pub async fn update_scenario_details(
        &self,
        project_id: &ProjectId,
        scenario_id: &ScenarioId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<PendingWrite, WorkspaceError> {
        let (name, description) = (name.into(), description.into());
        self.mutate_project(project_id, |project| {
            let scenario = scenario_in_mut(project, scenario_id)?;
            scenario.name = name;
            scenario.description = description;
            Ok(())
        })
        .await
        .map(|((), write)| write)
    }

    /// Deletes a scenario. A project always keeps at least one.
    pub async fn delete_scenario(
        &self,
        project_id: &ProjectId,
        scenario_id: &ScenarioId,
    ) -> Result<PendingWrite, WorkspaceError> {
        self.mutate_project(project_id, |project| {
            let index = project
                .scenarios
                .iter()
                .position(|s| &s.id == scenario_id)
                .ok_or_else(|| WorkspaceError::ScenarioNotFound(scenario_id.clone()))?;
            if project.scenarios.len() == 1 {
                return Err(WorkspaceError::LastScenario(scenario_id.clone()));
            }
            project.scenarios.remove(index);
            Ok(())
        })
        .await
        .map(|((), write)| write)
    }

    /// Validates a draft and appends it to a scenario.
    pub async fn add_component(
        &self,
        project_id: &ProjectId,
        scenario_id: &ScenarioId,
        draft: ComponentDraft,
    ) -> Result<(ComponentId, PendingWrite), WorkspaceError> {
        let component = draft.validate()?;
        self.mutate_project(project_id, |project| {
            let scenario = scenario_in_mut(project, scenario_id)?;
            let id = component.id.clone();
            scenario.components.push(component);
            Ok(id)
        })
        .await
    }

    /// Replaces the component with the same id.
    pub async fn update_component(
        &self,
        project_id: &ProjectId,
        scenario_id: &ScenarioId,
        component: Component,
    ) -> Result<PendingWrite, WorkspaceError> {
        component.validate()?;
        self.mutate_project(project_id, |project| {
            let scenario = scenario_in_mut(project, scenario_id)?;
            let slot = scenario
                .component_mut(&component.id)
                .ok_or_else(|| WorkspaceError::ComponentNotFound(component.id.clone()))?;
            *slot = component;
            Ok(())
        })
        .await
        .map(|((), write)| write)
    }

    pub async fn remove_component(
        &self,
        project_id: &ProjectId,
        scenario_id: &ScenarioId,
        component_id: &ComponentId,
    ) -> Result<PendingWrite, WorkspaceError> {
        self.mutate_project(project_id, |project| {
            scenario_in_mut(project, scenario_id)?
                .remove_component(component_id)
                .map(|_| ())
                .ok_or_else(|| WorkspaceError::ComponentNotFound(component_id.clone()))
        })
        .await
        .map(|((), write)| write)
    }

    /// Waits for dispatched writes to finish.
    pub async fn settle(writes: impl IntoIterator<Item = PendingWrite>) {
        for result in join_all(writes).await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Project write task did not complete");
            }
        }
    }

    /// Applies `change` to a project, stamps it, and dispatches a save.
    ///
    /// `change` must leave the project untouched when it returns an error.
    async fn mutate_project<T>(
        &self,
        id: &ProjectId,
        change: impl FnOnce(&mut Project) -> Result<T, WorkspaceError>,
    ) -> Result<(T, PendingWrite), WorkspaceError> {
        let (value, snapshot, revision) = {
            let mut state = self.state.write().await;
            let project = state
                .projects
                .iter_mut()
                .find(|p| &p.id == id)
                .ok_or_else(|| WorkspaceError::ProjectNotFound(id.clone()))?;

            let value = change(project)?;
            project.touch();
            let snapshot = project.clone();
            let revision = state.issue(id);
            (value, snapshot, revision)
        };

        Ok((value, self.dispatch(revision, Write::Save(snapshot))))
    }

    fn dispatch(&self, revision: u64, write: Write) -> PendingWrite {
        let repository = Arc::clone(&self.repository);
        let state = Arc::clone(&self.state);
        let written = Arc::clone(&self.written);

        tokio::spawn(async move {
            let project_id = write.project_id().clone();
            // Lock order: `written` before `state`.
            let mut written = written.lock().await;
            if written.get(&project_id).is_some_and(|&last| last > revision) {
                tracing::debug!(%project_id, revision, "Skipping superseded project write");
            } else {
                written.insert(project_id.clone(), revision);

                let result = match &write {
                    Write::Save(project) => repository.save(project).await,
                    Write::Delete(id) => repository.delete(id).await,
                };
                if let Err(e) = result {
                    tracing::error!(
                        %project_id,
                        operation = write.operation(),
                        error = %e,
                        "Project write failed"
                    );
                }
            }

            if state.write().await.finish(&project_id) {
                written.remove(&project_id);
            }
        })
    }
}

fn scenario_in<'a>(
    project: &'a Project,
    scenario_id: &ScenarioId,
) -> Result<&'a Scenario, WorkspaceError> {
    project
        .scenario(scenario_id)
        .ok_or_else(|| WorkspaceError::ScenarioNotFound(scenario_id.clone()))
}

fn scenario_in_mut<'a>(
    project: &'a mut Project,
    scenario_id: &ScenarioId,
) -> Result<&'a mut Scenario, WorkspaceError> {
    project
        .scenario_mut(scenario_id)
        .ok_or_else(|| WorkspaceError::ScenarioNotFound(scenario_id.clone()))
}
