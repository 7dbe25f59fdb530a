//! In-Memory Project Repository Adapter
//!
//! Stores projects in memory.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::costing::Project;
use crate::domain::foundation::ProjectId;
use crate::ports::{sort_by_recency, ProjectRepository, RepositoryError};

/// In-memory storage for projects
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    projects: Arc<RwLock<HashMap<ProjectId, Project>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryProjectRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with projects
    pub fn with_projects(projects: impl IntoIterator<Item = Project>) -> Self {
        let map = projects.into_iter().map(|p| (p.id.clone(), p)).collect();
        Self {
            projects: Arc::new(RwLock::new(map)),
            fail_writes: Arc::default(),
        }
    }

    /// Make every subsequent save and delete fail with an IO error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.projects.write().await.clear();
    }

    /// Get the number of stored projects
    pub async fn project_count(&self) -> usize {
        self.projects.read().await.len()
    }

    fn check_writable(&self) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Io("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn list(&self) -> Result<Vec<Project>, RepositoryError> {
        let mut projects: Vec<Project> = self.projects.read().await.values().cloned().collect();
        sort_by_recency(&mut projects);
        Ok(projects)
    }

    async fn find(&self, id: &ProjectId) -> Result<Project, RepositoryError> {
        self.projects
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    async fn save(&self, project: &Project) -> Result<(), RepositoryError> {
        self.check_writable()?;
        self.projects
            .write()
            .await
            .insert(project.id.clone(), project.clone());
        Ok(())
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), RepositoryError> {
        self.check_writable()?;
        self.projects.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    fn project_at(name: &str, millis: i64) -> Project {
        let mut project = Project::from_template();
        project.name = name.to_string();
        project.last_updated = Timestamp::from_millis(millis).unwrap();
        project
    }

    #[tokio::test]
    async fn save_and_find() {
        let repo = InMemoryProjectRepository::new();
        let project = Project::from_template();

        repo.save(&project).await.unwrap();

        let loaded = repo.find(&project.id).await.unwrap();
        assert_eq!(loaded, project);
        assert_eq!(repo.project_count().await, 1);
    }

    #[tokio::test]
    async fn find_missing_is_not_found() {
        let repo = InMemoryProjectRepository::new();
        let result = repo.find(&ProjectId::new()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn save_replaces_existing() {
        let repo = InMemoryProjectRepository::new();
        let mut project = Project::from_template();
        repo.save(&project).await.unwrap();

        project.name = "Renamed".to_string();
        repo.save(&project).await.unwrap();

        assert_eq!(repo.project_count().await, 1);
        assert_eq!(repo.find(&project.id).await.unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let repo = InMemoryProjectRepository::with_projects(vec![
            project_at("old", 1_000),
            project_at("newest", 3_000),
            project_at("middle", 2_000),
        ]);

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["newest", "middle", "old"]);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repo = InMemoryProjectRepository::new();
        let project = Project::from_template();
        repo.save(&project).await.unwrap();

        repo.delete(&project.id).await.unwrap();
        repo.delete(&project.id).await.unwrap();
        assert_eq!(repo.project_count().await, 0);
    }

    #[tokio::test]
    async fn failed_writes_leave_store_untouched() {
        let repo = InMemoryProjectRepository::new();
        repo.set_fail_writes(true);

        let result = repo.save(&Project::from_template()).await;
        assert!(matches!(result, Err(RepositoryError::Io(_))));
        assert_eq!(repo.project_count().await, 0);

        repo.set_fail_writes(false);
        repo.save(&Project::from_template()).await.unwrap();
        assert_eq!(repo.project_count().await, 1);
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let repo = InMemoryProjectRepository::new();
        let clone = repo.clone();
        clone.save(&Project::from_template()).await.unwrap();
        assert_eq!(repo.project_count().await, 1);

        repo.clear().await;
        assert_eq!(clone.project_count().await, 0);
    }
}
