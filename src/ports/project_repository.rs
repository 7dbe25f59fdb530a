//! Project Repository Port - Interface for persisting projects.
//!
//! Projects are stored whole: a save replaces the previous record. Listing
//! returns every readable record, most recently updated first.

use async_trait::async_trait;

use crate::domain::costing::Project;
use crate::domain::foundation::ProjectId;

/// Errors that can occur during project storage operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Project not found: {0}")]
    NotFound(ProjectId),

    #[error("Failed to serialize project: {0}")]
    Serialization(String),

    #[error("Corrupt project record {location}: {reason}")]
    Corrupt { location: String, reason: String },

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::Io(err.to_string())
    }
}

/// Port for loading and saving projects
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All stored projects, most recently updated first.
    async fn list(&self) -> Result<Vec<Project>, RepositoryError>;

    /// Loads one project.
    ///
    /// # Errors
    /// Returns `RepositoryError::NotFound` if no project has the id
    async fn find(&self, id: &ProjectId) -> Result<Project, RepositoryError>;

    /// Inserts or replaces a project.
    async fn save(&self, project: &Project) -> Result<(), RepositoryError>;

    /// Deletes a project. Deleting an unknown id succeeds.
    async fn delete(&self, id: &ProjectId) -> Result<(), RepositoryError>;
}

/// Sorts projects most recently updated first.
pub fn sort_by_recency(projects: &mut [Project]) {
    projects.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
}
