//! File-based Project Repository Adapter
//!
//! Stores each project as a pretty-printed JSON file named `{project_id}.json`
//! under a base directory, in the same camelCase layout used on the wire.
//!
//! Records that parse are returned even when some components fail
//! validation; those components are logged and left for the caller to flag.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::costing::Project;
use crate::domain::foundation::ProjectId;
use crate::ports::{sort_by_recency, ProjectRepository, RepositoryError};

const EXTENSION: &str = "json";

/// File-based storage for projects
#[derive(Debug, Clone)]
pub struct FileProjectRepository {
    base_path: PathBuf,
}

impl FileProjectRepository {
    /// Create a repository rooted at a directory
    ///
    /// The directory is created on first save.
    ///
    /// # Example
    /// ```ignore
    /// let repo = FileProjectRepository::new("./data/projects");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the record path for a project
    ///
    /// Ids that would escape the base directory are refused.
    fn project_file_path(&self, id: &ProjectId) -> Result<PathBuf, RepositoryError> {
        let raw = id.as_str();
        if raw.starts_with('.') || raw.contains(['/', '\\']) {
            return Err(RepositoryError::Io(format!(
                "project id '{}' cannot be used as a file name",
                raw
            )));
        }
        Ok(self.base_path.join(format!("{}.{}", raw, EXTENSION)))
    }

    async fn read_project(path: &Path) -> Result<Project, RepositoryError> {
        let bytes = fs::read(path).await?;
        let corrupt = |reason: String| RepositoryError::Corrupt {
            location: path.display().to_string(),
            reason,
        };

        let project: Project = serde_json::from_slice(&bytes).map_err(|e| corrupt(e.to_string()))?;
        for flagged in project.invalid_components() {
            tracing::warn!(
                path = %path.display(),
                scenario_id = %flagged.scenario_id,
                component_id = %flagged.component_id,
                error = %flagged.error,
                "Stored component is invalid"
            );
        }
        Ok(project)
    }
}

#[async_trait]
impl ProjectRepository for FileProjectRepository {
    async fn list(&self) -> Result<Vec<Project>, RepositoryError> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut projects = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }

            match Self::read_project(&path).await {
                Ok(project) => projects.push(project),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable project record");
                }
            }
        }

        sort_by_recency(&mut projects);
        Ok(projects)
    }

    async fn find(&self, id: &ProjectId) -> Result<Project, RepositoryError> {
        let path = self.project_file_path(id)?;
        match Self::read_project(&path).await {
            Err(RepositoryError::Io(_)) if !path.exists() => {
                Err(RepositoryError::NotFound(id.clone()))
            }
            other => other,
        }
    }

    async fn save(&self, project: &Project) -> Result<(), RepositoryError> {
        let path = self.project_file_path(&project.id)?;
        fs::create_dir_all(&self.base_path).await?;

        let json = serde_json::to_vec_pretty(project)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        // Write then rename so readers never see a half-written record
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &path).await?;

        tracing::debug!(project_id = %project.id, path = %path.display(), "Project saved");
        Ok(())
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), RepositoryError> {
        let path = self.project_file_path(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
