//! Project handlers - the editable project list.

mod workspace;

pub use workspace::{NewProject, PendingWrite, ProjectWorkspace, WorkspaceError};
