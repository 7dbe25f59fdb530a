//! Storage Adapters
//!
//! Implementations of the ProjectRepository port.
//!
//! ## Available Adapters
//!
//! - **FileProjectRepository** - One JSON file per project on disk
//! - **InMemoryProjectRepository** - Projects in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileProjectRepository, InMemoryProjectRepository};
//!
//! // Production: file-based storage
//! let repo = FileProjectRepository::new("./data/projects");
//!
//! // Testing: in-memory storage
//! let repo = InMemoryProjectRepository::new();
//! ```

mod file_project_repository;
mod in_memory_project_repository;

pub use file_project_repository::FileProjectRepository;
pub use in_memory_project_repository::InMemoryProjectRepository;
