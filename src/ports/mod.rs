//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ProjectRepository` - Project persistence
//! - `AIProvider` - Text generation for scenario advisory

mod ai_provider;
mod project_repository;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    RequestMetadata, TokenUsage,
};
pub use project_repository::{sort_by_recency, ProjectRepository, RepositoryError};
