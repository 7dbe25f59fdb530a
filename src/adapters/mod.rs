//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `storage` - Project repositories (file, in-memory)
//! - `ai` - Text generation providers (Gemini, mock)

pub mod ai;
pub mod storage;

pub use ai::{GeminiConfig, GeminiProvider, MockAIProvider};
pub use storage::{FileProjectRepository, InMemoryProjectRepository};
