//! Library API: services over the backend, the repository store and the
//! chat-completion client.

mod error;
pub mod generation;
mod hub;
pub mod models;
mod prompt_service;
mod repository_service;
mod repository_store;
pub mod search;

pub use error::{HubError, HubResult};
pub use generation::{ChatRequest, ChatRole, ChatTurn, ResponseGenerator};
pub use hub::PromptHub;
pub use models::{CreatePromptData, CreateRepositoryData, License, PromptUpdate, Repository};
pub use prompt_service::PromptService;
pub use repository_service::RepositoryService;
pub use repository_store::{RepositoryStore, StoreStats, Subscription};
pub use search::{SearchQuery, SortOrder};
