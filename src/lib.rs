pub mod api;
pub mod backend;
pub mod cli;
pub mod commands;
pub mod core;

pub use api::{HubError, HubResult, PromptHub};
