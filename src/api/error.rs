//! Error types for the library API.

use llm::error::LLMError;
use thiserror::Error;

use crate::backend::BackendError;

pub type HubResult<T> = Result<T, HubError>;

/// Errors surfaced by the services, the store and the generator.
#[derive(Error, Debug)]
pub enum HubError {
    /// The operation needs a signed-in user.
    #[error("{0}")]
    NotAuthenticated(String),

    /// A client-side ownership check failed.
    #[error("{0}")]
    PermissionDenied(String),

    /// The requested user, repository or prompt does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Input was rejected before reaching the backend.
    #[error("{0}")]
    Validation(String),

    /// A backend call failed; `context` says which operation.
    #[error("{context}: {source}")]
    Backend {
        context: String,
        #[source]
        source: BackendError,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The chat-completion provider failed.
    #[error("OpenRouter API error: {0}")]
    Generation(#[from] LLMError),

    /// The provider answered without any message content.
    #[error("OpenRouter API error: the response contained no content")]
    EmptyCompletion,

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// An interactive prompt failed.
    #[error("Input error: {0}")]
    Input(#[from] dialoguer::Error),
}

impl HubError {
    /// The backend error underneath, if this is a wrapped backend failure.
    pub fn backend_source(&self) -> Option<&BackendError> {
        match self {
            HubError::Backend { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Attaches a human-readable operation name to backend failures.
pub(crate) trait BackendContext<T> {
    fn context(self, context: &str) -> HubResult<T>;
}

impl<T> BackendContext<T> for Result<T, BackendError> {
    fn context(self, context: &str) -> HubResult<T> {
        self.map_err(|source| {
            tracing::error!(error = %source, "{}", context);
            HubError::Backend {
                context: context.to_string(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_carry_context() {
        let result: Result<(), BackendError> = Err(BackendError::Conflict("dup".into()));
        let err = result.context("Failed to create repository").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to create repository: Duplicate or conflicting row: dup"
        );
        assert!(matches!(
            err.backend_source(),
            Some(BackendError::Conflict(_))
        ));
    }
}
