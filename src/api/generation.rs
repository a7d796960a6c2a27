//! Chat completions through OpenRouter.

use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;
use serde::{Deserialize, Serialize};

use super::error::{HubError, HubResult};
use crate::core::config::{GenerationSettings, HubConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A chat-completion request; unset fields fall back to the settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: Option<String>,
    pub messages: Vec<ChatTurn>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// A request holding a single user turn; everything else uses the defaults.
    pub fn user(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatTurn::user(prompt)],
            ..Default::default()
        }
    }
}

/// A request with every default resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub model: String,
    pub messages: Vec<ChatTurn>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Applies defaults, caps `max_tokens` and prepends the system message.
pub fn prepare(request: ChatRequest, settings: &GenerationSettings) -> PreparedRequest {
    let model = request
        .model
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| settings.model.clone());
    let max_tokens = request
        .max_tokens
        .filter(|n| *n > 0)
        .unwrap_or(settings.max_tokens)
        .min(settings.max_tokens_cap);

    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    if let Some(system) = settings.system_prompt.as_deref().filter(|s| !s.is_empty()) {
        messages.push(ChatTurn::system(system));
    }
    messages.extend(request.messages);

    PreparedRequest {
        model,
        messages,
        temperature: request.temperature.unwrap_or(settings.temperature),
        max_tokens,
    }
}

/// Sends prepared requests to the configured OpenAI-compatible endpoint.
pub struct ResponseGenerator {
    api_key: String,
    settings: GenerationSettings,
}

impl ResponseGenerator {
    pub fn new(api_key: impl Into<String>, settings: GenerationSettings) -> Self {
        Self {
            api_key: api_key.into(),
            settings,
        }
    }

    /// Reads the API key from the environment; a missing key is a
    /// configuration error.
    pub fn from_config(config: &HubConfig) -> HubResult<Self> {
        Ok(Self::new(config.api_key()?, config.generation.clone()))
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Runs one completion and returns the first choice's text.
    pub async fn complete(&self, request: ChatRequest) -> HubResult<String> {
        let prepared = prepare(request, &self.settings);
        if !prepared.messages.iter().any(|m| m.role != ChatRole::System) {
            return Err(HubError::Validation(
                "A chat request needs at least one user message".to_string(),
            ));
        }

        let system: Vec<&str> = prepared
            .messages
            .iter()
            .filter(|m| m.role == ChatRole::System)
            .map(|m| m.content.as_str())
            .collect();
        let messages: Vec<ChatMessage> = prepared
            .messages
            .iter()
            .filter_map(|m| match m.role {
                ChatRole::System => None,
                ChatRole::User => Some(ChatMessage::user().content(&m.content).build()),
                ChatRole::Assistant => Some(ChatMessage::assistant().content(&m.content).build()),
            })
            .collect();

        tracing::info!(
            model = %prepared.model,
            message_count = prepared.messages.len(),
            max_tokens = prepared.max_tokens,
            "sending chat completion request"
        );

        let mut builder = LLMBuilder::new()
            .backend(LLMBackend::OpenAI)
            .base_url(&self.settings.base_url)
            .api_key(&self.api_key)
            .model(&prepared.model)
            .max_tokens(prepared.max_tokens)
            .temperature(prepared.temperature);
        if !system.is_empty() {
            builder = builder.system(system.join("\n\n"));
        }
        let llm = builder.build()?;

        let response = llm.chat(&messages).await.map_err(|e| {
            tracing::error!(error = %e, "Error calling OpenRouter API");
            HubError::Generation(e)
        })?;
        let text = completion_text(response.text())?;
        tracing::debug!(chars = text.len(), "received chat completion");
        Ok(text)
    }

    /// Single user message shortcut for [`complete`](Self::complete).
    pub async fn generate(&self, prompt: &str) -> HubResult<String> {
        self.complete(ChatRequest::user(prompt)).await
    }
}

fn completion_text(text: Option<String>) -> HubResult<String> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => {
            tracing::error!("chat completion returned no content");
            Err(HubError::EmptyCompletion)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_applies_defaults_and_system_prompt() {
        let settings = GenerationSettings::default();
        let prepared = prepare(
            ChatRequest {
                messages: vec![ChatTurn::user("Write a hook")],
                ..Default::default()
            },
            &settings,
        );
        assert_eq!(prepared.model, "anthropic/claude-3-haiku-20240307");
        assert_eq!(prepared.max_tokens, 150);
        assert!((prepared.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(prepared.messages.len(), 2);
        assert_eq!(prepared.messages[0].role, ChatRole::System);
        assert_eq!(prepared.messages[1], ChatTurn::user("Write a hook"));
    }

    #[test]
    fn prepare_caps_max_tokens_and_keeps_overrides() {
        let settings = GenerationSettings {
            system_prompt: None,
            ..Default::default()
        };
        let prepared = prepare(
            ChatRequest {
                model: Some("openai/gpt-4o-mini".into()),
                messages: vec![ChatTurn::user("hi")],
                temperature: Some(0.2),
                max_tokens: Some(4000),
            },
            &settings,
        );
        assert_eq!(prepared.model, "openai/gpt-4o-mini");
        assert_eq!(prepared.max_tokens, 500);
        assert!((prepared.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(prepared.messages, vec![ChatTurn::user("hi")]);
    }

    #[tokio::test]
    async fn complete_rejects_requests_without_user_turns() {
        let generator = ResponseGenerator::new("test-key", GenerationSettings::default());
        let err = generator.complete(ChatRequest::default()).await.unwrap_err();
        assert!(matches!(err, HubError::Validation(_)));
    }

    #[test]
    fn missing_completion_text_is_an_error() {
        assert!(matches!(completion_text(None), Err(HubError::EmptyCompletion)));
        assert!(matches!(
            completion_text(Some("  ".into())),
            Err(HubError::EmptyCompletion)
        ));
        assert_eq!(completion_text(Some("Hook: ...".into())).unwrap(), "Hook: ...");
    }

    #[test]
    fn user_request_holds_one_turn_and_default_settings() {
        let request = ChatRequest::user("Write a caption");
        assert_eq!(request.messages, vec![ChatTurn::user("Write a caption")]);
        assert_eq!(request.model, None);

        let prepared = prepare(request, &GenerationSettings::default());
        assert_eq!(prepared.messages.len(), 2);
        assert_eq!(prepared.messages[1].role, ChatRole::User);
        assert_eq!(prepared.model, "anthropic/claude-3-haiku-20240307");
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&ChatTurn::assistant("ok")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"ok"}"#);
    }
}
