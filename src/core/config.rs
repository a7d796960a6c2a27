//! Loads `~/.prompthub/config.toml`.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::HubError;

pub const DEFAULT_MODEL: &str = "anthropic/claude-3-haiku-20240307";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/";
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a social media content expert. Provide concise, engaging content optimized for short-form video platforms.";

/// Top-level configuration plus the directory it was resolved against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HubConfig {
    #[serde(skip)]
    pub home: PathBuf,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub generation: GenerationSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Relative paths are resolved against the home directory.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("hub.db")
}

/// Defaults applied to every chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound applied to any requested `max_tokens`.
    pub max_tokens_cap: u32,
    pub api_key_env: String,
    pub base_url: String,
    pub system_prompt: Option<String>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 150,
            max_tokens_cap: 500,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
        }
    }
}

impl HubConfig {
    /// Resolves the home directory (`PROMPTHUB_HOME`, else `$HOME/.prompthub`)
    /// and loads `config.toml` from it.
    pub fn load(home_override: Option<&Path>) -> Result<Self, HubError> {
        let home = match home_override {
            Some(path) => path.to_path_buf(),
            None => default_home()?,
        };
        Self::load_from(&home)
    }

    /// Loads `config.toml` from `home`; a missing file yields the defaults.
    pub fn load_from(home: &Path) -> Result<Self, HubError> {
        let config_path = home.join("config.toml");
        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).map_err(|e| {
                HubError::Configuration(format!("Failed to read config.toml: {}", e))
            })?;
            toml::from_str::<HubConfig>(&content).map_err(|e| {
                HubError::Configuration(format!("Failed to parse config.toml: {}", e))
            })?
        } else {
            HubConfig::default()
        };
        config.home = home.to_path_buf();
        if config.generation.max_tokens_cap == 0 {
            return Err(HubError::Configuration(
                "generation.max_tokens_cap must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn database_path(&self) -> PathBuf {
        if self.database.path.is_absolute() {
            self.database.path.clone()
        } else {
            self.home.join(&self.database.path)
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.home.join("session.json")
    }

    /// Reads the API key from the environment variable named in the settings.
    pub fn api_key(&self) -> Result<String, HubError> {
        let var = &self.generation.api_key_env;
        env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                HubError::Configuration(format!(
                    "OpenRouter API key is not configured. Set the '{}' environment variable.",
                    var
                ))
            })
    }
}

fn default_home() -> Result<PathBuf, HubError> {
    if let Ok(home) = env::var("PROMPTHUB_HOME") {
        return Ok(PathBuf::from(home));
    }
    let home = env::var("HOME")
        .map_err(|_| HubError::Configuration("Unable to determine HOME directory".to_string()))?;
    Ok(PathBuf::from(home).join(".prompthub"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = HubConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.generation.model, DEFAULT_MODEL);
        assert_eq!(config.generation.max_tokens_cap, 500);
        assert_eq!(config.database_path(), dir.path().join("hub.db"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[database]\npath = \"/tmp/elsewhere.db\"\n\n[generation]\nmodel = \"openai/gpt-4o-mini\"\n",
        )
        .unwrap();
        let config = HubConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("/tmp/elsewhere.db"));
        assert_eq!(config.generation.model, "openai/gpt-4o-mini");
        assert_eq!(config.generation.max_tokens, 150);
        assert_eq!(config.generation.api_key_env, DEFAULT_API_KEY_ENV);
    }

    #[test]
    fn invalid_toml_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "[generation\nmodel = 1").unwrap();
        assert!(matches!(
            HubConfig::load_from(dir.path()),
            Err(HubError::Configuration(_))
        ));
    }

    #[test]
    fn missing_api_key_is_reported() {
        let mut config = HubConfig::default();
        config.generation.api_key_env = "PROMPTHUB_TEST_UNSET_KEY".to_string();
        let err = config.api_key().unwrap_err();
        assert!(err.to_string().contains("PROMPTHUB_TEST_UNSET_KEY"));
    }
}
