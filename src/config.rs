use std::{env, time::Duration};

use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

/// Upper bound on attempts per generation run; one attempt per strategy.
pub const MAX_GENERATION_ATTEMPTS: u32 = 5;

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub openai_api_key: Option<SecretString>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub ollama_enabled: bool,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub pattern_capacity: usize,
    pub generation: GenerationSettings,
}

/// The orchestrator's slice of configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationSettings {
    pub max_attempts: u32,
    pub provider_timeout_seconds: u64,
    pub min_content_chars: usize,
    pub max_requested_count: usize,
}

impl GenerationSettings {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_seconds)
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_attempts: MAX_GENERATION_ATTEMPTS,
            provider_timeout_seconds: 60,
            min_content_chars: 50,
            max_requested_count: 50,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = GenerationSettings::default();

        Self {
            web_server_host: env_or("WEB_SERVER_HOST", "localhost"),
            web_server_port: env_parse("WEB_SERVER_PORT", 8080),
            openai_api_key: env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from),
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            openai_model: env_or("OPENAI_MODEL", "gpt-4o-mini"),
            ollama_enabled: env_parse("OLLAMA_ENABLED", true),
            ollama_base_url: env_or("OLLAMA_BASE_URL", "http://localhost:11434"),
            ollama_model: env_or("OLLAMA_MODEL", "llama3.1"),
            pattern_capacity: env_parse("PATTERN_CAPACITY", 20),
            generation: GenerationSettings {
                max_attempts: env_parse("GENERATION_MAX_ATTEMPTS", defaults.max_attempts)
                    .clamp(1, MAX_GENERATION_ATTEMPTS),
                provider_timeout_seconds: env_parse(
                    "PROVIDER_TIMEOUT_SECONDS",
                    defaults.provider_timeout_seconds,
                ),
                min_content_chars: env_parse("MIN_CONTENT_CHARS", defaults.min_content_chars),
                max_requested_count: env_parse(
                    "MAX_REQUESTED_COUNT",
                    defaults.max_requested_count,
                ),
            },
        }
    }

    pub fn has_provider(&self) -> bool {
        self.ollama_enabled || self.openai_api_key.is_some()
    }

    /// Rejects settings the generation loop cannot run with. Having no
    /// provider at all is only a warning: the basic strategy still works.
    pub fn validate(&self) -> AppResult<()> {
        if self.pattern_capacity == 0 {
            return Err(AppError::ValidationError(
                "PATTERN_CAPACITY must be at least 1".to_string(),
            ));
        }
        if self.generation.provider_timeout_seconds == 0 {
            return Err(AppError::ValidationError(
                "PROVIDER_TIMEOUT_SECONDS must be at least 1".to_string(),
            ));
        }
        if self.generation.max_requested_count == 0 {
            return Err(AppError::ValidationError(
                "MAX_REQUESTED_COUNT must be at least 1".to_string(),
            ));
        }
        if !self.has_provider() {
            log::warn!(
                "No completion provider configured; only basic extraction will produce questions"
            );
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            openai_api_key: None,
            openai_base_url: "http://localhost:9999/v1".to_string(),
            openai_model: "test-model".to_string(),
            ollama_enabled: false,
            ollama_base_url: "http://localhost:11434".to_string(),
            ollama_model: "test-local".to_string(),
            pattern_capacity: 20,
            generation: GenerationSettings {
                max_attempts: MAX_GENERATION_ATTEMPTS,
                provider_timeout_seconds: 5,
                min_content_chars: 50,
                max_requested_count: 50,
            },
        }
    }
}
