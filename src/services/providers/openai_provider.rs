use async_openai::{config::OpenAIConfig, error::OpenAIError, Client};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};

use crate::{
    errors::ProviderError,
    services::model_service::{CompletionOptions, CompletionProvider},
};

/// OpenAI accepts at most four stop sequences.
const MAX_STOP_SEQUENCES: usize = 4;

/// Cloud-hosted chat model reached through `async-openai`.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
    timeout_seconds: u64,
}

impl OpenAiProvider {
    pub fn new(api_key: &SecretString, base_url: &str, model: &str, timeout_seconds: u64) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(base_url);

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            timeout_seconds,
        }
    }
}

/// Chat-completions request body for a single user prompt.
pub fn build_chat_request(model: &str, prompt: &str, options: &CompletionOptions) -> Value {
    let mut request = json!({
        "model": model,
        "messages": [{ "role": "user", "content": prompt }],
        "temperature": options.temperature,
        "max_tokens": options.max_output_tokens,
    });

    if !options.stop_sequences.is_empty() {
        let stop: Vec<&String> = options
            .stop_sequences
            .iter()
            .take(MAX_STOP_SEQUENCES)
            .collect();
        request["stop"] = json!(stop);
    }

    request
}

/// Pulls the first choice's message text out of a chat-completions response.
pub fn extract_message_content(response: &Value) -> Result<String, ProviderError> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .filter(|text| !text.trim().is_empty())
        .ok_or(ProviderError::EmptyCompletion)
}

/// Maps an `async-openai` error message onto the provider taxonomy.
pub fn classify_error_message(message: String, model: &str, timeout_seconds: u64) -> ProviderError {
    let lowered = message.to_lowercase();

    if lowered.contains("model_not_found") || lowered.contains("does not exist") {
        ProviderError::ModelNotFound(model.to_string())
    } else if lowered.contains("timed out") || lowered.contains("timeout") {
        ProviderError::Timeout(timeout_seconds)
    } else if lowered.contains("error sending request") || lowered.contains("connect") {
        ProviderError::Connection(message)
    } else {
        ProviderError::Api(message)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> String {
        format!("openai:{}", self.model)
    }

    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, ProviderError> {
        let request = build_chat_request(&self.model, prompt, options);

        let response: Value = self
            .client
            .chat()
            .create_byot(request)
            .await
            .map_err(|err: OpenAIError| {
                classify_error_message(err.to_string(), &self.model, self.timeout_seconds)
            })?;

        if let Some(usage) = response.get("usage") {
            log::debug!(
                "OpenAI usage for {}: prompt_tokens={} completion_tokens={}",
                self.model,
                usage["prompt_tokens"],
                usage["completion_tokens"]
            );
        }

        extract_message_content(&response)
    }
}
