use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{AppError, AppResult, ProviderError},
    services::model_service::{CompletionOptions, CompletionProvider},
};

/// Locally hosted model served by an Ollama-compatible `/api/generate`
/// endpoint.
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout_seconds: u64,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str, timeout_seconds: u64) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout_seconds,
        })
    }

    fn classify(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.timeout_seconds)
        } else if err.is_connect() {
            ProviderError::Connection(err.to_string())
        } else {
            ProviderError::Api(err.to_string())
        }
    }
}

#[async_trait]
impl CompletionProvider for OllamaProvider {
    fn name(&self) -> String {
        format!("ollama:{}", self.model)
    }

    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: options.temperature,
                num_predict: options.max_output_tokens,
                stop: options.stop_sequences.clone(),
            },
        };

        let res = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::ModelNotFound(self.model.clone()));
        }
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!("HTTP {}: {}", status, body)));
        }

        let body: GenerateResponse = res.json().await.map_err(|e| self.classify(e))?;
        if body.response.trim().is_empty() {
            return Err(ProviderError::EmptyCompletion);
        }
        Ok(body.response)
    }
}
