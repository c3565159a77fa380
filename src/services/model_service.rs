use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::errors::ProviderError;

/// Generation options passed through to the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub stop_sequences: Vec<String>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 1024,
            stop_sequences: Vec::new(),
        }
    }
}

/// A text-completion service: prompt in, completion text out.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> String;

    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, ProviderError>;
}

/// Tries each provider in order and returns the first non-empty completion.
pub struct ModelService {
    providers: Vec<Arc<dyn CompletionProvider>>,
}

impl ModelService {
    pub fn new(providers: Vec<Arc<dyn CompletionProvider>>) -> Self {
        Self { providers }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

#[async_trait]
impl CompletionProvider for ModelService {
    fn name(&self) -> String {
        format!("fallback[{}]", self.provider_names().join(","))
    }

    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, ProviderError> {
        if self.providers.is_empty() {
            return Err(ProviderError::NotConfigured);
        }

        let mut failures = Vec::new();
        for provider in &self.providers {
            match provider.complete(prompt, options).await {
                Ok(text) if !text.trim().is_empty() => return Ok(text),
                Ok(_) => {
                    log::warn!("Provider {} returned an empty completion", provider.name());
                    failures.push(format!("{}: {}", provider.name(), ProviderError::EmptyCompletion));
                }
                Err(err) => {
                    log::warn!("Provider {} failed: {}", provider.name(), err);
                    failures.push(format!("{}: {}", provider.name(), err));
                }
            }
        }

        Err(ProviderError::AllProvidersFailed(failures.join("; ")))
    }
}
