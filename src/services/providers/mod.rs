pub mod ollama_provider;
pub mod openai_provider;

use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    services::model_service::{CompletionProvider, ModelService},
};

pub use ollama_provider::OllamaProvider;
pub use openai_provider::OpenAiProvider;

/// Local model first, cloud model second, whichever are configured.
pub fn model_service_from_config(config: &Config) -> AppResult<ModelService> {
    let mut providers: Vec<Arc<dyn CompletionProvider>> = Vec::new();

    if config.ollama_enabled {
        providers.push(Arc::new(OllamaProvider::new(
            &config.ollama_base_url,
            &config.ollama_model,
            config.generation.provider_timeout_seconds,
        )?));
    }

    if let Some(api_key) = &config.openai_api_key {
        providers.push(Arc::new(OpenAiProvider::new(
            api_key,
            &config.openai_base_url,
            &config.openai_model,
            config.generation.provider_timeout_seconds,
        )));
    }

    let service = ModelService::new(providers);
    log::info!("Completion providers: {:?}", service.provider_names());
    Ok(service)
}
