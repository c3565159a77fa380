use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    services::{
        generation_orchestrator::GenerationOrchestrator, model_service::CompletionProvider,
        pattern_store::PatternStore, providers::model_service_from_config,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<GenerationOrchestrator>,
    pub pattern_store: Arc<PatternStore>,
    pub provider_name: String,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let model_service = model_service_from_config(&config)?;
        Ok(Self::with_provider(config, Arc::new(model_service)))
    }

    /// Wires the shared pattern store and orchestrator around `provider`.
    pub fn with_provider(config: Config, provider: Arc<dyn CompletionProvider>) -> Self {
        let pattern_store = Arc::new(PatternStore::new(config.pattern_capacity));
        let provider_name = provider.name();
        let orchestrator = Arc::new(GenerationOrchestrator::new(
            provider,
            pattern_store.clone(),
            config.generation.clone(),
        ));

        Self {
            orchestrator,
            pattern_store,
            provider_name,
            config: Arc::new(config),
        }
    }
}
