use crate::models::domain::StrategyKind;

const SUBJECT_CONTEXT_TEMPERATURE: f32 = 0.7;
const CONSERVATIVE_TEMPERATURE: f32 = 0.4;
const SIMPLIFIED_TEMPERATURE: f32 = 0.3;
const PATTERN_BASED_TEMPERATURE: f32 = 0.6;

const SUBJECT_CONTEXT_BUDGET: usize = 2000;
const CONSERVATIVE_BUDGET: usize = 1500;
const SIMPLIFIED_BUDGET: usize = 800;
const PATTERN_BASED_BUDGET: usize = 1200;

const BASE_OUTPUT_TOKENS: u32 = 200;
const OUTPUT_TOKENS_PER_QUESTION: u32 = 220;
const MAX_OUTPUT_TOKENS: u32 = 4096;

/// Parameters of one strategy in the attempt sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStep {
    pub kind: StrategyKind,
    pub description: Option<String>,
    pub temperature: f32,
    pub content_budget: usize,
}

impl GenerationStep {
    pub fn new(kind: StrategyKind) -> Self {
        Self {
            kind,
            description: None,
            temperature: SUBJECT_CONTEXT_TEMPERATURE,
            content_budget: SUBJECT_CONTEXT_BUDGET,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_content_budget(mut self, chars: usize) -> Self {
        self.content_budget = chars;
        self
    }

    /// Strategy name followed by its description, as shown in attempt logs.
    pub fn label(&self) -> String {
        match &self.description {
            Some(description) => format!("{}: {}", self.kind, description),
            None => self.kind.to_string(),
        }
    }

    /// Output length to request for a batch of `batch_size` questions.
    pub fn max_output_tokens(&self, batch_size: usize) -> u32 {
        let batch = u32::try_from(batch_size).unwrap_or(u32::MAX);
        BASE_OUTPUT_TOKENS
            .saturating_add(OUTPUT_TOKENS_PER_QUESTION.saturating_mul(batch))
            .min(MAX_OUTPUT_TOKENS)
    }

    /// Stops the model once it starts a block beyond the requested batch.
    pub fn stop_sequences(&self, batch_size: usize) -> Vec<String> {
        vec![format!("QUESTION {}:", batch_size + 1)]
    }
}

/// Step for a 1-based attempt number.
pub fn step_for_attempt(attempt: u32) -> GenerationStep {
    step_for(StrategyKind::for_attempt(attempt))
}

pub fn step_for(kind: StrategyKind) -> GenerationStep {
    match kind {
        StrategyKind::SubjectContext => subject_context_step(),
        StrategyKind::Conservative => conservative_step(),
        StrategyKind::Simplified => simplified_step(),
        StrategyKind::PatternBased => pattern_based_step(),
        StrategyKind::Basic => basic_step(),
    }
}

fn subject_context_step() -> GenerationStep {
    GenerationStep::new(StrategyKind::SubjectContext)
        .with_description("Full subject template with a steered question-type mix")
        .with_temperature(SUBJECT_CONTEXT_TEMPERATURE)
        .with_content_budget(SUBJECT_CONTEXT_BUDGET)
}

fn conservative_step() -> GenerationStep {
    GenerationStep::new(StrategyKind::Conservative)
        .with_description("Shorter instructions at a lower temperature")
        .with_temperature(CONSERVATIVE_TEMPERATURE)
        .with_content_budget(CONSERVATIVE_BUDGET)
}

fn simplified_step() -> GenerationStep {
    GenerationStep::new(StrategyKind::Simplified)
        .with_description("Minimal prompt with a short excerpt")
        .with_temperature(SIMPLIFIED_TEMPERATURE)
        .with_content_budget(SIMPLIFIED_BUDGET)
}

fn pattern_based_step() -> GenerationStep {
    GenerationStep::new(StrategyKind::PatternBased)
        .with_description("Prompt seeded with a previously accepted question")
        .with_temperature(PATTERN_BASED_TEMPERATURE)
        .with_content_budget(PATTERN_BASED_BUDGET)
}

fn basic_step() -> GenerationStep {
    GenerationStep::new(StrategyKind::Basic)
        .with_description("Deterministic cloze questions extracted from the material")
        .with_temperature(0.0)
        .with_content_budget(usize::MAX)
}
