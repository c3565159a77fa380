use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::domain::{question::Question, subject_category::SubjectCategory};

/// One invocation of the generation pipeline.
#[derive(Clone, Debug, Validate)]
pub struct GenerationRequest {
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,

    #[validate(range(min = 1, message = "requested count must be positive"))]
    pub requested_count: usize,

    pub subject: SubjectCategory,

    #[validate(length(max = 200))]
    pub topic_name: String,
}

impl GenerationRequest {
    pub fn new(
        content: impl Into<String>,
        requested_count: usize,
        subject: SubjectCategory,
        topic_name: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            requested_count,
            subject,
            topic_name: topic_name.into(),
        }
    }
}

/// The five generation approaches, tried in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    SubjectContext,
    Conservative,
    Simplified,
    PatternBased,
    Basic,
}

impl StrategyKind {
    /// Strategy for a 1-based attempt number. Anything past the fourth
    /// attempt is the provider-free basic extraction.
    pub fn for_attempt(attempt: u32) -> Self {
        match attempt {
            0 | 1 => StrategyKind::SubjectContext,
            2 => StrategyKind::Conservative,
            3 => StrategyKind::Simplified,
            4 => StrategyKind::PatternBased,
            _ => StrategyKind::Basic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::SubjectContext => "subject_context",
            StrategyKind::Conservative => "conservative",
            StrategyKind::Simplified => "simplified",
            StrategyKind::PatternBased => "pattern_based",
            StrategyKind::Basic => "basic",
        }
    }

    pub fn uses_provider(&self) -> bool {
        !matches!(self, StrategyKind::Basic)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened during a single attempt of the loop.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttemptSummary {
    pub attempt: u32,
    pub strategy: StrategyKind,
    pub batch_size: usize,
    pub parsed: usize,
    pub accepted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_error: Option<String>,
}

/// Result of a generation run. Under-delivery is not an error: callers
/// check `met_count`.
#[derive(Clone, Debug, Serialize)]
pub struct GenerationOutcome {
    pub run_id: Uuid,
    pub questions: Vec<Question>,
    pub requested_count: usize,
    pub attempts_used: u32,
    pub met_count: bool,
    pub attempts: Vec<AttemptSummary>,
}
