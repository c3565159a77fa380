use serde::Deserialize;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{GenerationRequest, SubjectCategory},
};

const DEFAULT_PRUNE_AGE_DAYS: i64 = 30;
const MAX_PRUNE_AGE_DAYS: i64 = 36_500;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateQuestionsRequestDto {
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,

    #[validate(range(min = 1, message = "question_count must be at least 1"))]
    pub question_count: usize,

    /// Subject id such as `mathematics`; unknown or missing ids use `other`.
    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    #[validate(length(max = 200))]
    pub topic_name: String,
}

impl From<GenerateQuestionsRequestDto> for GenerationRequest {
    fn from(dto: GenerateQuestionsRequestDto) -> Self {
        let subject = dto
            .subject
            .as_deref()
            .map(SubjectCategory::from_id)
            .unwrap_or(SubjectCategory::Other);

        GenerationRequest::new(dto.content, dto.question_count, subject, dto.topic_name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternQuery {
    pub subject: Option<String>,
}

impl PatternQuery {
    /// No filter when absent; an unknown subject id is `NotFound`.
    pub fn subject(&self) -> AppResult<Option<SubjectCategory>> {
        self.subject
            .as_deref()
            .map(|id| {
                SubjectCategory::parse_id(id)
                    .ok_or_else(|| AppError::NotFound(format!("Subject '{}' not found", id)))
            })
            .transpose()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PruneQuery {
    #[validate(range(min = 0, max = MAX_PRUNE_AGE_DAYS))]
    pub max_age_days: Option<i64>,
}

impl PruneQuery {
    pub fn max_age_days(&self) -> i64 {
        self.max_age_days.unwrap_or(DEFAULT_PRUNE_AGE_DAYS)
    }
}
