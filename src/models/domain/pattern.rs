use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::question::{Question, QuestionType};

/// Summary of a previously accepted question, kept to seed later prompts.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Pattern {
    pub question_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub question_type: QuestionType,
    pub created_at: DateTime<Utc>,
    pub question_length: usize,
    pub has_numbers: bool,
}

impl Pattern {
    pub fn from_question(question: &Question, created_at: DateTime<Utc>) -> Self {
        Self {
            question_text: question.question_text.clone(),
            options: question.options.clone(),
            question_type: question.question_type,
            created_at,
            question_length: question.question_text.chars().count(),
            has_numbers: question.question_text.chars().any(|c| c.is_ascii_digit()),
        }
    }
}
