use serde::{Deserialize, Serialize};

pub const OPTION_COUNT: usize = 4;
pub const OPTION_LETTERS: [char; OPTION_COUNT] = ['A', 'B', 'C', 'D'];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TextBased,
}

/// A generated quiz question. Multiple-choice questions carry exactly four
/// options and the index of the correct one; text-based questions carry
/// neither.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub question_text: String,
    pub answer_text: String,
    pub question_type: QuestionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_index: Option<usize>,
    pub explanation: String,
}

impl Question {
    /// Builds a multiple-choice question; the answer is the text of the
    /// correct option.
    pub fn multiple_choice(
        question_text: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: impl Into<String>,
    ) -> Self {
        let answer_text = options.get(correct_index).cloned().unwrap_or_default();
        Self {
            question_text: question_text.into(),
            answer_text,
            question_type: QuestionType::MultipleChoice,
            options: Some(options),
            correct_index: Some(correct_index),
            explanation: explanation.into(),
        }
    }

    pub fn text_based(
        question_text: impl Into<String>,
        answer_text: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            question_text: question_text.into(),
            answer_text: answer_text.into(),
            question_type: QuestionType::TextBased,
            options: None,
            correct_index: None,
            explanation: explanation.into(),
        }
    }

    /// Turns a multiple-choice question into an open-response one whose
    /// model answer is the correct option.
    pub fn into_text_based(self) -> Self {
        match self.question_type {
            QuestionType::TextBased => self,
            QuestionType::MultipleChoice => Self {
                options: None,
                correct_index: None,
                question_type: QuestionType::TextBased,
                ..self
            },
        }
    }

    pub fn is_multiple_choice(&self) -> bool {
        self.question_type == QuestionType::MultipleChoice
    }

    pub fn correct_letter(&self) -> Option<char> {
        self.correct_index
            .and_then(|index| OPTION_LETTERS.get(index).copied())
    }

    /// Question, answer and explanation joined; the text subject rules scan.
    pub fn combined_text(&self) -> String {
        format!(
            "{} {} {}",
            self.question_text, self.answer_text, self.explanation
        )
    }

    /// Key used to spot the same question produced twice.
    pub fn dedup_key(&self) -> String {
        self.question_text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Question {
        Question::multiple_choice(
            "What force keeps planets in orbit?",
            vec![
                "Gravity".to_string(),
                "Magnetism".to_string(),
                "Friction".to_string(),
                "Buoyancy".to_string(),
            ],
            0,
            "Gravity provides the centripetal force.",
        )
    }

    #[test]
    fn multiple_choice_answer_matches_correct_option() {
        let question = sample();
        assert_eq!(question.answer_text, "Gravity");
        assert_eq!(question.correct_letter(), Some('A'));
        assert!(question.is_multiple_choice());
    }

    #[test]
    fn into_text_based_drops_options_but_keeps_answer() {
        let question = sample().into_text_based();
        assert_eq!(question.question_type, QuestionType::TextBased);
        assert!(question.options.is_none());
        assert!(question.correct_index.is_none());
        assert_eq!(question.answer_text, "Gravity");
    }

    #[test]
    fn question_type_serializes_snake_case() {
        let json = serde_json::to_string(&QuestionType::MultipleChoice).unwrap();
        assert_eq!(json, "\"multiple_choice\"");
    }

    #[test]
    fn dedup_key_normalizes_case_and_spacing() {
        let a = Question::text_based("What  is Photosynthesis?", "x", "");
        let b = Question::text_based("what is photosynthesis?", "y", "");
        assert_eq!(a.dedup_key(), b.dedup_key());
    }
}
