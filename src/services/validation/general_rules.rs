use std::collections::HashSet;

use crate::models::domain::{question::OPTION_COUNT, Question, QuestionType};
use crate::services::validation::{QuestionRule, RuleOutcome};

pub const MIN_QUESTION_CHARS: usize = 10;

/// Structural rules every question must satisfy regardless of subject.
pub static GENERAL_RULES: &[QuestionRule] = &[
    QuestionRule::new("question_length", question_length),
    QuestionRule::new("answer_present", answer_present),
    QuestionRule::new("option_structure", option_structure),
];

fn question_length(question: &Question) -> RuleOutcome {
    let length = question.question_text.trim().chars().count();
    if length < MIN_QUESTION_CHARS {
        RuleOutcome::Reject(format!(
            "question text has {} characters, at least {} required",
            length, MIN_QUESTION_CHARS
        ))
    } else {
        RuleOutcome::Pass
    }
}

fn answer_present(question: &Question) -> RuleOutcome {
    if question.answer_text.trim().is_empty() {
        RuleOutcome::Reject("answer is empty".to_string())
    } else {
        RuleOutcome::Pass
    }
}

fn option_structure(question: &Question) -> RuleOutcome {
    match question.question_type {
        QuestionType::TextBased => {
            if question.options.is_some() || question.correct_index.is_some() {
                RuleOutcome::Reject("text-based question carries options".to_string())
            } else {
                RuleOutcome::Pass
            }
        }
        QuestionType::MultipleChoice => multiple_choice_structure(question),
    }
}

/// Option checks for a multiple-choice question, also used before a parsed
/// question is turned into an open-response one.
pub fn multiple_choice_structure(question: &Question) -> RuleOutcome {
    let Some(options) = question.options.as_ref() else {
        return RuleOutcome::Reject("multiple-choice question has no options".to_string());
    };

    if options.len() != OPTION_COUNT {
        return RuleOutcome::Reject(format!(
            "expected {} options, found {}",
            OPTION_COUNT,
            options.len()
        ));
    }

    if options.iter().any(|option| option.trim().is_empty()) {
        return RuleOutcome::Reject("an option is empty".to_string());
    }

    let distinct: HashSet<String> = options
        .iter()
        .map(|option| option.trim().to_lowercase())
        .collect();
    if distinct.len() != OPTION_COUNT {
        return RuleOutcome::Reject("options are not pairwise distinct".to_string());
    }

    let Some(index) = question.correct_index.filter(|index| *index < OPTION_COUNT) else {
        return RuleOutcome::Reject(format!(
            "correct index {:?} is outside 0..{}",
            question.correct_index, OPTION_COUNT
        ));
    };

    if options[index].trim().to_lowercase() != question.answer_text.trim().to_lowercase() {
        return RuleOutcome::Reject("answer does not match the correct option".to_string());
    }

    RuleOutcome::Pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_multiple_choice;

    #[test]
    fn short_question_is_rejected() {
        let question = Question::text_based("Why?", "Because", "");
        assert!(question_length(&question).is_reject());
    }

    #[test]
    fn blank_answer_is_rejected() {
        let question = Question::text_based("Explain photosynthesis briefly.", "   ", "");
        assert!(answer_present(&question).is_reject());
    }

    #[test]
    fn well_formed_multiple_choice_passes() {
        let question = sample_multiple_choice("Which letter is third in the list?");
        assert_eq!(option_structure(&question), RuleOutcome::Pass);
    }

    #[test]
    fn duplicate_options_ignore_case() {
        let mut question = sample_multiple_choice("Which letter is third in the list?");
        question.options = Some(vec![
            "Alpha".to_string(),
            "ALPHA".to_string(),
            "Gamma".to_string(),
            "Delta".to_string(),
        ]);
        assert!(option_structure(&question).is_reject());
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut question = sample_multiple_choice("Which letter is third in the list?");
        question.correct_index = Some(4);
        assert!(option_structure(&question).is_reject());
    }

    #[test]
    fn answer_must_match_correct_option() {
        let mut question = sample_multiple_choice("Which letter is third in the list?");
        question.answer_text = "Beta".to_string();
        assert!(option_structure(&question).is_reject());
    }

    #[test]
    fn three_options_are_rejected() {
        let mut question = sample_multiple_choice("Which letter is third in the list?");
        question.options = Some(vec!["Alpha".into(), "Beta".into(), "Gamma".into()]);
        assert!(option_structure(&question).is_reject());
    }

    #[test]
    fn text_based_with_options_is_rejected() {
        let mut question = Question::text_based("Describe the water cycle.", "Evaporation", "");
        question.options = Some(vec!["a".into()]);
        assert!(option_structure(&question).is_reject());
    }
}
