use chrono::Utc;

use tento_quizgen::{
    constants::prompts::OUTPUT_CONTRACT,
    models::domain::{Pattern, Question, QuestionType, StrategyKind, SubjectCategory},
    services::{
        prompt_builder::{PromptBuilder, PromptInput},
        response_parser::ResponseParser,
        validation::Validator,
    },
};

const MATERIAL: &str = "The material covers the main ideas of the unit in a few short paragraphs. \
It introduces the key terms, gives worked examples and ends with a brief summary of the topic.";

const STRATEGIES: [StrategyKind; 5] = [
    StrategyKind::SubjectContext,
    StrategyKind::Conservative,
    StrategyKind::Simplified,
    StrategyKind::PatternBased,
    StrategyKind::Basic,
];

fn stored_pattern() -> Pattern {
    let question = Question::multiple_choice(
        "Which idea does the summary return to?",
        vec![
            "The key terms".to_string(),
            "The worked examples".to_string(),
            "The introduction".to_string(),
            "The exercises".to_string(),
        ],
        0,
        "The summary revisits the key terms.",
    );
    Pattern::from_question(&question, Utc::now())
}

#[test]
fn every_prompt_example_parses_into_one_valid_question() {
    let pattern = stored_pattern();
    let sequence = [QuestionType::MultipleChoice, QuestionType::TextBased];

    for subject in SubjectCategory::ALL {
        for kind in STRATEGIES {
            let input = PromptInput::new(MATERIAL, 2, subject, "Unit review")
                .with_type_sequence(&sequence)
                .with_pattern(Some(&pattern));
            let prompt = PromptBuilder::build(kind, &input);

            let example = PromptBuilder::extract_example(&prompt)
                .unwrap_or_else(|| panic!("{subject}/{kind}: prompt has no example"));
            let parsed = ResponseParser::parse(example, 5);
            assert_eq!(parsed.len(), 1, "{subject}/{kind}: example did not parse");

            let accepted = Validator::validate_all(parsed, subject);
            assert_eq!(accepted.len(), 1, "{subject}/{kind}: example failed validation");
        }
    }
}

#[test]
fn every_prompt_states_the_output_contract() {
    for subject in SubjectCategory::ALL {
        for kind in STRATEGIES {
            let prompt = PromptBuilder::build(kind, &PromptInput::new(MATERIAL, 3, subject, ""));
            assert!(
                prompt.contains(OUTPUT_CONTRACT),
                "{subject}/{kind}: output contract missing"
            );
            assert!(prompt.contains("QUESTION 1:"));
        }
    }
}

#[test]
fn examples_are_the_subject_examples() {
    for subject in SubjectCategory::ALL {
        let prompt = PromptBuilder::build(
            StrategyKind::SubjectContext,
            &PromptInput::new(MATERIAL, 1, subject, ""),
        );
        assert_eq!(
            PromptBuilder::extract_example(&prompt),
            Some(PromptBuilder::example_block(subject).trim())
        );
    }
}

#[test]
fn parsing_twice_gives_identical_results() {
    for subject in SubjectCategory::ALL {
        let example = PromptBuilder::example_block(subject);
        assert_eq!(
            ResponseParser::parse(example, 1),
            ResponseParser::parse(example, 1)
        );
    }
}
