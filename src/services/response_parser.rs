use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::domain::{question::OPTION_COUNT, Question};

static QUESTION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)QUESTION\s*\d+\s*:").expect("QUESTION_MARKER is a valid regex pattern")
});

static OPTION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-D])\)\s*(.+)$").expect("OPTION_LINE is a valid regex pattern")
});

static CORRECT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^CORRECT:\s*([A-D])").expect("CORRECT_LINE is a valid regex pattern")
});

static EXPLANATION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^EXPLANATION:\s*(.+)$").expect("EXPLANATION_LINE is a valid regex pattern")
});

pub struct ResponseParser;

impl ResponseParser {
    /// Parses up to `expected_count` questions out of a completion. Blocks
    /// that do not follow the output contract are dropped silently.
    pub fn parse(completion: &str, expected_count: usize) -> Vec<Question> {
        let mut questions = Vec::new();
        if expected_count == 0 {
            return questions;
        }

        // Text before the first marker is preamble.
        for block in QUESTION_MARKER.split(completion).skip(1) {
            if let Some(question) = Self::parse_block(block) {
                questions.push(question);
                if questions.len() >= expected_count {
                    break;
                }
            }
        }

        questions
    }

    /// Parses one block (the text following a `QUESTION <n>:` marker).
    pub fn parse_block(block: &str) -> Option<Question> {
        let mut stem_lines: Vec<&str> = Vec::new();
        let mut options: Vec<String> = Vec::new();
        let mut correct_index: Option<usize> = None;
        let mut explanation: Option<String> = None;

        for line in block.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if let Some(caps) = OPTION_LINE.captures(line) {
                options.push(caps[2].trim().to_string());
            } else if let Some(caps) = CORRECT_LINE.captures(line) {
                correct_index = caps[1]
                    .chars()
                    .next()
                    .map(|letter| (letter.to_ascii_uppercase() as u8 - b'A') as usize);
            } else if let Some(caps) = EXPLANATION_LINE.captures(line) {
                explanation = Some(caps[1].trim().to_string());
            } else if options.is_empty() {
                stem_lines.push(line);
            } else if let Some(text) = explanation.as_mut() {
                // Explanations may wrap onto following lines.
                text.push(' ');
                text.push_str(line);
            }
        }

        let question_text = stem_lines.join(" ");
        if question_text.is_empty() || options.len() != OPTION_COUNT {
            return None;
        }

        let correct_index = correct_index.filter(|index| *index < OPTION_COUNT)?;

        Some(Question::multiple_choice(
            question_text,
            options,
            correct_index,
            explanation.unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{well_formed_block, well_formed_completion};

    #[test]
    fn parses_well_formed_blocks() {
        let completion = well_formed_completion(3);
        let questions = ResponseParser::parse(&completion, 3);

        assert_eq!(questions.len(), 3);
        let first = &questions[0];
        assert_eq!(first.options.as_ref().map(Vec::len), Some(4));
        assert_eq!(first.correct_index, Some(1));
        assert_eq!(first.answer_text, first.options.as_ref().unwrap()[1]);
        assert!(!first.explanation.is_empty());
    }

    #[test]
    fn stops_at_expected_count() {
        let completion = well_formed_completion(5);
        assert_eq!(ResponseParser::parse(&completion, 2).len(), 2);
        assert!(ResponseParser::parse(&completion, 0).is_empty());
    }

    #[test]
    fn marker_is_case_insensitive_and_preamble_is_ignored() {
        let completion = format!(
            "Sure! Here are your questions.\n\nquestion 1:\n{}",
            "What is the boiling point of water at sea level?\nA) 90 °C\nB) 100 °C\nC) 110 °C\nD) 120 °C\nCORRECT: B\nEXPLANATION: Water boils at 100 °C at one atmosphere."
        );
        let questions = ResponseParser::parse(&completion, 5);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].answer_text, "100 °C");
    }

    #[test]
    fn multi_line_stem_is_space_joined() {
        let block = "A train travels at constant speed.\nHow far does it go in two hours?\nA) 1 km\nB) 2 km\nC) 3 km\nD) 4 km\nCORRECT: a\nEXPLANATION: Example.";
        let question = ResponseParser::parse_block(block).unwrap();

        assert_eq!(
            question.question_text,
            "A train travels at constant speed. How far does it go in two hours?"
        );
        assert_eq!(question.correct_index, Some(0));
    }

    #[test]
    fn drops_block_without_correct_line() {
        let block = "Which gas do plants absorb?\nA) Oxygen\nB) Carbon dioxide\nC) Helium\nD) Neon\nEXPLANATION: Plants take in CO2.";
        assert!(ResponseParser::parse_block(block).is_none());
    }

    #[test]
    fn drops_block_with_wrong_option_count() {
        let block = "Which gas do plants absorb?\nA) Oxygen\nB) Carbon dioxide\nC) Helium\nCORRECT: B";
        assert!(ResponseParser::parse_block(block).is_none());
    }

    #[test]
    fn drops_block_with_empty_stem() {
        let block = "A) Oxygen\nB) Carbon dioxide\nC) Helium\nD) Neon\nCORRECT: B";
        assert!(ResponseParser::parse_block(block).is_none());
    }

    #[test]
    fn keeps_good_blocks_around_bad_ones() {
        let completion = format!(
            "QUESTION 1:\n{}\nQUESTION 2:\nBroken block\nA) only one\nQUESTION 3:\n{}",
            well_formed_block(1),
            well_formed_block(3)
        );
        assert_eq!(ResponseParser::parse(&completion, 10).len(), 2);
    }

    #[test]
    fn wrapped_explanation_lines_are_appended() {
        let block = "Why is the sky blue?\nA) Rayleigh scattering\nB) Reflection of oceans\nC) Ozone colour\nD) Dust\nCORRECT: A\nEXPLANATION: Shorter wavelengths\nscatter more strongly.";
        let question = ResponseParser::parse_block(block).unwrap();
        assert_eq!(
            question.explanation,
            "Shorter wavelengths scatter more strongly."
        );
    }

    #[test]
    fn parsing_is_idempotent() {
        let completion = well_formed_completion(4);
        assert_eq!(
            ResponseParser::parse(&completion, 4),
            ResponseParser::parse(&completion, 4)
        );
    }
}
