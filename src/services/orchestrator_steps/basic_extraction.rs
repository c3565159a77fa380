//! Provider-free fallback: cloze questions cut straight from the material.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::domain::{question::OPTION_COUNT, Question};

pub const MIN_SENTENCE_CHARS: usize = 20;
const BLANK: &str = "_____";

static SENTENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^.!?\n]+[.!?]?").expect("SENTENCE is a valid regex pattern")
});

static KEY_TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z][A-Za-z'-]{4,}").expect("KEY_TERM is a valid regex pattern")
});

const STOP_WORDS: &[&str] = &[
    "about", "after", "again", "another", "because", "before", "being", "between", "could",
    "every", "first", "their", "there", "these", "those", "through", "under", "until", "where",
    "which", "while", "would", "should", "might", "since", "other", "often", "within", "without",
];

/// Sentences longer than `MIN_SENTENCE_CHARS`, trimmed, in order.
pub fn candidate_sentences(content: &str) -> Vec<String> {
    SENTENCE
        .find_iter(content)
        .map(|m| m.as_str().trim().to_string())
        .filter(|sentence| sentence.chars().count() > MIN_SENTENCE_CHARS)
        .collect()
}

fn key_terms(text: &str) -> impl Iterator<Item = regex::Match<'_>> {
    KEY_TERM
        .find_iter(text)
        .filter(|m| !STOP_WORDS.contains(&m.as_str().to_lowercase().as_str()))
}

/// Distinct key terms of the whole material, in order of first appearance.
fn term_pool(content: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    key_terms(content)
        .map(|m| m.as_str().to_string())
        .filter(|term| seen.insert(term.to_lowercase()))
        .collect()
}

/// Builds up to `limit` questions from `content` without calling a model.
/// Identical input always gives identical output.
pub fn extract_questions(content: &str, limit: usize) -> Vec<Question> {
    let pool = term_pool(content);
    let mut questions = Vec::new();

    for sentence in candidate_sentences(content) {
        if questions.len() >= limit {
            break;
        }

        // Longest term; the first one wins ties.
        let Some(key) = key_terms(&sentence).fold(None, |best: Option<regex::Match<'_>>, m| {
            match best {
                Some(b) if b.as_str().len() >= m.as_str().len() => Some(b),
                _ => Some(m),
            }
        }) else {
            continue;
        };

        let answer = key.as_str().to_string();
        let cloze = format!(
            "{}{}{}",
            &sentence[..key.start()],
            BLANK,
            &sentence[key.end()..]
        );
        let question_text = format!("Complete the statement from the material: \"{}\"", cloze);
        let explanation = format!("The material states: \"{}\"", sentence);

        let position = questions.len();
        let question = match distractors(&pool, &answer, position) {
            Some(mut options) => {
                let correct_index = position % OPTION_COUNT;
                options.insert(correct_index, answer);
                Question::multiple_choice(question_text, options, correct_index, explanation)
            }
            None => Question::text_based(question_text, answer, explanation),
        };
        questions.push(question);
    }

    questions
}

/// Three distinct terms other than `answer`, rotated by `offset` so that
/// consecutive questions use different distractors.
fn distractors(pool: &[String], answer: &str, offset: usize) -> Option<Vec<String>> {
    let answer = answer.to_lowercase();
    let others: Vec<&String> = pool
        .iter()
        .filter(|term| term.to_lowercase() != answer)
        .collect();
    if others.len() < OPTION_COUNT - 1 {
        return None;
    }

    let start = (offset * (OPTION_COUNT - 1)) % others.len();
    Some(
        others
            .iter()
            .cycle()
            .skip(start)
            .take(OPTION_COUNT - 1)
            .map(|term| term.to_string())
            .collect(),
    )
}
