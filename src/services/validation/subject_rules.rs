//! Heuristic, subject-specific acceptance rules.
//!
//! Each rule is a plain predicate over a parsed question so it can be tested
//! on its own. The arithmetic checker only understands single operations of
//! the form `a <op> b = c`; chained or algebraic expressions pass unchecked.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::domain::{Question, SubjectCategory};
use crate::services::validation::{QuestionRule, RuleOutcome};

static MATHEMATICS_RULES: &[QuestionRule] =
    &[QuestionRule::new("arithmetic_soundness", arithmetic_soundness)];

static NATURAL_SCIENCES_RULES: &[QuestionRule] =
    &[QuestionRule::new("known_misconceptions", known_misconceptions)];

static LITERATURE_RULES: &[QuestionRule] =
    &[QuestionRule::new("plot_summary", plot_summary)];

static HISTORY_RULES: &[QuestionRule] = &[QuestionRule::new("date_recall", date_recall)];

static COMPUTER_SCIENCE_RULES: &[QuestionRule] =
    &[QuestionRule::new("balanced_code", balanced_code)];

static LANGUAGES_RULES: &[QuestionRule] =
    &[QuestionRule::new("requires_audio", requires_audio)];

static ARTS_RULES: &[QuestionRule] = &[QuestionRule::new("requires_image", requires_image)];

static HEALTH_MEDICINE_RULES: &[QuestionRule] =
    &[QuestionRule::new("prescriptive_advice", prescriptive_advice)];

pub fn rules_for(subject: SubjectCategory) -> &'static [QuestionRule] {
    match subject {
        SubjectCategory::Mathematics => MATHEMATICS_RULES,
        SubjectCategory::NaturalSciences => NATURAL_SCIENCES_RULES,
        SubjectCategory::Literature => LITERATURE_RULES,
        SubjectCategory::History => HISTORY_RULES,
        SubjectCategory::ComputerScience => COMPUTER_SCIENCE_RULES,
        SubjectCategory::Languages => LANGUAGES_RULES,
        SubjectCategory::Arts => ARTS_RULES,
        SubjectCategory::HealthMedicine => HEALTH_MEDICINE_RULES,
        SubjectCategory::Business | SubjectCategory::Other => &[],
    }
}

// ---------------------------------------------------------------------------
// Mathematics
// ---------------------------------------------------------------------------

static EQUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(-?\d+(?:\.\d+)?)\s*([×*xX+\-÷/])\s*(-?\d+(?:\.\d+)?)\s*=\s*(-?\d+(?:\.\d+)?)")
        .expect("EQUATION is a valid regex pattern")
});

/// A single `a <op> b = c` claim found in text.
#[derive(Debug, Clone, PartialEq)]
pub struct ArithmeticClaim {
    pub expression: String,
    pub expected: Option<f64>,
    pub claimed: f64,
}

impl ArithmeticClaim {
    fn is_correct(&self, claimed_text: &str) -> bool {
        let Some(expected) = self.expected else {
            return false;
        };
        // Accept results rounded to the precision the text states.
        let decimals = claimed_text
            .split_once('.')
            .map(|(_, fraction)| fraction.len())
            .unwrap_or(0);
        let tolerance = if decimals == 0 {
            1e-9
        } else {
            0.5 * 10f64.powi(-(decimals as i32)) + 1e-9
        };
        (expected - self.claimed).abs() <= tolerance
    }
}

fn evaluate(a: f64, op: &str, b: f64) -> Option<f64> {
    match op {
        "+" => Some(a + b),
        "-" => Some(a - b),
        "×" | "*" | "x" | "X" => Some(a * b),
        "÷" | "/" if b != 0.0 => Some(a / b),
        _ => None,
    }
}

const SYMBOL_OPERATORS: &[char] = &['×', '*', '+', '-', '÷', '/'];

/// `x`/`X` only counts as an operator when it is not part of a word.
fn is_letter_operator(c: char, neighbour: Option<char>) -> bool {
    matches!(c, 'x' | 'X') && !neighbour.is_some_and(char::is_alphabetic)
}

/// True when the match starts inside a longer expression, e.g. the
/// `3 × 4 = 14` of `2 + 3 × 4 = 14` or the `000 + 500` of `1,000 + 500`.
fn continues_before(before: &str) -> bool {
    let mut raw = before.chars().rev();
    if let (Some('.' | ','), Some(prev)) = (raw.next(), raw.next()) {
        if prev.is_ascii_digit() {
            return true;
        }
    }

    let mut trimmed = before.trim_end().chars().rev();
    match trimmed.next() {
        Some(c) if SYMBOL_OPERATORS.contains(&c) => true,
        Some(c) => is_letter_operator(c, trimmed.next()),
        None => false,
    }
}

/// True when the stated result is only the start of a longer expression or
/// a thousands-separated number.
fn continues_after(after: &str) -> bool {
    let mut raw = after.chars();
    if let (Some('.' | ','), Some(next)) = (raw.next(), raw.next()) {
        if next.is_ascii_digit() {
            return true;
        }
    }

    let trimmed = after.trim_start();
    let mut chars = trimmed.chars();
    let Some(c) = chars.next() else {
        return false;
    };
    let followed_by_digit = chars
        .as_str()
        .trim_start()
        .starts_with(|d: char| d.is_ascii_digit());
    match c {
        '-' | 'x' | 'X' => followed_by_digit,
        c => SYMBOL_OPERATORS.contains(&c),
    }
}

/// Every equation in `text` whose stated result is wrong. Equations that
/// are part of a chain or use thousands separators are skipped.
pub fn arithmetic_errors(text: &str) -> Vec<ArithmeticClaim> {
    let mut errors = Vec::new();

    for caps in EQUATION.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if continues_before(&text[..whole.start()]) || continues_after(&text[whole.end()..]) {
            continue;
        }

        let (Ok(a), Ok(b), Ok(claimed)) = (
            caps[1].parse::<f64>(),
            caps[3].parse::<f64>(),
            caps[4].parse::<f64>(),
        ) else {
            continue;
        };

        let claim = ArithmeticClaim {
            expression: caps[0].to_string(),
            expected: evaluate(a, &caps[2], b),
            claimed,
        };
        if !claim.is_correct(&caps[4]) {
            errors.push(claim);
        }
    }

    errors
}

fn arithmetic_soundness(question: &Question) -> RuleOutcome {
    let text = format!("{} {}", question.question_text, question.explanation);
    match arithmetic_errors(&text).first() {
        Some(claim) => RuleOutcome::Reject(match claim.expected {
            Some(expected) => format!(
                "\"{}\" is wrong, expected {}",
                claim.expression, expected
            ),
            None => format!("\"{}\" cannot be evaluated", claim.expression),
        }),
        None => RuleOutcome::Pass,
    }
}

// ---------------------------------------------------------------------------
// Natural sciences
// ---------------------------------------------------------------------------

const MISCONCEPTIONS: &[&str] = &[
    "heavier objects fall faster",
    "heavy objects fall faster",
    "a force is needed to keep an object moving",
    "seasons are caused by the earth's distance from the sun",
    "seasons are caused by distance from the sun",
    "humans only use 10% of their brain",
    "humans only use 10 percent of their brain",
    "we only use 10% of our brain",
    "blood is blue",
    "deoxygenated blood is blue",
    "lightning never strikes the same place twice",
    "glass is a slow-moving liquid",
    "glass is a liquid",
    "the tongue has separate taste zones",
    "bats are blind",
    "goldfish have a three-second memory",
    "humans evolved from chimpanzees",
    "humans evolved from monkeys",
    "antibiotics kill viruses",
    "the great wall of china is visible from space",
    "there is no gravity in space",
];

fn known_misconceptions(question: &Question) -> RuleOutcome {
    let text = question.combined_text().to_lowercase().replace('’', "'");
    match MISCONCEPTIONS.iter().find(|m| text.contains(*m)) {
        Some(misconception) => {
            RuleOutcome::Reject(format!("states the misconception \"{}\"", misconception))
        }
        None => RuleOutcome::Pass,
    }
}

// ---------------------------------------------------------------------------
// Literature
// ---------------------------------------------------------------------------

static PLOT_SUMMARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\bwhat happens\b|\bwhat happened\b|\bthen (he|she|they)\b|\bwhat did \w+ do\b|\bsummari[sz]e the plot\b|\bwhat is the plot\b|\bwhere did \w+ go\b",
    )
    .expect("PLOT_SUMMARY is a valid regex pattern")
});

static ANALYTICAL_FRAMING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(why|how does|how do|theme|themes|symboli[sz]e|symbol|symbolism|significance|significant|analy[sz]e|analysis|interpret|interpretation|motif|represents?|suggests?|reveals?|purpose|effect|tone|imagery|irony|metaphor|foreshadow\w*|characteri[sz]ation)\b",
    )
    .expect("ANALYTICAL_FRAMING is a valid regex pattern")
});

fn plot_summary(question: &Question) -> RuleOutcome {
    let text = &question.question_text;
    if PLOT_SUMMARY.is_match(text) && !ANALYTICAL_FRAMING.is_match(text) {
        RuleOutcome::Reject("plot-summary question without analytical framing".to_string())
    } else {
        RuleOutcome::Pass
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

static DATE_RECALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(in\s+)?(what|which)\s+year\b|\bin what year\b|\bwhen did\b|\bon what date\b|\bwhat (was|is) the date\b",
    )
    .expect("DATE_RECALL is a valid regex pattern")
});

fn date_recall(question: &Question) -> RuleOutcome {
    if DATE_RECALL.is_match(&question.question_text) {
        RuleOutcome::Flag("bare date-recall question".to_string())
    } else {
        RuleOutcome::Pass
    }
}

// ---------------------------------------------------------------------------
// Computer science
// ---------------------------------------------------------------------------

static CODE_SYNTAX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(if|for|while)\s*\(|\bfunction\s+\w+|\bdef\s+\w+\s*\(")
        .expect("CODE_SYNTAX is a valid regex pattern")
});

/// Whether every bracket closes in order and double quotes and backticks
/// come in pairs.
pub fn is_balanced(text: &str) -> bool {
    let mut stack = Vec::new();
    let mut double_quotes = 0usize;
    let mut backticks = 0usize;

    for c in text.chars() {
        match c {
            '(' | '[' | '{' => stack.push(c),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if stack.pop() != Some(expected) {
                    return false;
                }
            }
            '"' => double_quotes += 1,
            '`' => backticks += 1,
            _ => {}
        }
    }

    stack.is_empty() && double_quotes % 2 == 0 && backticks % 2 == 0
}

fn balanced_code(question: &Question) -> RuleOutcome {
    let mut fields: Vec<&str> = vec![
        &question.question_text,
        &question.answer_text,
        &question.explanation,
    ];
    if let Some(options) = &question.options {
        fields.extend(options.iter().map(String::as_str));
    }

    if !fields.iter().any(|field| CODE_SYNTAX.is_match(field)) {
        return RuleOutcome::Pass;
    }

    match fields.iter().find(|field| !is_balanced(field)) {
        Some(field) => RuleOutcome::Reject(format!("unbalanced code in \"{}\"", field)),
        None => RuleOutcome::Pass,
    }
}

// ---------------------------------------------------------------------------
// Languages
// ---------------------------------------------------------------------------

static AUDIO_REQUIRED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\blisten(ing)? to\b|\bpronunciation\b|\bpronounce[ds]?\b|\baudio\b|\brecording\b|\bhear\b|\bheard\b|\bout loud\b|\baloud\b|\bsounds? like\b",
    )
    .expect("AUDIO_REQUIRED is a valid regex pattern")
});

fn requires_audio(question: &Question) -> RuleOutcome {
    if AUDIO_REQUIRED.is_match(&question.question_text) {
        RuleOutcome::Reject("requires audio, which learners cannot receive".to_string())
    } else {
        RuleOutcome::Pass
    }
}

// ---------------------------------------------------------------------------
// Arts
// ---------------------------------------------------------------------------

static IMAGE_REQUIRED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\blook at\b|\bshown (above|below|here)\b|\bpictured\b|\b(this|the following|the attached) (image|picture|painting|photo|photograph|artwork|sculpture|figure)\b|\bin the (image|picture|photo|photograph|figure|illustration)\b|\b(see|refer to|observe) the (image|picture|figure|painting|artwork)\b",
    )
    .expect("IMAGE_REQUIRED is a valid regex pattern")
});

fn requires_image(question: &Question) -> RuleOutcome {
    if IMAGE_REQUIRED.is_match(&question.question_text) {
        RuleOutcome::Reject("requires viewing an image that is not provided".to_string())
    } else {
        RuleOutcome::Pass
    }
}

// ---------------------------------------------------------------------------
// Health & medicine
// ---------------------------------------------------------------------------

static PRESCRIPTIVE_ADVICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\byou should (take|stop taking|start taking|increase|decrease|double)\b|\byou need to take\b|\b(take|administer)\s+\d+(\.\d+)?\s*(mg|mcg|µg|g|ml|milligrams?|micrograms?|millilit(er|re)s?|tablets?|pills?|capsules?)\b|\b\d+(\.\d+)?\s*(mg|mcg|ml)\s+(per day|a day|daily|twice|once|every)\b|\brecommended dos(e|age) for you\b",
    )
    .expect("PRESCRIPTIVE_ADVICE is a valid regex pattern")
});

fn prescriptive_advice(question: &Question) -> RuleOutcome {
    if PRESCRIPTIVE_ADVICE.is_match(&question.combined_text()) {
        RuleOutcome::Reject("gives prescriptive medical advice".to_string())
    } else {
        RuleOutcome::Pass
    }
}
