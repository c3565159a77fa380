use std::fmt::Write as _;

use crate::{
    constants::prompts::{
        subject_template, EXAMPLE_END, EXAMPLE_START, FORMAT_RULES, OPEN_RESPONSE_NOTE,
        OUTPUT_CONTRACT, PATTERN_INTRO,
    },
    models::domain::{
        question::OPTION_LETTERS, Pattern, QuestionType, StrategyKind, SubjectCategory,
    },
    services::orchestrator_steps::generation_strategies::step_for,
};

/// Inputs shared by every prompt variant.
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub content: &'a str,
    pub count: usize,
    pub subject: SubjectCategory,
    pub topic_name: &'a str,
    pub type_sequence: Option<&'a [QuestionType]>,
    pub pattern: Option<&'a Pattern>,
}

impl<'a> PromptInput<'a> {
    pub fn new(
        content: &'a str,
        count: usize,
        subject: SubjectCategory,
        topic_name: &'a str,
    ) -> Self {
        Self {
            content,
            count,
            subject,
            topic_name,
            type_sequence: None,
            pattern: None,
        }
    }

    pub fn with_type_sequence(mut self, sequence: &'a [QuestionType]) -> Self {
        self.type_sequence = Some(sequence);
        self
    }

    pub fn with_pattern(mut self, pattern: Option<&'a Pattern>) -> Self {
        self.pattern = pattern;
        self
    }
}

pub struct PromptBuilder;

impl PromptBuilder {
    /// Builds the prompt for a strategy. The basic strategy never calls a
    /// provider; asking for its prompt yields the simplified variant. A
    /// pattern-based request without a pattern falls back to the
    /// subject-context template.
    pub fn build(kind: StrategyKind, input: &PromptInput<'_>) -> String {
        let budget = step_for(kind).content_budget;
        match kind {
            StrategyKind::SubjectContext => Self::subject_context(input, budget),
            StrategyKind::Conservative => Self::conservative(input, budget),
            StrategyKind::Simplified | StrategyKind::Basic => {
                Self::simplified(input, step_for(StrategyKind::Simplified).content_budget)
            }
            StrategyKind::PatternBased => match input.pattern {
                Some(pattern) => Self::pattern_based(input, pattern, budget),
                None => Self::subject_context(input, budget),
            },
        }
    }

    fn subject_context(input: &PromptInput<'_>, budget: usize) -> String {
        let template = subject_template(input.subject);
        let mut prompt = String::new();

        let _ = writeln!(prompt, "{}", template.role);
        let _ = writeln!(
            prompt,
            "Create exactly {} {} questions about \"{}\" based only on the study material below.",
            input.count,
            input.subject.display_name(),
            topic_or_default(input.topic_name),
        );
        prompt.push('\n');
        prompt.push_str("SUBJECT GUIDELINES:\n");
        for line in template.guidance {
            let _ = writeln!(prompt, "- {}", line);
        }

        if let Some(sequence) = input.type_sequence.filter(|s| !s.is_empty()) {
            prompt.push('\n');
            prompt.push_str("QUESTION MIX (in order):\n");
            for (index, question_type) in sequence.iter().enumerate() {
                let label = match question_type {
                    QuestionType::MultipleChoice => "multiple choice",
                    QuestionType::TextBased => "open response",
                };
                let _ = writeln!(prompt, "{}. {}", index + 1, label);
            }
            let _ = writeln!(prompt, "{}", OPEN_RESPONSE_NOTE);
        }

        push_material(&mut prompt, input.content, budget);
        push_contract(&mut prompt, input.subject);
        push_closing(&mut prompt, input.count);
        prompt
    }

    fn conservative(input: &PromptInput<'_>, budget: usize) -> String {
        let template = subject_template(input.subject);
        let mut prompt = String::new();

        let _ = writeln!(
            prompt,
            "Write {} clear, factual multiple-choice questions about \"{}\" using only the material below.",
            input.count,
            topic_or_default(input.topic_name),
        );
        prompt.push_str("Keep each question short and unambiguous, with one clearly correct option.\n");
        for line in template.guidance.iter().take(2) {
            let _ = writeln!(prompt, "- {}", line);
        }

        push_material(&mut prompt, input.content, budget);
        push_contract(&mut prompt, input.subject);
        push_closing(&mut prompt, input.count);
        prompt
    }

    fn simplified(input: &PromptInput<'_>, budget: usize) -> String {
        let mut prompt = String::new();

        let _ = writeln!(
            prompt,
            "Write {} multiple-choice questions from this text.",
            input.count
        );
        push_material(&mut prompt, input.content, budget);

        prompt.push_str("\nFORMAT:\n");
        prompt.push_str(OUTPUT_CONTRACT);
        prompt.push_str("\n\n");
        push_example(&mut prompt, input.subject);
        push_closing(&mut prompt, input.count);
        prompt
    }

    fn pattern_based(input: &PromptInput<'_>, pattern: &Pattern, budget: usize) -> String {
        let template = subject_template(input.subject);
        let mut prompt = String::new();

        let _ = writeln!(prompt, "{}", template.role);
        let _ = writeln!(
            prompt,
            "Create exactly {} questions about \"{}\" based only on the study material below.",
            input.count,
            topic_or_default(input.topic_name),
        );
        prompt.push('\n');
        let _ = writeln!(prompt, "{}", PATTERN_INTRO);
        prompt.push_str(&render_pattern(pattern));
        prompt.push('\n');

        prompt.push_str("\nSUBJECT GUIDELINES:\n");
        for line in template.guidance {
            let _ = writeln!(prompt, "- {}", line);
        }

        push_material(&mut prompt, input.content, budget);
        push_contract(&mut prompt, input.subject);
        push_closing(&mut prompt, input.count);
        prompt
    }

    /// The worked example embedded in every prompt for a subject.
    pub fn example_block(subject: SubjectCategory) -> &'static str {
        subject_template(subject).example
    }

    /// Extracts the worked example from a built prompt.
    pub fn extract_example(prompt: &str) -> Option<&str> {
        let start = prompt.find(EXAMPLE_START)? + EXAMPLE_START.len();
        let end = start + prompt[start..].find(EXAMPLE_END)?;
        Some(prompt[start..end].trim())
    }
}

/// First `max_chars` characters of the material, cut on a char boundary.
pub fn truncate_content(content: &str, max_chars: usize) -> String {
    let content = content.trim();
    match content.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", content[..byte_index].trim_end()),
        None => content.to_string(),
    }
}

fn topic_or_default(topic_name: &str) -> &str {
    let topic = topic_name.trim();
    if topic.is_empty() {
        "the material"
    } else {
        topic
    }
}

fn push_material(prompt: &mut String, content: &str, budget: usize) {
    prompt.push_str("\nSTUDY MATERIAL:\n");
    prompt.push_str(&truncate_content(content, budget));
    prompt.push('\n');
}

fn push_contract(prompt: &mut String, subject: SubjectCategory) {
    prompt.push_str("\nOUTPUT FORMAT (follow exactly):\n");
    prompt.push_str(OUTPUT_CONTRACT);
    prompt.push_str("\n\nRULES:\n");
    prompt.push_str(FORMAT_RULES);
    prompt.push_str("\n\n");
    push_example(prompt, subject);
}

fn push_example(prompt: &mut String, subject: SubjectCategory) {
    let _ = writeln!(prompt, "{}", EXAMPLE_START);
    let _ = writeln!(prompt, "{}", PromptBuilder::example_block(subject));
    let _ = writeln!(prompt, "{}", EXAMPLE_END);
}

fn push_closing(prompt: &mut String, count: usize) {
    let _ = write!(
        prompt,
        "\nNow write all {} questions, starting with QUESTION 1:",
        count
    );
}

fn render_pattern(pattern: &Pattern) -> String {
    let mut rendered = format!("\"{}\"", pattern.question_text);
    if let Some(options) = &pattern.options {
        for (letter, option) in OPTION_LETTERS.iter().zip(options) {
            let _ = write!(rendered, "\n{}) {}", letter, option);
        }
    }
    rendered
}
