pub mod general_rules;
pub mod subject_rules;

use serde::Serialize;

use crate::models::domain::{Question, SubjectCategory};

pub use general_rules::GENERAL_RULES;
pub use subject_rules::rules_for;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Pass,
    /// Worth logging, but the question is kept.
    Flag(String),
    Reject(String),
}

impl RuleOutcome {
    pub fn is_reject(&self) -> bool {
        matches!(self, RuleOutcome::Reject(_))
    }
}

/// A named predicate over a parsed question.
#[derive(Clone, Copy)]
pub struct QuestionRule {
    pub name: &'static str,
    pub check: fn(&Question) -> RuleOutcome,
}

impl QuestionRule {
    pub const fn new(name: &'static str, check: fn(&Question) -> RuleOutcome) -> Self {
        Self { name, check }
    }

    pub fn apply(&self, question: &Question) -> RuleOutcome {
        (self.check)(question)
    }
}

impl std::fmt::Debug for QuestionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionRule").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub rule: &'static str,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted { flags: Vec<Rejection> },
    Rejected(Rejection),
}

/// Outcome of validating a batch.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub accepted: Vec<Question>,
    pub rejections: Vec<Rejection>,
    pub flagged: usize,
}

pub struct Validator;

impl Validator {
    /// Runs the general rules, then the subject's rules, stopping at the
    /// first rejection.
    pub fn validate(question: &Question, subject: SubjectCategory) -> Verdict {
        let mut flags = Vec::new();

        for rule in GENERAL_RULES.iter().chain(rules_for(subject)) {
            match rule.apply(question) {
                RuleOutcome::Pass => {}
                RuleOutcome::Flag(reason) => flags.push(Rejection {
                    rule: rule.name,
                    reason,
                }),
                RuleOutcome::Reject(reason) => {
                    return Verdict::Rejected(Rejection {
                        rule: rule.name,
                        reason,
                    })
                }
            }
        }

        Verdict::Accepted { flags }
    }

    pub fn review_all(questions: Vec<Question>, subject: SubjectCategory) -> ValidationReport {
        let mut report = ValidationReport::default();

        for question in questions {
            match Self::validate(&question, subject) {
                Verdict::Accepted { flags } => {
                    if !flags.is_empty() {
                        report.flagged += 1;
                        for flag in &flags {
                            log::debug!(
                                "Flagged {} question ({}): {}",
                                subject,
                                flag.rule,
                                flag.reason
                            );
                        }
                    }
                    report.accepted.push(question);
                }
                Verdict::Rejected(rejection) => {
                    log::debug!(
                        "Rejected {} question ({}): {}",
                        subject,
                        rejection.rule,
                        rejection.reason
                    );
                    report.rejections.push(rejection);
                }
            }
        }

        report
    }

    /// Keeps the questions that pass every applicable rule, unchanged and in
    /// order.
    pub fn validate_all(questions: Vec<Question>, subject: SubjectCategory) -> Vec<Question> {
        Self::review_all(questions, subject).accepted
    }
}
