use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    config::GenerationSettings,
    errors::{AppError, AppResult, ProviderError},
    models::domain::{
        AttemptSummary, GenerationOutcome, GenerationRequest, Question, QuestionType,
        StrategyKind, SubjectCategory,
    },
    services::{
        model_service::{CompletionOptions, CompletionProvider},
        orchestrator_steps::{
            basic_extraction,
            generation_strategies::{step_for_attempt, GenerationStep},
        },
        pattern_store::PatternStore,
        prompt_builder::{PromptBuilder, PromptInput},
        question_type_distributor::QuestionTypeDistributor,
        response_parser::ResponseParser,
        validation::{general_rules::multiple_choice_structure, Validator},
    },
};

const ATTEMPT_GROWTH: f64 = 0.2;
const MAX_BATCH_FACTOR: usize = 3;

/// Candidates `needed` questions should be asked for on a given attempt,
/// inflated for expected rejections and never more than three times `needed`.
pub fn compute_batch_size(needed: usize, attempt: u32, subject: SubjectCategory) -> usize {
    let attempt_multiplier = 1.0 + f64::from(attempt.saturating_sub(1)) * ATTEMPT_GROWTH;
    let raw = needed as f64 * subject.batch_multiplier() * attempt_multiplier;
    // 5 × 1.2 must come out as 6, not 7.
    let rounded = (raw * 1e6).round() / 1e6;
    (rounded.ceil() as usize).min(needed.saturating_mul(MAX_BATCH_FACTOR))
}

/// Converts items to open-response by position where the sequence asks for it.
/// Items whose parsed options are malformed stay multiple-choice so that
/// validation still rejects them.
pub fn apply_type_sequence(questions: Vec<Question>, sequence: &[QuestionType]) -> Vec<Question> {
    questions
        .into_iter()
        .enumerate()
        .map(|(index, question)| match sequence.get(index) {
            Some(QuestionType::TextBased)
                if !multiple_choice_structure(&question).is_reject() =>
            {
                question.into_text_based()
            }
            _ => question,
        })
        .collect()
}

/// Candidates produced by one attempt, plus the provider failure if the
/// attempt had one.
struct StrategyYield {
    candidates: Vec<Question>,
    provider_error: Option<ProviderError>,
}

/// The count-guarantee loop: runs up to `max_attempts` strategies in order
/// until the requested number of valid questions has been collected.
pub struct GenerationOrchestrator {
    provider: Arc<dyn CompletionProvider>,
    pattern_store: Arc<PatternStore>,
    settings: GenerationSettings,
}

impl GenerationOrchestrator {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        pattern_store: Arc<PatternStore>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            provider,
            pattern_store,
            settings,
        }
    }

    pub fn pattern_store(&self) -> &Arc<PatternStore> {
        &self.pattern_store
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    fn check_preconditions(&self, request: &GenerationRequest) -> AppResult<()> {
        request.validate()?;

        let content_chars = request.content.trim().chars().count();
        if content_chars < self.settings.min_content_chars {
            return Err(AppError::ValidationError(format!(
                "content must be at least {} characters, got {}",
                self.settings.min_content_chars, content_chars
            )));
        }

        if request.requested_count > self.settings.max_requested_count {
            return Err(AppError::ValidationError(format!(
                "requested count {} exceeds the maximum of {}",
                request.requested_count, self.settings.max_requested_count
            )));
        }

        Ok(())
    }

    /// Runs the attempt loop. Only precondition failures are returned as
    /// errors; provider failures and rejected candidates just cost an attempt.
    pub async fn generate(&self, request: &GenerationRequest) -> AppResult<GenerationOutcome> {
        self.check_preconditions(request)?;

        let run_id = Uuid::new_v4();
        let requested = request.requested_count;
        let subject = request.subject;

        log::info!(
            "[{}] Generating {} {} question(s) for topic '{}'",
            run_id,
            requested,
            subject,
            request.topic_name
        );

        let mut accepted: Vec<Question> = Vec::with_capacity(requested);
        let mut seen: HashSet<String> = HashSet::new();
        let mut attempts = Vec::new();
        let mut attempt = 0;

        while accepted.len() < requested && attempt < self.settings.max_attempts {
            attempt += 1;
            let needed = requested - accepted.len();
            let batch_size = compute_batch_size(needed, attempt, subject);
            let step = step_for_attempt(attempt);

            let StrategyYield {
                candidates,
                provider_error,
            } = self.run_strategy(&step, request, batch_size).await;
            let parsed = candidates.len();

            let report = Validator::review_all(candidates, subject);
            let rejected = report.rejections.len();
            let mut newly_accepted = 0;
            for question in report.accepted {
                if seen.insert(question.dedup_key()) {
                    accepted.push(question);
                    newly_accepted += 1;
                }
            }

            match &provider_error {
                Some(err) => log::warn!(
                    "[{}] Attempt {}/{} ({}, batch {}) provider failed: {}",
                    run_id,
                    attempt,
                    self.settings.max_attempts,
                    step.label(),
                    batch_size,
                    err
                ),
                None => log::info!(
                    "[{}] Attempt {}/{} ({}, batch {}): parsed {}, accepted {}, rejected {}, flagged {}",
                    run_id,
                    attempt,
                    self.settings.max_attempts,
                    step.label(),
                    batch_size,
                    parsed,
                    newly_accepted,
                    rejected,
                    report.flagged
                ),
            }

            attempts.push(AttemptSummary {
                attempt,
                strategy: step.kind,
                batch_size,
                parsed,
                accepted: newly_accepted,
                provider_error: provider_error.map(|err| err.to_string()),
            });
        }

        accepted.truncate(requested);
        let met_count = accepted.len() == requested;

        if met_count {
            log::info!(
                "[{}] Delivered {} question(s) in {} attempt(s)",
                run_id,
                accepted.len(),
                attempt
            );
        } else {
            log::warn!(
                "[{}] Delivered {} of {} question(s) after {} attempt(s)",
                run_id,
                accepted.len(),
                requested,
                attempt
            );
        }

        if !accepted.is_empty() {
            self.pattern_store.store(subject, &accepted).await;
        }

        Ok(GenerationOutcome {
            run_id,
            questions: accepted,
            requested_count: requested,
            attempts_used: attempt,
            met_count,
            attempts,
        })
    }

    /// Plain list of questions, for callers that do not need the attempt log.
    pub async fn generate_questions(
        &self,
        content: &str,
        requested_count: usize,
        subject: SubjectCategory,
        topic_name: &str,
    ) -> AppResult<Vec<Question>> {
        let request = GenerationRequest::new(content, requested_count, subject, topic_name);
        Ok(self.generate(&request).await?.questions)
    }

    async fn run_strategy(
        &self,
        step: &GenerationStep,
        request: &GenerationRequest,
        batch_size: usize,
    ) -> StrategyYield {
        if !step.kind.uses_provider() {
            return StrategyYield {
                candidates: basic_extraction::extract_questions(&request.content, batch_size),
                provider_error: None,
            };
        }

        let pattern = match step.kind {
            StrategyKind::PatternBased => self.pattern_store.get_random(request.subject).await,
            _ => None,
        };

        // Pattern-based without a pattern reuses the subject-context template,
        // type mix included.
        let type_sequence = match (step.kind, &pattern) {
            (StrategyKind::SubjectContext, _) | (StrategyKind::PatternBased, None) => {
                Some(QuestionTypeDistributor::sequence(request.subject, batch_size))
            }
            _ => None,
        };

        let mut input = PromptInput::new(
            &request.content,
            batch_size,
            request.subject,
            &request.topic_name,
        )
        .with_pattern(pattern.as_ref());
        if let Some(sequence) = type_sequence.as_deref() {
            input = input.with_type_sequence(sequence);
        }

        let prompt = PromptBuilder::build(step.kind, &input);
        let options = CompletionOptions {
            temperature: step.temperature,
            max_output_tokens: step.max_output_tokens(batch_size),
            stop_sequences: step.stop_sequences(batch_size),
        };

        match self.complete_with_timeout(&prompt, &options).await {
            Ok(completion) => {
                let parsed = ResponseParser::parse(&completion, batch_size);
                let candidates = match type_sequence {
                    Some(sequence) => apply_type_sequence(parsed, &sequence),
                    None => parsed,
                };
                StrategyYield {
                    candidates,
                    provider_error: None,
                }
            }
            Err(err) => StrategyYield {
                candidates: Vec::new(),
                provider_error: Some(err),
            },
        }
    }

    async fn complete_with_timeout(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, ProviderError> {
        match tokio::time::timeout(
            self.settings.provider_timeout(),
            self.provider.complete(prompt, options),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.settings.provider_timeout_seconds)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use super::*;
    use crate::{
        config::Config,
        services::model_service::MockCompletionProvider,
        test_utils::{sample_multiple_choice, science_passage, well_formed_block, well_formed_completion},
    };

    fn orchestrator(mock: MockCompletionProvider) -> GenerationOrchestrator {
        GenerationOrchestrator::new(
            Arc::new(mock),
            Arc::new(PatternStore::default()),
            Config::test_config().generation,
        )
    }

    fn request(count: usize, subject: SubjectCategory) -> GenerationRequest {
        GenerationRequest::new(science_passage(), count, subject, "Forces and motion")
    }

    #[test]
    fn batch_size_follows_subject_and_attempt_multipliers() {
        assert_eq!(compute_batch_size(5, 1, SubjectCategory::NaturalSciences), 7);
        assert_eq!(compute_batch_size(4, 1, SubjectCategory::Mathematics), 6);
        assert_eq!(compute_batch_size(5, 1, SubjectCategory::Business), 6);
        assert_eq!(compute_batch_size(10, 3, SubjectCategory::History), 19);
        assert_eq!(compute_batch_size(0, 2, SubjectCategory::Other), 0);
    }

    #[test]
    fn batch_size_is_capped_at_three_times_needed() {
        assert_eq!(compute_batch_size(1, 12, SubjectCategory::Mathematics), 3);
        assert_eq!(compute_batch_size(2, 5, SubjectCategory::Mathematics), 6);
    }

    #[test]
    fn batch_size_never_shrinks_across_attempts() {
        for subject in SubjectCategory::ALL {
            for needed in 1..=20 {
                let sizes: Vec<usize> = (1..=8)
                    .map(|attempt| compute_batch_size(needed, attempt, subject))
                    .collect();
                assert!(
                    sizes.windows(2).all(|pair| pair[0] <= pair[1]),
                    "{subject} needed={needed}: {sizes:?}"
                );
                assert!(sizes.iter().all(|&size| size >= needed));
            }
        }
    }

    #[test]
    fn type_sequence_converts_by_position() {
        let questions = vec![
            sample_multiple_choice("First sample question?"),
            sample_multiple_choice("Second sample question?"),
            sample_multiple_choice("Third sample question?"),
        ];
        let converted = apply_type_sequence(
            questions,
            &[QuestionType::MultipleChoice, QuestionType::TextBased],
        );

        assert!(converted[0].is_multiple_choice());
        assert_eq!(converted[1].question_type, QuestionType::TextBased);
        assert_eq!(converted[1].answer_text, "Gamma");
        assert!(converted[2].is_multiple_choice());
    }

    #[test]
    fn malformed_options_are_not_hidden_by_conversion() {
        let duplicated = Question::multiple_choice(
            "Which unit measures force?",
            vec![
                "Newton".to_string(),
                "newton".to_string(),
                "Joule".to_string(),
                "Watt".to_string(),
            ],
            0,
            "Force is measured in newtons.",
        );
        let converted = apply_type_sequence(vec![duplicated], &[QuestionType::TextBased]);

        assert!(converted[0].is_multiple_choice());
        assert!(Validator::validate_all(converted, SubjectCategory::NaturalSciences).is_empty());
    }

    #[tokio::test]
    async fn first_attempt_meeting_the_count_stops_the_loop() {
        let mut mock = MockCompletionProvider::new();
        mock.expect_complete()
            .withf(|_, options| {
                (options.temperature - 0.7).abs() < f32::EPSILON
                    && options.stop_sequences == vec!["QUESTION 8:".to_string()]
            })
            .times(1)
            .returning(|_, _| Ok(well_formed_completion(5)));
        let orchestrator = orchestrator(mock);

        let outcome = orchestrator
            .generate(&request(5, SubjectCategory::NaturalSciences))
            .await
            .unwrap();

        assert_eq!(outcome.questions.len(), 5);
        assert!(outcome.met_count);
        assert_eq!(outcome.attempts_used, 1);
        assert_eq!(outcome.attempts[0].batch_size, 7);
        assert_eq!(outcome.attempts[0].strategy, StrategyKind::SubjectContext);
    }

    #[tokio::test]
    async fn never_returns_more_than_requested() {
        let mut mock = MockCompletionProvider::new();
        mock.expect_complete()
            .times(1)
            .returning(|_, _| Ok(well_formed_completion(10)));
        let orchestrator = orchestrator(mock);

        let outcome = orchestrator
            .generate(&request(2, SubjectCategory::Business))
            .await
            .unwrap();

        assert_eq!(outcome.questions.len(), 2);
        assert!(outcome.met_count);
    }

    #[tokio::test]
    async fn wrong_arithmetic_forces_a_conservative_attempt() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut mock = MockCompletionProvider::new();
        mock.expect_complete().returning(move |_, _| {
            let call = counter.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                Ok(format!(
                    "QUESTION 1:\n{}\n\nQUESTION 2:\nWhat is five groups of four?\nA) 18\nB) 20\nC) 24\nD) 9\nCORRECT: A\nEXPLANATION: 5 × 4 = 18",
                    well_formed_block(1)
                ))
            } else {
                Ok(format!("QUESTION 1:\n{}", well_formed_block(2)))
            }
        });
        let orchestrator = orchestrator(mock);

        let outcome = orchestrator
            .generate(&request(2, SubjectCategory::Mathematics))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(outcome.attempts[0].parsed, 2);
        assert_eq!(outcome.attempts[0].accepted, 1);
        assert_eq!(outcome.attempts[1].strategy, StrategyKind::Conservative);
        assert_eq!(outcome.questions.len(), 2);
        assert!(outcome
            .questions
            .iter()
            .all(|q| !q.explanation.contains("5 × 4 = 18")));
    }

    #[tokio::test]
    async fn provider_failures_fall_through_to_basic_extraction() {
        let mut mock = MockCompletionProvider::new();
        mock.expect_complete()
            .times(4)
            .returning(|_, _| Err(ProviderError::Connection("refused".to_string())));
        let orchestrator = orchestrator(mock);

        let outcome = orchestrator
            .generate(&request(3, SubjectCategory::NaturalSciences))
            .await
            .unwrap();

        assert_eq!(outcome.attempts_used, 5);
        assert_eq!(outcome.attempts[4].strategy, StrategyKind::Basic);
        assert!(outcome.attempts[..4]
            .iter()
            .all(|a| a.provider_error.as_deref() == Some("connection failed: refused")));
        assert_eq!(outcome.questions.len(), 3);
        assert!(outcome.met_count);
    }

    #[tokio::test]
    async fn malformed_output_and_short_sentences_yield_nothing() {
        let mut mock = MockCompletionProvider::new();
        mock.expect_complete().times(4).returning(|_, _| {
            Ok("QUESTION 1:\nWhich planet is largest?\nA) Mars\nB) Jupiter\nC) Venus\nD) Earth\nEXPLANATION: Jupiter.".to_string())
        });
        let orchestrator = orchestrator(mock);
        let content = "Cells divide. Atoms bond. Stars shine. Rivers flow. Winds blow. Seeds grow.";

        let outcome = orchestrator
            .generate(&GenerationRequest::new(content, 3, SubjectCategory::NaturalSciences, "Nature"))
            .await
            .unwrap();

        assert!(outcome.questions.is_empty());
        assert!(!outcome.met_count);
        assert_eq!(outcome.attempts_used, 5);
        assert!(orchestrator
            .pattern_store()
            .get_all(SubjectCategory::NaturalSciences)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn repeated_questions_are_not_accepted_twice() {
        let mut mock = MockCompletionProvider::new();
        mock.expect_complete()
            .returning(|_, _| Ok(well_formed_completion(2)));
        let orchestrator = orchestrator(mock);

        let outcome = orchestrator
            .generate(&request(4, SubjectCategory::Business))
            .await
            .unwrap();

        assert_eq!(outcome.attempts[0].accepted, 2);
        assert_eq!(outcome.attempts[1].accepted, 0);
        let keys: HashSet<String> = outcome.questions.iter().map(Question::dedup_key).collect();
        assert_eq!(keys.len(), outcome.questions.len());
    }

    #[tokio::test]
    async fn pattern_attempt_embeds_a_stored_pattern() {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let recorded = prompts.clone();

        let mut mock = MockCompletionProvider::new();
        mock.expect_complete().returning(move |prompt, _| {
            recorded.lock().unwrap().push(prompt.to_string());
            Ok("nothing usable".to_string())
        });
        let orchestrator = orchestrator(mock);
        orchestrator
            .pattern_store()
            .store(
                SubjectCategory::Business,
                &[sample_multiple_choice("Which option was retained from a past run?")],
            )
            .await;

        orchestrator
            .generate(&request(1, SubjectCategory::Business))
            .await
            .unwrap();

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 4);
        assert!(!prompts[0].contains("retained from a past run"));
        assert!(prompts[3].contains("Which option was retained from a past run?"));
    }

    #[tokio::test]
    async fn accepted_questions_are_retained_as_patterns() {
        let mut mock = MockCompletionProvider::new();
        mock.expect_complete()
            .returning(|_, _| Ok(well_formed_completion(3)));
        let orchestrator = orchestrator(mock);

        orchestrator
            .generate(&request(3, SubjectCategory::History))
            .await
            .unwrap();

        assert_eq!(
            orchestrator
                .pattern_store()
                .get_all(SubjectCategory::History)
                .await
                .len(),
            3
        );
    }

    #[tokio::test]
    async fn preconditions_fail_before_any_attempt() {
        let orchestrator = orchestrator(MockCompletionProvider::new());

        let short = GenerationRequest::new("Too short.", 3, SubjectCategory::Other, "t");
        assert!(matches!(
            orchestrator.generate(&short).await,
            Err(AppError::ValidationError(_))
        ));

        assert!(matches!(
            orchestrator.generate(&request(0, SubjectCategory::Other)).await,
            Err(AppError::ValidationError(_))
        ));

        assert!(matches!(
            orchestrator.generate(&request(51, SubjectCategory::Other)).await,
            Err(AppError::ValidationError(_))
        ));
    }

    struct StalledProvider;

    #[async_trait::async_trait]
    impl CompletionProvider for StalledProvider {
        fn name(&self) -> String {
            "stalled".to_string()
        }

        async fn complete(
            &self,
            _prompt: &str,
            _options: &CompletionOptions,
        ) -> Result<String, ProviderError> {
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn slow_provider_counts_as_a_timed_out_attempt() {
        let mut settings = Config::test_config().generation;
        settings.max_attempts = 1;
        settings.provider_timeout_seconds = 1;
        let orchestrator = GenerationOrchestrator::new(
            Arc::new(StalledProvider),
            Arc::new(PatternStore::default()),
            settings,
        );

        let outcome = orchestrator
            .generate(&request(2, SubjectCategory::Other))
            .await
            .unwrap();

        assert!(outcome.questions.is_empty());
        assert_eq!(
            outcome.attempts[0].provider_error.as_deref(),
            Some("request timed out after 1s")
        );
    }
}
