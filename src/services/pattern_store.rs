use std::collections::{BTreeMap, HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::models::domain::{Pattern, Question, SubjectCategory};

pub const DEFAULT_PATTERN_CAPACITY: usize = 20;
pub const EXPORT_VERSION: &str = "1.0";

/// Bulk transfer format for backup and restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternExport {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub patterns: BTreeMap<String, Vec<Pattern>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectPatternStats {
    pub count: usize,
    pub average_length: f64,
    pub numeric_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternStats {
    pub total_patterns: usize,
    pub subjects: BTreeMap<String, SubjectPatternStats>,
}

/// Bounded per-subject history of accepted questions.
///
/// Each call is atomic on its own, but calls from concurrent generation runs
/// interleave freely: two runs storing for the same subject may evict each
/// other's entries in any order. Nothing depends on that ordering.
pub struct PatternStore {
    capacity: usize,
    patterns: RwLock<HashMap<String, VecDeque<Pattern>>>,
}

impl Default for PatternStore {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN_CAPACITY)
    }
}

impl PatternStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            patterns: RwLock::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn store(&self, subject: SubjectCategory, questions: &[Question]) {
        if questions.is_empty() {
            return;
        }
        let now = Utc::now();

        let mut patterns = self.patterns.write().await;
        let entries = patterns.entry(subject.id().to_string()).or_default();
        for question in questions {
            entries.push_back(Pattern::from_question(question, now));
        }
        while entries.len() > self.capacity {
            entries.pop_front();
        }

        log::debug!(
            "Stored {} patterns for {} ({} retained)",
            questions.len(),
            subject,
            entries.len()
        );
    }

    /// Oldest first.
    pub async fn get_all(&self, subject: SubjectCategory) -> Vec<Pattern> {
        let patterns = self.patterns.read().await;
        patterns
            .get(subject.id())
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn get_random(&self, subject: SubjectCategory) -> Option<Pattern> {
        let all = self.get_all(subject).await;
        all.choose(&mut rand::thread_rng()).cloned()
    }

    /// Drops patterns older than `max_age_days`; returns how many went.
    pub async fn prune(&self, subject: SubjectCategory, max_age_days: i64) -> usize {
        // An age beyond what a timestamp can express keeps everything.
        let Some(cutoff) = Duration::try_days(max_age_days.max(0))
            .and_then(|age| Utc::now().checked_sub_signed(age))
        else {
            return 0;
        };

        let mut patterns = self.patterns.write().await;
        let Some(entries) = patterns.get_mut(subject.id()) else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|pattern| pattern.created_at >= cutoff);
        let removed = before - entries.len();

        if entries.is_empty() {
            patterns.remove(subject.id());
        }
        if removed > 0 {
            log::info!("Pruned {} patterns for {}", removed, subject);
        }
        removed
    }

    pub async fn export(&self, subject: Option<SubjectCategory>) -> PatternExport {
        let patterns = self.patterns.read().await;
        let selected = patterns
            .iter()
            .filter(|(id, _)| subject.map_or(true, |s| s.id() == id.as_str()))
            .map(|(id, entries)| (id.clone(), entries.iter().cloned().collect()))
            .collect();

        PatternExport {
            version: EXPORT_VERSION.to_string(),
            exported_at: Utc::now(),
            patterns: selected,
        }
    }

    /// Merges exported patterns, keeping the newest `capacity` per subject.
    /// Unknown subject ids are filed under their canonical subject (or
    /// `other`). Returns the number of patterns read from `data`.
    pub async fn import(&self, data: PatternExport) -> usize {
        if data.version != EXPORT_VERSION {
            log::warn!(
                "Importing patterns with version {} (expected {})",
                data.version,
                EXPORT_VERSION
            );
        }

        let mut imported = 0;
        let mut patterns = self.patterns.write().await;
        for (id, incoming) in data.patterns {
            let key = SubjectCategory::from_id(&id).id().to_string();
            imported += incoming.len();

            let entries = patterns.entry(key).or_default();
            let mut merged: Vec<Pattern> = entries.drain(..).chain(incoming).collect();
            merged.sort_by_key(|pattern| pattern.created_at);
            let skip = merged.len().saturating_sub(self.capacity);
            entries.extend(merged.into_iter().skip(skip));
        }

        log::info!("Imported {} patterns", imported);
        imported
    }

    pub async fn stats(&self, subject: Option<SubjectCategory>) -> PatternStats {
        let patterns = self.patterns.read().await;
        let mut subjects = BTreeMap::new();
        let mut total_patterns = 0;

        for (id, entries) in patterns.iter() {
            if subject.is_some_and(|s| s.id() != id.as_str()) || entries.is_empty() {
                continue;
            }
            let count = entries.len();
            let total_length: usize = entries.iter().map(|p| p.question_length).sum();
            let numeric = entries.iter().filter(|p| p.has_numbers).count();

            total_patterns += count;
            subjects.insert(
                id.clone(),
                SubjectPatternStats {
                    count,
                    average_length: total_length as f64 / count as f64,
                    numeric_percentage: numeric as f64 * 100.0 / count as f64,
                },
            );
        }

        PatternStats {
            total_patterns,
            subjects,
        }
    }
}
