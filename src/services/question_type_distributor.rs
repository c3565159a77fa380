use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

use crate::models::domain::{QuestionType, SubjectCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeDistribution {
    pub multiple_choice: usize,
    pub text_based: usize,
}

pub struct QuestionTypeDistributor;

impl QuestionTypeDistributor {
    /// Share of multiple-choice questions for a subject.
    pub fn multiple_choice_ratio(subject: SubjectCategory) -> f64 {
        match subject {
            SubjectCategory::Mathematics => 0.7,
            SubjectCategory::NaturalSciences => 0.7,
            SubjectCategory::Literature => 0.4,
            SubjectCategory::History => 0.5,
            SubjectCategory::ComputerScience => 0.8,
            SubjectCategory::Arts => 0.5,
            SubjectCategory::HealthMedicine => 0.7,
            SubjectCategory::Languages | SubjectCategory::Business | SubjectCategory::Other => 0.6,
        }
    }

    pub fn distribution(subject: SubjectCategory, total_count: usize) -> TypeDistribution {
        let ratio = Self::multiple_choice_ratio(subject);
        let multiple_choice = ((total_count as f64) * ratio).round() as usize;
        let multiple_choice = multiple_choice.min(total_count);

        TypeDistribution {
            multiple_choice,
            text_based: total_count - multiple_choice,
        }
    }

    pub fn sequence(subject: SubjectCategory, total_count: usize) -> Vec<QuestionType> {
        Self::sequence_with_rng(subject, total_count, &mut rand::thread_rng())
    }

    /// Shuffled type tags matching `distribution`. `SliceRandom::shuffle`
    /// is a Fisher-Yates shuffle.
    pub fn sequence_with_rng<R: Rng + ?Sized>(
        subject: SubjectCategory,
        total_count: usize,
        rng: &mut R,
    ) -> Vec<QuestionType> {
        let distribution = Self::distribution(subject, total_count);

        let mut sequence = Vec::with_capacity(total_count);
        sequence.extend(std::iter::repeat(QuestionType::MultipleChoice).take(distribution.multiple_choice));
        sequence.extend(std::iter::repeat(QuestionType::TextBased).take(distribution.text_based));
        sequence.shuffle(rng);
        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn distribution_follows_ratio_table() {
        let maths = QuestionTypeDistributor::distribution(SubjectCategory::Mathematics, 10);
        assert_eq!(maths, TypeDistribution { multiple_choice: 7, text_based: 3 });

        let literature = QuestionTypeDistributor::distribution(SubjectCategory::Literature, 10);
        assert_eq!(literature, TypeDistribution { multiple_choice: 4, text_based: 6 });

        let cs = QuestionTypeDistributor::distribution(SubjectCategory::ComputerScience, 10);
        assert_eq!(cs, TypeDistribution { multiple_choice: 8, text_based: 2 });

        let other = QuestionTypeDistributor::distribution(SubjectCategory::Other, 10);
        assert_eq!(other, TypeDistribution { multiple_choice: 6, text_based: 4 });
    }

    #[test]
    fn distribution_always_sums_to_total() {
        for subject in SubjectCategory::ALL {
            for total in 0..25 {
                let d = QuestionTypeDistributor::distribution(subject, total);
                assert_eq!(d.multiple_choice + d.text_based, total);
            }
        }
    }

    #[test]
    fn sequence_has_the_distribution_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        let sequence =
            QuestionTypeDistributor::sequence_with_rng(SubjectCategory::Mathematics, 10, &mut rng);

        assert_eq!(sequence.len(), 10);
        let mc = sequence
            .iter()
            .filter(|t| **t == QuestionType::MultipleChoice)
            .count();
        assert_eq!(mc, 7);
    }

    #[test]
    fn empty_sequence_for_zero_total() {
        assert!(QuestionTypeDistributor::sequence(SubjectCategory::Arts, 0).is_empty());
    }
}
