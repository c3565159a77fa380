use std::fmt;

use serde::{Deserialize, Serialize};

/// Subject a piece of study material belongs to. Drives prompt template,
/// validation rules, batch-size multiplier and question-type ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubjectCategory {
    Mathematics,
    NaturalSciences,
    Literature,
    History,
    ComputerScience,
    Languages,
    Business,
    Arts,
    HealthMedicine,
    Other,
}

impl SubjectCategory {
    pub const ALL: [SubjectCategory; 10] = [
        SubjectCategory::Mathematics,
        SubjectCategory::NaturalSciences,
        SubjectCategory::Literature,
        SubjectCategory::History,
        SubjectCategory::ComputerScience,
        SubjectCategory::Languages,
        SubjectCategory::Business,
        SubjectCategory::Arts,
        SubjectCategory::HealthMedicine,
        SubjectCategory::Other,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            SubjectCategory::Mathematics => "mathematics",
            SubjectCategory::NaturalSciences => "natural-sciences",
            SubjectCategory::Literature => "literature",
            SubjectCategory::History => "history",
            SubjectCategory::ComputerScience => "computer-science",
            SubjectCategory::Languages => "languages",
            SubjectCategory::Business => "business",
            SubjectCategory::Arts => "arts",
            SubjectCategory::HealthMedicine => "health-medicine",
            SubjectCategory::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SubjectCategory::Mathematics => "Mathematics",
            SubjectCategory::NaturalSciences => "Natural Sciences",
            SubjectCategory::Literature => "Literature",
            SubjectCategory::History => "History",
            SubjectCategory::ComputerScience => "Computer Science",
            SubjectCategory::Languages => "Languages",
            SubjectCategory::Business => "Business",
            SubjectCategory::Arts => "Arts",
            SubjectCategory::HealthMedicine => "Health & Medicine",
            SubjectCategory::Other => "Other",
        }
    }

    /// Exact lookup by identifier, ignoring case and `_`/`-` spelling.
    pub fn parse_id(id: &str) -> Option<Self> {
        let id = id.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL.iter().copied().find(|subject| subject.id() == id)
    }

    /// Like `parse_id`, but unknown ids map to `Other` so callers always get
    /// the general rules.
    pub fn from_id(id: &str) -> Self {
        Self::parse_id(id).unwrap_or(SubjectCategory::Other)
    }

    /// Over-generation factor applied to every batch for this subject.
    pub fn batch_multiplier(&self) -> f64 {
        match self {
            SubjectCategory::Mathematics => 1.5,
            SubjectCategory::NaturalSciences => 1.4,
            SubjectCategory::Literature | SubjectCategory::History => 1.3,
            _ => 1.2,
        }
    }
}

impl fmt::Display for SubjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_id_round_trips_every_subject() {
        for subject in SubjectCategory::ALL {
            assert_eq!(SubjectCategory::from_id(subject.id()), subject);
        }
    }

    #[test]
    fn from_id_accepts_loose_spelling_and_defaults_to_other() {
        assert_eq!(
            SubjectCategory::from_id(" Computer_Science "),
            SubjectCategory::ComputerScience
        );
        assert_eq!(SubjectCategory::from_id("astrology"), SubjectCategory::Other);
        assert_eq!(SubjectCategory::parse_id("astrology"), None);
    }

    #[test]
    fn serde_uses_kebab_case_ids() {
        let json = serde_json::to_string(&SubjectCategory::HealthMedicine).unwrap();
        assert_eq!(json, "\"health-medicine\"");

        let parsed: SubjectCategory = serde_json::from_str("\"natural-sciences\"").unwrap();
        assert_eq!(parsed, SubjectCategory::NaturalSciences);
    }

    #[test]
    fn batch_multipliers_follow_subject_table() {
        assert_eq!(SubjectCategory::Mathematics.batch_multiplier(), 1.5);
        assert_eq!(SubjectCategory::NaturalSciences.batch_multiplier(), 1.4);
        assert_eq!(SubjectCategory::History.batch_multiplier(), 1.3);
        assert_eq!(SubjectCategory::Business.batch_multiplier(), 1.2);
    }
}
