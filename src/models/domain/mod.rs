pub mod generation;
pub mod pattern;
pub mod question;
pub mod subject_category;
pub use generation::{AttemptSummary, GenerationOutcome, GenerationRequest, StrategyKind};
pub use pattern::Pattern;
pub use question::{Question, QuestionType};
pub use subject_category::SubjectCategory;
