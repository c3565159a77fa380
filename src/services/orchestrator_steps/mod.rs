pub mod basic_extraction;
pub mod generation_strategies;
