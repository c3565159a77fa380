pub mod generation_orchestrator;
pub mod model_service;
pub mod orchestrator_steps;
pub mod pattern_store;
pub mod prompt_builder;
pub mod providers;
pub mod question_type_distributor;
pub mod response_parser;
pub mod validation;
