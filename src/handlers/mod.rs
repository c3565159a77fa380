pub mod generation_handler;
pub mod health_handler;
pub mod pattern_handler;

use actix_web::web;

pub use generation_handler::generate_questions;
pub use health_handler::health_check;
pub use pattern_handler::{export_patterns, import_patterns, pattern_stats, prune_patterns};

/// Registers every route on an app or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(generate_questions)
        .service(pattern_stats)
        .service(export_patterns)
        .service(import_patterns)
        .service(prune_patterns);
}
