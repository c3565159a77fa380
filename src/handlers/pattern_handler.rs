use actix_web::{delete, get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::{
        domain::SubjectCategory,
        dto::{
            request::{PatternQuery, PruneQuery},
            response::{ImportResponse, PruneResponse},
        },
    },
    services::pattern_store::PatternExport,
};

#[get("/api/patterns/stats")]
pub async fn pattern_stats(
    state: web::Data<AppState>,
    query: web::Query<PatternQuery>,
) -> Result<HttpResponse, AppError> {
    let stats = state.pattern_store.stats(query.subject()?).await;
    Ok(HttpResponse::Ok().json(stats))
}

#[get("/api/patterns/export")]
pub async fn export_patterns(
    state: web::Data<AppState>,
    query: web::Query<PatternQuery>,
) -> Result<HttpResponse, AppError> {
    let export = state.pattern_store.export(query.subject()?).await;
    Ok(HttpResponse::Ok().json(export))
}

#[post("/api/patterns/import")]
pub async fn import_patterns(
    state: web::Data<AppState>,
    data: web::Json<PatternExport>,
) -> Result<HttpResponse, AppError> {
    let imported = state.pattern_store.import(data.into_inner()).await;
    Ok(HttpResponse::Ok().json(ImportResponse { imported }))
}

#[delete("/api/patterns/{subject}")]
pub async fn prune_patterns(
    state: web::Data<AppState>,
    subject: web::Path<String>,
    query: web::Query<PruneQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let id = subject.into_inner();
    let subject = SubjectCategory::parse_id(&id)
        .ok_or_else(|| AppError::NotFound(format!("Subject '{}' not found", id)))?;
    let removed = state
        .pattern_store
        .prune(subject, query.max_age_days())
        .await;

    Ok(HttpResponse::Ok().json(PruneResponse {
        subject: subject.id().to_string(),
        removed,
    }))
}
