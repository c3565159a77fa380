use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::{domain::GenerationRequest, dto::request::GenerateQuestionsRequestDto},
};

#[post("/api/questions/generate")]
pub async fn generate_questions(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuestionsRequestDto>,
) -> Result<HttpResponse, AppError> {
    let dto = request.into_inner();
    dto.validate()?;

    let request = GenerationRequest::from(dto);
    let outcome = state.orchestrator.generate(&request).await?;
    Ok(HttpResponse::Ok().json(outcome))
}
