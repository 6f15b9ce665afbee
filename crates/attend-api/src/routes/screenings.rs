use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use serde::Deserialize;

use attend_core::models::demographics::DemographicInput;
use attend_core::models::questionnaire::QuestionnaireResponse;
use attend_export::render::{render_report, ReportContext};
use attend_instruments::screening::{screen, ScreeningResult};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

const DEFAULT_TITLE: &str = "ADHD screening report";

#[derive(Debug, Deserialize)]
pub struct ScreeningRequest {
    pub answers: QuestionnaireResponse,
    pub demographics: DemographicInput,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub answers: QuestionnaireResponse,
    pub demographics: DemographicInput,
    pub title: Option<String>,
    pub subject: Option<String>,
    /// Tera template replacing the built-in one.
    pub template: Option<String>,
}

pub async fn create_screening(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ScreeningRequest>,
) -> Result<ApiJson<ScreeningResult>, ApiError> {
    let profile = request.demographics.validate()?;
    let result = screen(&request.answers, &profile, &state.rules)?;
    Ok(ApiJson(result))
}

pub async fn create_report(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = request.demographics.validate()?;
    let result = screen(&request.answers, &profile, &state.rules)?;

    let mut context = ReportContext::new(request.title.as_deref().unwrap_or(DEFAULT_TITLE));
    context.subject = request.subject;
    context.demographics = Some(profile);

    let markdown = render_report(&result, &context, request.template.as_deref())?;
    Ok(([(header::CONTENT_TYPE, "text/markdown; charset=utf-8")], markdown))
}
