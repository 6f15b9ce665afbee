use axum::extract::State;
use serde::Deserialize;

use attend_core::models::demographics::DemographicInput;
use attend_core::models::questionnaire::QuestionnaireResponse;
use attend_instruments::risk::RiskEstimate;
use attend_instruments::subscales::SubScaleScores;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Externally computed scores; they are range- and sum-checked before use.
#[derive(Debug, Deserialize)]
pub struct RiskRequest {
    pub scores: SubScaleScores,
    pub demographics: DemographicInput,
    pub answers: QuestionnaireResponse,
}

pub async fn estimate(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RiskRequest>,
) -> Result<ApiJson<RiskEstimate>, ApiError> {
    let profile = request.demographics.validate()?;
    let estimate = state.rules.estimate(&request.scores, &profile, &request.answers)?;
    Ok(ApiJson(estimate))
}
