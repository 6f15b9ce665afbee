use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use attend_core::models::demographics::DemographicInput;
use attend_core::models::session::{ScreeningSession, SessionStatus, SessionStore};
use attend_instruments::screening::{screen_submission, ScreeningResult};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnswerBody {
    pub answer: u8,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    session: SessionStatus,
    result: ScreeningResult,
}

fn session_mut(store: &mut SessionStore, id: Uuid) -> Result<&mut ScreeningSession, ApiError> {
    store
        .get_mut(&id)
        .ok_or_else(|| ApiError::NotFound(format!("session not found: {id}")))
}

pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, ApiJson<SessionStatus>) {
    let mut sessions = state.sessions.lock().await;
    let now = jiff::Timestamp::now();
    let expired = sessions.evict_expired(now);
    if expired > 0 {
        tracing::debug!(expired, "expired sessions evicted");
    }
    let session = sessions.open_at(now);
    tracing::info!(session_id = %session.id, "session opened");
    (StatusCode::CREATED, ApiJson(session.status()))
}

pub async fn get_session(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiJson<SessionStatus>, ApiError> {
    let sessions = state.sessions.lock().await;
    let session = sessions
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("session not found: {id}")))?;
    Ok(ApiJson(session.status()))
}

pub async fn delete_session(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut sessions = state.sessions.lock().await;
    sessions
        .remove(&id)
        .ok_or_else(|| ApiError::NotFound(format!("session not found: {id}")))?;
    tracing::info!(session_id = %id, "session discarded");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn record_answer(
    State(state): State<AppState>,
    ApiPath((id, question)): ApiPath<(Uuid, u8)>,
    ApiJson(body): ApiJson<AnswerBody>,
) -> Result<ApiJson<SessionStatus>, ApiError> {
    let mut sessions = state.sessions.lock().await;
    let session = session_mut(&mut sessions, id)?;
    session.record_answer(question, body.answer)?;
    Ok(ApiJson(session.status()))
}

pub async fn clear_answer(
    State(state): State<AppState>,
    ApiPath((id, question)): ApiPath<(Uuid, u8)>,
) -> Result<ApiJson<SessionStatus>, ApiError> {
    let mut sessions = state.sessions.lock().await;
    let session = session_mut(&mut sessions, id)?;
    session.clear_answer(question)?;
    Ok(ApiJson(session.status()))
}

pub async fn set_demographics(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<DemographicInput>,
) -> Result<ApiJson<SessionStatus>, ApiError> {
    let mut sessions = state.sessions.lock().await;
    let session = session_mut(&mut sessions, id)?;
    session.set_demographics(&input)?;
    Ok(ApiJson(session.status()))
}

pub async fn submit(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiJson<SubmitResponse>, ApiError> {
    let mut sessions = state.sessions.lock().await;
    let session = session_mut(&mut sessions, id)?;
    let result = screen_submission(session.submit()?, &state.rules)?;
    tracing::info!(
        session_id = %id,
        probability = result.risk.probability,
        "session submitted"
    );

    Ok(ApiJson(SubmitResponse {
        session: session.status(),
        result,
    }))
}
