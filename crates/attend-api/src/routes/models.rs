use axum::extract::State;
use serde::Deserialize;

use attend_models::pipeline::{train_and_evaluate, TrainingConfig, TrainingReport};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Body of `POST /models/train`. The body may be omitted entirely.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TrainRequest {
    /// Overrides the configured training settings.
    pub config: Option<TrainingConfig>,
}

pub async fn train(
    State(state): State<AppState>,
    request: Option<ApiJson<TrainRequest>>,
) -> Result<ApiJson<TrainingReport>, ApiError> {
    let request = request.map(|ApiJson(r)| r).unwrap_or_default();
    let config = request
        .config
        .unwrap_or_else(|| state.config.training.clone());
    let dataset = state.dataset.clone();

    let report =
        tokio::task::spawn_blocking(move || train_and_evaluate(&dataset, &config)).await??;
    tracing::info!(
        best_model = ?report.best_model,
        models = report.models.len(),
        "training report cached"
    );

    *state.last_report.lock().await = Some(report.clone());
    Ok(ApiJson(report))
}

pub async fn last_report(
    State(state): State<AppState>,
) -> Result<ApiJson<TrainingReport>, ApiError> {
    state
        .last_report
        .lock()
        .await
        .clone()
        .map(ApiJson)
        .ok_or_else(|| ApiError::NotFound("no model has been trained yet".to_string()))
}
