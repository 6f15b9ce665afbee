use axum::extract::State;
use serde::Serialize;

use attend_models::dataset::{Record, SUBSAMPLES};
use attend_models::stats::{summarize, DatasetSummary};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Rows shown per subsample.
const PREVIEW_ROWS: usize = 10;

#[derive(Serialize)]
pub struct SamplePreview {
    size: usize,
    seed: u64,
    positive_rate: f64,
    rows: Vec<Record>,
}

pub async fn summary(State(state): State<AppState>) -> Result<ApiJson<DatasetSummary>, ApiError> {
    Ok(ApiJson(summarize(&state.dataset)?))
}

pub async fn samples(State(state): State<AppState>) -> ApiJson<Vec<SamplePreview>> {
    let previews = SUBSAMPLES
        .iter()
        .zip(state.dataset.subsamples())
        .map(|(&(_, seed), sample)| {
            let positives = sample.records.iter().filter(|r| r.adhd).count();
            SamplePreview {
                size: sample.len(),
                seed,
                positive_rate: if sample.is_empty() {
                    0.0
                } else {
                    positives as f64 / sample.len() as f64
                },
                rows: sample.records.into_iter().take(PREVIEW_ROWS).collect(),
            }
        })
        .collect();
    ApiJson(previews)
}
