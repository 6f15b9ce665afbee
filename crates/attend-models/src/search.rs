//! Cross-validation and grid search.
//!
//! aprender's `cross_validate` only drives its `Estimator` trait over plain
//! k-fold, so the fold loop lives here; fold statistics come from its
//! `CrossValidationResult`.

use aprender::model_selection::CrossValidationResult;
use aprender::primitives::Matrix;
use serde::{Deserialize, Serialize};

use crate::classifiers::{Classifier, ModelKind, ModelParams};
use crate::error::ModelError;
use crate::features::{self, FeatureScaler};
use crate::metrics::{self, ConfusionMatrix};
use crate::model_selection::Split;

/// Per-fold scores of one parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvScores {
    pub accuracy: Vec<f64>,
    pub f1: Vec<f64>,
}

impl CvScores {
    pub fn mean_accuracy(&self) -> f64 {
        summary(&self.accuracy).mean().into()
    }

    /// Population standard deviation, as fold scores are usually reported.
    pub fn std_accuracy(&self) -> f64 {
        summary(&self.accuracy).std().into()
    }

    pub fn mean_f1(&self) -> f64 {
        summary(&self.f1).mean().into()
    }
}

fn summary(scores: &[f64]) -> CrossValidationResult {
    CrossValidationResult {
        scores: scores.iter().map(|&s| s as f32).collect(),
    }
}

/// Fit a scaler on `x_train` and `params` on the scaled rows.
pub fn fit_scaled(
    params: &ModelParams,
    seed: u64,
    x_train: &Matrix<f32>,
    y_train: &[bool],
) -> Result<(FeatureScaler, Classifier), ModelError> {
    let scaler = FeatureScaler::fit(x_train)?;
    let mut model = params.build(seed);
    model.fit(&scaler.transform(x_train)?, y_train)?;
    Ok((scaler, model))
}

/// Score `params` on every fold. The scaler is refit inside each fold.
pub fn cross_validate(
    params: &ModelParams,
    x: &Matrix<f32>,
    y: &[bool],
    folds: &[Split],
    seed: u64,
) -> Result<CvScores, ModelError> {
    params.validate()?;
    let mut scores = CvScores {
        accuracy: Vec::with_capacity(folds.len()),
        f1: Vec::with_capacity(folds.len()),
    };

    for split in folds {
        let y_train: Vec<bool> = split.train.iter().map(|&i| y[i]).collect();
        let y_test: Vec<bool> = split.test.iter().map(|&i| y[i]).collect();
        let x_train = features::select_rows(x, &split.train)?;
        let (scaler, model) = fit_scaled(params, seed, &x_train, &y_train)?;
        let x_test = features::select_rows(x, &split.test)?;
        let predicted = model.predict(&scaler.transform(&x_test)?)?;

        scores.accuracy.push(metrics::accuracy(&y_test, &predicted));
        scores.f1.push(ConfusionMatrix::from_predictions(&y_test, &predicted).f1());
    }
    Ok(scores)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub params: ModelParams,
    pub mean_f1: f64,
    pub mean_accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSearchResult {
    pub kind: ModelKind,
    pub best: ModelParams,
    pub best_f1: f64,
    pub candidates: Vec<CandidateScore>,
}

/// Pick the candidate with the highest mean cross-validated F1. Ties keep
/// the earlier candidate.
pub fn grid_search(
    kind: ModelKind,
    grid: &[ModelParams],
    x: &Matrix<f32>,
    y: &[bool],
    folds: &[Split],
    seed: u64,
) -> Result<GridSearchResult, ModelError> {
    if grid.is_empty() {
        return Err(ModelError::InvalidParameter(format!(
            "empty parameter grid for {}",
            kind.label()
        )));
    }
    if let Some(other) = grid.iter().find(|p| p.kind() != kind) {
        return Err(ModelError::InvalidParameter(format!(
            "grid for {} contains {} parameters",
            kind.label(),
            other.kind().label()
        )));
    }

    let mut candidates = Vec::with_capacity(grid.len());
    for params in grid {
        let scores = cross_validate(params, x, y, folds, seed)?;
        candidates.push(CandidateScore {
            params: *params,
            mean_f1: scores.mean_f1(),
            mean_accuracy: scores.mean_accuracy(),
        });
    }

    let mut best = 0;
    for (i, candidate) in candidates.iter().enumerate().skip(1) {
        if candidate.mean_f1 > candidates[best].mean_f1 {
            best = i;
        }
    }
    let (best_params, best_f1) = (candidates[best].params, candidates[best].mean_f1);
    tracing::info!(
        model = kind.label(),
        best_f1,
        candidates = candidates.len(),
        "grid search finished"
    );

    Ok(GridSearchResult {
        kind,
        best: best_params,
        best_f1,
        candidates,
    })
}

/// Small default grid around each model's defaults.
pub fn default_grid(kind: ModelKind) -> Vec<ModelParams> {
    match kind {
        ModelKind::LogisticRegression => [0.01, 0.1, 0.5]
            .into_iter()
            .map(|learning_rate| ModelParams::LogisticRegression {
                learning_rate,
                max_iter: 1000,
                tolerance: 1e-4,
            })
            .collect(),
        ModelKind::DecisionTree => [3, 5, 8]
            .into_iter()
            .map(|max_depth| ModelParams::DecisionTree { max_depth })
            .collect(),
        ModelKind::RandomForest => [(50, 5), (50, 8), (100, 5), (100, 8)]
            .into_iter()
            .map(|(n_estimators, max_depth)| ModelParams::RandomForest {
                n_estimators,
                max_depth,
            })
            .collect(),
        ModelKind::GradientBoosting => [(0.05, 2), (0.05, 3), (0.1, 2), (0.1, 3)]
            .into_iter()
            .map(|(learning_rate, max_depth)| ModelParams::GradientBoosting {
                n_estimators: 100,
                learning_rate,
                max_depth,
            })
            .collect(),
    }
}
