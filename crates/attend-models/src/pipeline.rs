//! End-to-end training: encode, split, cross-validate, fit, evaluate.

use aprender::primitives::Matrix;
use serde::{Deserialize, Serialize};

use crate::classifiers::{ModelKind, ModelParams, DECISION_THRESHOLD};
use crate::dataset::{Dataset, Provenance};
use crate::error::ModelError;
use crate::features;
use crate::metrics::ClassificationMetrics;
use crate::model_selection::{self, train_test_split, Split};
use crate::search::{self, GridSearchResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub test_size: f64,
    pub cv_folds: usize,
    pub seed: u64,
    pub models: Vec<ModelKind>,
    /// How many importances to keep per model.
    pub top_features: usize,
    /// Tune each model over its default grid before the final fit.
    pub grid_search: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            cv_folds: 5,
            seed: 42,
            models: ModelKind::ALL.to_vec(),
            top_features: 10,
            grid_search: false,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(ModelError::InvalidParameter(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.cv_folds < 2 {
            return Err(ModelError::InvalidParameter(format!(
                "cv_folds must be at least 2, got {}",
                self.cv_folds
            )));
        }
        if self.models.is_empty() {
            return Err(ModelError::InvalidParameter("no models selected".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReport {
    pub kind: ModelKind,
    pub label: String,
    pub params: ModelParams,
    pub test: ClassificationMetrics,
    pub cv_accuracy: Vec<f64>,
    pub cv_mean: f64,
    pub cv_std: f64,
    pub top_features: Vec<FeatureImportance>,
    pub grid_search: Option<GridSearchResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub features: Vec<String>,
    pub models: Vec<ModelReport>,
    /// Highest test F1; the first listed model wins ties.
    pub best_model: Option<ModelKind>,
    pub provenance: Provenance,
}

impl TrainingReport {
    pub fn model(&self, kind: ModelKind) -> Option<&ModelReport> {
        self.models.iter().find(|m| m.kind == kind)
    }
}

pub fn train_and_evaluate(
    dataset: &Dataset,
    config: &TrainingConfig,
) -> Result<TrainingReport, ModelError> {
    config.validate()?;
    dataset.ensure_trainable()?;

    let x = features::encode(&dataset.records)?;
    let y = dataset.labels();
    let names = features::feature_names();

    let split = train_test_split(&y, config.test_size, config.seed)?;
    let x_train = features::select_rows(&x, &split.train)?;
    let x_test = features::select_rows(&x, &split.test)?;
    let y_train: Vec<bool> = split.train.iter().map(|&i| y[i]).collect();
    let y_test: Vec<bool> = split.test.iter().map(|&i| y[i]).collect();
    let folds = model_selection::stratified_folds(&y_train, config.cv_folds, config.seed)?;

    tracing::info!(
        rows = dataset.len(),
        train = split.train.len(),
        test = split.test.len(),
        models = config.models.len(),
        "training started"
    );

    let mut models = Vec::with_capacity(config.models.len());
    for &kind in &config.models {
        let report = train_one(
            kind,
            config,
            &names,
            (&x_train, &y_train),
            (&x_test, &y_test),
            &folds,
        )?;
        tracing::info!(
            model = kind.label(),
            accuracy = report.test.accuracy,
            f1 = report.test.f1,
            roc_auc = report.test.roc_auc,
            cv_mean = report.cv_mean,
            "model evaluated"
        );
        models.push(report);
    }

    let mut best_model: Option<&ModelReport> = None;
    for report in &models {
        if best_model.is_none_or(|b| report.test.f1 > b.test.f1) {
            best_model = Some(report);
        }
    }
    let best_model = best_model.map(|m| m.kind);

    Ok(TrainingReport {
        rows: dataset.len(),
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        features: names,
        models,
        best_model,
        provenance: dataset.provenance.clone(),
    })
}

fn train_one(
    kind: ModelKind,
    config: &TrainingConfig,
    names: &[String],
    (x_train, y_train): (&Matrix<f32>, &[bool]),
    (x_test, y_test): (&Matrix<f32>, &[bool]),
    folds: &[Split],
) -> Result<ModelReport, ModelError> {
    let grid_search = if config.grid_search {
        Some(search::grid_search(
            kind,
            &search::default_grid(kind),
            x_train,
            y_train,
            folds,
            config.seed,
        )?)
    } else {
        None
    };
    let params = grid_search
        .as_ref()
        .map_or_else(|| ModelParams::default_for(kind), |g| g.best);

    let cv = search::cross_validate(&params, x_train, y_train, folds, config.seed)?;
    let (scaler, model) = search::fit_scaled(&params, config.seed, x_train, y_train)?;
    let probabilities = model.predict_proba(&scaler.transform(x_test)?)?;
    let importances = model.feature_importances(&scaler.transform(x_train)?, y_train)?;

    Ok(ModelReport {
        kind,
        label: kind.label().to_string(),
        params,
        test: ClassificationMetrics::evaluate(y_test, &probabilities, DECISION_THRESHOLD),
        cv_mean: cv.mean_accuracy(),
        cv_std: cv.std_accuracy(),
        cv_accuracy: cv.accuracy,
        top_features: top_features(names, Some(importances), config.top_features),
        grid_search,
    })
}

/// The `n` largest importances, largest first.
pub fn top_features(names: &[String], importances: Option<Vec<f64>>, n: usize) -> Vec<FeatureImportance> {
    let Some(importances) = importances else {
        return Vec::new();
    };
    let mut ranked: Vec<FeatureImportance> = names
        .iter()
        .zip(importances)
        .map(|(feature, importance)| FeatureImportance {
            feature: feature.clone(),
            importance,
        })
        .collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked.truncate(n);
    ranked
}
