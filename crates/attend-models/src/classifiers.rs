//! The four comparison models, fitted through aprender.
//!
//! aprender panics when an unfitted model predicts; [`Classifier`] only
//! holds a model once `fit` has succeeded and reports
//! [`ModelError::NotFitted`] otherwise.

use aprender::classification::LogisticRegression;
use aprender::interpret::PermutationImportance;
use aprender::primitives::{Matrix, Vector};
use aprender::tree::{DecisionTreeClassifier, GradientBoostingClassifier, RandomForestClassifier};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::metrics::labels;

/// Probability threshold for the positive class.
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    DecisionTree,
    RandomForest,
    GradientBoosting,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::LogisticRegression,
        ModelKind::DecisionTree,
        ModelKind::RandomForest,
        ModelKind::GradientBoosting,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ModelKind::LogisticRegression => "Logistic Regression",
            ModelKind::DecisionTree => "Decision Tree",
            ModelKind::RandomForest => "Random Forest",
            ModelKind::GradientBoosting => "Gradient Boosting",
        }
    }
}

/// Hyperparameters, tagged by model kind on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelParams {
    LogisticRegression {
        learning_rate: f32,
        max_iter: usize,
        tolerance: f32,
    },
    DecisionTree {
        max_depth: usize,
    },
    RandomForest {
        n_estimators: usize,
        max_depth: usize,
    },
    GradientBoosting {
        n_estimators: usize,
        learning_rate: f32,
        max_depth: usize,
    },
}

impl ModelParams {
    pub fn default_for(kind: ModelKind) -> Self {
        match kind {
            ModelKind::LogisticRegression => ModelParams::LogisticRegression {
                learning_rate: 0.1,
                max_iter: 1000,
                tolerance: 1e-4,
            },
            ModelKind::DecisionTree => ModelParams::DecisionTree { max_depth: 6 },
            ModelKind::RandomForest => ModelParams::RandomForest {
                n_estimators: 100,
                max_depth: 8,
            },
            ModelKind::GradientBoosting => ModelParams::GradientBoosting {
                n_estimators: 100,
                learning_rate: 0.1,
                max_depth: 3,
            },
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            ModelParams::LogisticRegression { .. } => ModelKind::LogisticRegression,
            ModelParams::DecisionTree { .. } => ModelKind::DecisionTree,
            ModelParams::RandomForest { .. } => ModelKind::RandomForest,
            ModelParams::GradientBoosting { .. } => ModelKind::GradientBoosting,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let problem = match *self {
            ModelParams::LogisticRegression {
                learning_rate,
                max_iter,
                tolerance,
            } => {
                if !(learning_rate > 0.0) {
                    Some(format!("learning_rate must be positive, got {learning_rate}"))
                } else if max_iter == 0 {
                    Some("max_iter must be at least 1".to_string())
                } else if !(tolerance >= 0.0) {
                    Some(format!("tolerance must not be negative, got {tolerance}"))
                } else {
                    None
                }
            }
            ModelParams::DecisionTree { max_depth } => {
                (max_depth == 0).then(|| "max_depth must be at least 1".to_string())
            }
            ModelParams::RandomForest {
                n_estimators,
                max_depth,
            } => {
                if n_estimators == 0 {
                    Some("n_estimators must be at least 1".to_string())
                } else if max_depth == 0 {
                    Some("max_depth must be at least 1".to_string())
                } else {
                    None
                }
            }
            ModelParams::GradientBoosting {
                n_estimators,
                learning_rate,
                max_depth,
            } => {
                if n_estimators == 0 {
                    Some("n_estimators must be at least 1".to_string())
                } else if !(learning_rate > 0.0 && learning_rate <= 1.0) {
                    Some(format!("learning_rate must be in (0, 1], got {learning_rate}"))
                } else if max_depth == 0 {
                    Some("max_depth must be at least 1".to_string())
                } else {
                    None
                }
            }
        };
        match problem {
            Some(message) => Err(ModelError::InvalidParameter(format!(
                "{}: {message}",
                self.kind().label()
            ))),
            None => Ok(()),
        }
    }

    /// Unfitted classifier; `seed` drives the forest's bootstrap.
    pub fn build(&self, seed: u64) -> Classifier {
        Classifier {
            params: *self,
            seed,
            fitted: None,
        }
    }
}

#[derive(Debug, Clone)]
enum Model {
    Logistic(LogisticRegression),
    Tree(DecisionTreeClassifier),
    Forest(RandomForestClassifier),
    Boosting(GradientBoostingClassifier),
}

#[derive(Debug, Clone)]
struct Fitted {
    model: Model,
    width: usize,
}

/// A binary classifier over an encoded feature matrix.
#[derive(Debug, Clone)]
pub struct Classifier {
    params: ModelParams,
    seed: u64,
    fitted: Option<Fitted>,
}

impl Classifier {
    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn fit(&mut self, x: &Matrix<f32>, y: &[bool]) -> Result<(), ModelError> {
        self.params.validate()?;
        if x.n_rows() == 0 {
            return Err(ModelError::Fit("cannot fit on zero rows".to_string()));
        }
        if x.n_rows() != y.len() {
            return Err(ModelError::ShapeMismatch {
                expected: x.n_rows(),
                actual: y.len(),
            });
        }
        let y = labels(y);

        let model = match self.params {
            ModelParams::LogisticRegression {
                learning_rate,
                max_iter,
                tolerance,
            } => {
                let mut model = LogisticRegression::new()
                    .with_learning_rate(learning_rate)
                    .with_max_iter(max_iter)
                    .with_tolerance(tolerance);
                model.fit(x, &y)?;
                Model::Logistic(model)
            }
            ModelParams::DecisionTree { max_depth } => {
                let mut model = DecisionTreeClassifier::new().with_max_depth(max_depth);
                model.fit(x, &y)?;
                Model::Tree(model)
            }
            ModelParams::RandomForest {
                n_estimators,
                max_depth,
            } => {
                let mut model = RandomForestClassifier::new(n_estimators)
                    .with_max_depth(max_depth)
                    .with_random_state(self.seed);
                model.fit(x, &y)?;
                Model::Forest(model)
            }
            ModelParams::GradientBoosting {
                n_estimators,
                learning_rate,
                max_depth,
            } => {
                let mut model = GradientBoostingClassifier::new()
                    .with_n_estimators(n_estimators)
                    .with_learning_rate(learning_rate)
                    .with_max_depth(max_depth);
                model.fit(x, &y)?;
                Model::Boosting(model)
            }
        };

        self.fitted = Some(Fitted {
            model,
            width: x.n_cols(),
        });
        Ok(())
    }

    /// Probability of the positive class, one per row.
    pub fn predict_proba(&self, x: &Matrix<f32>) -> Result<Vec<f64>, ModelError> {
        positive_proba(&self.checked(x)?.model, x)
    }

    pub fn predict(&self, x: &Matrix<f32>) -> Result<Vec<bool>, ModelError> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|p| p >= DECISION_THRESHOLD)
            .collect())
    }

    /// Importances in feature order, summing to 1. `x` and `y` are only
    /// read by the models scored through permutation.
    pub fn feature_importances(&self, x: &Matrix<f32>, y: &[bool]) -> Result<Vec<f64>, ModelError> {
        let fitted = self.checked(x)?;
        if x.n_rows() == 0 || x.n_rows() != y.len() {
            return Err(ModelError::ShapeMismatch {
                expected: x.n_rows(),
                actual: y.len(),
            });
        }
        importances(&fitted.model, x, &labels(y))
    }

    fn checked(&self, x: &Matrix<f32>) -> Result<&Fitted, ModelError> {
        let fitted = self.fitted.as_ref().ok_or(ModelError::NotFitted)?;
        if x.n_cols() != fitted.width {
            return Err(ModelError::ShapeMismatch {
                expected: fitted.width,
                actual: x.n_cols(),
            });
        }
        Ok(fitted)
    }
}

fn positive_proba(model: &Model, x: &Matrix<f32>) -> Result<Vec<f64>, ModelError> {
    let n = x.n_rows();
    if n == 0 {
        return Ok(Vec::new());
    }
    let probabilities = match model {
        Model::Logistic(m) => m.predict_proba(x).as_slice().iter().map(|&p| f64::from(p)).collect(),
        // A single tree only votes.
        Model::Tree(m) => m.predict(x).into_iter().map(|c| if c == 1 { 1.0 } else { 0.0 }).collect(),
        Model::Forest(m) => {
            // One column when training saw only the negative class.
            let votes = m.predict_proba(x);
            (0..n)
                .map(|i| {
                    if votes.n_cols() > 1 {
                        f64::from(votes.get(i, 1))
                    } else {
                        0.0
                    }
                })
                .collect()
        }
        Model::Boosting(m) => m
            .predict_proba(x)?
            .into_iter()
            .map(|p| f64::from(p.get(1).copied().unwrap_or(0.0)))
            .collect(),
    };
    Ok(probabilities)
}

/// Logistic regression ranks by coefficient magnitude and the forest by
/// aprender's split importances. The single tree and the boosted ensemble
/// expose neither, so they use permutation importance on `x`.
fn importances(model: &Model, x: &Matrix<f32>, y: &[usize]) -> Result<Vec<f64>, ModelError> {
    let raw: Vec<f64> = match model {
        Model::Logistic(m) => m
            .coefficients()
            .as_slice()
            .iter()
            .map(|w| f64::from(w.abs()))
            .collect(),
        Model::Forest(m) => m
            .feature_importances()
            .unwrap_or_else(|| vec![0.0; x.n_cols()])
            .into_iter()
            .map(f64::from)
            .collect(),
        Model::Tree(_) | Model::Boosting(_) => permutation_importances(model, x, y)?,
    };
    Ok(normalize(raw))
}

fn permutation_importances(model: &Model, x: &Matrix<f32>, y: &[usize]) -> Result<Vec<f64>, ModelError> {
    let cols = x.n_cols();
    let rows: Vec<Vector<f32>> = (0..x.n_rows()).map(|i| x.row(i)).collect();
    let targets: Vec<f32> = y.iter().map(|&c| c as f32).collect();

    let predict = |row: &Vector<f32>| -> f32 {
        Matrix::from_vec(1, cols, row.as_slice().to_vec())
            .ok()
            .and_then(|single| positive_proba(model, &single).ok())
            .and_then(|p| p.first().copied())
            .map_or(0.5, |p| p as f32)
    };
    let squared_error = |predicted: f32, actual: f32| (predicted - actual).powi(2);

    let result = PermutationImportance::compute(predict, &rows, &targets, squared_error);
    // Shuffling a feature the model ignores can lower the error by chance.
    Ok(result
        .scores()
        .as_slice()
        .iter()
        .map(|&s| f64::from(s.max(0.0)))
        .collect())
}

/// Scale to sum 1; all-zero input stays zero.
fn normalize(values: Vec<f64>) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.into_iter().map(|v| v / total).collect()
    } else {
        values
    }
}
