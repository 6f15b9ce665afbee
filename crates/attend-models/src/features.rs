//! Feature encoding and scaling.
//!
//! Layout of an encoded row: the scaled numeric block (age, the three
//! clinical scores, q1..q18, total), then the two boolean flags as 0/1,
//! then one-hot gender, education and tester status.

use aprender::preprocessing::StandardScaler;
use aprender::primitives::Matrix;
use aprender::traits::Transformer;

use attend_core::models::demographics::{Education, Gender};
use attend_core::models::questionnaire::QUESTION_COUNT;

use crate::dataset::{Record, TesterStatus};
use crate::error::ModelError;

/// Number of leading columns the scaler standardizes.
pub const SCALED_COLUMNS: usize = 4 + QUESTION_COUNT + 1;

const GENDERS: [(Gender, &str); 2] = [(Gender::Male, "male"), (Gender::Female, "female")];
const EDUCATIONS: [(Education, &str); 3] = [
    (Education::Primary, "primary"),
    (Education::Secondary, "secondary"),
    (Education::Higher, "higher"),
];
const TESTERS: [(TesterStatus, &str); 4] = [
    (TesterStatus::Family, "family"),
    (TesterStatus::Physician, "physician"),
    (TesterStatus::Psychologist, "psychologist"),
    (TesterStatus::SelfReport, "self"),
];

pub fn feature_names() -> Vec<String> {
    let mut names: Vec<String> = [
        "age",
        "hyperactivity_score",
        "inattention_score",
        "impulsivity_score",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    names.extend((1..=QUESTION_COUNT).map(|q| format!("q{q}")));
    names.push("total".to_string());
    names.push("learning_difficulties".to_string());
    names.push("family_history".to_string());
    names.extend(GENDERS.iter().map(|(_, n)| format!("gender_{n}")));
    names.extend(EDUCATIONS.iter().map(|(_, n)| format!("education_{n}")));
    names.extend(TESTERS.iter().map(|(_, n)| format!("tester_status_{n}")));
    names
}

/// Unscaled encoding of `records`.
pub fn encode(records: &[Record]) -> Result<Matrix<f32>, ModelError> {
    let cols = feature_names().len();
    let mut data = Vec::with_capacity(records.len() * cols);

    for r in records {
        data.push(f32::from(r.age));
        data.push(f32::from(r.hyperactivity_score));
        data.push(f32::from(r.inattention_score));
        data.push(f32::from(r.impulsivity_score));
        data.extend(r.items.iter().map(|&v| f32::from(v)));
        data.push(r.total() as f32);
        data.push(flag(r.learning_difficulties));
        data.push(flag(r.family_history));
        data.extend(GENDERS.iter().map(|(g, _)| flag(*g == r.gender)));
        data.extend(EDUCATIONS.iter().map(|(e, _)| flag(*e == r.education)));
        data.extend(TESTERS.iter().map(|(t, _)| flag(*t == r.tester_status)));
    }

    matrix(records.len(), cols, data)
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

fn matrix(rows: usize, cols: usize, data: Vec<f32>) -> Result<Matrix<f32>, ModelError> {
    let actual = data.len();
    Matrix::from_vec(rows, cols, data).map_err(|_| ModelError::ShapeMismatch {
        expected: rows * cols,
        actual,
    })
}

/// The rows of `x` at `indices`, in that order.
pub fn select_rows(x: &Matrix<f32>, indices: &[usize]) -> Result<Matrix<f32>, ModelError> {
    let (rows, cols) = x.shape();
    let mut data = Vec::with_capacity(indices.len() * cols);
    for &i in indices {
        if i >= rows {
            return Err(ModelError::InvalidParameter(format!(
                "row {i} out of range for {rows} rows"
            )));
        }
        data.extend((0..cols).map(|j| x.get(i, j)));
    }
    matrix(indices.len(), cols, data)
}

/// Columns `from..to` of `x`.
fn columns(x: &Matrix<f32>, from: usize, to: usize) -> Result<Matrix<f32>, ModelError> {
    let rows = x.n_rows();
    let mut data = Vec::with_capacity(rows * (to - from));
    for i in 0..rows {
        data.extend((from..to).map(|j| x.get(i, j)));
    }
    matrix(rows, to - from, data)
}

fn hstack(left: &Matrix<f32>, right: &Matrix<f32>) -> Result<Matrix<f32>, ModelError> {
    let rows = left.n_rows();
    let cols = left.n_cols() + right.n_cols();
    let mut data = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        data.extend((0..left.n_cols()).map(|j| left.get(i, j)));
        data.extend((0..right.n_cols()).map(|j| right.get(i, j)));
    }
    matrix(rows, cols, data)
}

/// Standardizes the leading numeric block with aprender's scaler; the
/// flag and one-hot columns pass through untouched.
pub struct FeatureScaler {
    scaler: StandardScaler,
    numeric: usize,
    width: usize,
}

impl FeatureScaler {
    pub fn fit(x: &Matrix<f32>) -> Result<Self, ModelError> {
        let width = x.n_cols();
        let numeric = SCALED_COLUMNS.min(width);
        let mut scaler = StandardScaler::new();
        scaler.fit(&columns(x, 0, numeric)?)?;
        Ok(Self {
            scaler,
            numeric,
            width,
        })
    }

    pub fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>, ModelError> {
        if x.n_cols() != self.width {
            return Err(ModelError::ShapeMismatch {
                expected: self.width,
                actual: x.n_cols(),
            });
        }
        let scaled = self.scaler.transform(&columns(x, 0, self.numeric)?)?;
        hstack(&scaled, &columns(x, self.numeric, self.width)?)
    }

    /// Per-column means of the numeric block.
    pub fn means(&self) -> &[f32] {
        self.scaler.mean()
    }
}
