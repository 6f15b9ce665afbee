//! Stratified splitting.
//!
//! aprender's own `train_test_split` ignores the labels, so the holdout
//! split shuffles each class separately here; k-fold goes through
//! aprender. Every part keeps roughly the dataset's class ratio.

use aprender::model_selection::StratifiedKFold;
use aprender::primitives::Vector;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Stratified holdout split. Each class contributes
/// `round(test_size * class_len)` rows to the test side, at least one
/// and never all of them.
pub fn train_test_split(labels: &[bool], test_size: f64, seed: u64) -> Result<Split, ModelError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ModelError::InvalidParameter(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut split = Split {
        train: Vec::new(),
        test: Vec::new(),
    };

    for mut class in class_indices(labels) {
        if class.len() < 2 {
            return Err(ModelError::InvalidParameter(
                "every class needs at least 2 rows for a stratified split".to_string(),
            ));
        }
        class.shuffle(&mut rng);
        let n_test = ((class.len() as f64 * test_size).round() as usize).clamp(1, class.len() - 1);
        split.test.extend_from_slice(&class[..n_test]);
        split.train.extend_from_slice(&class[n_test..]);
    }

    split.train.sort_unstable();
    split.test.sort_unstable();
    Ok(split)
}

/// Stratified k-fold over `labels` through aprender's `StratifiedKFold`.
/// Folds come back in order with sorted indices; the test sides partition
/// `0..labels.len()`.
pub fn stratified_folds(labels: &[bool], n_splits: usize, seed: u64) -> Result<Vec<Split>, ModelError> {
    if n_splits < 2 {
        return Err(ModelError::InvalidParameter(format!(
            "k-fold needs at least 2 splits, got {n_splits}"
        )));
    }
    if n_splits > labels.len() {
        return Err(ModelError::InvalidParameter(format!(
            "cannot make {n_splits} folds from {} rows",
            labels.len()
        )));
    }

    let y = Vector::from_vec(labels.iter().map(|&l| if l { 1.0 } else { 0.0 }).collect());
    let folds = StratifiedKFold::new(n_splits).with_random_state(seed).split(&y);

    Ok(folds
        .into_iter()
        .map(|(mut train, mut test)| {
            train.sort_unstable();
            test.sort_unstable();
            Split { train, test }
        })
        .collect())
}

/// Indices of the negative class, then of the positive class.
fn class_indices(labels: &[bool]) -> [Vec<usize>; 2] {
    let mut classes = [Vec::new(), Vec::new()];
    for (i, &label) in labels.iter().enumerate() {
        classes[usize::from(label)].push(i);
    }
    classes
}
