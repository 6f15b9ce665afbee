//! Binary classification metrics. Positive class is `true`; a metric whose
//! denominator is zero is reported as 0.
//!
//! Counting and accuracy come from aprender. Its precision, recall and F1
//! only average over classes, so the positive-class versions and the ROC
//! AUC live here.

use aprender::metrics::classification;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

impl ConfusionMatrix {
    /// Counts over the common prefix of `y_true` and `y_pred`.
    pub fn from_predictions(y_true: &[bool], y_pred: &[bool]) -> Self {
        let n = y_true.len().min(y_pred.len());
        if n == 0 {
            return Self::default();
        }
        // aprender sizes the matrix by the largest label seen, indexed
        // [true][predicted].
        let counts = classification::confusion_matrix(&labels(&y_pred[..n]), &labels(&y_true[..n]));
        let cell = |t: usize, p: usize| {
            if t < counts.n_rows() && p < counts.n_cols() {
                counts.get(t, p)
            } else {
                0
            }
        };
        Self {
            true_negative: cell(0, 0),
            false_positive: cell(0, 1),
            false_negative: cell(1, 0),
            true_positive: cell(1, 1),
        }
    }

    pub fn total(&self) -> usize {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    /// F1 of the positive class.
    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Class indices as aprender expects them.
pub fn labels(y: &[bool]) -> Vec<usize> {
    y.iter().map(|&v| usize::from(v)).collect()
}

pub fn accuracy(y_true: &[bool], y_pred: &[bool]) -> f64 {
    let n = y_true.len().min(y_pred.len());
    if n == 0 {
        return 0.0;
    }
    f64::from(classification::accuracy(&labels(&y_pred[..n]), &labels(&y_true[..n])))
}

/// Area under the ROC curve via the Mann-Whitney rank statistic, tied
/// scores sharing their average rank. `None` when only one class is
/// present.
pub fn roc_auc(y_true: &[bool], scores: &[f64]) -> Option<f64> {
    let n_pos = y_true.iter().filter(|&&t| t).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut ranks = vec![0.0; scores.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        // Ranks are 1-based; the tie group spans start+1..=end.
        let average = (start + 1 + end) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = average;
        }
        start = end;
    }

    let positive_rank_sum: f64 = y_true
        .iter()
        .zip(&ranks)
        .filter(|&(&t, _)| t)
        .map(|(_, &r)| r)
        .sum();
    let n_pos = n_pos as f64;
    let u = positive_rank_sum - n_pos * (n_pos + 1.0) / 2.0;
    Some(u / (n_pos * n_neg as f64))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub roc_auc: Option<f64>,
    pub confusion: ConfusionMatrix,
}

impl ClassificationMetrics {
    pub fn evaluate(y_true: &[bool], probabilities: &[f64], threshold: f64) -> Self {
        let y_pred: Vec<bool> = probabilities.iter().map(|&p| p >= threshold).collect();
        let confusion = ConfusionMatrix::from_predictions(y_true, &y_pred);
        Self {
            accuracy: accuracy(y_true, &y_pred),
            precision: confusion.precision(),
            recall: confusion.recall(),
            f1: confusion.f1(),
            roc_auc: roc_auc(y_true, probabilities),
            confusion,
        }
    }
}
