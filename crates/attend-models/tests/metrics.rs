use attend_models::metrics::{accuracy, roc_auc, ClassificationMetrics, ConfusionMatrix};

const T: bool = true;
const F: bool = false;

#[test]
fn hand_computed_confusion() {
    let y_true = [T, T, T, F, F, F, F, F];
    let y_pred = [T, T, F, T, F, F, F, F];
    let m = ConfusionMatrix::from_predictions(&y_true, &y_pred);

    assert_eq!(
        m,
        ConfusionMatrix {
            true_negative: 4,
            false_positive: 1,
            false_negative: 1,
            true_positive: 2,
        }
    );
    assert!((accuracy(&y_true, &y_pred) - 0.75).abs() < 1e-6);
    assert!((m.precision() - 2.0 / 3.0).abs() < 1e-12);
    assert!((m.recall() - 2.0 / 3.0).abs() < 1e-12);
    assert!((m.f1() - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn degenerate_denominators_are_zero() {
    let m = ConfusionMatrix::from_predictions(&[F, F, T], &[F, F, F]);
    assert_eq!(m.precision(), 0.0);
    assert_eq!(m.recall(), 0.0);
    assert_eq!(m.f1(), 0.0);
    assert_eq!(accuracy(&[], &[]), 0.0);
}

#[test]
fn negative_only_predictions_still_fill_the_matrix() {
    let m = ConfusionMatrix::from_predictions(&[F, F], &[F, F]);
    assert_eq!(m.true_negative, 2);
    assert_eq!(m.total(), 2);
    assert_eq!(ConfusionMatrix::from_predictions(&[], &[]).total(), 0);
}

#[test]
fn auc_extremes() {
    let y = [F, F, T, T];
    assert_eq!(roc_auc(&y, &[0.1, 0.2, 0.8, 0.9]), Some(1.0));
    assert_eq!(roc_auc(&y, &[0.9, 0.8, 0.2, 0.1]), Some(0.0));
    assert_eq!(roc_auc(&y, &[0.5, 0.5, 0.5, 0.5]), Some(0.5));
}

#[test]
fn auc_averages_ties() {
    // One positive tied with one negative: that pair counts half.
    let y = [F, F, T, T];
    assert_eq!(roc_auc(&y, &[0.1, 0.6, 0.6, 0.9]), Some(0.875));
}

#[test]
fn auc_needs_both_classes() {
    assert_eq!(roc_auc(&[T, T], &[0.2, 0.3]), None);
    assert_eq!(roc_auc(&[F], &[0.2]), None);
}

#[test]
fn evaluate_thresholds_probabilities() {
    let y = [F, T, T, F];
    let metrics = ClassificationMetrics::evaluate(&y, &[0.4, 0.5, 0.7, 0.6], 0.5);
    assert_eq!(metrics.confusion.true_positive, 2);
    assert_eq!(metrics.confusion.false_positive, 1);
    assert!((metrics.accuracy - 0.75).abs() < 1e-6);
    assert_eq!(metrics.recall, 1.0);
    assert_eq!(metrics.roc_auc, Some(0.75));
}
