use std::collections::BTreeSet;

use attend_models::error::ModelError;
use attend_models::model_selection::{stratified_folds, train_test_split};

fn labels(negatives: usize, positives: usize) -> Vec<bool> {
    let mut y = vec![false; negatives];
    y.extend(vec![true; positives]);
    y
}

#[test]
fn split_preserves_class_ratio() {
    let y = labels(80, 20);
    let split = train_test_split(&y, 0.25, 42).unwrap();

    assert_eq!(split.test.len(), 25);
    assert_eq!(split.train.len(), 75);
    assert_eq!(split.test.iter().filter(|&&i| y[i]).count(), 5);
    assert_eq!(split.train.iter().filter(|&&i| y[i]).count(), 15);
}

#[test]
fn split_is_disjoint_and_complete() {
    let y = labels(37, 13);
    let split = train_test_split(&y, 0.2, 7).unwrap();
    let train: BTreeSet<usize> = split.train.iter().copied().collect();
    let test: BTreeSet<usize> = split.test.iter().copied().collect();
    assert!(train.is_disjoint(&test));
    assert_eq!(train.len() + test.len(), 50);
}

#[test]
fn split_is_seeded() {
    let y = labels(40, 40);
    assert_eq!(train_test_split(&y, 0.3, 1).unwrap(), train_test_split(&y, 0.3, 1).unwrap());
    assert_ne!(train_test_split(&y, 0.3, 1).unwrap(), train_test_split(&y, 0.3, 2).unwrap());
}

#[test]
fn split_rejects_bad_fraction_and_tiny_class() {
    let y = labels(10, 10);
    assert!(matches!(train_test_split(&y, 0.0, 1), Err(ModelError::InvalidParameter(_))));
    assert!(matches!(train_test_split(&y, 1.0, 1), Err(ModelError::InvalidParameter(_))));
    assert!(matches!(
        train_test_split(&labels(10, 1), 0.2, 1),
        Err(ModelError::InvalidParameter(_))
    ));
}

#[test]
fn kfold_test_sides_partition_indices() {
    let y = labels(31, 12);
    let folds = stratified_folds(&y, 5, 42).unwrap();
    assert_eq!(folds.len(), 5);

    let mut seen = BTreeSet::new();
    for fold in &folds {
        assert_eq!(fold.train.len() + fold.test.len(), y.len());
        assert!(fold.test.windows(2).all(|w| w[0] < w[1]));
        for &i in &fold.test {
            assert!(seen.insert(i), "index {i} in two test folds");
            assert!(!fold.train.contains(&i));
        }
    }
    assert_eq!(seen.len(), y.len());
}

#[test]
fn kfold_is_stratified() {
    let y = labels(50, 25);
    let folds = stratified_folds(&y, 5, 3).unwrap();
    for fold in &folds {
        assert_eq!(fold.test.len(), 15);
        assert_eq!(fold.test.iter().filter(|&&i| y[i]).count(), 5);
    }
}

#[test]
fn kfold_is_seeded() {
    let y = labels(30, 30);
    assert_eq!(stratified_folds(&y, 3, 9).unwrap(), stratified_folds(&y, 3, 9).unwrap());
}

#[test]
fn kfold_validates() {
    assert!(matches!(stratified_folds(&labels(5, 5), 1, 0), Err(ModelError::InvalidParameter(_))));
    assert!(matches!(stratified_folds(&labels(2, 2), 5, 0), Err(ModelError::InvalidParameter(_))));
}
