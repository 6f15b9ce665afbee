use attend_core::models::demographics::{Education, Gender};
use attend_models::dataset::{Dataset, DatasetSource, Record, TesterStatus};
use attend_models::error::ModelError;
use attend_models::stats::{pearson, sample_std, summarize, NUMERIC_COLUMNS};
use attend_models::synthetic;

fn record(age: u8, gender: Gender, item: u8, adhd: bool) -> Record {
    Record {
        age,
        gender,
        education: Education::Higher,
        hyperactivity_score: item * 5,
        inattention_score: 10,
        impulsivity_score: 3,
        learning_difficulties: false,
        family_history: false,
        tester_status: TesterStatus::Physician,
        items: [item; 18],
        adhd,
    }
}

fn small() -> Dataset {
    Dataset::new(
        vec![
            record(20, Gender::Male, 4, true),
            record(30, Gender::Female, 3, true),
            record(40, Gender::Male, 1, false),
            record(50, Gender::Female, 0, false),
        ],
        DatasetSource::Synthetic { samples: 4, seed: 0 },
    )
}

#[test]
fn headline_numbers() {
    let summary = summarize(&small()).unwrap();
    assert_eq!(summary.participants, 4);
    assert_eq!(summary.positives, 2);
    assert_eq!(summary.positive_rate, 0.5);
    assert_eq!(summary.age_mean, 35.0);
    assert!((summary.age_std - 12.909_944).abs() < 1e-6);
    assert_eq!(summary.male_ratio, 0.5);
}

#[test]
fn class_means_split_by_target() {
    let summary = summarize(&small()).unwrap();
    let positive = summary.positive_class.unwrap();
    let negative = summary.negative_class.unwrap();

    assert_eq!(positive.count, 2);
    assert_eq!(positive.columns[0].column, "age");
    assert_eq!(positive.columns[0].mean, 25.0);
    assert_eq!(negative.columns[0].mean, 45.0);
    assert_eq!(positive.items.len(), 18);
    assert_eq!(positive.items[0], 3.5);
    assert_eq!(negative.items[17], 0.5);
}

#[test]
fn missing_class_has_no_means() {
    let dataset = Dataset::new(
        vec![record(20, Gender::Male, 2, false)],
        DatasetSource::Synthetic { samples: 1, seed: 0 },
    );
    let summary = summarize(&dataset).unwrap();
    assert!(summary.positive_class.is_none());
    assert!(summary.negative_class.is_some());
    assert_eq!(summary.age_std, 0.0);
}

#[test]
fn empty_dataset_is_rejected() {
    let dataset = Dataset::new(Vec::new(), DatasetSource::Synthetic { samples: 0, seed: 0 });
    assert!(matches!(summarize(&dataset), Err(ModelError::NoTrainableData(_))));
}

#[test]
fn correlation_matrix_shape_and_ranking() {
    let summary = summarize(&small()).unwrap();
    let n = NUMERIC_COLUMNS.len();
    assert_eq!(summary.correlation.columns.len(), n);
    assert_eq!(summary.correlation.values.len(), n);
    for i in 0..n {
        assert_eq!(summary.correlation.values[i][i], 1.0);
    }

    assert_eq!(summary.top_correlations.len(), n * (n - 1) / 2);
    for pair in summary.top_correlations.windows(2) {
        assert!(pair[0].r.abs() >= pair[1].r.abs());
    }
    // hyperactivity_score and total both scale with the item value.
    let top = &summary.top_correlations[0];
    assert!((top.r.abs() - 1.0).abs() < 1e-5);
}

#[test]
fn histogram_counts_every_row() {
    let dataset = synthetic::generate(400, 11);
    let summary = summarize(&dataset).unwrap();
    assert_eq!(summary.total_histogram.len(), 73);
    let positives: usize = summary.total_histogram.iter().map(|b| b.positive).sum();
    let negatives: usize = summary.total_histogram.iter().map(|b| b.negative).sum();
    assert_eq!(positives, summary.positives);
    assert_eq!(positives + negatives, 400);
}

#[test]
fn pearson_basics() {
    assert!((pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]) - 1.0).abs() < 1e-6);
    assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-6);
    assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
    assert_eq!(sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), (32.0f64 / 7.0).sqrt());
}
