//! Descriptive statistics over a [`Dataset`].

use aprender::primitives::Vector;
use serde::Serialize;

use attend_core::models::demographics::Gender;
use attend_core::models::questionnaire::QUESTION_COUNT;

use crate::dataset::{Dataset, Provenance, Record};
use crate::error::ModelError;

/// Numeric columns summarized per class and correlated.
pub const NUMERIC_COLUMNS: [&str; 5] = [
    "age",
    "hyperactivity_score",
    "inattention_score",
    "impulsivity_score",
    "total",
];

const MAX_TOTAL: u32 = 72;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMean {
    pub column: String,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMeans {
    pub count: usize,
    pub columns: Vec<ColumnMean>,
    /// Mean answer for q1..q18, in question order.
    pub items: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPair {
    pub first: String,
    pub second: String,
    pub r: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistogramBin {
    pub total: u32,
    pub positive: usize,
    pub negative: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub participants: usize,
    pub positives: usize,
    pub positive_rate: f64,
    pub age_mean: f64,
    /// Sample standard deviation (n - 1).
    pub age_std: f64,
    pub male_ratio: f64,
    /// `None` when the class has no rows.
    pub positive_class: Option<ClassMeans>,
    pub negative_class: Option<ClassMeans>,
    pub correlation: CorrelationMatrix,
    /// Off-diagonal pairs, strongest `|r|` first.
    pub top_correlations: Vec<CorrelationPair>,
    /// One bin per possible total, 0 through 72.
    pub total_histogram: Vec<HistogramBin>,
    pub provenance: Provenance,
}

pub fn summarize(dataset: &Dataset) -> Result<DatasetSummary, ModelError> {
    if dataset.is_empty() {
        return Err(ModelError::NoTrainableData("dataset has no rows".to_string()));
    }

    let records = &dataset.records;
    let n = records.len();
    let positives = records.iter().filter(|r| r.adhd).count();
    let ages: Vec<f64> = records.iter().map(|r| f64::from(r.age)).collect();
    let males = records.iter().filter(|r| r.gender == Gender::Male).count();

    let columns: Vec<Vec<f64>> = (0..NUMERIC_COLUMNS.len())
        .map(|c| records.iter().map(|r| numeric(r, c)).collect())
        .collect();
    let correlation = correlation_matrix(&columns);

    Ok(DatasetSummary {
        participants: n,
        positives,
        positive_rate: positives as f64 / n as f64,
        age_mean: mean(&ages),
        age_std: sample_std(&ages),
        male_ratio: males as f64 / n as f64,
        positive_class: class_means(records, true),
        negative_class: class_means(records, false),
        top_correlations: ranked_pairs(&correlation),
        correlation,
        total_histogram: histogram(records),
        provenance: dataset.provenance.clone(),
    })
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; 0 for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Pearson correlation. A constant column correlates 0 with everything.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let a = Vector::from_vec(a.iter().map(|&v| v as f32).collect());
    let b = Vector::from_vec(b.iter().map(|&v| v as f32).collect());
    // Errors only for empty, mismatched or constant input.
    aprender::stats::corr(&a, &b).map_or(0.0, f64::from)
}

fn numeric(record: &Record, column: usize) -> f64 {
    match column {
        0 => f64::from(record.age),
        1 => f64::from(record.hyperactivity_score),
        2 => f64::from(record.inattention_score),
        3 => f64::from(record.impulsivity_score),
        _ => f64::from(record.total()),
    }
}

fn class_means(records: &[Record], positive: bool) -> Option<ClassMeans> {
    let class: Vec<&Record> = records.iter().filter(|r| r.adhd == positive).collect();
    if class.is_empty() {
        return None;
    }
    let count = class.len() as f64;

    let columns = NUMERIC_COLUMNS
        .iter()
        .enumerate()
        .map(|(c, name)| ColumnMean {
            column: name.to_string(),
            mean: class.iter().map(|r| numeric(r, c)).sum::<f64>() / count,
        })
        .collect();

    let items = (0..QUESTION_COUNT)
        .map(|q| class.iter().map(|r| f64::from(r.items[q])).sum::<f64>() / count)
        .collect();

    Some(ClassMeans {
        count: class.len(),
        columns,
        items,
    })
}

fn correlation_matrix(columns: &[Vec<f64>]) -> CorrelationMatrix {
    let values = columns
        .iter()
        .enumerate()
        .map(|(i, a)| {
            columns
                .iter()
                .enumerate()
                .map(|(j, b)| if i == j { 1.0 } else { pearson(a, b) })
                .collect()
        })
        .collect();

    CorrelationMatrix {
        columns: NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect(),
        values,
    }
}

fn ranked_pairs(matrix: &CorrelationMatrix) -> Vec<CorrelationPair> {
    let mut pairs = Vec::new();
    for i in 0..matrix.columns.len() {
        for j in (i + 1)..matrix.columns.len() {
            pairs.push(CorrelationPair {
                first: matrix.columns[i].clone(),
                second: matrix.columns[j].clone(),
                r: matrix.values[i][j],
            });
        }
    }
    pairs.sort_by(|a, b| b.r.abs().total_cmp(&a.r.abs()));
    pairs
}

fn histogram(records: &[Record]) -> Vec<HistogramBin> {
    let mut bins: Vec<HistogramBin> = (0..=MAX_TOTAL)
        .map(|total| HistogramBin {
            total,
            positive: 0,
            negative: 0,
        })
        .collect();

    for record in records {
        let Some(bin) = bins.get_mut(record.total() as usize) else {
            continue;
        };
        if record.adhd {
            bin.positive += 1;
        } else {
            bin.negative += 1;
        }
    }
    bins
}
