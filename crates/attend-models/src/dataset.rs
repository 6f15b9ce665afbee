use std::io;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use attend_core::models::demographics::{Education, Gender};
use attend_core::models::questionnaire::QUESTION_COUNT;

use crate::error::ModelError;
use crate::synthetic;

/// Name of the diagnosis column every dataset must carry.
pub const TARGET_COLUMN: &str = "adhd";

/// Subsample sizes and seeds offered next to the full dataset.
pub const SUBSAMPLES: [(usize, u64); 5] = [(300, 1), (400, 2), (350, 3), (250, 4), (200, 5)];

const FEATURE_COLUMNS: [&str; 9] = [
    "age",
    "gender",
    "education",
    "hyperactivity_score",
    "inattention_score",
    "impulsivity_score",
    "learning_difficulties",
    "family_history",
    "tester_status",
];

/// Who filled in the questionnaire for the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TesterStatus {
    Family,
    Physician,
    Psychologist,
    #[serde(rename = "self")]
    SelfReport,
}

impl TesterStatus {
    pub const ALL: [TesterStatus; 4] = [
        TesterStatus::Family,
        TesterStatus::Physician,
        TesterStatus::Psychologist,
        TesterStatus::SelfReport,
    ];
}

/// One subject of the tabular dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub age: u8,
    pub gender: Gender,
    pub education: Education,
    pub hyperactivity_score: u8,
    pub inattention_score: u8,
    pub impulsivity_score: u8,
    pub learning_difficulties: bool,
    pub family_history: bool,
    pub tester_status: TesterStatus,
    /// Answers to q1..q18, 0-4 each.
    pub items: [u8; QUESTION_COUNT],
    pub adhd: bool,
}

impl Record {
    pub fn total(&self) -> u32 {
        self.items.iter().map(|&v| u32::from(v)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DatasetSource {
    File { path: PathBuf },
    Synthetic { samples: usize, seed: u64 },
}

/// Where the rows came from, and whether a fallback replaced a failed load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub source: DatasetSource,
    pub fallback_used: bool,
    pub fallback_reason: Option<String>,
}

/// What to do when the configured dataset file cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Surface the load error.
    Strict,
    /// Substitute synthetic data, flagged in the provenance.
    Synthetic { samples: usize, seed: u64 },
}

#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub provenance: Provenance,
}

impl Dataset {
    pub fn new(records: Vec<Record>, source: DatasetSource) -> Self {
        Self {
            records,
            provenance: Provenance {
                source,
                fallback_used: false,
                fallback_reason: None,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn labels(&self) -> Vec<bool> {
        self.records.iter().map(|r| r.adhd).collect()
    }

    pub fn from_csv(path: &Path) -> Result<Self, ModelError> {
        let file = std::fs::File::open(path)?;
        let records = read_records(file)?;
        let dataset = Self::new(
            records,
            DatasetSource::File {
                path: path.to_path_buf(),
            },
        );
        dataset.ensure_trainable()?;
        tracing::info!(path = %path.display(), rows = dataset.len(), "dataset loaded");
        Ok(dataset)
    }

    /// Load `path` if given, otherwise generate synthetic data.
    ///
    /// A failed load is only replaced when `policy` allows it; the
    /// replacement is logged and recorded in [`Provenance`].
    pub fn load_or_synthesize(path: Option<&Path>, policy: FallbackPolicy) -> Result<Self, ModelError> {
        let Some(path) = path else {
            let (samples, seed) = match policy {
                FallbackPolicy::Synthetic { samples, seed } => (samples, seed),
                FallbackPolicy::Strict => (synthetic::DEFAULT_SAMPLES, synthetic::DEFAULT_SEED),
            };
            return Ok(synthetic::generate(samples, seed));
        };

        match (Self::from_csv(path), policy) {
            (Ok(dataset), _) => Ok(dataset),
            (Err(e), FallbackPolicy::Strict) => Err(e),
            (Err(e), FallbackPolicy::Synthetic { samples, seed }) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "dataset unavailable, substituting synthetic data"
                );
                let mut dataset = synthetic::generate(samples, seed);
                dataset.provenance.fallback_used = true;
                dataset.provenance.fallback_reason = Some(e.to_string());
                Ok(dataset)
            }
        }
    }

    /// Fail unless the dataset has rows of both target classes.
    pub fn ensure_trainable(&self) -> Result<(), ModelError> {
        if self.records.is_empty() {
            return Err(ModelError::NoTrainableData("dataset has no rows".to_string()));
        }
        let positives = self.records.iter().filter(|r| r.adhd).count();
        if positives == 0 || positives == self.records.len() {
            return Err(ModelError::NoTrainableData(format!(
                "target column '{TARGET_COLUMN}' has a single class"
            )));
        }
        Ok(())
    }

    /// Seeded sample without replacement, capped at the dataset size.
    pub fn sample(&self, n: usize, seed: u64) -> Dataset {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut indices: Vec<usize> = (0..self.records.len()).collect();
        indices.shuffle(&mut rng);
        indices.truncate(n);

        Dataset {
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
            provenance: self.provenance.clone(),
        }
    }

    /// The standard five subsamples.
    pub fn subsamples(&self) -> Vec<Dataset> {
        SUBSAMPLES
            .iter()
            .map(|&(n, seed)| self.sample(n, seed))
            .collect()
    }
}

/// Parse headered CSV rows into records. Header names are matched
/// case-insensitively; cells are trimmed.
pub fn read_records<R: io::Read>(reader: R) -> Result<Vec<Record>, ModelError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers: csv::StringRecord = csv.headers()?.iter().map(str::to_ascii_lowercase).collect();
    check_columns(&headers)?;
    csv.set_headers(headers.clone());

    let mut records = Vec::new();
    for (index, result) in csv.deserialize::<CsvRow>().enumerate() {
        let row = result.map_err(|e| cell_error(e, &headers))?;
        // Header is line 1.
        records.push(row.into_record(index + 2)?);
    }
    Ok(records)
}

fn check_columns(headers: &csv::StringRecord) -> Result<(), ModelError> {
    let has = |name: &str| headers.iter().any(|h| h == name);
    if !has(TARGET_COLUMN) {
        return Err(ModelError::NoTrainableData(format!(
            "target column '{TARGET_COLUMN}' is missing"
        )));
    }
    let items = (1..=QUESTION_COUNT).map(|q| format!("q{q}"));
    for name in FEATURE_COLUMNS.iter().map(|c| c.to_string()).chain(items) {
        if !has(&name) {
            return Err(ModelError::MissingColumn(name));
        }
    }
    Ok(())
}

/// Name the offending column when serde rejected a cell.
fn cell_error(e: csv::Error, headers: &csv::StringRecord) -> ModelError {
    if let csv::ErrorKind::Deserialize { pos, err } = e.kind() {
        if let Some(column) = err.field().and_then(|f| headers.get(f as usize)) {
            return ModelError::InvalidValue {
                line: pos.as_ref().map_or(0, |p| p.line() as usize),
                column: column.to_string(),
                reason: err.kind().to_string(),
            };
        }
    }
    ModelError::Csv(e)
}

/// One CSV line as serde sees it; ranges are checked in `into_record`.
#[derive(Debug, Deserialize)]
struct CsvRow {
    age: u8,
    #[serde(deserialize_with = "gender")]
    gender: Gender,
    #[serde(deserialize_with = "education")]
    education: Education,
    hyperactivity_score: u8,
    inattention_score: u8,
    impulsivity_score: u8,
    #[serde(deserialize_with = "yes_no")]
    learning_difficulties: bool,
    #[serde(deserialize_with = "yes_no")]
    family_history: bool,
    #[serde(deserialize_with = "tester_status")]
    tester_status: TesterStatus,
    q1: u8,
    q2: u8,
    q3: u8,
    q4: u8,
    q5: u8,
    q6: u8,
    q7: u8,
    q8: u8,
    q9: u8,
    q10: u8,
    q11: u8,
    q12: u8,
    q13: u8,
    q14: u8,
    q15: u8,
    q16: u8,
    q17: u8,
    q18: u8,
    #[serde(deserialize_with = "yes_no")]
    adhd: bool,
}

/// Inclusive upper bounds of the subscale scores.
const MAX_HYPERACTIVITY: u8 = 27;
const MAX_INATTENTION: u8 = 27;
const MAX_IMPULSIVITY: u8 = 19;
const MAX_ITEM: u8 = 4;

impl CsvRow {
    fn into_record(self, line: usize) -> Result<Record, ModelError> {
        let within = |column: &str, value: u8, max: u8| -> Result<u8, ModelError> {
            if value <= max {
                Ok(value)
            } else {
                Err(ModelError::InvalidValue {
                    line,
                    column: column.to_string(),
                    reason: format!("{value} is outside 0..={max}"),
                })
            }
        };

        let answers = [
            self.q1, self.q2, self.q3, self.q4, self.q5, self.q6, self.q7, self.q8, self.q9,
            self.q10, self.q11, self.q12, self.q13, self.q14, self.q15, self.q16, self.q17, self.q18,
        ];
        let mut items = [0u8; QUESTION_COUNT];
        for (i, (slot, value)) in items.iter_mut().zip(answers).enumerate() {
            *slot = within(&format!("q{}", i + 1), value, MAX_ITEM)?;
        }

        Ok(Record {
            age: self.age,
            gender: self.gender,
            education: self.education,
            hyperactivity_score: within("hyperactivity_score", self.hyperactivity_score, MAX_HYPERACTIVITY)?,
            inattention_score: within("inattention_score", self.inattention_score, MAX_INATTENTION)?,
            impulsivity_score: within("impulsivity_score", self.impulsivity_score, MAX_IMPULSIVITY)?,
            learning_difficulties: self.learning_difficulties,
            family_history: self.family_history,
            tester_status: self.tester_status,
            items,
            adhd: self.adhd,
        })
    }
}


fn gender<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Gender, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.to_ascii_lowercase().as_str() {
        "m" | "male" => Ok(Gender::Male),
        "f" | "female" => Ok(Gender::Female),
        _ => Err(de::Error::custom(format!("unrecognized gender '{raw}'"))),
    }
}

fn education<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Education, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.to_ascii_lowercase().as_str() {
        "primary" => Ok(Education::Primary),
        "secondary" => Ok(Education::Secondary),
        "higher" => Ok(Education::Higher),
        _ => Err(de::Error::custom(format!("unrecognized education '{raw}'"))),
    }
}

fn tester_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TesterStatus, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.to_ascii_lowercase().as_str() {
        "family" => Ok(TesterStatus::Family),
        "physician" => Ok(TesterStatus::Physician),
        "psychologist" => Ok(TesterStatus::Psychologist),
        "self" => Ok(TesterStatus::SelfReport),
        _ => Err(de::Error::custom(format!("unrecognized tester status '{raw}'"))),
    }
}

fn yes_no<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Ok(true),
        "0" | "false" | "no" | "n" => Ok(false),
        _ => Err(de::Error::custom(format!("expected yes/no or 1/0, got '{raw}'"))),
    }
}
