//! Seeded demo dataset generator.
//!
//! Item answers are uniform on 0..=4 and the diagnosis is drawn with
//! probability `total / 72 * 0.8 + 0.1`, so the label correlates with the
//! questionnaire total but not perfectly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use attend_core::models::demographics::{Education, Gender};
use attend_core::models::questionnaire::QUESTION_COUNT;

use crate::dataset::{Dataset, DatasetSource, Record, TesterStatus};

pub const DEFAULT_SAMPLES: usize = 1500;
pub const DEFAULT_SEED: u64 = 42;

const AGE_MEAN: f64 = 35.0;
const AGE_STD: f64 = 12.0;
const MAX_TOTAL: f64 = 72.0;

pub fn generate(samples: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let records = (0..samples).map(|_| record(&mut rng)).collect();
    tracing::debug!(samples, seed, "generated synthetic dataset");
    Dataset::new(records, DatasetSource::Synthetic { samples, seed })
}

fn record(rng: &mut StdRng) -> Record {
    let mut items = [0u8; QUESTION_COUNT];
    for item in &mut items {
        *item = rng.gen_range(0..=4);
    }
    let total: u32 = items.iter().map(|&v| u32::from(v)).sum();
    let adhd_probability = f64::from(total) / MAX_TOTAL * 0.8 + 0.1;

    Record {
        age: age(rng),
        gender: if rng.gen_bool(0.6) {
            Gender::Male
        } else {
            Gender::Female
        },
        education: match rng.gen_range(0..3) {
            0 => Education::Primary,
            1 => Education::Secondary,
            _ => Education::Higher,
        },
        hyperactivity_score: rng.gen_range(0..28),
        inattention_score: rng.gen_range(0..28),
        impulsivity_score: rng.gen_range(0..20),
        learning_difficulties: rng.gen_bool(0.3),
        family_history: rng.gen_bool(0.4),
        tester_status: TesterStatus::ALL[rng.gen_range(0..TesterStatus::ALL.len())],
        items,
        adhd: rng.gen_bool(adhd_probability),
    }
}

/// Truncated normal age; implausible draws are replaced uniformly.
fn age(rng: &mut StdRng) -> u8 {
    let drawn = (AGE_MEAN + AGE_STD * standard_normal(rng)) as i64;
    if drawn < 6 {
        rng.gen_range(6..18)
    } else if drawn > 65 {
        rng.gen_range(18..65)
    } else {
        drawn as u8
    }
}

/// Box-Muller transform.
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.r#gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
