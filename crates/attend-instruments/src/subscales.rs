use serde::{Deserialize, Serialize};
use ts_rs::TS;

use attend_core::models::questionnaire::{AnswerMap, QuestionnaireResponse};

use crate::error::InstrumentError;
use crate::instruments::asrs::Asrs;
use crate::scoring::ScoreEntry;
use crate::Instrument;

/// Part A, the six-item screener.
pub const PART_A: [u8; 6] = [1, 2, 3, 4, 5, 6];

/// Part B, the remaining twelve items.
pub const PART_B: [u8; 12] = [7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18];

/// Inattention grouping. Overlaps Part A and Part B.
pub const INATTENTION: [u8; 7] = [1, 2, 3, 4, 7, 8, 9];

/// Hyperactivity/impulsivity grouping. Overlaps Part A and Part B.
pub const HYPERACTIVITY: [u8; 11] = [5, 6, 10, 11, 12, 13, 14, 15, 16, 17, 18];

/// Highest answer code, used to derive subscale maxima.
const MAX_CODE: u32 = 4;

/// Sums for every ASRS subscale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubScaleScores {
    pub part_a: u32,
    pub part_b: u32,
    pub total: u32,
    pub inattention: u32,
    pub hyperactivity: u32,
}

impl SubScaleScores {
    /// Subscale ids as registered on the ASRS instrument, with values.
    pub fn to_entries(&self) -> Vec<ScoreEntry> {
        vec![
            ScoreEntry::new("part_a", self.part_a),
            ScoreEntry::new("part_b", self.part_b),
            ScoreEntry::new("total", self.total),
            ScoreEntry::new("inattention", self.inattention),
            ScoreEntry::new("hyperactivity", self.hyperactivity),
        ]
    }

    /// Check ranges against the instrument definition and the
    /// `part_a + part_b == total` identity.
    pub fn validate(&self) -> Result<(), InstrumentError> {
        if let Some(error) = Asrs.validate_scores(&self.to_entries()).into_iter().next() {
            return Err(error.into());
        }
        if self.part_a + self.part_b != self.total {
            return Err(InstrumentError::InvalidScores(format!(
                "part_a ({}) + part_b ({}) must equal total ({})",
                self.part_a, self.part_b, self.total
            )));
        }
        Ok(())
    }
}

/// Compute every subscale sum from a complete response.
pub fn compute_subscales(responses: &QuestionnaireResponse) -> SubScaleScores {
    let part_a = responses.sum_over(&PART_A);
    let part_b = responses.sum_over(&PART_B);
    SubScaleScores {
        part_a,
        part_b,
        total: part_a + part_b,
        inattention: responses.sum_over(&INATTENTION),
        hyperactivity: responses.sum_over(&HYPERACTIVITY),
    }
}

/// Validate a raw answer map, then score it.
pub fn compute_subscales_from_map(answers: &AnswerMap) -> Result<SubScaleScores, InstrumentError> {
    let responses = QuestionnaireResponse::from_answers(answers)?;
    Ok(compute_subscales(&responses))
}

/// Maximum attainable sum for a membership table.
pub fn max_score(items: &[u8]) -> u32 {
    items.len() as u32 * MAX_CODE
}
