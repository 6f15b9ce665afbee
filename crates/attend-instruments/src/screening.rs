use serde::{Deserialize, Serialize};
use ts_rs::TS;

use attend_core::models::demographics::DemographicProfile;
use attend_core::models::questionnaire::{AnswerCode, QuestionnaireResponse};
use attend_core::models::session::Submission;

use crate::error::InstrumentError;
use crate::instruments::asrs::Asrs;
use crate::risk::{RiskEstimate, RiskRules};
use crate::screener::{self, ScreenerResult};
use crate::scoring::ScoreEntry;
use crate::subscales::{compute_subscales, SubScaleScores};
use crate::Instrument;

/// Everything computed from one submitted questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScreeningResult {
    pub instrument_id: String,
    pub scores: SubScaleScores,
    pub screener: ScreenerResult,
    pub risk: RiskEstimate,
    /// Answers at "Often" or above.
    pub elevated_responses: u32,
}

impl ScreeningResult {
    /// Scores plus screener counts, keyed by ASRS subscale id.
    pub fn score_entries(&self) -> Vec<ScoreEntry> {
        let mut entries = self.scores.to_entries();
        entries.push(ScoreEntry::new(
            "part_a_positive_items",
            u32::from(self.screener.part_a_positive_items),
        ));
        entries.push(ScoreEntry::new(
            "part_b_positive_items",
            u32::from(self.screener.part_b_positive_items),
        ));
        entries
    }

    /// Structured text rendering through the instrument's layout.
    pub fn to_structured_input(&self) -> String {
        Asrs.to_structured_input(&self.score_entries())
    }
}

/// Scorer → screener → risk estimator.
pub fn screen(
    responses: &QuestionnaireResponse,
    demographics: &DemographicProfile,
    rules: &RiskRules,
) -> Result<ScreeningResult, InstrumentError> {
    let scores = compute_subscales(responses);
    let risk = rules.estimate(&scores, demographics, responses)?;

    Ok(ScreeningResult {
        instrument_id: Asrs.id().to_string(),
        scores,
        screener: screener::screen(responses),
        risk,
        elevated_responses: responses.count_at_least(AnswerCode::Often) as u32,
    })
}

pub fn screen_submission(
    submission: &Submission,
    rules: &RiskRules,
) -> Result<ScreeningResult, InstrumentError> {
    screen(&submission.responses, &submission.demographics, rules)
}
