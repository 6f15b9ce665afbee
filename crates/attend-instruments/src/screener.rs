use serde::{Deserialize, Serialize};
use ts_rs::TS;

use attend_core::models::questionnaire::{AnswerCode, QuestionId, QuestionnaireResponse};

use crate::subscales::{PART_A, PART_B};

/// Items whose shaded box starts at "Sometimes". Every other item starts
/// at "Often".
const SOMETIMES_ITEMS: [u8; 7] = [1, 2, 3, 9, 12, 16, 18];

/// Part A is screen-positive at this many shaded answers.
pub const PART_A_POSITIVE_MIN: u8 = 4;

/// Outcome of the shaded-box screener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScreenerResult {
    pub part_a_positive_items: u8,
    pub part_a_positive: bool,
    pub part_b_positive_items: u8,
}

/// Lowest answer that lands in the shaded box for `question`.
pub fn threshold(question: u8) -> AnswerCode {
    if SOMETIMES_ITEMS.contains(&question) {
        AnswerCode::Sometimes
    } else {
        AnswerCode::Often
    }
}

pub fn screen(responses: &QuestionnaireResponse) -> ScreenerResult {
    let part_a_positive_items = shaded(responses, &PART_A);
    ScreenerResult {
        part_a_positive_items,
        part_a_positive: part_a_positive_items >= PART_A_POSITIVE_MIN,
        part_b_positive_items: shaded(responses, &PART_B),
    }
}

fn shaded(responses: &QuestionnaireResponse, items: &[u8]) -> u8 {
    items
        .iter()
        .filter_map(|&id| QuestionId::new(id).ok())
        .filter(|&id| responses.answer(id) >= threshold(id.get()))
        .count() as u8
}
