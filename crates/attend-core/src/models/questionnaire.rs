use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of items on the ASRS v1.1 symptom checklist.
pub const QUESTION_COUNT: usize = 18;

/// Raw answer store as submitted by a form: question id → answer code.
pub type AnswerMap = BTreeMap<u8, u8>;

/// Identifier of a questionnaire item, always in `1..=18`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct QuestionId(u8);

impl QuestionId {
    pub fn new(id: u8) -> Result<Self, CoreError> {
        if (1..=QUESTION_COUNT as u8).contains(&id) {
            Ok(Self(id))
        } else {
            Err(CoreError::UnknownQuestion(id))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All eighteen ids in questionnaire order.
    pub fn all() -> impl Iterator<Item = QuestionId> {
        (1..=QUESTION_COUNT as u8).map(QuestionId)
    }

    fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for QuestionId {
    type Error = CoreError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<QuestionId> for u8 {
    fn from(id: QuestionId) -> Self {
        id.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

/// Five-point frequency answer. Serialized as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AnswerCode {
    Never = 0,
    Rarely = 1,
    Sometimes = 2,
    Often = 3,
    VeryOften = 4,
}

impl AnswerCode {
    pub const ALL: [AnswerCode; 5] = [
        AnswerCode::Never,
        AnswerCode::Rarely,
        AnswerCode::Sometimes,
        AnswerCode::Often,
        AnswerCode::VeryOften,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            AnswerCode::Never => "Never",
            AnswerCode::Rarely => "Rarely",
            AnswerCode::Sometimes => "Sometimes",
            AnswerCode::Often => "Often",
            AnswerCode::VeryOften => "Very Often",
        }
    }
}

impl TryFrom<u8> for AnswerCode {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        AnswerCode::ALL
            .get(usize::from(code))
            .copied()
            .ok_or_else(|| CoreError::OutOfRange {
                field: "answer_code".to_string(),
                value: i64::from(code),
                min: 0,
                max: 4,
            })
    }
}

impl From<AnswerCode> for u8 {
    fn from(code: AnswerCode) -> Self {
        code.value()
    }
}

/// A complete, validated set of eighteen answers.
///
/// The only ways to build one are [`QuestionnaireResponse::from_answers`],
/// which rejects incomplete or out-of-range input, and
/// [`QuestionnaireResponse::from_codes`], which takes already-typed codes.
/// Once built it is never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AnswerMap", into = "AnswerMap")]
pub struct QuestionnaireResponse {
    answers: [AnswerCode; QUESTION_COUNT],
}

impl QuestionnaireResponse {
    /// Validate a raw answer map.
    ///
    /// Unknown question ids and out-of-range codes fail first; otherwise
    /// every missing question id is reported in a single
    /// [`CoreError::MissingResponse`].
    pub fn from_answers(answers: &AnswerMap) -> Result<Self, CoreError> {
        let mut slots: [Option<AnswerCode>; QUESTION_COUNT] = [None; QUESTION_COUNT];

        for (&question, &code) in answers {
            let id = QuestionId::new(question)?;
            let code = AnswerCode::try_from(code).map_err(|_| CoreError::OutOfRange {
                field: format!("answer to question {question}"),
                value: i64::from(code),
                min: 0,
                max: 4,
            })?;
            slots[id.index()] = Some(code);
        }

        let missing: Vec<u8> = QuestionId::all()
            .filter(|id| slots[id.index()].is_none())
            .map(QuestionId::get)
            .collect();
        if !missing.is_empty() {
            return Err(CoreError::MissingResponse {
                question_ids: missing,
            });
        }

        Ok(Self {
            answers: slots.map(|slot| slot.unwrap_or(AnswerCode::Never)),
        })
    }

    pub fn from_codes(answers: [AnswerCode; QUESTION_COUNT]) -> Self {
        Self { answers }
    }

    /// Every question answered with the same code.
    pub fn uniform(code: AnswerCode) -> Self {
        Self {
            answers: [code; QUESTION_COUNT],
        }
    }

    pub fn answer(&self, id: QuestionId) -> AnswerCode {
        self.answers[id.index()]
    }

    /// Answer for a raw id, `None` when the id is not on the questionnaire.
    pub fn answer_for(&self, id: u8) -> Option<AnswerCode> {
        QuestionId::new(id).ok().map(|id| self.answer(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, AnswerCode)> + '_ {
        QuestionId::all().zip(self.answers.iter().copied())
    }

    /// Sum of the answer codes for the listed question ids.
    pub fn sum_over(&self, ids: &[u8]) -> u32 {
        ids.iter()
            .filter_map(|&id| self.answer_for(id))
            .map(|code| u32::from(code.value()))
            .sum()
    }

    /// Number of answers at or above `threshold`.
    pub fn count_at_least(&self, threshold: AnswerCode) -> usize {
        self.answers.iter().filter(|&&code| code >= threshold).count()
    }

    /// Copy of this response with one answer replaced.
    pub fn with_answer(&self, id: QuestionId, code: AnswerCode) -> Self {
        let mut answers = self.answers;
        answers[id.index()] = code;
        Self { answers }
    }
}

impl TryFrom<AnswerMap> for QuestionnaireResponse {
    type Error = CoreError;

    fn try_from(answers: AnswerMap) -> Result<Self, Self::Error> {
        Self::from_answers(&answers)
    }
}

impl From<QuestionnaireResponse> for AnswerMap {
    fn from(response: QuestionnaireResponse) -> Self {
        response
            .iter()
            .map(|(id, code)| (id.get(), code.value()))
            .collect()
    }
}
