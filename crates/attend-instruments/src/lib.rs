//! attend-instruments
//!
//! Screening instrument definitions and scoring. Pure computation, no I/O.
//! Defines the ASRS v1.1 items and subscales, the sub-scale scorer, the
//! official shaded-box screener and the heuristic risk rule table.

pub mod error;
pub mod instruments;
pub mod risk;
pub mod screener;
pub mod screening;
pub mod scoring;
pub mod subscales;

use attend_core::models::questionnaire::AnswerCode;
use scoring::{AnswerOption, Domain, Item, ScoreEntry, ValidationError};

/// Trait implemented by each screening instrument.
pub trait Instrument: Send + Sync {
    /// Unique identifier for this instrument (e.g., "asrs_v1_1").
    fn id(&self) -> &str;

    /// Human-readable name (e.g., "ASRS v1.1").
    fn name(&self) -> &str;

    /// The domains and subscales this instrument measures.
    fn domains(&self) -> &[Domain];

    /// The items presented to the respondent, in order.
    fn items(&self) -> &[Item];

    /// Answer choices shared by every item.
    fn answer_options(&self) -> Vec<AnswerOption> {
        AnswerCode::ALL
            .iter()
            .map(|code| AnswerOption {
                code: code.value(),
                label: code.label().to_string(),
            })
            .collect()
    }

    /// Validate a set of score entries against this instrument's rules.
    fn validate_scores(&self, scores: &[ScoreEntry]) -> Vec<ValidationError> {
        let all_subscales: Vec<_> = self
            .domains()
            .iter()
            .flat_map(|d| &d.subscales)
            .collect();

        let mut errors = Vec::new();
        for entry in scores {
            if let Some(subscale) = all_subscales.iter().find(|s| s.id == entry.subscale_id)
                && !subscale.range.contains(entry.value)
            {
                errors.push(ValidationError {
                    subscale_id: entry.subscale_id.clone(),
                    value: entry.value,
                    expected_range: subscale.range,
                    score_type: subscale.score_type,
                    message: format!(
                        "{}: {} score {} is outside range [{}, {}]",
                        self.name(),
                        subscale.name,
                        entry.value,
                        subscale.range.min,
                        subscale.range.max,
                    ),
                });
            }
        }
        errors
    }

    /// Format scores as structured text, one section per domain.
    fn to_structured_input(&self, scores: &[ScoreEntry]) -> String {
        let mut output = format!("## {}\n\n", self.name());
        for domain in self.domains() {
            output.push_str(&format!("### {}\n", domain.name));
            for subscale in &domain.subscales {
                if let Some(entry) = scores.iter().find(|e| e.subscale_id == subscale.id) {
                    output.push_str(&format!(
                        "- {}: {} / {}\n",
                        subscale.name, entry.value, subscale.range.max
                    ));
                }
            }
            output.push('\n');
        }
        output
    }
}

/// Return all registered instruments.
pub fn all_instruments() -> Vec<Box<dyn Instrument>> {
    vec![Box::new(instruments::asrs::Asrs)]
}

/// Look up an instrument by ID.
pub fn get_instrument(id: &str) -> Option<Box<dyn Instrument>> {
    all_instruments().into_iter().find(|i| i.id() == id)
}
