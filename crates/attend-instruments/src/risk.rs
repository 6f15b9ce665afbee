//! Heuristic risk estimate.
//!
//! A fixed table of additive weights with a hard cap. Weights are held in
//! basis points (1 bp = 0.0001) so sums are exact and the resulting
//! probability matches the decimal weights bit for bit.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use attend_core::models::demographics::DemographicProfile;
use attend_core::models::questionnaire::{AnswerCode, QuestionnaireResponse};

use crate::error::InstrumentError;
use crate::subscales::SubScaleScores;

pub const BASIS_POINTS: u32 = 10_000;

static DEFAULT_RULES: LazyLock<RiskRules> = LazyLock::new(RiskRules::default);

/// One step of a threshold ladder: `value >= at_least` earns `weight_bp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rung {
    pub at_least: u32,
    pub weight_bp: u32,
}

/// Threshold ladder. The highest rung reached wins; nothing is added below
/// the lowest rung.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Ladder {
    pub rungs: Vec<Rung>,
}

impl Ladder {
    pub fn new(rungs: &[(u32, u32)]) -> Self {
        Self {
            rungs: rungs
                .iter()
                .map(|&(at_least, weight_bp)| Rung { at_least, weight_bp })
                .collect(),
        }
    }

    pub fn weight_for(&self, value: u32) -> u32 {
        self.rungs
            .iter()
            .filter(|rung| value >= rung.at_least)
            .max_by_key(|rung| rung.at_least)
            .map_or(0, |rung| rung.weight_bp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DimensionGapRule {
    /// Fires when `|inattention - hyperactivity|` is strictly greater.
    pub more_than: u32,
    pub weight_bp: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AgeRule {
    pub below: u8,
    pub weight_bp: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WellbeingRule {
    pub quality_of_life_below: u8,
    pub stress_above: u8,
    pub weight_bp: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ElevatedResponsesRule {
    /// Answer code counted as elevated (inclusive).
    pub min_code: u8,
    pub min_count: u32,
    pub weight_bp: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ConfidenceLabel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RecommendedAction {
    RoutineMonitoring,
    PrimaryCareFollowUp,
    SpecialistEvaluation,
    UrgentSpecialistEvaluation,
}

impl RecommendedAction {
    pub fn description(self) -> &'static str {
        match self {
            RecommendedAction::RoutineMonitoring => {
                "Keep monitoring; repeat the screening if symptoms change."
            }
            RecommendedAction::PrimaryCareFollowUp => {
                "Discuss the results with your general practitioner and track symptoms over the next weeks."
            }
            RecommendedAction::SpecialistEvaluation => {
                "Ask for a specialist evaluation and document the symptoms you observe."
            }
            RecommendedAction::UrgentSpecialistEvaluation => {
                "Consult a specialist promptly; consider a neuropsychological assessment."
            }
        }
    }
}

/// Probability strictly above `above_bp` maps to `label` / `action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LabelBand {
    pub above_bp: u32,
    pub label: ConfidenceLabel,
    pub action: RecommendedAction,
}

/// Names of the rules, as reported in [`RiskEstimate::contributions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskRule {
    PartA,
    Total,
    DimensionGap,
    YoungAdult,
    Wellbeing,
    ElevatedResponses,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskContribution {
    pub rule: RiskRule,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskEstimate {
    pub probability: f64,
    pub confidence_label: ConfidenceLabel,
    pub recommended_action: RecommendedAction,
    pub contributions: Vec<RiskContribution>,
}

/// The full rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskRules {
    pub part_a: Ladder,
    pub total: Ladder,
    pub dimension_gap: DimensionGapRule,
    pub young_adult: AgeRule,
    pub wellbeing: WellbeingRule,
    pub elevated_responses: ElevatedResponsesRule,
    pub cap_bp: u32,
    /// Checked from the highest `above_bp` down; below all bands the
    /// estimate is low / routine monitoring.
    pub bands: Vec<LabelBand>,
}

impl Default for RiskRules {
    fn default() -> Self {
        Self {
            part_a: Ladder::new(&[(16, 4_000), (14, 3_000), (10, 2_000)]),
            total: Ladder::new(&[(45, 2_500), (35, 1_500)]),
            dimension_gap: DimensionGapRule {
                more_than: 10,
                weight_bp: 1_000,
            },
            young_adult: AgeRule {
                below: 25,
                weight_bp: 500,
            },
            wellbeing: WellbeingRule {
                quality_of_life_below: 5,
                stress_above: 3,
                weight_bp: 1_000,
            },
            elevated_responses: ElevatedResponsesRule {
                min_code: AnswerCode::Often.value(),
                min_count: 8,
                weight_bp: 1_000,
            },
            cap_bp: 9_500,
            // Urgent referral sits on its own VeryHigh label above 0.80;
            // High covers 0.60..=0.80.
            bands: vec![
                LabelBand {
                    above_bp: 8_000,
                    label: ConfidenceLabel::VeryHigh,
                    action: RecommendedAction::UrgentSpecialistEvaluation,
                },
                LabelBand {
                    above_bp: 6_000,
                    label: ConfidenceLabel::High,
                    action: RecommendedAction::SpecialistEvaluation,
                },
                LabelBand {
                    above_bp: 4_000,
                    label: ConfidenceLabel::Moderate,
                    action: RecommendedAction::PrimaryCareFollowUp,
                },
            ],
        }
    }
}

impl RiskRules {
    /// Reject tables that could produce a value outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), InstrumentError> {
        if self.cap_bp > BASIS_POINTS {
            return Err(InstrumentError::InvalidRules(format!(
                "cap_bp {} exceeds {BASIS_POINTS}",
                self.cap_bp
            )));
        }
        if self.elevated_responses.min_code > AnswerCode::VeryOften.value() {
            return Err(InstrumentError::InvalidRules(format!(
                "elevated_responses.min_code {} is not an answer code",
                self.elevated_responses.min_code
            )));
        }
        Ok(())
    }

    /// Apply the table. Scores are range-checked first.
    pub fn estimate(
        &self,
        scores: &SubScaleScores,
        demo: &DemographicProfile,
        responses: &QuestionnaireResponse,
    ) -> Result<RiskEstimate, InstrumentError> {
        scores.validate()?;

        let elevated_code = AnswerCode::try_from(self.elevated_responses.min_code)?;
        let elevated = responses.count_at_least(elevated_code) as u32;

        let candidates = [
            (RiskRule::PartA, self.part_a.weight_for(scores.part_a)),
            (RiskRule::Total, self.total.weight_for(scores.total)),
            (
                RiskRule::DimensionGap,
                fires(
                    scores.inattention.abs_diff(scores.hyperactivity) > self.dimension_gap.more_than,
                    self.dimension_gap.weight_bp,
                ),
            ),
            (
                RiskRule::YoungAdult,
                fires(demo.age < self.young_adult.below, self.young_adult.weight_bp),
            ),
            (
                RiskRule::Wellbeing,
                fires(
                    demo.quality_of_life < self.wellbeing.quality_of_life_below
                        && demo.stress_level > self.wellbeing.stress_above,
                    self.wellbeing.weight_bp,
                ),
            ),
            (
                RiskRule::ElevatedResponses,
                fires(
                    elevated >= self.elevated_responses.min_count,
                    self.elevated_responses.weight_bp,
                ),
            ),
        ];

        let accumulated: u32 = candidates.iter().map(|&(_, bp)| bp).sum();
        let probability_bp = accumulated.min(self.cap_bp);

        let (confidence_label, recommended_action) = self.band_for(probability_bp);

        Ok(RiskEstimate {
            probability: to_probability(probability_bp),
            confidence_label,
            recommended_action,
            contributions: candidates
                .iter()
                .filter(|&&(_, bp)| bp > 0)
                .map(|&(rule, bp)| RiskContribution {
                    rule,
                    weight: to_probability(bp),
                })
                .collect(),
        })
    }

    pub fn band_for(&self, probability_bp: u32) -> (ConfidenceLabel, RecommendedAction) {
        self.bands
            .iter()
            .filter(|band| probability_bp > band.above_bp)
            .max_by_key(|band| band.above_bp)
            .map_or(
                (ConfidenceLabel::Low, RecommendedAction::RoutineMonitoring),
                |band| (band.label, band.action),
            )
    }
}

/// Estimate with the default rule table.
pub fn estimate_risk(
    scores: &SubScaleScores,
    demo: &DemographicProfile,
    responses: &QuestionnaireResponse,
) -> Result<RiskEstimate, InstrumentError> {
    DEFAULT_RULES.estimate(scores, demo, responses)
}

pub fn to_probability(bp: u32) -> f64 {
    f64::from(bp) / f64::from(BASIS_POINTS)
}

fn fires(condition: bool, weight_bp: u32) -> u32 {
    if condition { weight_bp } else { 0 }
}
