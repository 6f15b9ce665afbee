use attend_core::models::demographics::{DemographicInput, DemographicProfile, Education, Gender, JobStatus};
use attend_core::models::questionnaire::{AnswerCode, AnswerMap, QuestionnaireResponse};
use attend_instruments::risk::{
    estimate_risk, ConfidenceLabel, Ladder, RecommendedAction, RiskRule, RiskRules,
};
use attend_instruments::subscales::{compute_subscales, SubScaleScores};

fn demo(age: i32, quality_of_life: i32, stress_level: i32) -> DemographicProfile {
    DemographicInput {
        age: Some(age),
        gender: Some(Gender::Male),
        education: Some(Education::Secondary),
        job_status: Some(JobStatus::Employed),
        quality_of_life: Some(quality_of_life),
        stress_level: Some(stress_level),
    }
    .validate()
    .unwrap()
}

fn neutral() -> DemographicProfile {
    demo(30, 5, 3)
}

fn response_with(f: impl Fn(u8) -> u8) -> QuestionnaireResponse {
    let answers: AnswerMap = (1..=18).map(|q| (q, f(q))).collect();
    QuestionnaireResponse::from_answers(&answers).unwrap()
}

fn risk_for(response: &QuestionnaireResponse, demo: &DemographicProfile) -> f64 {
    estimate_risk(&compute_subscales(response), demo, response)
        .unwrap()
        .probability
}

#[test]
fn all_never_scores_zero() {
    let response = QuestionnaireResponse::uniform(AnswerCode::Never);
    let estimate = estimate_risk(&compute_subscales(&response), &neutral(), &response).unwrap();
    assert_eq!(estimate.probability, 0.0);
    assert_eq!(estimate.confidence_label, ConfidenceLabel::Low);
    assert_eq!(estimate.recommended_action, RecommendedAction::RoutineMonitoring);
    assert!(estimate.contributions.is_empty());
}

#[test]
fn part_a_maxed_only_scores_point_four() {
    let response = response_with(|q| if q <= 6 { 4 } else { 0 });
    let estimate = estimate_risk(&compute_subscales(&response), &neutral(), &response).unwrap();
    assert_eq!(estimate.probability, 0.40);
    assert_eq!(estimate.confidence_label, ConfidenceLabel::Low);
    assert_eq!(estimate.contributions.len(), 1);
    assert_eq!(estimate.contributions[0].rule, RiskRule::PartA);
}

#[test]
fn all_very_often_scores_point_eight_five() {
    let response = QuestionnaireResponse::uniform(AnswerCode::VeryOften);
    let estimate = estimate_risk(&compute_subscales(&response), &neutral(), &response).unwrap();
    assert_eq!(estimate.probability, 0.85);
    assert_eq!(estimate.confidence_label, ConfidenceLabel::VeryHigh);
    assert_eq!(
        estimate.recommended_action,
        RecommendedAction::UrgentSpecialistEvaluation
    );
}

#[test]
fn probability_is_capped() {
    let response = QuestionnaireResponse::uniform(AnswerCode::VeryOften);
    // 0.85 + young adult 0.05 + wellbeing 0.10 = 1.00 before the cap.
    assert_eq!(risk_for(&response, &demo(20, 2, 5)), 0.95);
}

#[test]
fn cap_holds_across_inputs() {
    for code in AnswerCode::ALL {
        for age in [18, 40] {
            for (qol, stress) in [(1, 5), (8, 1)] {
                let response = QuestionnaireResponse::uniform(code);
                assert!(risk_for(&response, &demo(age, qol, stress)) <= 0.95);
            }
        }
    }
}

#[test]
fn part_a_ladder_boundaries_are_inclusive() {
    let rules = RiskRules::default();
    assert_eq!(rules.part_a.weight_for(16), 4_000);
    assert_eq!(rules.part_a.weight_for(15), 3_000);
    assert_eq!(rules.part_a.weight_for(14), 3_000);
    assert_eq!(rules.part_a.weight_for(13), 2_000);
    assert_eq!(rules.part_a.weight_for(10), 2_000);
    assert_eq!(rules.part_a.weight_for(9), 0);
}

#[test]
fn total_ladder_boundaries_are_inclusive() {
    let rules = RiskRules::default();
    assert_eq!(rules.total.weight_for(45), 2_500);
    assert_eq!(rules.total.weight_for(44), 1_500);
    assert_eq!(rules.total.weight_for(35), 1_500);
    assert_eq!(rules.total.weight_for(34), 0);
}

#[test]
fn part_a_of_fourteen_versus_thirteen() {
    // Items 1-6 = 3,3,2,2,2,2 (14) and 3,2,2,2,2,2 (13); Part B zero.
    let fourteen = response_with(|q| match q {
        1 | 2 => 3,
        3..=6 => 2,
        _ => 0,
    });
    let thirteen = response_with(|q| match q {
        1 => 3,
        2..=6 => 2,
        _ => 0,
    });
    assert_eq!(compute_subscales(&fourteen).part_a, 14);
    assert_eq!(compute_subscales(&thirteen).part_a, 13);
    assert_eq!(risk_for(&fourteen, &neutral()), 0.30);
    assert_eq!(risk_for(&thirteen, &neutral()), 0.20);
}

#[test]
fn total_of_thirty_five_versus_thirty_four() {
    // Part A stays at 12 (< 14 but >= 10) so only the total rung moves.
    let base = |q: u8| if q <= 6 { 2 } else { 0 };
    let with_b = |extra: u8| {
        response_with(move |q| {
            if q <= 6 {
                base(q)
            } else if q == 7 {
                extra
            } else if q <= 12 {
                4
            } else {
                0
            }
        })
    };
    // 12 + 4*5 (items 8-12) = 32, plus item 7.
    let thirty_five = with_b(3);
    let thirty_four = with_b(2);
    assert_eq!(compute_subscales(&thirty_five).total, 35);
    assert_eq!(compute_subscales(&thirty_four).total, 34);

    let diff = |r: &QuestionnaireResponse| risk_for(r, &neutral());
    let gap = diff(&thirty_five) - diff(&thirty_four);
    assert!((gap - 0.15).abs() < 1e-12, "gap was {gap}");
}

#[test]
fn dimension_gap_is_strict() {
    let rules = RiskRules::default();
    let response = QuestionnaireResponse::uniform(AnswerCode::Never);
    let scores = |inattention, hyperactivity| SubScaleScores {
        part_a: 0,
        part_b: 0,
        total: 0,
        inattention,
        hyperactivity,
    };
    // Only validation of ranges and the part identity applies, so
    // synthetic dimension scores are accepted.
    let at_ten = rules.estimate(&scores(10, 0), &neutral(), &response).unwrap();
    let at_eleven = rules.estimate(&scores(11, 0), &neutral(), &response).unwrap();
    assert_eq!(at_ten.probability, 0.0);
    assert_eq!(at_eleven.probability, 0.10);
}

#[test]
fn demographic_rules() {
    let response = QuestionnaireResponse::uniform(AnswerCode::Never);
    assert_eq!(risk_for(&response, &demo(24, 5, 3)), 0.05);
    assert_eq!(risk_for(&response, &demo(25, 5, 3)), 0.0);
    assert_eq!(risk_for(&response, &demo(30, 4, 4)), 0.10);
    assert_eq!(risk_for(&response, &demo(30, 4, 3)), 0.0);
    assert_eq!(risk_for(&response, &demo(30, 5, 5)), 0.0);
}

#[test]
fn elevated_response_count_needs_eight() {
    let eight = response_with(|q| if (7..=14).contains(&q) { 3 } else { 0 });
    let seven = response_with(|q| if (7..=13).contains(&q) { 3 } else { 0 });
    let eight_risk = estimate_risk(&compute_subscales(&eight), &neutral(), &eight).unwrap();
    assert!(eight_risk
        .contributions
        .iter()
        .any(|c| c.rule == RiskRule::ElevatedResponses));
    let seven_risk = estimate_risk(&compute_subscales(&seven), &neutral(), &seven).unwrap();
    assert!(!seven_risk
        .contributions
        .iter()
        .any(|c| c.rule == RiskRule::ElevatedResponses));
}

#[test]
fn label_bands_use_strict_cutpoints() {
    let rules = RiskRules::default();
    assert_eq!(rules.band_for(8_001).0, ConfidenceLabel::VeryHigh);
    assert_eq!(rules.band_for(8_000).0, ConfidenceLabel::High);
    assert_eq!(rules.band_for(6_000).0, ConfidenceLabel::Moderate);
    assert_eq!(rules.band_for(4_001).0, ConfidenceLabel::Moderate);
    assert_eq!(rules.band_for(4_000).0, ConfidenceLabel::Low);
    assert_eq!(rules.band_for(0).1, RecommendedAction::RoutineMonitoring);
}

#[test]
fn urgent_referral_is_reserved_for_the_top_band() {
    let rules = RiskRules::default();
    assert_eq!(
        rules.band_for(8_001),
        (ConfidenceLabel::VeryHigh, RecommendedAction::UrgentSpecialistEvaluation)
    );
    assert_eq!(
        rules.band_for(8_000),
        (ConfidenceLabel::High, RecommendedAction::SpecialistEvaluation)
    );
    assert_eq!(
        rules.band_for(6_001),
        (ConfidenceLabel::High, RecommendedAction::SpecialistEvaluation)
    );
    assert_eq!(
        rules.band_for(4_001),
        (ConfidenceLabel::Moderate, RecommendedAction::PrimaryCareFollowUp)
    );
}

#[test]
fn custom_rules_round_trip_through_json() {
    let mut rules = RiskRules::default();
    rules.part_a = Ladder::new(&[(12, 5_000)]);
    let json = serde_json::to_string(&rules).unwrap();
    let back: RiskRules = serde_json::from_str(&json).unwrap();
    assert_eq!(back, rules);
    back.validate().unwrap();

    rules.cap_bp = 12_000;
    assert!(rules.validate().is_err());
}
