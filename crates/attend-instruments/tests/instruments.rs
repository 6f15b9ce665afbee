use attend_core::models::demographics::{DemographicInput, Education, Gender, JobStatus};
use attend_core::models::questionnaire::{AnswerCode, QuestionnaireResponse};
use attend_instruments::risk::RiskRules;
use attend_instruments::scoring::ScoreEntry;
use attend_instruments::screening::screen;
use attend_instruments::{all_instruments, get_instrument};

#[test]
fn asrs_is_registered() {
    assert_eq!(all_instruments().len(), 1);
    let asrs = get_instrument("asrs_v1_1").unwrap();
    assert_eq!(asrs.name(), "ASRS v1.1");
    assert_eq!(asrs.items().len(), 18);
    assert_eq!(asrs.answer_options().len(), 5);
    assert!(get_instrument("srs2").is_none());
}

#[test]
fn item_thresholds_are_exposed() {
    let asrs = get_instrument("asrs_v1_1").unwrap();
    assert_eq!(asrs.items()[0].screener_threshold, 2);
    assert_eq!(asrs.items()[3].screener_threshold, 3);
}

#[test]
fn validate_scores_flags_out_of_range() {
    let asrs = get_instrument("asrs_v1_1").unwrap();
    let errors = asrs.validate_scores(&[
        ScoreEntry::new("part_a", 25),
        ScoreEntry::new("total", 72),
        ScoreEntry::new("hyperactivity", 45),
    ]);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].subscale_id, "part_a");
    assert_eq!(errors[1].subscale_id, "hyperactivity");
}

#[test]
fn screening_combines_every_stage() {
    let demographics = DemographicInput {
        age: Some(22),
        gender: Some(Gender::Female),
        education: Some(Education::Higher),
        job_status: Some(JobStatus::Student),
        quality_of_life: Some(7),
        stress_level: Some(2),
    }
    .validate()
    .unwrap();
    let responses = QuestionnaireResponse::uniform(AnswerCode::Often);

    let result = screen(&responses, &demographics, &RiskRules::default()).unwrap();
    assert_eq!(result.instrument_id, "asrs_v1_1");
    assert_eq!(result.scores.total, 54);
    assert!(result.screener.part_a_positive);
    assert_eq!(result.elevated_responses, 18);
    // part_a 18 → 0.40, total 54 → 0.25, gap |21-33| = 12 → 0.10,
    // age 22 → 0.05, elevated → 0.10
    assert_eq!(result.risk.probability, 0.90);

    let text = result.to_structured_input();
    assert!(text.starts_with("## ASRS v1.1"));
    assert!(text.contains("- Total: 54 / 72"));
}
