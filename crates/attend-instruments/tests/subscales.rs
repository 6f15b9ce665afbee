use attend_core::models::questionnaire::{AnswerCode, AnswerMap, QuestionId, QuestionnaireResponse};
use attend_instruments::error::InstrumentError;
use attend_instruments::subscales::{
    compute_subscales, compute_subscales_from_map, SubScaleScores, HYPERACTIVITY, INATTENTION, PART_A,
    PART_B,
};

fn response_with(f: impl Fn(u8) -> u8) -> QuestionnaireResponse {
    let answers: AnswerMap = (1..=18).map(|q| (q, f(q))).collect();
    QuestionnaireResponse::from_answers(&answers).unwrap()
}

#[test]
fn all_zero_scores_zero() {
    let scores = compute_subscales(&QuestionnaireResponse::uniform(AnswerCode::Never));
    assert_eq!(
        scores,
        SubScaleScores {
            part_a: 0,
            part_b: 0,
            total: 0,
            inattention: 0,
            hyperactivity: 0,
        }
    );
}

#[test]
fn part_a_maxed_only() {
    let scores = compute_subscales(&response_with(|q| if q <= 6 { 4 } else { 0 }));
    assert_eq!(scores.part_a, 24);
    assert_eq!(scores.part_b, 0);
    assert_eq!(scores.total, 24);
    assert_eq!(scores.inattention, 16);
    assert_eq!(scores.hyperactivity, 8);
}

#[test]
fn all_maxed() {
    let scores = compute_subscales(&QuestionnaireResponse::uniform(AnswerCode::VeryOften));
    assert_eq!(scores.part_a, 24);
    assert_eq!(scores.part_b, 48);
    assert_eq!(scores.total, 72);
    assert_eq!(scores.inattention, 28);
    assert_eq!(scores.hyperactivity, 44);
}

#[test]
fn membership_tables_overlap_as_published() {
    assert!(INATTENTION.contains(&7) && PART_B.contains(&7));
    assert!(HYPERACTIVITY.contains(&5) && PART_A.contains(&5));
    assert_eq!(PART_A.len() + PART_B.len(), 18);
    assert_eq!(INATTENTION.len() + HYPERACTIVITY.len(), 18);
}

#[test]
fn scoring_is_idempotent() {
    let response = response_with(|q| q % 5);
    assert_eq!(compute_subscales(&response), compute_subscales(&response));
}

#[test]
fn ranges_and_sum_hold_for_varied_answers() {
    for seed in 0u8..50 {
        let response = response_with(|q| (q.wrapping_mul(seed).wrapping_add(seed)) % 5);
        let scores = compute_subscales(&response);
        assert!(scores.part_a <= 24);
        assert!(scores.part_b <= 48);
        assert!(scores.total <= 72);
        assert_eq!(scores.part_a + scores.part_b, scores.total);
        scores.validate().unwrap();
    }
}

#[test]
fn raising_one_answer_never_lowers_scores() {
    let base = response_with(|q| q % 3);
    let base_scores = compute_subscales(&base);

    for id in QuestionId::all() {
        for code in AnswerCode::ALL {
            if code < base.answer(id) {
                continue;
            }
            let raised = compute_subscales(&base.with_answer(id, code));
            assert!(raised.total >= base_scores.total);
            assert!(raised.part_a >= base_scores.part_a);
            assert!(raised.part_b >= base_scores.part_b);
            assert!(raised.inattention >= base_scores.inattention);
            assert!(raised.hyperactivity >= base_scores.hyperactivity);
        }
    }
}

#[test]
fn map_with_gaps_is_rejected() {
    let answers: AnswerMap = (1..=10).map(|q| (q, 2)).collect();
    let err = compute_subscales_from_map(&answers).unwrap_err();
    assert!(matches!(err, InstrumentError::Input(_)));
    assert!(err.to_string().contains("11"), "{err}");
}

#[test]
fn inconsistent_scores_fail_validation() {
    let scores = SubScaleScores {
        part_a: 10,
        part_b: 10,
        total: 25,
        inattention: 5,
        hyperactivity: 5,
    };
    assert!(matches!(scores.validate(), Err(InstrumentError::InvalidScores(_))));

    let out_of_range = SubScaleScores {
        part_a: 30,
        part_b: 0,
        total: 30,
        inattention: 0,
        hyperactivity: 0,
    };
    assert!(matches!(out_of_range.validate(), Err(InstrumentError::Validation(_))));
}
