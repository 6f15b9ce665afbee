use attend_core::models::questionnaire::{AnswerCode, AnswerMap, QuestionnaireResponse};
use attend_instruments::screener::{screen, threshold};

fn response_with(f: impl Fn(u8) -> u8) -> QuestionnaireResponse {
    let answers: AnswerMap = (1..=18).map(|q| (q, f(q))).collect();
    QuestionnaireResponse::from_answers(&answers).unwrap()
}

#[test]
fn thresholds_follow_the_shaded_boxes() {
    for q in [1, 2, 3, 9, 12, 16, 18] {
        assert_eq!(threshold(q), AnswerCode::Sometimes, "item {q}");
    }
    for q in [4, 5, 6, 7, 8, 10, 11, 13, 14, 15, 17] {
        assert_eq!(threshold(q), AnswerCode::Often, "item {q}");
    }
}

#[test]
fn four_shaded_part_a_answers_screen_positive() {
    // Items 1-3 at Sometimes count; item 4 needs Often.
    let response = response_with(|q| match q {
        1..=3 => 2,
        4 => 3,
        _ => 0,
    });
    let result = screen(&response);
    assert_eq!(result.part_a_positive_items, 4);
    assert!(result.part_a_positive);
}

#[test]
fn sometimes_on_often_items_does_not_count() {
    let response = response_with(|q| if q <= 6 { 2 } else { 0 });
    let result = screen(&response);
    assert_eq!(result.part_a_positive_items, 3);
    assert!(!result.part_a_positive);
}

#[test]
fn part_b_counts_its_own_items() {
    let result = screen(&QuestionnaireResponse::uniform(AnswerCode::Sometimes));
    assert_eq!(result.part_b_positive_items, 4);
    let result = screen(&QuestionnaireResponse::uniform(AnswerCode::VeryOften));
    assert_eq!(result.part_b_positive_items, 12);
}
