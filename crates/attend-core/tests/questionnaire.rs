use attend_core::error::CoreError;
use attend_core::models::questionnaire::{AnswerCode, AnswerMap, QuestionId, QuestionnaireResponse};

fn full_map(code: u8) -> AnswerMap {
    (1..=18).map(|q| (q, code)).collect()
}

#[test]
fn complete_map_is_accepted() {
    let response = QuestionnaireResponse::from_answers(&full_map(2)).unwrap();
    assert_eq!(response, QuestionnaireResponse::uniform(AnswerCode::Sometimes));
}

#[test]
fn missing_answers_are_all_reported() {
    let mut answers = full_map(1);
    answers.remove(&3);
    answers.remove(&17);

    match QuestionnaireResponse::from_answers(&answers) {
        Err(CoreError::MissingResponse { question_ids }) => assert_eq!(question_ids, vec![3, 17]),
        other => panic!("expected MissingResponse, got {other:?}"),
    }
}

#[test]
fn empty_map_reports_every_question() {
    let err = QuestionnaireResponse::from_answers(&AnswerMap::new()).unwrap_err();
    match err {
        CoreError::MissingResponse { question_ids } => {
            assert_eq!(question_ids, (1..=18).collect::<Vec<u8>>())
        }
        other => panic!("expected MissingResponse, got {other:?}"),
    }
}

#[test]
fn out_of_range_code_names_the_question() {
    let mut answers = full_map(0);
    answers.insert(5, 7);

    let err = QuestionnaireResponse::from_answers(&answers).unwrap_err();
    assert!(matches!(err, CoreError::OutOfRange { value: 7, max: 4, .. }));
    assert!(err.to_string().contains("question 5"), "{err}");
}

#[test]
fn unknown_question_is_rejected() {
    let mut answers = full_map(0);
    answers.insert(19, 1);

    let err = QuestionnaireResponse::from_answers(&answers).unwrap_err();
    assert!(matches!(err, CoreError::UnknownQuestion(19)));
}

#[test]
fn question_ids_are_bounded() {
    assert!(QuestionId::new(0).is_err());
    assert!(QuestionId::new(1).is_ok());
    assert!(QuestionId::new(18).is_ok());
    assert!(QuestionId::new(19).is_err());
    assert_eq!(QuestionId::all().count(), 18);
}

#[test]
fn count_at_least_counts_inclusively() {
    let response = QuestionnaireResponse::from_answers(
        &(1..=18).map(|q| (q, if q <= 8 { 3 } else { 2 })).collect(),
    )
    .unwrap();
    assert_eq!(response.count_at_least(AnswerCode::Often), 8);
    assert_eq!(response.count_at_least(AnswerCode::Never), 18);
    assert_eq!(response.count_at_least(AnswerCode::VeryOften), 0);
}

#[test]
fn sum_over_ignores_ids_off_the_questionnaire() {
    let response = QuestionnaireResponse::uniform(AnswerCode::VeryOften);
    assert_eq!(response.sum_over(&[1, 2, 3]), 12);
    assert_eq!(response.sum_over(&[0, 1, 42]), 4);
}

#[test]
fn json_round_trip_uses_question_keys() {
    let response = QuestionnaireResponse::uniform(AnswerCode::Rarely)
        .with_answer(QuestionId::new(4).unwrap(), AnswerCode::Often);
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["4"], 3);
    assert_eq!(json["1"], 1);

    let back: QuestionnaireResponse = serde_json::from_value(json).unwrap();
    assert_eq!(back, response);
}

#[test]
fn json_with_missing_question_fails_to_deserialize() {
    let json = serde_json::json!({ "1": 0, "2": 0 });
    let err = serde_json::from_value::<QuestionnaireResponse>(json).unwrap_err();
    assert!(err.to_string().contains("missing response"), "{err}");
}

#[test]
fn answer_labels() {
    assert_eq!(AnswerCode::VeryOften.label(), "Very Often");
    assert_eq!(AnswerCode::try_from(2).unwrap(), AnswerCode::Sometimes);
    assert!(AnswerCode::try_from(5).is_err());
}
