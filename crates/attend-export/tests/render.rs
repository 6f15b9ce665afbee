use attend_core::models::demographics::{DemographicInput, DemographicProfile, Education, Gender, JobStatus};
use attend_core::models::questionnaire::{AnswerCode, QuestionnaireResponse};
use attend_export::error::ExportError;
use attend_export::render::{render_report, render_template, ReportContext, DISCLAIMER};
use attend_instruments::risk::RiskRules;
use attend_instruments::screening::{screen, ScreeningResult};

fn profile(age: i32) -> DemographicProfile {
    DemographicInput {
        age: Some(age),
        gender: Some(Gender::Female),
        education: Some(Education::Higher),
        job_status: Some(JobStatus::Student),
        quality_of_life: Some(6),
        stress_level: Some(2),
    }
    .validate()
    .unwrap()
}

fn result(code: AnswerCode, age: i32) -> ScreeningResult {
    screen(&QuestionnaireResponse::uniform(code), &profile(age), &RiskRules::default()).unwrap()
}

#[test]
fn default_report_lists_scores_and_outcome() {
    let result = result(AnswerCode::VeryOften, 30);
    let mut context = ReportContext::new("ASRS screening");
    context.subject = Some("J. Doe".to_string());
    context.demographics = Some(profile(30));

    let report = render_report(&result, &context, None).unwrap();

    assert!(report.starts_with("# ASRS screening"));
    assert!(report.contains("**Subject:** J. Doe"));
    assert!(report.contains("| Part A (screener) | 24 | 24 |"));
    assert!(report.contains("| Total | 72 | 72 |"));
    assert!(report.contains("**Part A is screen-positive**: 6 of 6"));
    assert!(report.contains("Probability: **85%**"));
    assert!(report.contains("Confidence: Very high"));
    assert!(report.contains("Part A score: +40%"));
    assert!(report.contains("- Education: higher"));
    assert!(report.contains(DISCLAIMER));
}

#[test]
fn report_without_contributions() {
    let result = result(AnswerCode::Never, 40);
    let report = render_report(&result, &ReportContext::new("Screening"), None).unwrap();

    assert!(report.contains("Probability: **0%**"));
    assert!(report.contains("No rule contributed"));
    assert!(report.contains("Part A is screen-negative: 0 of 6"));
    assert!(!report.contains("## Profile"));
}

#[test]
fn custom_template_sees_the_result() {
    let result = result(AnswerCode::Often, 22);
    let template = "{{ result.scores.total }}|{{ recommended_action }}|{{ elevated_responses }}";
    let report = render_report(&result, &ReportContext::new("x"), Some(template)).unwrap();
    assert_eq!(report, "54|urgent_specialist_evaluation|18");
}

#[test]
fn broken_template_is_a_parse_error() {
    let result = result(AnswerCode::Never, 40);
    let err = render_report(&result, &ReportContext::new("x"), Some("{% if %}")).unwrap_err();
    assert!(matches!(err, ExportError::TemplateParse(_)));
}

#[test]
fn unknown_variable_is_a_render_error() {
    let err = render_template("t", "{{ missing.field }}", &serde_json::json!({})).unwrap_err();
    assert!(matches!(err, ExportError::TemplateRender(_)));
}

#[test]
fn templates_cannot_read_the_environment() {
    let context = serde_json::json!({});
    for template in [
        r#"{{ get_env(name="PATH") }}"#,
        r#"{{ get_env(name="NO_SUCH_VAR", default="x") }}"#,
        "{{ now() }}",
        "{{ get_random(end=10) }}",
    ] {
        match render_template("t", template, &context).unwrap_err() {
            ExportError::TemplateRender(message) => {
                assert!(message.contains("not available in report templates"), "{message}");
            }
            other => panic!("unexpected error for {template}: {other}"),
        }
    }

    // Other builtins still work.
    assert_eq!(render_template("t", "{% for i in range(end=3) %}{{ i }}{% endfor %}", &context).unwrap(), "012");
}
