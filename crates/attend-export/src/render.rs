use std::collections::HashMap;

use jiff::Timestamp;
use serde::Serialize;
use tera::{Context, Tera};

use attend_core::models::demographics::DemographicProfile;
use attend_instruments::instruments::asrs::Asrs;
use attend_instruments::risk::{ConfidenceLabel, RiskRule};
use attend_instruments::screener::ScreenerResult;
use attend_instruments::screening::ScreeningResult;
use attend_instruments::Instrument;

use crate::error::ExportError;

pub const DEFAULT_TEMPLATE_NAME: &str = "screening_report.md";
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/screening_report.md");

pub const DISCLAIMER: &str = "This screening does not replace a clinical diagnosis. \
Only a qualified health professional can diagnose ADHD.";

/// Caller-supplied details printed around the result.
#[derive(Debug, Clone, Serialize)]
pub struct ReportContext {
    pub title: String,
    pub subject: Option<String>,
    pub demographics: Option<DemographicProfile>,
    pub generated_at: Timestamp,
}

impl ReportContext {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            subject: None,
            demographics: None,
            generated_at: Timestamp::now(),
        }
    }
}

#[derive(Serialize)]
struct ScoreRow {
    name: String,
    value: u32,
    max: u32,
}

#[derive(Serialize)]
struct ContributionRow {
    rule: &'static str,
    percent: String,
}

/// Everything a template can reference.
#[derive(Serialize)]
struct ReportView<'a> {
    title: &'a str,
    subject: Option<&'a str>,
    demographics: Option<&'a DemographicProfile>,
    generated_at: String,
    instrument_name: &'a str,
    scores: Vec<ScoreRow>,
    screener: &'a ScreenerResult,
    elevated_responses: u32,
    probability: f64,
    probability_percent: String,
    confidence_label: &'static str,
    recommended_action: String,
    action_description: &'static str,
    contributions: Vec<ContributionRow>,
    structured_input: String,
    disclaimer: &'static str,
    result: &'a ScreeningResult,
}

/// Tera builtins that reach outside the context: the process environment,
/// randomness and the clock. Templates may come from API callers.
const DISABLED_FUNCTIONS: [&str; 3] = ["get_env", "get_random", "now"];

fn sandboxed_tera() -> Tera {
    let mut tera = Tera::default();
    for name in DISABLED_FUNCTIONS {
        tera.register_function(name, move |_: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
            Err(tera::Error::msg(format!(
                "function `{name}` is not available in report templates"
            )))
        });
    }
    tera
}

/// Render a Tera template with a serializable context.
///
/// The `template_content` is the raw template string (Jinja2 syntax).
/// Only `value` is visible to it; see [`DISABLED_FUNCTIONS`].
pub fn render_template<T: Serialize>(
    template_name: &str,
    template_content: &str,
    value: &T,
) -> Result<String, ExportError> {
    let mut tera = sandboxed_tera();
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let value = serde_json::to_value(value)?;
    let context =
        Context::from_value(value).map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tera.render(template_name, &context)?;
    Ok(rendered)
}

/// Render a screening report, with the built-in Markdown template unless
/// `template` is given.
pub fn render_report(
    result: &ScreeningResult,
    context: &ReportContext,
    template: Option<&str>,
) -> Result<String, ExportError> {
    let view = ReportView {
        title: &context.title,
        subject: context.subject.as_deref(),
        demographics: context.demographics.as_ref(),
        generated_at: context.generated_at.strftime("%Y-%m-%d %H:%M UTC").to_string(),
        instrument_name: Asrs.name(),
        scores: score_rows(result),
        screener: &result.screener,
        elevated_responses: result.elevated_responses,
        probability: result.risk.probability,
        probability_percent: percent(result.risk.probability),
        confidence_label: confidence_label(result.risk.confidence_label),
        recommended_action: serde_json::to_value(result.risk.recommended_action)?
            .as_str()
            .unwrap_or_default()
            .to_string(),
        action_description: result.risk.recommended_action.description(),
        contributions: result
            .risk
            .contributions
            .iter()
            .map(|c| ContributionRow {
                rule: rule_label(c.rule),
                percent: percent(c.weight),
            })
            .collect(),
        structured_input: result.to_structured_input(),
        disclaimer: DISCLAIMER,
        result,
    };

    let (name, content) = match template {
        Some(content) => ("custom_report", content),
        None => (DEFAULT_TEMPLATE_NAME, DEFAULT_TEMPLATE),
    };
    let rendered = render_template(name, content, &view)?;
    tracing::debug!(template = name, bytes = rendered.len(), "report rendered");
    Ok(rendered)
}

fn score_rows(result: &ScreeningResult) -> Vec<ScoreRow> {
    let entries = result.score_entries();
    Asrs.domains()
        .iter()
        .flat_map(|d| &d.subscales)
        .filter_map(|s| {
            let entry = entries.iter().find(|e| e.subscale_id == s.id)?;
            Some(ScoreRow {
                name: s.name.clone(),
                value: entry.value as u32,
                max: s.range.max as u32,
            })
        })
        .collect()
}

fn percent(p: f64) -> String {
    format!("{:.0}%", p * 100.0)
}

fn confidence_label(label: ConfidenceLabel) -> &'static str {
    match label {
        ConfidenceLabel::Low => "Low",
        ConfidenceLabel::Moderate => "Moderate",
        ConfidenceLabel::High => "High",
        ConfidenceLabel::VeryHigh => "Very high",
    }
}

fn rule_label(rule: RiskRule) -> &'static str {
    match rule {
        RiskRule::PartA => "Part A score",
        RiskRule::Total => "Total score",
        RiskRule::DimensionGap => "Inattention/hyperactivity imbalance",
        RiskRule::YoungAdult => "Age under 25",
        RiskRule::Wellbeing => "Low quality of life with high stress",
        RiskRule::ElevatedResponses => "Many answers at Often or above",
    }
}
