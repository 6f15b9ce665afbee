use axum::Json;
use serde::Serialize;

use attend_instruments::scoring::{AnswerOption, Domain, Item};
use attend_instruments::{all_instruments, get_instrument, Instrument};

use crate::error::ApiError;
use crate::extract::ApiPath;

#[derive(Serialize)]
pub struct InstrumentSummary {
    id: String,
    name: String,
}

#[derive(Serialize)]
pub struct InstrumentDetail {
    id: String,
    name: String,
    domains: Vec<Domain>,
}

#[derive(Serialize)]
pub struct Questionnaire {
    id: String,
    name: String,
    items: Vec<Item>,
    answer_options: Vec<AnswerOption>,
}

pub async fn list_instruments() -> Json<Vec<InstrumentSummary>> {
    let instruments: Vec<InstrumentSummary> = all_instruments()
        .iter()
        .map(|i| InstrumentSummary {
            id: i.id().to_string(),
            name: i.name().to_string(),
        })
        .collect();
    Json(instruments)
}

fn find(id: &str) -> Result<Box<dyn Instrument>, ApiError> {
    get_instrument(id).ok_or_else(|| ApiError::NotFound(format!("instrument not found: {id}")))
}

pub async fn get_instrument_detail(
    ApiPath(id): ApiPath<String>,
) -> Result<Json<InstrumentDetail>, ApiError> {
    let instrument = find(&id)?;

    Ok(Json(InstrumentDetail {
        id: instrument.id().to_string(),
        name: instrument.name().to_string(),
        domains: instrument.domains().to_vec(),
    }))
}

pub async fn get_questions(ApiPath(id): ApiPath<String>) -> Result<Json<Questionnaire>, ApiError> {
    let instrument = find(&id)?;

    Ok(Json(Questionnaire {
        id: instrument.id().to_string(),
        name: instrument.name().to_string(),
        items: instrument.items().to_vec(),
        answer_options: instrument.answer_options(),
    }))
}
