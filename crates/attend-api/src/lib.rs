//! attend-api
//!
//! JSON HTTP service over the screening, reporting and classification
//! crates. Session state lives in [`state::AppState`], never in globals.

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        // Instruments (public schema data)
        .route("/instruments", get(routes::instruments::list_instruments))
        .route(
            "/instruments/{id}",
            get(routes::instruments::get_instrument_detail),
        )
        .route(
            "/instruments/{id}/questions",
            get(routes::instruments::get_questions),
        )
        // Stateless scoring
        .route("/screenings", post(routes::screenings::create_screening))
        .route("/screenings/report", post(routes::screenings::create_report))
        .route("/risk", post(routes::risk::estimate))
        // Sessions
        .route("/sessions", post(routes::sessions::create_session))
        .route(
            "/sessions/{id}",
            get(routes::sessions::get_session).delete(routes::sessions::delete_session),
        )
        .route(
            "/sessions/{id}/answers/{question}",
            put(routes::sessions::record_answer).delete(routes::sessions::clear_answer),
        )
        .route(
            "/sessions/{id}/demographics",
            put(routes::sessions::set_demographics),
        )
        .route("/sessions/{id}/submit", post(routes::sessions::submit))
        // Dataset and models
        .route("/dataset/summary", get(routes::dataset::summary))
        .route("/dataset/samples", get(routes::dataset::samples))
        .route("/models/train", post(routes::models::train))
        .route("/models/report", get(routes::models::last_report))
        .layer(
            ServiceBuilder::new()
                .layer(axum_mw::from_fn(middleware::request_log::request_log))
                .layer(cors),
        )
        .with_state(state)
}
