use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Logs every API request as one structured event.
pub async fn request_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_secs_f64() * 1_000.0;
    if response.status().is_server_error() {
        tracing::warn!(method = %method, path = %uri, status, latency_ms, "api_request");
    } else {
        tracing::info!(method = %method, path = %uri, status, latency_ms, "api_request");
    }

    response
}
