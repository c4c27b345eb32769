use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

pub(super) const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Tags each request with an id (reusing the caller's `x-request-id` when it
/// sends one), echoes it back, and logs failed responses with their
/// [`ErrorReport`].
pub(super) async fn trace_requests(mut request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        request.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let mut response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let report = response.extensions_mut().remove::<ErrorReport>();
    let (origin, headline, chain) = match &report {
        Some(report) => (report.origin, report.headline(), report.chain.as_slice()),
        None => ("unknown", "no diagnostic available", &[][..]),
    };

    if status.is_server_error() {
        error!(
            target: "quire::http",
            %method,
            %path,
            status = status.as_u16(),
            elapsed_ms,
            origin,
            detail = headline,
            chain = ?chain,
            request_id = %request_id,
            "request failed"
        );
    } else if status.is_client_error() {
        warn!(
            target: "quire::http",
            %method,
            %path,
            status = status.as_u16(),
            elapsed_ms,
            origin,
            detail = headline,
            request_id = %request_id,
            "request rejected"
        );
    } else {
        debug!(
            target: "quire::http",
            %method,
            %path,
            status = status.as_u16(),
            elapsed_ms,
            request_id = %request_id,
            "request served"
        );
    }

    response
}
