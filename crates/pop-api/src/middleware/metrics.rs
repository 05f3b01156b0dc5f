//! # Request Metrics
//!
//! Per-request counters and latency recorded through the `metrics` facade.
//! With no recorder installed (tests) the calls are no-ops; `main` installs
//! the Prometheus recorder rendered at `/metrics`.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Record `pop_http_requests_total` and `pop_http_request_duration_seconds`.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    // Route templates, not raw paths, to keep label cardinality bounded.
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        "pop_http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!("pop_http_request_duration_seconds", "method" => method, "route" => route)
        .record(started.elapsed().as_secs_f64());

    response
}
