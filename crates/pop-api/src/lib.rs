//! # pop-api — HTTP Service for the Passport Registry
//!
//! Thin Axum layer over [`pop_registry::Protocol`]. Handlers parse requests,
//! hand proof verification to the blocking pool, and map protocol
//! rejections to structured JSON errors. No protocol logic lives here.
//!
//! ## API Surface
//!
//! | Route                              | Module                 |
//! |------------------------------------|------------------------|
//! | `POST /v1/register/{algorithm}`    | [`routes::registry`]   |
//! | `GET  /v1/registry/root`           | [`routes::registry`]   |
//! | `GET  /v1/registry/proof/{index}`  | [`routes::registry`]   |
//! | `POST /v1/disclose`                | [`routes::disclose`]   |
//! | `GET  /v1/tokens/{id}`             | [`routes::tokens`]     |
//! | `GET  /v1/tokens/{id}/metadata`    | [`routes::tokens`]     |
//! | `GET  /v1/config/algorithms`       | [`routes::config`]     |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```
//!
//! Health probes and `/metrics` are mounted outside the middleware stack.

pub mod bootstrap;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::AppState;

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::registry::router())
        .merge(routes::disclose::router())
        .merge(routes::tokens::router())
        .merge(routes::config::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let probes = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(render_metrics))
        .with_state(state);

    Router::new().merge(probes).merge(api)
}

/// Liveness probe: 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 once bootstrap has produced a protocol instance.
async fn readiness() -> &'static str {
    "ready"
}

/// Prometheus text exposition.
async fn render_metrics(State(state): State<AppState>) -> Result<String, AppError> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or_else(|| AppError::NotFound("metrics exporter not installed".into()))
}
