//! # pop-api — Binary Entry Point
//!
//! Environment:
//!
//! - `PORT`: listen port (default 8080)
//! - `POP_CONFIG`: protocol YAML file
//! - `RUST_LOG`: tracing filter (default `info`)
//! - `LOG_FORMAT=json`: JSON log lines

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use pop_api::state::AppConfig;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let config_path = std::env::var_os("POP_CONFIG").map(Into::into);
    let config = AppConfig { port, config_path };

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;

    let state = pop_api::bootstrap::bootstrap(config)
        .map_err(|e| {
            tracing::error!("Bootstrap failed: {e}");
            e
        })?
        .with_metrics(metrics);

    let app = pop_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("pop-api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
