//! # Application State
//!
//! Shared state handed to every handler through the `State` extractor.
//! The protocol instance carries its own lock; the state itself is only
//! cloned `Arc`s.

use std::path::PathBuf;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use pop_registry::{Protocol, ProtocolSettings};

/// Process configuration read from the environment.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// TCP port to bind.
    pub port: u16,
    /// Protocol YAML file (`POP_CONFIG`). `None` starts with defaults and
    /// no bound verifiers.
    pub config_path: Option<PathBuf>,
}

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub protocol: Arc<Protocol>,
    pub config: AppConfig,
    /// Installed Prometheus recorder, rendered at `/metrics`.
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("protocol", &self.protocol)
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl AppState {
    /// Default protocol settings, no verifiers, no metrics exporter.
    pub fn new() -> Self {
        Self::with_protocol(Protocol::builder(ProtocolSettings::default()).build())
    }

    pub fn with_protocol(protocol: Protocol) -> Self {
        Self {
            protocol: Arc::new(protocol),
            config: AppConfig {
                port: 8080,
                config_path: None,
            },
            metrics: None,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
