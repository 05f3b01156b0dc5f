//! # Bootstrap
//!
//! Builds the protocol instance at startup.
//!
//! 1. **Locate configuration**: `POP_CONFIG` names a YAML file. When unset
//!    the server starts with default settings and no bound verifiers;
//!    every proof is then rejected.
//! 2. **Load verifiers**: verification keys resolve relative to the
//!    configuration file's directory.
//! 3. **Log identity**: hash function, bound algorithms, trusted roots.

use std::path::Path;

use pop_registry::{ConfigError, ProtocolConfig};

use crate::state::{AppConfig, AppState};

/// Errors during bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Configuration file not found at the given path.
    #[error("protocol configuration not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration could not be loaded or applied.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Build application state from `config`.
pub fn bootstrap(config: AppConfig) -> Result<AppState, BootstrapError> {
    let protocol = match &config.config_path {
        Some(path) => {
            if !path.exists() {
                return Err(BootstrapError::ConfigNotFound {
                    path: path.display().to_string(),
                });
            }
            let protocol_config = ProtocolConfig::from_file(path)?;
            let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
            tracing::info!(path = %path.display(), "loading protocol configuration");
            protocol_config.build(base_dir)?
        }
        None => {
            tracing::warn!("POP_CONFIG not set; starting with defaults and no bound verifiers");
            ProtocolConfig::default().build(Path::new("."))?
        }
    };

    let algorithms: Vec<String> = protocol.algorithms().iter().map(|a| a.to_string()).collect();
    tracing::info!(
        hash = %protocol.settings().hash,
        attestation_id = %protocol.settings().attestation_id,
        algorithms = ?algorithms,
        disclose_verifier = protocol.has_disclose_verifier(),
        "protocol ready"
    );

    Ok(AppState::with_protocol(protocol).with_config(config))
}
