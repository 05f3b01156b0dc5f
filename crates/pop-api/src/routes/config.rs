//! # Configuration Endpoint
//!
//! `GET /v1/config/algorithms` lists the bound signature algorithms and the
//! parameters a prover needs to build acceptable proofs.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use pop_core::AttestationId;
use pop_crypto::HashFunction;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct AlgorithmEntry {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub algorithms: Vec<AlgorithmEntry>,
    pub disclose_verifier: bool,
    pub attestation_id: AttestationId,
    pub hash: HashFunction,
    pub date_tolerance_secs: i64,
    pub certificate_root_check: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/config/algorithms", get(algorithms))
}

/// GET /v1/config/algorithms
async fn algorithms(State(state): State<AppState>) -> Json<ConfigResponse> {
    let protocol = &state.protocol;
    let settings = protocol.settings();
    Json(ConfigResponse {
        algorithms: protocol
            .algorithms()
            .into_iter()
            .map(|a| AlgorithmEntry {
                id: a.id(),
                name: a.name().to_string(),
            })
            .collect(),
        disclose_verifier: protocol.has_disclose_verifier(),
        attestation_id: settings.attestation_id,
        hash: settings.hash,
        date_tolerance_secs: settings.date_tolerance_secs,
        certificate_root_check: protocol.certificate_roots().is_enabled(),
    })
}
