//! # Commitment Registry Endpoints
//!
//! - `POST /v1/register/{algorithm}`: verify a register proof and insert its
//!   commitment. `{algorithm}` is a numeric id or an algorithm name.
//! - `GET /v1/registry/root`: current root and size.
//! - `GET /v1/registry/proof/{index}`: inclusion proof for a leaf.

use std::str::FromStr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use pop_core::{Commitment, FieldElement, SignatureAlgorithm};
use pop_crypto::MerkleProof;
use pop_zkp::CallData;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Response to a successful registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub algorithm: SignatureAlgorithm,
    pub commitment: Commitment,
    pub leaf_index: usize,
    pub root: FieldElement,
}

/// Current registry root.
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub root: FieldElement,
    pub size: usize,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/register/{algorithm}", post(register))
        .route("/v1/registry/root", get(root))
        .route("/v1/registry/proof/{index}", get(proof))
}

/// Numeric ids pass through unchanged so that unbound ids surface as
/// `UNKNOWN_ALGORITHM`; names must be known.
fn algorithm_id(raw: &str) -> Result<u64, AppError> {
    if let Ok(id) = raw.parse::<u64>() {
        return Ok(id);
    }
    Ok(SignatureAlgorithm::from_str(raw)?.id())
}

/// POST /v1/register/{algorithm}
async fn register(
    State(state): State<AppState>,
    Path(algorithm): Path<String>,
    body: Result<Json<CallData>, JsonRejection>,
) -> Result<Json<RegisterResponse>, AppError> {
    let id = algorithm_id(&algorithm)?;
    let call = extract_json(body)?;
    let protocol = state.protocol.clone();
    let receipt = tokio::task::spawn_blocking(move || protocol.validate_proof(&call, id)).await??;
    Ok(Json(RegisterResponse {
        algorithm: receipt.algorithm,
        commitment: receipt.commitment,
        leaf_index: receipt.leaf_index,
        root: receipt.root,
    }))
}

/// GET /v1/registry/root
async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let (root, size) = state
        .protocol
        .read(|s| (s.commitments.current_root(), s.commitments.len()));
    Json(RootResponse { root, size })
}

/// GET /v1/registry/proof/{index}
async fn proof(State(state): State<AppState>, Path(index): Path<usize>) -> Result<Json<MerkleProof>, AppError> {
    Ok(Json(state.protocol.merkle_proof(index)?))
}
