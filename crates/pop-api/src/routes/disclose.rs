//! # Disclosure Endpoint
//!
//! `POST /v1/disclose` verifies a disclosure proof against the current
//! registry root and server time and mints one credential.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use pop_core::{FieldElement, Timestamp, TokenId};
use pop_sbt::MetadataAttribute;
use pop_zkp::CallData;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Response to a successful disclosure.
#[derive(Debug, Serialize, Deserialize)]
pub struct DiscloseResponse {
    pub token_id: TokenId,
    pub owner: FieldElement,
    pub not_before: Timestamp,
    pub not_after: Timestamp,
    /// Revealed attributes as `{trait_type, value}` pairs.
    pub attributes: Vec<MetadataAttribute>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/disclose", post(disclose))
}

/// POST /v1/disclose
async fn disclose(
    State(state): State<AppState>,
    body: Result<Json<CallData>, JsonRejection>,
) -> Result<Json<DiscloseResponse>, AppError> {
    let call = extract_json(body)?;
    let protocol = state.protocol.clone();
    let at = Timestamp::now();
    let receipt = tokio::task::spawn_blocking(move || protocol.mint(&call, at)).await??;
    let attributes = receipt
        .attributes
        .revealed()
        .into_iter()
        .map(|(attribute, value)| MetadataAttribute {
            trait_type: attribute.label().to_string(),
            value,
        })
        .collect();
    Ok(Json(DiscloseResponse {
        token_id: receipt.token_id,
        owner: receipt.owner,
        not_before: receipt.not_before,
        not_after: receipt.not_after,
        attributes,
    }))
}
