//! # Credential Token Endpoints
//!
//! Both endpoints render at `?at=<unix seconds>` when given, otherwise at
//! the current time. Rendering never changes the token.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use pop_core::TokenId;
use pop_sbt::TokenMetadata;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::{extract_at, AtQuery};
use crate::state::AppState;

/// Token URI response.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenUriResponse {
    pub token_id: TokenId,
    pub token_uri: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/tokens/{id}", get(token_uri))
        .route("/v1/tokens/{id}/metadata", get(metadata))
}

/// GET /v1/tokens/{id}
async fn token_uri(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    query: Result<Query<AtQuery>, QueryRejection>,
) -> Result<Json<TokenUriResponse>, AppError> {
    let at = extract_at(query)?;
    let token_id = TokenId::new(id);
    let token_uri = state.protocol.token_uri(token_id, at)?;
    Ok(Json(TokenUriResponse { token_id, token_uri }))
}

/// GET /v1/tokens/{id}/metadata
async fn metadata(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    query: Result<Query<AtQuery>, QueryRejection>,
) -> Result<Json<TokenMetadata>, AppError> {
    let at = extract_at(query)?;
    Ok(Json(state.protocol.token_metadata(TokenId::new(id), at)?))
}
