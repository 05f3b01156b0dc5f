//! # Integration Tests for pop-api
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot` against a
//! protocol bound to deterministic mock verifiers.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use pop_core::{
    AttestationId, Attribute, Commitment, DisclosureBuilder, FieldElement, Nullifier, PassportDate, SignatureAlgorithm,
    Timestamp,
};
use pop_registry::{register_circuit_name, Protocol, ProtocolSettings, DISCLOSE_CIRCUIT};
use pop_sbt::TokenMetadata;
use pop_zkp::{CallData, DiscloseSignals, MockVerifier, RegisterSignals};

use pop_api::state::AppState;

const ALG: SignatureAlgorithm = SignatureAlgorithm::Sha256WithRsaEncryption65537;

fn fe(v: u64) -> FieldElement {
    FieldElement::from_u64(v)
}

/// Helper: protocol with a mock register verifier for `ALG` and a mock
/// disclosure verifier.
fn test_state() -> AppState {
    let mut builder = Protocol::builder(ProtocolSettings::default());
    builder
        .add_signature_algorithm(ALG, Arc::new(MockVerifier::new(register_circuit_name(ALG))))
        .unwrap()
        .set_disclose_verifier(Arc::new(MockVerifier::new(DISCLOSE_CIRCUIT)))
        .add_country_codes([("FRA", "France")]);
    AppState::with_protocol(builder.build())
}

fn test_app(state: &AppState) -> axum::Router {
    pop_api::app(state.clone())
}

fn register_call(nullifier: u64, commitment: u64) -> CallData {
    let public_signals = RegisterSignals {
        nullifier: Nullifier::new(fe(nullifier)),
        commitment: Commitment::new(fe(commitment)),
        signature_algorithm: fe(ALG.id()),
        merkle_root: fe(0),
        attestation_id: AttestationId::passport(),
    }
    .to_public_signals();
    CallData {
        proof: MockVerifier::new(register_circuit_name(ALG)).prove(&public_signals),
        public_signals,
    }
}

fn today() -> PassportDate {
    let now = Timestamp::now();
    PassportDate::parse_yymmdd(&now.as_datetime().format("%y%m%d").to_string()).unwrap()
}

fn disclose_call(root: FieldElement, nullifier: u64) -> CallData {
    let public_signals = DiscloseSignals {
        nullifier: Nullifier::new(fe(nullifier)),
        revealed_data_packed: DisclosureBuilder::new()
            .reveal(Attribute::Nationality, "FRA")
            .reveal(Attribute::OlderThan, "18")
            .build()
            .pack(),
        attestation_id: AttestationId::passport(),
        merkle_root: root,
        scope: fe(1),
        current_date: today(),
        user_identifier: fe(4242),
    }
    .to_public_signals();
    CallData {
        proof: MockVerifier::new(DISCLOSE_CIRCUIT).prove(&public_signals),
        public_signals,
    }
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

async fn get(app: axum::Router, uri: &str) -> axum::http::Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(app: axum::Router, uri: &str, body: &impl serde::Serialize) -> axum::http::Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap(),
    )
    .await
    .unwrap()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let state = AppState::new();
    let response = get(test_app(&state), "/health/liveness").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let state = AppState::new();
    let response = get(test_app(&state), "/health/readiness").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

#[tokio::test]
async fn test_metrics_without_exporter_is_not_found() {
    let state = AppState::new();
    let response = get(test_app(&state), "/metrics").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- Registration --------------------------------------------------------------

#[tokio::test]
async fn test_register_by_name_and_by_id() {
    let state = test_state();
    let response = post_json(
        test_app(&state),
        "/v1/register/sha256WithRSAEncryption_65537",
        &register_call(1, 100),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["commitment"], "100");
    assert_eq!(body["leaf_index"], 0);
    assert_eq!(body["root"], "100");
    assert_eq!(body["algorithm"], "sha256WithRSAEncryption_65537");

    let response = post_json(test_app(&state), "/v1/register/1", &register_call(2, 200)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["leaf_index"], 1);
}

#[tokio::test]
async fn test_register_replay_is_conflict() {
    let state = test_state();
    let call = register_call(1, 100);
    assert_eq!(post_json(test_app(&state), "/v1/register/1", &call).await.status(), StatusCode::OK);
    let response = post_json(test_app(&state), "/v1/register/1", &call).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"]["code"], "NULLIFIER_REUSE");
}

#[tokio::test]
async fn test_register_unbound_algorithm() {
    let state = test_state();
    let response = post_json(test_app(&state), "/v1/register/7", &register_call(1, 100)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"]["code"], "UNKNOWN_ALGORITHM");
}

#[tokio::test]
async fn test_register_unknown_algorithm_name() {
    let state = test_state();
    let response = post_json(test_app(&state), "/v1/register/rot13", &register_call(1, 100)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_malformed_body() {
    let state = test_state();
    let response = test_app(&state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/register/1")
                .header("content-type", "application/json")
                .body(Body::from("{\"proof\": 1}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_register_tampered_proof() {
    let state = test_state();
    let mut call = register_call(1, 100);
    call.public_signals[1] = fe(101);
    let response = post_json(test_app(&state), "/v1/register/1", &call).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"]["code"], "INVALID_PROOF");
}

// -- Registry Reads ------------------------------------------------------------

#[tokio::test]
async fn test_root_and_inclusion_proof() {
    let state = test_state();
    for i in 0..3 {
        post_json(test_app(&state), "/v1/register/1", &register_call(i + 1, 100 + i)).await;
    }
    let root = body_json(get(test_app(&state), "/v1/registry/root").await).await;
    assert_eq!(root["size"], 3);

    let response = get(test_app(&state), "/v1/registry/proof/2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let proof: pop_crypto::MerkleProof = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(proof.leaf, fe(102));
    assert_eq!(serde_json::to_value(proof.root).unwrap(), root["root"]);

    let response = get(test_app(&state), "/v1/registry/proof/3").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- Disclosure and Tokens -----------------------------------------------------

#[tokio::test]
async fn test_disclose_mints_token_and_renders_metadata() {
    let state = test_state();
    let registered = body_json(post_json(test_app(&state), "/v1/register/1", &register_call(1, 100)).await).await;
    let root = FieldElement::parse(registered["root"].as_str().unwrap()).unwrap();

    let response = post_json(test_app(&state), "/v1/disclose", &disclose_call(root, 9)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let minted = body_json(response).await;
    assert_eq!(minted["token_id"], 0);
    assert_eq!(minted["owner"], "4242");

    let uri = body_json(get(test_app(&state), "/v1/tokens/0").await).await;
    let meta = TokenMetadata::from_data_uri(uri["token_uri"].as_str().unwrap()).unwrap();
    assert_eq!(meta.attribute("Nationality"), Some("France"));
    assert_eq!(meta.attribute("Expired"), Some("No"));

    let far_future = Timestamp::now().add_secs(400 * 24 * 3600).epoch_secs();
    let response = get(test_app(&state), &format!("/v1/tokens/0/metadata?at={far_future}")).await;
    let meta = body_json(response).await;
    let expired = meta["attributes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["trait_type"] == "Expired")
        .unwrap();
    assert_eq!(expired["value"], "Yes");
}

#[tokio::test]
async fn test_disclose_replay_is_conflict() {
    let state = test_state();
    post_json(test_app(&state), "/v1/register/1", &register_call(1, 100)).await;
    let call = disclose_call(state.protocol.current_root(), 9);
    assert_eq!(post_json(test_app(&state), "/v1/disclose", &call).await.status(), StatusCode::OK);
    let response = post_json(test_app(&state), "/v1/disclose", &call).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"]["code"], "NULLIFIER_REUSE");
}

#[tokio::test]
async fn test_disclose_stale_root() {
    let state = test_state();
    post_json(test_app(&state), "/v1/register/1", &register_call(1, 100)).await;
    let stale = state.protocol.current_root();
    post_json(test_app(&state), "/v1/register/1", &register_call(2, 200)).await;
    let response = post_json(test_app(&state), "/v1/disclose", &disclose_call(stale, 9)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"]["code"], "INVALID_MERKLE_ROOT");
}

#[tokio::test]
async fn test_disclose_without_verifier_is_rejected() {
    let state = AppState::new();
    let response = post_json(test_app(&state), "/v1/disclose", &disclose_call(FieldElement::ZERO, 9)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"]["code"], "INVALID_PROOF");
}

#[tokio::test]
async fn test_unknown_token_is_not_found() {
    let state = test_state();
    let response = get(test_app(&state), "/v1/tokens/12").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
}

// -- Configuration -------------------------------------------------------------

#[tokio::test]
async fn test_config_lists_bound_algorithms() {
    let state = test_state();
    let body = body_json(get(test_app(&state), "/v1/config/algorithms").await).await;
    assert_eq!(body["algorithms"][0]["id"], 1);
    assert_eq!(body["algorithms"][0]["name"], "sha256WithRSAEncryption_65537");
    assert_eq!(body["disclose_verifier"], true);
    assert_eq!(body["hash"], "poseidon");
    assert_eq!(body["certificate_root_check"], false);
}
