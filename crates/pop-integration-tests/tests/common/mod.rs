//! Shared fixtures: a protocol bound to mock verifiers and helpers that
//! build well-formed register and disclose call data.

#![allow(dead_code)]

use std::sync::Arc;

use pop_core::{
    AttestationId, Attribute, Commitment, DisclosureAttributeSet, DisclosureBuilder, FieldElement, Nullifier,
    PassportDate, SignatureAlgorithm, Timestamp,
};
use pop_registry::{register_circuit_name, Protocol, ProtocolSettings, DISCLOSE_CIRCUIT};
use pop_zkp::{CallData, DiscloseSignals, MockVerifier, RegisterSignals};

pub const ALG: SignatureAlgorithm = SignatureAlgorithm::EcdsaWithSha256;

pub fn fe(v: u64) -> FieldElement {
    FieldElement::from_u64(v)
}

pub fn protocol_with(settings: ProtocolSettings) -> Protocol {
    let mut builder = Protocol::builder(settings);
    builder
        .add_signature_algorithm(ALG, Arc::new(MockVerifier::new(register_circuit_name(ALG))))
        .unwrap()
        .set_disclose_verifier(Arc::new(MockVerifier::new(DISCLOSE_CIRCUIT)))
        .add_country_codes([("FRA", "France"), ("D<<", "Germany")]);
    builder.build()
}

pub fn protocol() -> Protocol {
    protocol_with(ProtocolSettings::default())
}

pub fn register_signals(nullifier: u64, commitment: u64) -> RegisterSignals {
    RegisterSignals {
        nullifier: Nullifier::new(fe(nullifier)),
        commitment: Commitment::new(fe(commitment)),
        signature_algorithm: fe(ALG.id()),
        merkle_root: fe(0),
        attestation_id: AttestationId::passport(),
    }
}

pub fn register_call_for(signals: &RegisterSignals) -> CallData {
    let public_signals = signals.to_public_signals();
    CallData {
        proof: MockVerifier::new(register_circuit_name(ALG)).prove(&public_signals),
        public_signals,
    }
}

pub fn register_call(nullifier: u64, commitment: u64) -> CallData {
    register_call_for(&register_signals(nullifier, commitment))
}

pub fn attributes() -> DisclosureAttributeSet {
    DisclosureBuilder::new()
        .reveal(Attribute::IssuingState, "D<<")
        .reveal(Attribute::Nationality, "FRA")
        .reveal(Attribute::OlderThan, "18")
        .build()
}

pub fn disclose_signals(root: FieldElement, nullifier: u64, date: &str, attrs: &DisclosureAttributeSet) -> DiscloseSignals {
    DiscloseSignals {
        nullifier: Nullifier::new(fe(nullifier)),
        revealed_data_packed: attrs.pack(),
        attestation_id: AttestationId::passport(),
        merkle_root: root,
        scope: fe(1),
        current_date: PassportDate::parse_yymmdd(date).unwrap(),
        user_identifier: fe(0xBEEF),
    }
}

pub fn disclose_call_for(signals: &DiscloseSignals) -> CallData {
    let public_signals = signals.to_public_signals();
    CallData {
        proof: MockVerifier::new(DISCLOSE_CIRCUIT).prove(&public_signals),
        public_signals,
    }
}

pub fn disclose_call(root: FieldElement, nullifier: u64) -> CallData {
    disclose_call_for(&disclose_signals(root, nullifier, "250301", &attributes()))
}

/// Noon on the date `disclose_call` proves.
pub fn noon() -> Timestamp {
    Timestamp::parse("2025-03-01T12:00:00Z").unwrap()
}
