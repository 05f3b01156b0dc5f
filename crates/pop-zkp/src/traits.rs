//! # Verifier Trait
//!
//! Every circuit the registry accepts proofs for has exactly one
//! [`ProofVerifier`]. Verification is pure: no state, no I/O, safe to run
//! concurrently from any number of threads.

use pop_core::FieldElement;
use thiserror::Error;

use crate::proof::Groth16Proof;

/// Error during proof verification.
///
/// `Ok(false)` from [`ProofVerifier::verify`] means a well-formed proof
/// failed the check; an `Err` means it could not even be checked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The proof is structurally malformed (bad coordinate, point not on curve).
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// The verification key could not be loaded.
    #[error("malformed verification key: {0}")]
    MalformedKey(String),

    /// Wrong number of public inputs for this circuit.
    #[error("expected {expected} public signals, got {actual}")]
    PublicInputCount {
        /// Number the verification key commits to.
        expected: usize,
        /// Number supplied.
        actual: usize,
    },

    /// The proving backend reported an internal failure.
    #[error("verification backend error: {0}")]
    Backend(String),
}

/// A verifier for one circuit.
///
/// `Send + Sync` so verifiers can be shared behind `Arc` across request
/// handlers.
pub trait ProofVerifier: Send + Sync + std::fmt::Debug {
    /// Name of the circuit this verifier is keyed for. Used in logs.
    fn circuit(&self) -> &str;

    /// Check `proof` against `public_signals`.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError`] when the proof or signals cannot be decoded.
    fn verify(&self, proof: &Groth16Proof, public_signals: &[FieldElement]) -> Result<bool, VerifyError>;
}
