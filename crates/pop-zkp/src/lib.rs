//! # pop-zkp — Proof Verification
//!
//! Zero-knowledge proofs are consumed here as an opaque capability:
//! `verify(proof, public_signals) -> bool`. The circuits themselves live
//! elsewhere; this crate knows their wire format and the order of their
//! public signals, nothing more.
//!
//! ## Verifiers
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Groth16Verifier`] | arkworks Groth16 over BN254, keyed by a snarkjs `verification_key.json` (feature `groth16`, default) |
//! | [`MockVerifier`] | deterministic SHA-256 stand-in for tests and local development |
//!
//! ## Public Signals
//!
//! [`RegisterSignals`] and [`DiscloseSignals`] reshape the flat ordered
//! signal vector into named fields. Length or range errors surface as
//! `ProtocolError::MalformedSignals`.

pub mod mock;
pub mod proof;
pub mod signals;
pub mod traits;

#[cfg(feature = "groth16")]
pub mod groth16;

#[cfg(feature = "groth16")]
pub use groth16::{Groth16Verifier, VerificationKeyJson};
pub use mock::MockVerifier;
pub use proof::{CallData, Groth16Proof};
pub use signals::{DiscloseSignals, RegisterSignals};
pub use traits::{ProofVerifier, VerifyError};
