//! # Error Types
//!
//! [`ProtocolError`] is the rejection taxonomy for register and disclose
//! attempts. [`ValidationError`] covers malformed inputs caught while
//! parsing field elements, dates, and identifiers.
//!
//! Every `ProtocolError` is terminal: the attempt aborts, no state is
//! mutated, nothing is retried.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::SignatureAlgorithm;
use crate::field::FieldElement;

/// Which operation a nullifier was consumed by.
///
/// The two sets are disjoint: a value consumed on registration can still be
/// presented on disclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullifierKind {
    /// Consumed by a successful registration.
    Register,
    /// Consumed by a successful disclosure (and its credential mint).
    Disclose,
}

impl NullifierKind {
    /// Lowercase name used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Disclose => "disclose",
        }
    }
}

impl std::fmt::Display for NullifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a register or disclose attempt was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The requested signature algorithm has no bound verifier, or the
    /// numeric id does not name a known algorithm at all.
    #[error("signature algorithm {0} is not bound to a verifier")]
    UnknownAlgorithm(u64),

    /// The proof's attestation id differs from the configured constant.
    #[error("attestation id mismatch: expected {expected}, got {actual}")]
    InvalidAttestationId {
        /// Configured attestation id.
        expected: FieldElement,
        /// Value carried in the public signals.
        actual: FieldElement,
    },

    /// Cryptographic verification failed.
    #[error("invalid proof: {0}")]
    InvalidProof(String),

    /// The Merkle root in the public signals is not the one required.
    #[error("merkle root {submitted} is not accepted")]
    InvalidMerkleRoot {
        /// Root carried in the public signals.
        submitted: FieldElement,
    },

    /// The supplied time lies outside the proof's validity window.
    #[error("time {now} is outside the proof window [{not_before}, {not_after}]")]
    InvalidDateRange {
        /// Evaluation time, seconds since the Unix epoch.
        now: i64,
        /// Window start, seconds since the Unix epoch.
        not_before: i64,
        /// Window end, seconds since the Unix epoch.
        not_after: i64,
    },

    /// The nullifier was already consumed for this operation kind.
    #[error("{kind} nullifier {nullifier} already used")]
    NullifierReuse {
        /// Operation kind the nullifier was presented for.
        kind: NullifierKind,
        /// The repeated nullifier.
        nullifier: FieldElement,
    },

    /// The commitment is already a leaf of the registry.
    #[error("commitment {0} already registered")]
    DuplicateCommitment(FieldElement),

    /// Configuration attempted to bind an algorithm twice.
    #[error("signature algorithm {0} is already bound")]
    AlreadyBound(SignatureAlgorithm),

    /// Public signals could not be reshaped into named fields.
    #[error("malformed public signals: {0}")]
    MalformedSignals(String),
}

impl ProtocolError {
    /// Machine-readable code used in API bodies and metric labels.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownAlgorithm(_) => "UNKNOWN_ALGORITHM",
            Self::InvalidAttestationId { .. } => "INVALID_ATTESTATION_ID",
            Self::InvalidProof(_) => "INVALID_PROOF",
            Self::InvalidMerkleRoot { .. } => "INVALID_MERKLE_ROOT",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::NullifierReuse { .. } => "NULLIFIER_REUSE",
            Self::DuplicateCommitment(_) => "DUPLICATE_COMMITMENT",
            Self::AlreadyBound(_) => "ALREADY_BOUND",
            Self::MalformedSignals(_) => "MALFORMED_SIGNALS",
        }
    }
}

/// Input validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Not a canonical BN254 scalar field element.
    #[error("invalid field element \"{value}\": {reason}")]
    InvalidFieldElement {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Timestamp string is not valid UTC RFC 3339, or epoch out of range.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Passport date is not six digits naming a real calendar day.
    #[error("invalid passport date: \"{0}\" (expected YYMMDD)")]
    InvalidPassportDate(String),

    /// Packed revealed data does not decode to the 90-byte vector.
    #[error("invalid revealed data: {0}")]
    InvalidRevealedData(String),

    /// Signature algorithm name or id is not recognized.
    #[error("unknown signature algorithm: \"{0}\"")]
    UnknownSignatureAlgorithm(String),
}
