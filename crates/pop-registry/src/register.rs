//! # Register Service
//!
//! A registration proves, for one signature algorithm, that the holder owns
//! a passport signed under a trusted certificate, and publishes a
//! commitment to it.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. the algorithm has a bound verifier
//! 2. the public signals have the register shape
//! 3. the attestation id matches
//! 4. the certificate root is trusted
//! 5. the signals name the requested algorithm and the proof verifies
//! 6. the register nullifier is unused
//! 7. the commitment is new
//!
//! Steps 1 to 5 are pure and run without the protocol lock. Steps 6 and 7
//! mutate state and run under it.

use pop_core::{AttestationId, Commitment, FieldElement, Nullifier, NullifierKind, ProtocolError, SignatureAlgorithm};
use pop_zkp::{CallData, RegisterSignals};
use serde::{Deserialize, Serialize};

use crate::algorithm::SignatureAlgorithmRegistry;
use crate::certificate::CertificateRootRegistry;
use crate::commitment::CommitmentRegistry;
use crate::nullifier::NullifierLedger;

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterReceipt {
    /// Algorithm the proof was verified under.
    pub algorithm: SignatureAlgorithm,
    /// Register nullifier consumed by this registration.
    pub nullifier: Nullifier,
    /// Commitment appended to the registry.
    pub commitment: Commitment,
    /// Zero-based position of the new leaf.
    pub leaf_index: usize,
    /// Registry root after insertion.
    pub root: FieldElement,
}

/// Register proof that passed verification, awaiting commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedRegistration {
    /// Algorithm whose verifier accepted the proof.
    pub algorithm: SignatureAlgorithm,
    /// Named public signals of the accepted proof.
    pub signals: RegisterSignals,
}

/// Read-only view of the configuration a registration is checked against.
#[derive(Debug, Clone, Copy)]
pub struct RegisterService<'a> {
    algorithms: &'a SignatureAlgorithmRegistry,
    certificate_roots: &'a CertificateRootRegistry,
    attestation_id: AttestationId,
}

impl<'a> RegisterService<'a> {
    /// Borrow the algorithm bindings, trusted roots and expected attestation id.
    pub fn new(
        algorithms: &'a SignatureAlgorithmRegistry,
        certificate_roots: &'a CertificateRootRegistry,
        attestation_id: AttestationId,
    ) -> Self {
        Self {
            algorithms,
            certificate_roots,
            attestation_id,
        }
    }

    /// Steps 1 to 5.
    pub fn verify(&self, algorithm_id: u64, call: &CallData) -> Result<VerifiedRegistration, ProtocolError> {
        let (algorithm, verifier) = self.algorithms.verifier_for(algorithm_id)?;
        let signals = RegisterSignals::from_public_signals(&call.public_signals)?;

        if signals.attestation_id != self.attestation_id {
            return Err(ProtocolError::InvalidAttestationId {
                expected: self.attestation_id.value(),
                actual: signals.attestation_id.value(),
            });
        }

        self.certificate_roots.check(&signals.merkle_root)?;

        if signals.signature_algorithm != FieldElement::from_u64(algorithm.id()) {
            return Err(ProtocolError::InvalidProof(format!(
                "proof is for signature algorithm {}, submitted as {algorithm}",
                signals.signature_algorithm
            )));
        }

        match verifier.verify(&call.proof, &call.public_signals) {
            Ok(true) => Ok(VerifiedRegistration { algorithm, signals }),
            Ok(false) => Err(ProtocolError::InvalidProof(format!("rejected by {}", verifier.circuit()))),
            Err(e) => Err(ProtocolError::InvalidProof(e.to_string())),
        }
    }

    /// Steps 6 and 7. The nullifier is recorded first and released again
    /// if the commitment cannot be inserted.
    pub fn commit(
        verified: &VerifiedRegistration,
        nullifiers: &mut NullifierLedger,
        commitments: &mut CommitmentRegistry,
    ) -> Result<RegisterReceipt, ProtocolError> {
        let nullifier = verified.signals.nullifier;
        let commitment = verified.signals.commitment;
        nullifiers.check(NullifierKind::Register, &nullifier)?;
        nullifiers.record(NullifierKind::Register, nullifier)?;
        let insert = match commitments.insert(commitment) {
            Ok(receipt) => receipt,
            Err(e) => {
                nullifiers.rollback(NullifierKind::Register, &nullifier);
                return Err(e);
            }
        };
        Ok(RegisterReceipt {
            algorithm: verified.algorithm,
            nullifier,
            commitment,
            leaf_index: insert.leaf_index,
            root: insert.root,
        })
    }
}
