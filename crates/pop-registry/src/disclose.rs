//! # Disclose Service
//!
//! A disclosure proves membership of a registered commitment and reveals a
//! chosen subset of passport attributes. On success exactly one credential
//! is minted.
//!
//! Check order, first failure wins:
//!
//! 1. the membership root equals the current registry root
//! 2. the evaluation time lies in the window around the proof's date
//! 3. the attestation id matches
//! 4. the proof verifies
//! 5. the disclose nullifier is unused
//!
//! Step 1 is evaluated twice: once against a snapshot before verification,
//! and again under the protocol lock together with steps 5 and the mint.
//! Only the second evaluation is authoritative.

use pop_core::{
    AttestationId, DisclosureAttributeSet, FieldElement, Nullifier, NullifierKind, ProtocolError, Timestamp, TokenId,
};
use pop_sbt::CredentialIssuer;
use pop_zkp::{CallData, DiscloseSignals, ProofVerifier};
use serde::{Deserialize, Serialize};

use crate::commitment::CommitmentRegistry;
use crate::nullifier::NullifierLedger;

/// Outcome of a successful disclosure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscloseReceipt {
    /// Credential minted for this disclosure.
    pub token_id: TokenId,
    /// User identifier the credential is issued to.
    pub owner: FieldElement,
    /// Disclose nullifier consumed by this disclosure.
    pub nullifier: Nullifier,
    /// Attributes revealed by the proof.
    pub attributes: DisclosureAttributeSet,
    /// Credential validity start.
    pub not_before: Timestamp,
    /// Credential validity end.
    pub not_after: Timestamp,
}

/// Disclosure proof that passed verification, awaiting commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedDisclosure {
    /// Named public signals of the accepted proof.
    pub signals: DiscloseSignals,
    /// Attributes unpacked from the revealed data.
    pub attributes: DisclosureAttributeSet,
}

/// Read-only view of the configuration a disclosure is checked against.
#[derive(Debug, Clone, Copy)]
pub struct DiscloseService<'a> {
    verifier: Option<&'a dyn ProofVerifier>,
    attestation_id: AttestationId,
    date_tolerance_secs: i64,
}

impl<'a> DiscloseService<'a> {
    /// Borrow the disclosure verifier and the date window parameters.
    pub fn new(verifier: Option<&'a dyn ProofVerifier>, attestation_id: AttestationId, date_tolerance_secs: i64) -> Self {
        Self {
            verifier,
            attestation_id,
            date_tolerance_secs,
        }
    }

    /// Steps 1 to 4 against `current_root` as observed before verification.
    pub fn verify(
        &self,
        call: &CallData,
        current_root: FieldElement,
        at: Timestamp,
    ) -> Result<VerifiedDisclosure, ProtocolError> {
        let signals = DiscloseSignals::from_public_signals(&call.public_signals)?;
        let attributes = signals.attributes()?;

        check_root(&signals, current_root)?;

        let (not_before, not_after) = signals.validity_window(self.date_tolerance_secs);
        if at < not_before || at > not_after {
            return Err(ProtocolError::InvalidDateRange {
                now: at.epoch_secs(),
                not_before: not_before.epoch_secs(),
                not_after: not_after.epoch_secs(),
            });
        }

        if signals.attestation_id != self.attestation_id {
            return Err(ProtocolError::InvalidAttestationId {
                expected: self.attestation_id.value(),
                actual: signals.attestation_id.value(),
            });
        }

        let verifier = self
            .verifier
            .ok_or_else(|| ProtocolError::InvalidProof("no disclosure verifier configured".into()))?;
        match verifier.verify(&call.proof, &call.public_signals) {
            Ok(true) => Ok(VerifiedDisclosure { signals, attributes }),
            Ok(false) => Err(ProtocolError::InvalidProof(format!("rejected by {}", verifier.circuit()))),
            Err(e) => Err(ProtocolError::InvalidProof(e.to_string())),
        }
    }

    /// Authoritative root check, nullifier consumption and mint.
    pub fn commit(
        verified: VerifiedDisclosure,
        commitments: &CommitmentRegistry,
        nullifiers: &mut NullifierLedger,
        issuer: &mut CredentialIssuer,
        at: Timestamp,
    ) -> Result<DiscloseReceipt, ProtocolError> {
        let VerifiedDisclosure { signals, attributes } = verified;
        // No membership proof can exist for an empty registry, even
        // against its zero root.
        if commitments.is_empty() {
            return Err(ProtocolError::InvalidMerkleRoot {
                submitted: signals.merkle_root,
            });
        }
        check_root(&signals, commitments.current_root())?;
        nullifiers.check(NullifierKind::Disclose, &signals.nullifier)?;
        nullifiers.record(NullifierKind::Disclose, signals.nullifier)?;

        let window = issuer.validity_window(&attributes, at);
        let token = issuer.mint(signals.user_identifier, attributes, signals.nullifier, window);
        Ok(DiscloseReceipt {
            token_id: token.id,
            owner: token.owner,
            nullifier: token.nullifier,
            attributes: token.attributes,
            not_before: token.not_before,
            not_after: token.not_after,
        })
    }
}

fn check_root(signals: &DiscloseSignals, current_root: FieldElement) -> Result<(), ProtocolError> {
    if signals.merkle_root != current_root {
        return Err(ProtocolError::InvalidMerkleRoot {
            submitted: signals.merkle_root,
        });
    }
    Ok(())
}
