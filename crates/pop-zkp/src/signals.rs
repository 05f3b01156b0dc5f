//! # Public Signal Layouts
//!
//! Circuits emit a flat, ordered vector of field elements. These types give
//! each position a name and validate the shape before any verification is
//! attempted.
//!
//! Register (5 signals):
//!
//! ```text
//! [nullifier, commitment, signature_algorithm, merkle_root, attestation_id]
//! ```
//!
//! Disclose (14 signals):
//!
//! ```text
//! [nullifier, revealed_packed[0..3], attestation_id, merkle_root, scope,
//!  current_date[0..6] (Y Y M M D D digits), user_identifier]
//! ```

use pop_core::{
    AttestationId, Commitment, DisclosureAttributeSet, FieldElement, Nullifier, PassportDate, ProtocolError,
    Timestamp,
};
use serde::{Deserialize, Serialize};

fn expect_len(signals: &[FieldElement], expected: usize, circuit: &str) -> Result<(), ProtocolError> {
    if signals.len() != expected {
        return Err(ProtocolError::MalformedSignals(format!(
            "{circuit} expects {expected} public signals, got {}",
            signals.len()
        )));
    }
    Ok(())
}

/// Named view of a register proof's public signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSignals {
    pub nullifier: Nullifier,
    pub commitment: Commitment,
    /// Numeric signature algorithm id the circuit was compiled for.
    pub signature_algorithm: FieldElement,
    /// Root of the document-signing-certificate tree the proof was made against.
    pub merkle_root: FieldElement,
    pub attestation_id: AttestationId,
}

impl RegisterSignals {
    /// Number of public signals.
    pub const LEN: usize = 5;

    /// Reshape an ordered signal vector.
    pub fn from_public_signals(signals: &[FieldElement]) -> Result<Self, ProtocolError> {
        expect_len(signals, Self::LEN, "register")?;
        Ok(Self {
            nullifier: Nullifier::new(signals[0]),
            commitment: Commitment::new(signals[1]),
            signature_algorithm: signals[2],
            merkle_root: signals[3],
            attestation_id: AttestationId::new(signals[4]),
        })
    }

    /// Flatten back to circuit order.
    pub fn to_public_signals(&self) -> Vec<FieldElement> {
        vec![
            self.nullifier.value(),
            self.commitment.value(),
            self.signature_algorithm,
            self.merkle_root,
            self.attestation_id.value(),
        ]
    }
}

/// Named view of a disclose proof's public signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscloseSignals {
    pub nullifier: Nullifier,
    pub revealed_data_packed: [FieldElement; 3],
    pub attestation_id: AttestationId,
    /// Commitment-registry root the membership proof was made against.
    pub merkle_root: FieldElement,
    /// Application scope the nullifier is bound to.
    pub scope: FieldElement,
    /// Date the proof was generated for, as seen by the prover.
    pub current_date: PassportDate,
    /// Identity the credential is issued to.
    pub user_identifier: FieldElement,
}

impl DiscloseSignals {
    /// Number of public signals.
    pub const LEN: usize = 14;

    /// Reshape an ordered signal vector.
    ///
    /// The six date signals must each be a single decimal digit and together
    /// name a real calendar day.
    pub fn from_public_signals(signals: &[FieldElement]) -> Result<Self, ProtocolError> {
        expect_len(signals, Self::LEN, "disclose")?;
        let mut digits = [0u8; 6];
        for (digit, signal) in digits.iter_mut().zip(&signals[7..13]) {
            *digit = signal
                .to_u64()
                .filter(|d| *d <= 9)
                .map(|d| d as u8)
                .ok_or_else(|| ProtocolError::MalformedSignals(format!("current_date digit {signal} out of range")))?;
        }
        let current_date =
            PassportDate::from_digits(digits).map_err(|e| ProtocolError::MalformedSignals(e.to_string()))?;
        Ok(Self {
            nullifier: Nullifier::new(signals[0]),
            revealed_data_packed: [signals[1], signals[2], signals[3]],
            attestation_id: AttestationId::new(signals[4]),
            merkle_root: signals[5],
            scope: signals[6],
            current_date,
            user_identifier: signals[13],
        })
    }

    /// Flatten back to circuit order.
    pub fn to_public_signals(&self) -> Vec<FieldElement> {
        let date = self.current_date.to_string();
        let mut out = Vec::with_capacity(Self::LEN);
        out.push(self.nullifier.value());
        out.extend_from_slice(&self.revealed_data_packed);
        out.push(self.attestation_id.value());
        out.push(self.merkle_root);
        out.push(self.scope);
        out.extend(date.bytes().map(|b| FieldElement::from_u64(u64::from(b - b'0'))));
        out.push(self.user_identifier);
        out
    }

    /// Window in which the proof may be presented: midnight UTC of
    /// `current_date`, widened by `tolerance_secs` on both sides.
    pub fn validity_window(&self, tolerance_secs: i64) -> (Timestamp, Timestamp) {
        let midnight = self.current_date.midnight();
        (midnight.add_secs(-tolerance_secs), midnight.add_secs(tolerance_secs))
    }

    /// Unpack the revealed attributes.
    pub fn attributes(&self) -> Result<DisclosureAttributeSet, ProtocolError> {
        DisclosureAttributeSet::unpack(&self.revealed_data_packed)
            .map_err(|e| ProtocolError::MalformedSignals(e.to_string()))
    }
}
