//! # Mock Verifier
//!
//! A deterministic, transparent stand-in for development and testing.
//! A mock "proof" is the SHA-256 digest of the circuit name and the public
//! signals, reduced into the scalar field and placed in `a[0]`. Verification
//! recomputes the digest. No zero-knowledge or soundness guarantees.
//!
//! Binding the digest to the circuit name means a proof minted for one
//! signature algorithm's circuit fails against another's verifier, the way
//! real verifying keys behave.

use pop_core::field::parse_uint256;
use pop_core::FieldElement;
use sha2::{Digest, Sha256};

use crate::proof::Groth16Proof;
use crate::traits::{ProofVerifier, VerifyError};

/// Deterministic SHA-256 verifier for one named circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockVerifier {
    circuit: String,
}

impl MockVerifier {
    /// Create a mock verifier for `circuit`.
    pub fn new(circuit: impl Into<String>) -> Self {
        Self {
            circuit: circuit.into(),
        }
    }

    /// Produce the proof this verifier accepts for `public_signals`.
    pub fn prove(&self, public_signals: &[FieldElement]) -> Groth16Proof {
        let zero = || "0".to_string();
        Groth16Proof {
            a: [self.digest(public_signals).to_decimal(), "1".to_string()],
            b: [[zero(), zero()], [zero(), zero()]],
            c: [zero(), zero()],
        }
    }

    fn digest(&self, public_signals: &[FieldElement]) -> FieldElement {
        let mut hasher = Sha256::new();
        hasher.update(self.circuit.as_bytes());
        hasher.update([0x00]);
        for signal in public_signals {
            hasher.update(signal.as_bytes());
        }
        FieldElement::from_be_bytes_reduced(&hasher.finalize())
    }
}

impl ProofVerifier for MockVerifier {
    fn circuit(&self) -> &str {
        &self.circuit
    }

    fn verify(&self, proof: &Groth16Proof, public_signals: &[FieldElement]) -> Result<bool, VerifyError> {
        let claimed = parse_uint256(&proof.a[0]).map_err(|e| VerifyError::MalformedProof(e.to_string()))?;
        Ok(claimed == *self.digest(public_signals).as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals() -> Vec<FieldElement> {
        (1..=5).map(FieldElement::from_u64).collect()
    }

    #[test]
    fn accepts_its_own_proof() {
        let v = MockVerifier::new("register_sha256WithRSAEncryption_65537");
        let proof = v.prove(&signals());
        assert!(v.verify(&proof, &signals()).unwrap());
    }

    #[test]
    fn rejects_altered_signals() {
        let v = MockVerifier::new("disclose");
        let proof = v.prove(&signals());
        let mut altered = signals();
        altered[2] = FieldElement::from_u64(99);
        assert!(!v.verify(&proof, &altered).unwrap());
    }

    #[test]
    fn rejects_proof_for_other_circuit() {
        let a = MockVerifier::new("register_a");
        let b = MockVerifier::new("register_b");
        assert!(!b.verify(&a.prove(&signals()), &signals()).unwrap());
    }

    #[test]
    fn garbage_proof_is_malformed() {
        let v = MockVerifier::new("disclose");
        let mut proof = v.prove(&signals());
        proof.a[0] = "not a number".into();
        assert!(matches!(v.verify(&proof, &signals()), Err(VerifyError::MalformedProof(_))));
    }

    #[test]
    fn proofs_are_deterministic() {
        let v = MockVerifier::new("disclose");
        assert_eq!(v.prove(&signals()), v.prove(&signals()));
        assert_eq!(v.circuit(), "disclose");
    }
}
