//! # Signature Algorithm Registry
//!
//! Each passport signature scheme has its own register circuit and so its
//! own verifier. Bindings are made once at configuration and never change.

use std::collections::BTreeMap;
use std::sync::Arc;

use pop_core::{ProtocolError, SignatureAlgorithm};
use pop_zkp::ProofVerifier;

/// Algorithm to verifier bindings.
#[derive(Debug, Clone, Default)]
pub struct SignatureAlgorithmRegistry {
    verifiers: BTreeMap<SignatureAlgorithm, Arc<dyn ProofVerifier>>,
}

impl SignatureAlgorithmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `algorithm` to `verifier`.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::AlreadyBound`] if `algorithm` already has a verifier.
    pub fn register(&mut self, algorithm: SignatureAlgorithm, verifier: Arc<dyn ProofVerifier>) -> Result<(), ProtocolError> {
        if self.verifiers.contains_key(&algorithm) {
            return Err(ProtocolError::AlreadyBound(algorithm));
        }
        tracing::info!(%algorithm, circuit = verifier.circuit(), "signature algorithm bound");
        self.verifiers.insert(algorithm, verifier);
        Ok(())
    }

    /// Verifier bound to the numeric algorithm id.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::UnknownAlgorithm`] if the id names no algorithm or
    /// the algorithm is unbound.
    pub fn verifier_for(&self, algorithm_id: u64) -> Result<(SignatureAlgorithm, Arc<dyn ProofVerifier>), ProtocolError> {
        SignatureAlgorithm::from_id(algorithm_id)
            .and_then(|alg| self.verifiers.get(&alg).map(|v| (alg, Arc::clone(v))))
            .ok_or(ProtocolError::UnknownAlgorithm(algorithm_id))
    }

    /// Bound algorithms, ordered by id.
    pub fn algorithms(&self) -> Vec<SignatureAlgorithm> {
        self.verifiers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.verifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verifiers.is_empty()
    }
}
