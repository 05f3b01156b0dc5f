//! # Protocol
//!
//! The single serialization point for every state change. [`Protocol::apply`]
//! runs an [`Operation`] as one transaction:
//!
//! - configuration (verifiers, attestation id, trusted roots) is immutable
//!   after [`ProtocolBuilder::build`] and read without locking;
//! - proof verification runs before the lock is taken, in parallel with any
//!   number of other submissions;
//! - the check-then-act sequence (root comparison, nullifier check,
//!   insertion or mint) runs while holding one `parking_lot::Mutex` over
//!   the registry, ledger and issuer.
//!
//! A failed operation leaves state exactly as it was.

use std::sync::Arc;

use parking_lot::Mutex;
use pop_core::{AttestationId, Commitment, FieldElement, NullifierKind, ProtocolError, SignatureAlgorithm, Timestamp, TokenId};
use pop_crypto::{CryptoError, HashFunction, MerkleProof};
use pop_sbt::{CredentialIssuer, CredentialToken, SbtError, TokenMetadata, DEFAULT_VALIDITY_SECS};
use pop_zkp::{CallData, ProofVerifier};
use serde::{Deserialize, Serialize};

use crate::algorithm::SignatureAlgorithmRegistry;
use crate::certificate::CertificateRootRegistry;
use crate::commitment::{CommitmentRegistry, InsertReceipt};
use crate::config::DEFAULT_DATE_TOLERANCE_SECS;
use crate::disclose::{DiscloseReceipt, DiscloseService};
use crate::nullifier::NullifierLedger;
use crate::register::{RegisterReceipt, RegisterService};

/// Scalar protocol parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolSettings {
    /// Attestation id every proof must carry.
    pub attestation_id: AttestationId,
    /// Commitment tree node hash.
    pub hash: HashFunction,
    /// Slack around the disclosure date window, in seconds.
    pub date_tolerance_secs: i64,
    /// Credential lifetime when no expiry date is revealed, in seconds.
    pub default_validity_secs: i64,
}

impl Default for ProtocolSettings {
    fn default() -> Self {
        Self {
            attestation_id: AttestationId::default(),
            hash: HashFunction::default(),
            date_tolerance_secs: DEFAULT_DATE_TOLERANCE_SECS,
            default_validity_secs: DEFAULT_VALIDITY_SECS,
        }
    }
}

/// Mutable protocol state. Only reachable through the protocol lock.
#[derive(Debug, Clone)]
pub struct ProtocolState {
    /// Commitment tree.
    pub commitments: CommitmentRegistry,
    /// Consumed register and disclose nullifiers.
    pub nullifiers: NullifierLedger,
    /// Minted credentials.
    pub issuer: CredentialIssuer,
}

/// A state-changing request.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Register a commitment under the numeric signature algorithm id.
    Register { algorithm: u64, call: CallData },
    /// Disclose attributes and mint a credential, evaluated at `at`.
    Disclose { call: CallData, at: Timestamp },
    /// Insert a commitment without a proof. Administrative seeding of the
    /// registry; never exposed to untrusted callers.
    AddCommitment(Commitment),
}

impl Operation {
    /// Lowercase name used in logs and metric labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::Disclose { .. } => "disclose",
            Self::AddCommitment(_) => "add_commitment",
        }
    }
}

/// Result of a successful [`Operation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A commitment was registered.
    Registered(RegisterReceipt),
    /// A credential was minted.
    Disclosed(DiscloseReceipt),
    /// A commitment was seeded without a proof.
    CommitmentAdded(InsertReceipt),
}

/// Point-in-time counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolStats {
    /// Leaves in the commitment tree.
    pub commitments: usize,
    /// Consumed register nullifiers.
    pub register_nullifiers: usize,
    /// Consumed disclose nullifiers.
    pub disclose_nullifiers: usize,
    /// Credentials minted so far.
    pub tokens: u64,
}

/// Assembles a [`Protocol`]. All bindings are made here.
#[derive(Debug, Default)]
pub struct ProtocolBuilder {
    settings: ProtocolSettings,
    algorithms: SignatureAlgorithmRegistry,
    certificate_roots: CertificateRootRegistry,
    disclose_verifier: Option<Arc<dyn ProofVerifier>>,
    country_codes: Vec<(String, String)>,
}

impl ProtocolBuilder {
    /// Start from `settings` with nothing bound.
    pub fn new(settings: ProtocolSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Bind a register verifier. Fails if `algorithm` is already bound.
    pub fn add_signature_algorithm(
        &mut self,
        algorithm: SignatureAlgorithm,
        verifier: Arc<dyn ProofVerifier>,
    ) -> Result<&mut Self, ProtocolError> {
        self.algorithms.register(algorithm, verifier)?;
        Ok(self)
    }

    /// Bind the disclosure verifier, replacing any previous one.
    pub fn set_disclose_verifier(&mut self, verifier: Arc<dyn ProofVerifier>) -> &mut Self {
        self.disclose_verifier = Some(verifier);
        self
    }

    /// Trust a certificate root. The first root enables the check.
    pub fn add_certificate_root(&mut self, root: FieldElement) -> &mut Self {
        self.certificate_roots.add(root);
        self
    }

    /// Add alpha-3 code to display name mappings for token metadata.
    pub fn add_country_codes<I, K, V>(&mut self, mapping: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.country_codes
            .extend(mapping.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Freeze the bindings and create empty state.
    pub fn build(self) -> Protocol {
        let mut issuer = CredentialIssuer::new(self.settings.default_validity_secs);
        issuer.add_country_codes(self.country_codes);
        if !self.certificate_roots.is_enabled() {
            tracing::warn!("no trusted certificate roots configured; certificate root check disabled");
        }
        if self.disclose_verifier.is_none() {
            tracing::warn!("no disclosure verifier configured; every disclosure will be rejected");
        }
        tracing::info!(
            hash = %self.settings.hash,
            algorithms = self.algorithms.len(),
            certificate_roots = self.certificate_roots.len(),
            "protocol initialized"
        );
        Protocol {
            settings: self.settings,
            algorithms: self.algorithms,
            certificate_roots: self.certificate_roots,
            disclose_verifier: self.disclose_verifier,
            state: Mutex::new(ProtocolState {
                commitments: CommitmentRegistry::new(self.settings.hash),
                nullifiers: NullifierLedger::new(),
                issuer,
            }),
        }
    }
}

/// The Register/Disclose protocol.
#[derive(Debug)]
pub struct Protocol {
    settings: ProtocolSettings,
    algorithms: SignatureAlgorithmRegistry,
    certificate_roots: CertificateRootRegistry,
    disclose_verifier: Option<Arc<dyn ProofVerifier>>,
    state: Mutex<ProtocolState>,
}

impl Protocol {
    /// Start a [`ProtocolBuilder`].
    pub fn builder(settings: ProtocolSettings) -> ProtocolBuilder {
        ProtocolBuilder::new(settings)
    }

    /// Run `operation` as one transaction.
    pub fn apply(&self, operation: Operation) -> Result<Outcome, ProtocolError> {
        let _span = tracing::debug_span!("apply", operation = operation.name()).entered();
        match operation {
            Operation::Register { algorithm, call } => self.validate_proof(&call, algorithm).map(Outcome::Registered),
            Operation::Disclose { call, at } => self.mint(&call, at).map(Outcome::Disclosed),
            Operation::AddCommitment(commitment) => self.add_commitment(commitment).map(Outcome::CommitmentAdded),
        }
    }

    /// Verify a register proof and, on success, insert its commitment.
    pub fn validate_proof(&self, call: &CallData, algorithm: u64) -> Result<RegisterReceipt, ProtocolError> {
        let result = self.register(algorithm, call);
        match &result {
            Ok(r) => {
                metrics::counter!("pop_registrations_total", "algorithm" => r.algorithm.name()).increment(1);
                tracing::info!(
                    algorithm = %r.algorithm,
                    commitment = %r.commitment,
                    leaf_index = r.leaf_index,
                    root = %r.root,
                    "commitment registered"
                );
            }
            Err(err) => record_rejection("register", err),
        }
        result
    }

    /// Verify a disclosure proof and, on success, mint a credential.
    pub fn mint(&self, call: &CallData, at: Timestamp) -> Result<DiscloseReceipt, ProtocolError> {
        let result = self.disclose(call, at);
        match &result {
            Ok(d) => {
                metrics::counter!("pop_disclosures_total").increment(1);
                tracing::info!(token_id = %d.token_id, owner = %d.owner, not_after = %d.not_after, "credential issued");
            }
            Err(err) => record_rejection("disclose", err),
        }
        result
    }

    /// Administrative insert without a proof.
    pub fn add_commitment(&self, commitment: Commitment) -> Result<InsertReceipt, ProtocolError> {
        let result = self.state.lock().commitments.insert(commitment);
        match &result {
            Ok(i) => tracing::info!(leaf_index = i.leaf_index, root = %i.root, "commitment added without proof"),
            Err(err) => record_rejection("add_commitment", err),
        }
        result
    }

    fn register(&self, algorithm: u64, call: &CallData) -> Result<RegisterReceipt, ProtocolError> {
        let service = RegisterService::new(&self.algorithms, &self.certificate_roots, self.settings.attestation_id);
        let verified = service.verify(algorithm, call)?;
        let mut state = self.state.lock();
        let ProtocolState {
            commitments,
            nullifiers,
            ..
        } = &mut *state;
        RegisterService::commit(&verified, nullifiers, commitments)
    }

    fn disclose(&self, call: &CallData, at: Timestamp) -> Result<DiscloseReceipt, ProtocolError> {
        let service = DiscloseService::new(
            self.disclose_verifier.as_deref(),
            self.settings.attestation_id,
            self.settings.date_tolerance_secs,
        );
        let verified = service.verify(call, self.current_root(), at)?;
        let mut state = self.state.lock();
        let ProtocolState {
            commitments,
            nullifiers,
            issuer,
        } = &mut *state;
        DiscloseService::commit(verified, commitments, nullifiers, issuer, at)
    }

    /// Root of the commitment tree; zero while empty.
    pub fn current_root(&self) -> FieldElement {
        self.state.lock().commitments.current_root()
    }

    /// Inclusion proof for the commitment at `index`.
    pub fn merkle_proof(&self, index: usize) -> Result<MerkleProof, CryptoError> {
        self.state.lock().commitments.proof(index)
    }

    /// Snapshot of a minted credential.
    pub fn token(&self, id: TokenId) -> Result<CredentialToken, SbtError> {
        self.state.lock().issuer.token(id).cloned()
    }

    /// Credential metadata with expiry evaluated at `at`.
    pub fn token_metadata(&self, id: TokenId, at: Timestamp) -> Result<TokenMetadata, SbtError> {
        self.state.lock().issuer.render(id, at)
    }

    /// Credential metadata as a base64 `data:` URI.
    pub fn token_uri(&self, id: TokenId, at: Timestamp) -> Result<String, SbtError> {
        self.state.lock().issuer.token_uri(id, at)
    }

    /// Bound signature algorithms.
    pub fn algorithms(&self) -> Vec<SignatureAlgorithm> {
        self.algorithms.algorithms()
    }

    pub fn settings(&self) -> &ProtocolSettings {
        &self.settings
    }

    pub fn certificate_roots(&self) -> &CertificateRootRegistry {
        &self.certificate_roots
    }

    pub fn has_disclose_verifier(&self) -> bool {
        self.disclose_verifier.is_some()
    }

    pub fn stats(&self) -> ProtocolStats {
        let state = self.state.lock();
        ProtocolStats {
            commitments: state.commitments.len(),
            register_nullifiers: state.nullifiers.len(NullifierKind::Register),
            disclose_nullifiers: state.nullifiers.len(NullifierKind::Disclose),
            tokens: state.issuer.total_supply(),
        }
    }

    /// Run `f` against a consistent snapshot of the state.
    pub fn read<R>(&self, f: impl FnOnce(&ProtocolState) -> R) -> R {
        f(&self.state.lock())
    }
}

fn record_rejection(operation: &'static str, err: &ProtocolError) {
    metrics::counter!("pop_rejections_total", "operation" => operation, "reason" => err.code()).increment(1);
    tracing::warn!(operation, code = err.code(), error = %err, "operation rejected");
}
