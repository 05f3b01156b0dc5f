//! # pop-registry — Register/Disclose Protocol
//!
//! The stateful core. Three owned structures, each behind transactional
//! methods:
//!
//! - **CommitmentRegistry** (`commitment.rs`): append-only lean incremental
//!   Merkle tree of passport commitments.
//! - **NullifierLedger** (`nullifier.rs`): consumed nullifiers, one set per
//!   operation kind.
//! - **CredentialIssuer** (from `pop-sbt`): minted tokens.
//!
//! plus immutable configuration:
//!
//! - **SignatureAlgorithmRegistry** (`algorithm.rs`): algorithm id to
//!   verifier binding.
//! - **CertificateRootRegistry** (`certificate.rs`): trusted roots of the
//!   document-signing certificate tree.
//!
//! [`Protocol`] (`protocol.rs`) combines them. Proof verification runs
//! outside its lock; every check-then-act sequence runs inside it, so two
//! submissions never observe each other half-applied.
//!
//! ## Crate Policy
//!
//! - Every rejection is a [`pop_core::ProtocolError`]; a rejected attempt
//!   leaves no trace in state.
//! - Configuration is loaded from YAML (`config.rs`).

pub mod algorithm;
pub mod certificate;
pub mod commitment;
pub mod config;
pub mod disclose;
pub mod nullifier;
pub mod protocol;
pub mod register;

pub use algorithm::SignatureAlgorithmRegistry;
pub use certificate::CertificateRootRegistry;
pub use commitment::{CommitmentRegistry, InsertReceipt};
pub use config::{register_circuit_name, ConfigError, ProtocolConfig, RegisterVerifierConfig, VerifierConfig, DISCLOSE_CIRCUIT};
pub use disclose::{DiscloseReceipt, DiscloseService, VerifiedDisclosure};
pub use nullifier::NullifierLedger;
pub use protocol::{Operation, Outcome, Protocol, ProtocolBuilder, ProtocolSettings, ProtocolState, ProtocolStats};
pub use register::{RegisterReceipt, RegisterService, VerifiedRegistration};
