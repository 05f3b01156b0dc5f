//! # Protocol Configuration
//!
//! YAML file describing one deployment:
//!
//! ```yaml
//! attestation_id: "8518753152044246090169372947057357973469996808638122125210848696986717482788"
//! hash: poseidon
//! date_tolerance_secs: 86400
//! default_validity_secs: 31536000
//! trusted_certificate_roots:
//!   - "12345"
//! register_verifiers:
//!   - algorithm: sha256WithRSAEncryption_65537
//!     verifier:
//!       backend: groth16
//!       verification_key: keys/register_sha256WithRSAEncryption_65537.json
//! disclose_verifier:
//!   backend: mock
//! country_codes:
//!   FRA: France
//! ```
//!
//! Field elements are quoted decimal strings. Relative key paths resolve
//! against the directory containing the configuration file.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pop_core::{AttestationId, FieldElement, ProtocolError, SignatureAlgorithm};
use pop_crypto::HashFunction;
use pop_sbt::DEFAULT_VALIDITY_SECS;
use pop_zkp::{Groth16Verifier, MockVerifier, ProofVerifier, VerifyError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::{Protocol, ProtocolBuilder, ProtocolSettings};

/// Disclosure proofs are accepted within one day either side of the
/// circuit's current date.
pub const DEFAULT_DATE_TOLERANCE_SECS: i64 = 24 * 60 * 60;

/// Circuit name of the disclosure verifier.
pub const DISCLOSE_CIRCUIT: &str = "disclose";

/// Circuit name of the register verifier for `algorithm`.
pub fn register_circuit_name(algorithm: SignatureAlgorithm) -> String {
    format!("register_{}", algorithm.name())
}

/// Errors loading or applying a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("cannot load verifier for {circuit}: {source}")]
    Verifier {
        circuit: String,
        #[source]
        source: VerifyError,
    },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// How to build one verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum VerifierConfig {
    /// arkworks Groth16 keyed by a snarkjs `verification_key.json`.
    Groth16 { verification_key: PathBuf },
    /// Deterministic SHA-256 stand-in. Development only.
    Mock,
}

impl VerifierConfig {
    fn load(&self, circuit: String, base_dir: &Path) -> Result<Arc<dyn ProofVerifier>, ConfigError> {
        match self {
            Self::Groth16 { verification_key } => {
                let path = base_dir.join(verification_key);
                let verifier = Groth16Verifier::from_file(circuit.clone(), &path)
                    .map_err(|source| ConfigError::Verifier { circuit, source })?;
                Ok(Arc::new(verifier))
            }
            Self::Mock => {
                tracing::warn!(%circuit, "mock verifier bound; proofs carry no soundness");
                Ok(Arc::new(MockVerifier::new(circuit)))
            }
        }
    }
}

/// One register circuit binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterVerifierConfig {
    pub algorithm: SignatureAlgorithm,
    pub verifier: VerifierConfig,
}

/// Deployment configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtocolConfig {
    #[serde(default)]
    pub attestation_id: AttestationId,
    #[serde(default)]
    pub hash: HashFunction,
    #[serde(default = "default_date_tolerance")]
    pub date_tolerance_secs: i64,
    #[serde(default = "default_validity")]
    pub default_validity_secs: i64,
    /// Empty disables the certificate-root check.
    #[serde(default)]
    pub trusted_certificate_roots: Vec<FieldElement>,
    #[serde(default)]
    pub register_verifiers: Vec<RegisterVerifierConfig>,
    #[serde(default)]
    pub disclose_verifier: Option<VerifierConfig>,
    #[serde(default)]
    pub country_codes: BTreeMap<String, String>,
}

fn default_date_tolerance() -> i64 {
    DEFAULT_DATE_TOLERANCE_SECS
}

fn default_validity() -> i64 {
    DEFAULT_VALIDITY_SECS
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            attestation_id: AttestationId::default(),
            hash: HashFunction::default(),
            date_tolerance_secs: DEFAULT_DATE_TOLERANCE_SECS,
            default_validity_secs: DEFAULT_VALIDITY_SECS,
            trusted_certificate_roots: Vec::new(),
            register_verifiers: Vec::new(),
            disclose_verifier: None,
            country_codes: BTreeMap::new(),
        }
    }
}

impl ProtocolConfig {
    /// Parse and validate YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Structural checks that do not touch the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.date_tolerance_secs < 0 {
            return Err(ConfigError::Invalid("date_tolerance_secs must not be negative".into()));
        }
        if self.default_validity_secs <= 0 {
            return Err(ConfigError::Invalid("default_validity_secs must be positive".into()));
        }
        let mut seen = BTreeSet::new();
        for entry in &self.register_verifiers {
            if !seen.insert(entry.algorithm) {
                return Err(ConfigError::Protocol(ProtocolError::AlreadyBound(entry.algorithm)));
            }
        }
        Ok(())
    }

    pub fn settings(&self) -> ProtocolSettings {
        ProtocolSettings {
            attestation_id: self.attestation_id,
            hash: self.hash,
            date_tolerance_secs: self.date_tolerance_secs,
            default_validity_secs: self.default_validity_secs,
        }
    }

    /// Load every verifier and assemble a builder. Key paths resolve
    /// against `base_dir`.
    pub fn builder(&self, base_dir: &Path) -> Result<ProtocolBuilder, ConfigError> {
        self.validate()?;
        let mut builder = ProtocolBuilder::new(self.settings());
        for entry in &self.register_verifiers {
            let verifier = entry.verifier.load(register_circuit_name(entry.algorithm), base_dir)?;
            builder.add_signature_algorithm(entry.algorithm, verifier)?;
        }
        if let Some(disclose) = &self.disclose_verifier {
            builder.set_disclose_verifier(disclose.load(DISCLOSE_CIRCUIT.to_string(), base_dir)?);
        }
        for root in &self.trusted_certificate_roots {
            builder.add_certificate_root(*root);
        }
        builder.add_country_codes(self.country_codes.clone());
        Ok(builder)
    }

    /// Build a ready protocol instance.
    pub fn build(&self, base_dir: &Path) -> Result<Protocol, ConfigError> {
        Ok(self.builder(base_dir)?.build())
    }
}
