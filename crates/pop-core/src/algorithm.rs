//! # Signature Algorithms
//!
//! The document-signing algorithms a registration proof can be generated
//! for. Each variant corresponds to a distinct register circuit and
//! therefore a distinct verifying key. Numeric ids match the identifiers
//! the register circuits emit as their `signature_algorithm` signal.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Passport signature algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    /// RSA PKCS#1 v1.5 over SHA-256, exponent 65537.
    #[serde(rename = "sha256WithRSAEncryption_65537")]
    Sha256WithRsaEncryption65537,
    /// RSA PKCS#1 v1.5 over SHA-256, exponent 3.
    #[serde(rename = "sha256WithRSAEncryption_3")]
    Sha256WithRsaEncryption3,
    /// RSA PKCS#1 v1.5 over SHA-1, exponent 65537.
    #[serde(rename = "sha1WithRSAEncryption_65537")]
    Sha1WithRsaEncryption65537,
    /// RSASSA-PSS over SHA-256, exponent 65537.
    #[serde(rename = "sha256WithRSASSAPSS_65537")]
    Sha256WithRsaSsaPss65537,
    /// ECDSA over SHA-384.
    #[serde(rename = "ecdsa_with_SHA384")]
    EcdsaWithSha384,
    /// ECDSA over SHA-1.
    #[serde(rename = "ecdsa_with_SHA1")]
    EcdsaWithSha1,
    /// ECDSA over SHA-256.
    #[serde(rename = "ecdsa_with_SHA256")]
    EcdsaWithSha256,
    /// ECDSA over SHA-512.
    #[serde(rename = "ecdsa_with_SHA512")]
    EcdsaWithSha512,
    /// RSA PKCS#1 v1.5 over SHA-512, exponent 65537.
    #[serde(rename = "sha512WithRSAEncryption_65537")]
    Sha512WithRsaEncryption65537,
}

impl SignatureAlgorithm {
    /// Every known algorithm, in id order.
    pub const ALL: [SignatureAlgorithm; 9] = [
        Self::Sha256WithRsaEncryption65537,
        Self::Sha256WithRsaEncryption3,
        Self::Sha1WithRsaEncryption65537,
        Self::Sha256WithRsaSsaPss65537,
        Self::EcdsaWithSha384,
        Self::EcdsaWithSha1,
        Self::EcdsaWithSha256,
        Self::EcdsaWithSha512,
        Self::Sha512WithRsaEncryption65537,
    ];

    /// Numeric identifier.
    pub fn id(&self) -> u64 {
        match self {
            Self::Sha256WithRsaEncryption65537 => 1,
            Self::Sha256WithRsaEncryption3 => 2,
            Self::Sha1WithRsaEncryption65537 => 3,
            Self::Sha256WithRsaSsaPss65537 => 4,
            Self::EcdsaWithSha384 => 5,
            Self::EcdsaWithSha1 => 6,
            Self::EcdsaWithSha256 => 7,
            Self::EcdsaWithSha512 => 8,
            Self::Sha512WithRsaEncryption65537 => 9,
        }
    }

    /// Look up by numeric identifier.
    pub fn from_id(id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|alg| alg.id() == id)
    }

    /// Canonical name (OID-style, as used in certificate tooling).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256WithRsaEncryption65537 => "sha256WithRSAEncryption_65537",
            Self::Sha256WithRsaEncryption3 => "sha256WithRSAEncryption_3",
            Self::Sha1WithRsaEncryption65537 => "sha1WithRSAEncryption_65537",
            Self::Sha256WithRsaSsaPss65537 => "sha256WithRSASSAPSS_65537",
            Self::EcdsaWithSha384 => "ecdsa_with_SHA384",
            Self::EcdsaWithSha1 => "ecdsa_with_SHA1",
            Self::EcdsaWithSha256 => "ecdsa_with_SHA256",
            Self::EcdsaWithSha512 => "ecdsa_with_SHA512",
            Self::Sha512WithRsaEncryption65537 => "sha512WithRSAEncryption_65537",
        }
    }
}

impl std::fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts either the canonical name or the numeric id.
impl FromStr for SignatureAlgorithm {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u64>() {
            return Self::from_id(id)
                .ok_or_else(|| ValidationError::UnknownSignatureAlgorithm(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == s)
            .ok_or_else(|| ValidationError::UnknownSignatureAlgorithm(s.to_string()))
    }
}
