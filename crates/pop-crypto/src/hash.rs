//! # Node Hashing
//!
//! The commitment tree is parameterized by a two-input compression
//! function. All implementations output canonical BN254 scalars so tree
//! nodes are always valid circuit inputs.
//!
//! - Poseidon (circomlib): width 3, x^5 S-box, the round constants and MDS
//!   matrix shipped with circomlib's `poseidon.circom`. This is the hash
//!   the disclosure circuit recomputes its Merkle path with, so it is the
//!   default.
//! - Poseidon (Grain): width 3 (rate 2, capacity 1), 8 full and 57 partial
//!   rounds, x^5 S-box, arkworks Grain LFSR round constants. The output is
//!   the first squeezed element. Only usable with circuits built against
//!   the same parameters.
//! - SHA-256: `SHA256(0x01 || left || right)` over 32-byte big-endian
//!   operands, reduced modulo `r`.

use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::{find_poseidon_ark_and_mds, PoseidonConfig, PoseidonSponge};
use ark_crypto_primitives::sponge::CryptographicSponge;
use light_poseidon::{Poseidon, PoseidonHasher as _};
use pop_core::FieldElement;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CryptoError;

/// Two-to-one compression function for Merkle nodes.
pub trait NodeHasher: Send + Sync {
    /// Hash an ordered pair of child nodes into their parent.
    fn hash_pair(&self, left: &FieldElement, right: &FieldElement) -> FieldElement;
}

/// circomlib-compatible Poseidon hash of 1 to 12 field elements.
///
/// Matches `poseidon([..])` from circomlibjs and `poseidon-lite`.
pub fn poseidon_hash(inputs: &[FieldElement]) -> Result<FieldElement, CryptoError> {
    let mut hasher =
        Poseidon::<Fr>::new_circom(inputs.len()).map_err(|e| CryptoError::Poseidon(e.to_string()))?;
    let inputs: Vec<Fr> = inputs.iter().map(FieldElement::to_fr).collect();
    hasher
        .hash(&inputs)
        .map(FieldElement::from_fr)
        .map_err(|e| CryptoError::Poseidon(e.to_string()))
}

/// circomlib Poseidon compression (`poseidon2`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PoseidonHasher;

impl NodeHasher for PoseidonHasher {
    fn hash_pair(&self, left: &FieldElement, right: &FieldElement) -> FieldElement {
        // Two inputs is always a supported circom width.
        poseidon_hash(&[*left, *right]).unwrap_or(FieldElement::ZERO)
    }
}

static GRAIN_POSEIDON_CONFIG: OnceLock<PoseidonConfig<Fr>> = OnceLock::new();

fn grain_poseidon_config() -> &'static PoseidonConfig<Fr> {
    GRAIN_POSEIDON_CONFIG.get_or_init(|| {
        let rate = 2;
        let full_rounds = 8;
        let partial_rounds = 57;
        let (ark, mds) = find_poseidon_ark_and_mds::<Fr>(254, rate, full_rounds, partial_rounds, 0);
        PoseidonConfig {
            full_rounds: full_rounds as usize,
            partial_rounds: partial_rounds as usize,
            alpha: 5,
            ark,
            mds,
            rate,
            capacity: 1,
        }
    })
}

/// Poseidon sponge hash with arkworks Grain LFSR parameters.
pub fn grain_poseidon_hash(inputs: &[FieldElement]) -> FieldElement {
    let mut sponge = PoseidonSponge::new(grain_poseidon_config());
    for input in inputs {
        sponge.absorb(&input.to_fr());
    }
    let out: Vec<Fr> = sponge.squeeze_field_elements(1);
    FieldElement::from_fr(out.into_iter().next().unwrap_or_default())
}

/// Poseidon sponge compression with arkworks Grain LFSR parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrainPoseidonHasher;

impl NodeHasher for GrainPoseidonHasher {
    fn hash_pair(&self, left: &FieldElement, right: &FieldElement) -> FieldElement {
        grain_poseidon_hash(&[*left, *right])
    }
}

/// Domain-separated SHA-256 compression, reduced into the field.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl NodeHasher for Sha256Hasher {
    fn hash_pair(&self, left: &FieldElement, right: &FieldElement) -> FieldElement {
        let mut hasher = Sha256::new();
        hasher.update([0x01]);
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        FieldElement::from_be_bytes_reduced(&hasher.finalize())
    }
}

/// Configuration-selectable hash function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashFunction {
    /// circomlib Poseidon over BN254.
    #[default]
    Poseidon,
    /// Poseidon sponge with arkworks Grain LFSR parameters.
    GrainPoseidon,
    /// SHA-256 with a `0x01` node prefix.
    Sha256,
}

impl NodeHasher for HashFunction {
    fn hash_pair(&self, left: &FieldElement, right: &FieldElement) -> FieldElement {
        match self {
            Self::Poseidon => PoseidonHasher.hash_pair(left, right),
            Self::GrainPoseidon => GrainPoseidonHasher.hash_pair(left, right),
            Self::Sha256 => Sha256Hasher.hash_pair(left, right),
        }
    }
}

impl std::fmt::Display for HashFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Poseidon => f.write_str("poseidon"),
            Self::GrainPoseidon => f.write_str("grain_poseidon"),
            Self::Sha256 => f.write_str("sha256"),
        }
    }
}
