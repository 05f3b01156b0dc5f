//! # pop-crypto — Cryptographic Primitives
//!
//! - **Node hashing** ([`hash`]): the two-input compression function of the
//!   commitment tree. circomlib Poseidon over BN254 (the default, matching
//!   what the disclosure circuit recomputes), Poseidon with arkworks Grain
//!   parameters, or domain-separated SHA-256 reduced into the field.
//! - **Lean incremental Merkle tree** ([`lean_imt`]): append-only binary
//!   tree where a lone right-edge node is carried up unhashed. Insertion
//!   touches one node per level; inclusion proofs skip carried levels.
//!
//! ## Crate Policy
//!
//! - Depends only on `pop-core` internally.
//! - No mocking of cryptographic operations in tests.

pub mod error;
pub mod hash;
pub mod lean_imt;

pub use error::CryptoError;
pub use hash::{
    grain_poseidon_hash, poseidon_hash, GrainPoseidonHasher, HashFunction, NodeHasher, PoseidonHasher,
    Sha256Hasher,
};
pub use lean_imt::{root_from_leaves, LeanImt, MerkleProof};
