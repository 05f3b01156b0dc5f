#![deny(missing_docs)]
//! # pop-core — Foundational Types for the Passport Registry
//!
//! This crate defines the primitives every other `pop-*` crate speaks in.
//! It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Field elements, not bytes.** Every public signal, commitment,
//!    nullifier and Merkle node is a [`FieldElement`]: a canonical element of
//!    the BN254 scalar field. Non-canonical encodings are rejected at parse
//!    time, so two equal field elements always have one representation.
//!
//! 2. **Newtypes for protocol roles.** [`Commitment`], [`Nullifier`],
//!    [`AttestationId`] and [`TokenId`] are distinct types. A nullifier
//!    cannot be inserted into the commitment tree by accident.
//!
//! 3. **One error taxonomy.** [`ProtocolError`] enumerates every way a
//!    register or disclose attempt can be rejected. All rejections are
//!    terminal and leave protocol state untouched.
//!
//! 4. **UTC-only timestamps.** [`Timestamp`] is seconds-precision UTC.
//!    Passport dates (`YYMMDD`) convert to midnight UTC.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pop-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod algorithm;
pub mod disclosure;
pub mod error;
pub mod field;
pub mod identity;
pub mod temporal;

pub use algorithm::SignatureAlgorithm;
pub use disclosure::{Attribute, DisclosureAttributeSet, DisclosureBuilder};
pub use error::{NullifierKind, ProtocolError, ValidationError};
pub use field::FieldElement;
pub use identity::{AttestationId, Commitment, Nullifier, TokenId};
pub use temporal::{PassportDate, Timestamp};
