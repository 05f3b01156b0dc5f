//! # API Route Modules
//!
//! - `registry`: register submissions, registry root and inclusion proofs.
//! - `disclose`: disclosure submissions and credential minting.
//! - `tokens`: credential token URIs and metadata.
//! - `config`: read-only view of the protocol configuration.

pub mod config;
pub mod disclose;
pub mod registry;
pub mod tokens;
