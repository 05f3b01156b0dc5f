//! # pop-sbt — Disclosure Credentials
//!
//! A successful disclosure mints exactly one [`CredentialToken`]: a
//! non-transferable record binding an owner identifier to the attributes
//! the holder chose to reveal, valid for a fixed window.
//!
//! - **Token** (`token.rs`): the immutable minted record.
//! - **Issuer** (`issuer.rs`): sequential minting, ownership queries, and
//!   rendering at a caller-supplied instant.
//! - **Metadata** (`metadata.rs`): the JSON document and its
//!   `data:application/json;base64,` URI.
//! - **Country codes** (`country.rs`): ICAO alpha-3 code to display name.
//!
//! ## Expiry
//!
//! Tokens are never mutated after mint. `Expired` is derived when a token
//! is rendered, by comparing the render time against `not_after`. The same
//! token renders differently at different instants and identically at the
//! same instant.
//!
//! There is no transfer operation.

pub mod country;
pub mod error;
pub mod issuer;
pub mod metadata;
pub mod token;

pub use country::CountryCodes;
pub use error::SbtError;
pub use issuer::{CredentialIssuer, DEFAULT_VALIDITY_SECS};
pub use metadata::{MetadataAttribute, TokenMetadata};
pub use token::CredentialToken;
