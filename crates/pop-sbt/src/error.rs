//! Credential lookup errors.

use pop_core::TokenId;
use thiserror::Error;

/// Errors from the credential issuer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SbtError {
    /// No token has been minted with this id.
    #[error("token {0} does not exist")]
    TokenNotFound(TokenId),

    /// Metadata could not be serialized.
    #[error("metadata encoding failed: {0}")]
    Encoding(String),
}
