//! # Credential Token
//!
//! The record minted for one successful disclosure.

use pop_core::{DisclosureAttributeSet, FieldElement, Nullifier, Timestamp, TokenId};
use serde::{Deserialize, Serialize};

/// An issued, non-transferable credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialToken {
    /// Sequential id, starting at 0.
    pub id: TokenId,
    /// The `user_identifier` public signal of the disclosure proof.
    pub owner: FieldElement,
    /// Snapshot of the revealed attributes at mint.
    pub attributes: DisclosureAttributeSet,
    /// Disclosure nullifier the token was minted from.
    pub nullifier: Nullifier,
    /// Start of validity (issuance time).
    pub not_before: Timestamp,
    /// End of validity, inclusive.
    pub not_after: Timestamp,
}

impl CredentialToken {
    /// Whether the token is expired at `at`.
    ///
    /// `not_after` itself is still valid; expiry starts one second later.
    pub fn is_expired(&self, at: Timestamp) -> bool {
        at > self.not_after
    }
}
