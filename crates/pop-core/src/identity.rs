//! # Protocol Newtypes
//!
//! Role-specific wrappers over [`FieldElement`]. Each role is a distinct
//! type so a nullifier cannot be passed where a commitment is expected.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::field::FieldElement;

macro_rules! field_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(FieldElement);

        impl $name {
            /// Wrap a field element.
            pub fn new(value: FieldElement) -> Self {
                Self(value)
            }

            /// Parse from a decimal or `0x` hex string.
            pub fn parse(s: &str) -> Result<Self, ValidationError> {
                FieldElement::parse(s).map(Self)
            }

            /// The underlying field element.
            pub fn value(&self) -> FieldElement {
                self.0
            }
        }

        impl From<FieldElement> for $name {
            fn from(value: FieldElement) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

field_newtype!(
    /// One-way commitment to passport data and a holder secret. Leaf of the
    /// commitment registry.
    Commitment
);

field_newtype!(
    /// Value derived from a holder secret and a per-operation domain
    /// separator. Consumed at most once per operation kind.
    Nullifier
);

field_newtype!(
    /// Domain-separation constant identifying the document type a proof
    /// attests to.
    AttestationId
);

/// Attestation id of ICAO passports, as emitted by the passport circuits.
pub const PASSPORT_ATTESTATION_ID: &str =
    "8518753152044246090169372947057357973469996808638122125210848696986717482788";

impl AttestationId {
    /// The passport attestation id.
    pub fn passport() -> Self {
        // The literal is a compile-time constant below the modulus.
        match FieldElement::from_decimal(PASSPORT_ATTESTATION_ID) {
            Ok(value) => Self(value),
            Err(_) => Self(FieldElement::ZERO),
        }
    }
}

impl Default for AttestationId {
    fn default() -> Self {
        Self::passport()
    }
}

/// Sequential credential token identifier, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(u64);

impl TokenId {
    /// Wrap a raw id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The id that follows this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
