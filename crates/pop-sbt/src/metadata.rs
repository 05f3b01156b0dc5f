//! # Token Metadata
//!
//! Rendered view of a credential at a given instant, in the common NFT
//! metadata shape:
//!
//! ```json
//! {
//!   "name": "Proof of Passport #0",
//!   "description": "...",
//!   "owner": "42",
//!   "attributes": [
//!     { "trait_type": "Nationality", "value": "France" },
//!     { "trait_type": "Expired", "value": "No" }
//!   ]
//! }
//! ```
//!
//! The token URI embeds this document as
//! `data:application/json;base64,<base64(json)>`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pop_core::{Attribute, FieldElement};
use serde::{Deserialize, Serialize};

use crate::country::CountryCodes;
use crate::error::SbtError;
use crate::token::CredentialToken;

/// Prefix of every token URI.
pub const DATA_URI_PREFIX: &str = "data:application/json;base64,";

const DESCRIPTION: &str = "Non-transferable credential attesting to passport attributes proven in zero knowledge.";

/// `trait_type` of the live expiry flag.
pub const EXPIRED_TRAIT: &str = "Expired";

/// One `{trait_type, value}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataAttribute {
    pub trait_type: String,
    pub value: String,
}

/// JSON metadata of a token at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    pub owner: FieldElement,
    pub attributes: Vec<MetadataAttribute>,
}

impl TokenMetadata {
    /// Render `token` with the given expiry state.
    ///
    /// Only revealed attributes are listed. Issuing state and nationality
    /// go through `countries`.
    pub fn render(token: &CredentialToken, expired: bool, countries: &CountryCodes) -> Self {
        let mut attributes: Vec<MetadataAttribute> = token
            .attributes
            .revealed()
            .into_iter()
            .map(|(attribute, value)| {
                let value = match attribute {
                    Attribute::IssuingState | Attribute::Nationality => countries.display(&value),
                    _ => value,
                };
                MetadataAttribute {
                    trait_type: attribute.label().to_string(),
                    value,
                }
            })
            .collect();
        attributes.push(MetadataAttribute {
            trait_type: EXPIRED_TRAIT.to_string(),
            value: if expired { "Yes" } else { "No" }.to_string(),
        });
        Self {
            name: format!("Proof of Passport #{}", token.id),
            description: DESCRIPTION.to_string(),
            owner: token.owner,
            attributes,
        }
    }

    /// Value of the attribute with `trait_type`, if listed.
    pub fn attribute(&self, trait_type: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.trait_type == trait_type)
            .map(|a| a.value.as_str())
    }

    /// `data:application/json;base64,...`
    pub fn to_data_uri(&self) -> Result<String, SbtError> {
        let json = serde_json::to_vec(self).map_err(|e| SbtError::Encoding(e.to_string()))?;
        Ok(format!("{DATA_URI_PREFIX}{}", STANDARD.encode(json)))
    }

    /// Decode a URI produced by [`to_data_uri`](Self::to_data_uri).
    pub fn from_data_uri(uri: &str) -> Result<Self, SbtError> {
        let encoded = uri
            .strip_prefix(DATA_URI_PREFIX)
            .ok_or_else(|| SbtError::Encoding("not a base64 JSON data URI".into()))?;
        let json = STANDARD
            .decode(encoded)
            .map_err(|e| SbtError::Encoding(e.to_string()))?;
        serde_json::from_slice(&json).map_err(|e| SbtError::Encoding(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pop_core::{DisclosureBuilder, Nullifier, Timestamp, TokenId};

    fn token() -> CredentialToken {
        let t0 = Timestamp::from_epoch_secs(1_700_000_000).unwrap();
        CredentialToken {
            id: TokenId::new(3),
            owner: FieldElement::from_u64(42),
            attributes: DisclosureBuilder::new()
                .reveal(Attribute::Nationality, "FRA")
                .reveal(Attribute::Name, "DUPONT<<ALPHONSE<HUGUES")
                .reveal(Attribute::OlderThan, "18")
                .build(),
            nullifier: Nullifier::new(FieldElement::from_u64(1)),
            not_before: t0,
            not_after: t0.add_secs(10),
        }
    }

    #[test]
    fn lists_only_revealed_attributes_plus_expiry() {
        let countries: CountryCodes = [("FRA", "France")].into_iter().collect();
        let meta = TokenMetadata::render(&token(), false, &countries);
        let traits: Vec<_> = meta.attributes.iter().map(|a| a.trait_type.as_str()).collect();
        assert_eq!(traits, vec!["Name", "Nationality", "Older Than", "Expired"]);
        assert_eq!(meta.attribute("Nationality"), Some("France"));
        assert_eq!(meta.attribute("Name"), Some("DUPONT ALPHONSE HUGUES"));
        assert_eq!(meta.attribute(EXPIRED_TRAIT), Some("No"));
        assert_eq!(meta.attribute("Gender"), None);
        assert_eq!(meta.name, "Proof of Passport #3");
    }

    #[test]
    fn unmapped_country_shows_code() {
        let meta = TokenMetadata::render(&token(), true, &CountryCodes::new());
        assert_eq!(meta.attribute("Nationality"), Some("FRA"));
        assert_eq!(meta.attribute(EXPIRED_TRAIT), Some("Yes"));
    }

    #[test]
    fn data_uri_decodes_to_same_document() {
        let meta = TokenMetadata::render(&token(), false, &CountryCodes::new());
        let uri = meta.to_data_uri().unwrap();
        assert!(uri.starts_with(DATA_URI_PREFIX));
        assert_eq!(TokenMetadata::from_data_uri(&uri).unwrap(), meta);
    }

    #[test]
    fn owner_serializes_as_decimal() {
        let meta = TokenMetadata::render(&token(), false, &CountryCodes::new());
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["owner"], "42");
    }

    #[test]
    fn rejects_foreign_uri() {
        assert!(TokenMetadata::from_data_uri("https://example.org/1.json").is_err());
    }
}
