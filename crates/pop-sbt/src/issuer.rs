//! # Credential Issuer
//!
//! Owns every minted token. Ids are dense and sequential from 0, so the
//! token store is a plain vector indexed by id.
//!
//! The issuer trusts its caller: replay of a disclosure nullifier is
//! rejected before `mint` is reached. It holds no nullifier set of its own.

use std::collections::HashMap;

use pop_core::{DisclosureAttributeSet, FieldElement, Nullifier, Timestamp, TokenId};

use crate::country::CountryCodes;
use crate::error::SbtError;
use crate::metadata::TokenMetadata;
use crate::token::CredentialToken;

/// Validity granted when the passport expiry date is not revealed: 365 days.
pub const DEFAULT_VALIDITY_SECS: i64 = 365 * 24 * 60 * 60;

/// Mints and renders credential tokens.
#[derive(Debug, Clone)]
pub struct CredentialIssuer {
    tokens: Vec<CredentialToken>,
    by_owner: HashMap<FieldElement, Vec<TokenId>>,
    countries: CountryCodes,
    default_validity_secs: i64,
}

impl CredentialIssuer {
    /// An issuer with no tokens and the given default validity.
    pub fn new(default_validity_secs: i64) -> Self {
        Self {
            tokens: Vec::new(),
            by_owner: HashMap::new(),
            countries: CountryCodes::new(),
            default_validity_secs,
        }
    }

    /// Merge country display names used by metadata rendering.
    pub fn add_country_codes<I, K, V>(&mut self, mapping: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.countries.extend(mapping);
    }

    pub fn country_codes(&self) -> &CountryCodes {
        &self.countries
    }

    /// The `[not_before, not_after]` window a token minted at `issued_at`
    /// with `attributes` receives.
    ///
    /// `not_after` is midnight UTC of the revealed passport expiry date when
    /// present, otherwise `issued_at` plus the default validity.
    pub fn validity_window(&self, attributes: &DisclosureAttributeSet, issued_at: Timestamp) -> (Timestamp, Timestamp) {
        let not_after = attributes
            .expiry_date()
            .map(|date| date.midnight())
            .unwrap_or_else(|| issued_at.add_secs(self.default_validity_secs));
        (issued_at, not_after)
    }

    /// Mint the next token.
    pub fn mint(
        &mut self,
        owner: FieldElement,
        attributes: DisclosureAttributeSet,
        nullifier: Nullifier,
        window: (Timestamp, Timestamp),
    ) -> CredentialToken {
        let id = TokenId::new(self.tokens.len() as u64);
        let (not_before, not_after) = window;
        let token = CredentialToken {
            id,
            owner,
            attributes,
            nullifier,
            not_before,
            not_after,
        };
        self.tokens.push(token.clone());
        self.by_owner.entry(owner).or_default().push(id);
        tracing::debug!(token_id = %id, owner = %owner, not_after = %not_after, "credential minted");
        token
    }

    /// A minted token.
    pub fn token(&self, id: TokenId) -> Result<&CredentialToken, SbtError> {
        usize::try_from(id.as_u64())
            .ok()
            .and_then(|i| self.tokens.get(i))
            .ok_or(SbtError::TokenNotFound(id))
    }

    /// Metadata of `id` as it stands at `at`. Pure: nothing is stored.
    pub fn render(&self, id: TokenId, at: Timestamp) -> Result<TokenMetadata, SbtError> {
        let token = self.token(id)?;
        Ok(TokenMetadata::render(token, token.is_expired(at), &self.countries))
    }

    /// Base64 JSON data URI of `id` at `at`.
    pub fn token_uri(&self, id: TokenId, at: Timestamp) -> Result<String, SbtError> {
        self.render(id, at)?.to_data_uri()
    }

    pub fn owner_of(&self, id: TokenId) -> Result<FieldElement, SbtError> {
        self.token(id).map(|t| t.owner)
    }

    /// Ids owned by `owner`, in mint order.
    pub fn tokens_of(&self, owner: &FieldElement) -> &[TokenId] {
        self.by_owner.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_supply(&self) -> u64 {
        self.tokens.len() as u64
    }
}

impl Default for CredentialIssuer {
    fn default() -> Self {
        Self::new(DEFAULT_VALIDITY_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::EXPIRED_TRAIT;
    use pop_core::{Attribute, DisclosureBuilder};

    fn t0() -> Timestamp {
        Timestamp::parse("2025-03-01T12:00:00Z").unwrap()
    }

    fn nullifier(n: u64) -> Nullifier {
        Nullifier::new(FieldElement::from_u64(n))
    }

    #[test]
    fn ids_are_sequential_from_zero() {
        let mut issuer = CredentialIssuer::default();
        let attrs = DisclosureBuilder::new().build();
        let w = issuer.validity_window(&attrs, t0());
        let a = issuer.mint(FieldElement::from_u64(1), attrs.clone(), nullifier(1), w);
        let b = issuer.mint(FieldElement::from_u64(1), attrs, nullifier(2), w);
        assert_eq!(a.id, TokenId::new(0));
        assert_eq!(b.id, TokenId::new(1));
        assert_eq!(issuer.total_supply(), 2);
        assert_eq!(issuer.tokens_of(&FieldElement::from_u64(1)), &[a.id, b.id]);
        assert!(issuer.tokens_of(&FieldElement::from_u64(2)).is_empty());
    }

    #[test]
    fn default_window_without_expiry_attribute() {
        let issuer = CredentialIssuer::new(1000);
        let (nb, na) = issuer.validity_window(&DisclosureBuilder::new().build(), t0());
        assert_eq!(nb, t0());
        assert_eq!(na, t0().add_secs(1000));
    }

    #[test]
    fn window_ends_at_revealed_passport_expiry() {
        let issuer = CredentialIssuer::default();
        let attrs = DisclosureBuilder::new().reveal(Attribute::ExpiryDate, "300115").build();
        let (_, na) = issuer.validity_window(&attrs, t0());
        assert_eq!(na.to_iso8601(), "2030-01-15T00:00:00Z");
    }

    #[test]
    fn expired_flips_one_second_after_not_after() {
        let k = 3600;
        let mut issuer = CredentialIssuer::new(k);
        let attrs = DisclosureBuilder::new().build();
        let w = issuer.validity_window(&attrs, t0());
        let token = issuer.mint(FieldElement::from_u64(9), attrs, nullifier(1), w);

        let at = |secs| issuer.render(token.id, t0().add_secs(secs)).unwrap();
        assert_eq!(at(0).attribute(EXPIRED_TRAIT), Some("No"));
        assert_eq!(at(k).attribute(EXPIRED_TRAIT), Some("No"));
        assert_eq!(at(k + 1).attribute(EXPIRED_TRAIT), Some("Yes"));
        // Rendering stores nothing.
        assert_eq!(at(0).attribute(EXPIRED_TRAIT), Some("No"));
    }

    #[test]
    fn token_uri_uses_country_names() {
        let mut issuer = CredentialIssuer::default();
        issuer.add_country_codes([("FRA", "France")]);
        let attrs = DisclosureBuilder::new().reveal(Attribute::IssuingState, "FRA").build();
        let w = issuer.validity_window(&attrs, t0());
        let token = issuer.mint(FieldElement::from_u64(5), attrs, nullifier(1), w);
        let uri = issuer.token_uri(token.id, t0()).unwrap();
        let meta = TokenMetadata::from_data_uri(&uri).unwrap();
        assert_eq!(meta.attribute("Issuing State"), Some("France"));
        assert_eq!(issuer.owner_of(token.id).unwrap(), FieldElement::from_u64(5));
    }

    #[test]
    fn unknown_token_is_an_error() {
        let issuer = CredentialIssuer::default();
        assert_eq!(
            issuer.render(TokenId::new(0), t0()).unwrap_err(),
            SbtError::TokenNotFound(TokenId::new(0))
        );
        assert!(issuer.owner_of(TokenId::new(u64::MAX)).is_err());
    }
}
