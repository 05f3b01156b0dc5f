//! # Disclosure Attributes
//!
//! The disclosure circuit exposes a 90-byte vector derived from the
//! passport's machine-readable zone. Every byte the holder chose to hide is
//! zero. The vector travels packed into three field elements holding 31, 31
//! and 28 bytes, least significant byte first.
//!
//! Attribute byte ranges within the vector (inclusive):
//!
//! | Attribute        | Bytes    |
//! |------------------|----------|
//! | issuing state    | 2..=4    |
//! | name             | 5..=43   |
//! | passport number  | 44..=52  |
//! | nationality      | 54..=56  |
//! | date of birth    | 57..=62  |
//! | gender           | 64       |
//! | expiry date      | 65..=70  |
//! | older than       | 88..=89  |

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::field::FieldElement;
use crate::temporal::PassportDate;

/// Length of the unpacked revealed-data vector.
pub const REVEALED_DATA_LEN: usize = 90;

/// Bytes carried by each packed field element.
pub const PACKED_CHUNK_LENGTHS: [usize; 3] = [31, 31, 28];

/// A disclosable passport attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Three-letter issuing state code.
    IssuingState,
    /// Holder name field, `<`-padded.
    Name,
    /// Document number.
    PassportNumber,
    /// Three-letter nationality code.
    Nationality,
    /// Date of birth, `YYMMDD`.
    DateOfBirth,
    /// Sex marker.
    Gender,
    /// Document expiry, `YYMMDD`.
    ExpiryDate,
    /// Two-digit minimum age the holder proved.
    OlderThan,
}

impl Attribute {
    /// All attributes in vector order.
    pub const ALL: [Attribute; 8] = [
        Self::IssuingState,
        Self::Name,
        Self::PassportNumber,
        Self::Nationality,
        Self::DateOfBirth,
        Self::Gender,
        Self::ExpiryDate,
        Self::OlderThan,
    ];

    /// Byte positions in the revealed-data vector.
    pub fn range(&self) -> RangeInclusive<usize> {
        match self {
            Self::IssuingState => 2..=4,
            Self::Name => 5..=43,
            Self::PassportNumber => 44..=52,
            Self::Nationality => 54..=56,
            Self::DateOfBirth => 57..=62,
            Self::Gender => 64..=64,
            Self::ExpiryDate => 65..=70,
            Self::OlderThan => 88..=89,
        }
    }

    /// Human-readable label used as the metadata `trait_type`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::IssuingState => "Issuing State",
            Self::Name => "Name",
            Self::PassportNumber => "Passport Number",
            Self::Nationality => "Nationality",
            Self::DateOfBirth => "Date of birth",
            Self::Gender => "Gender",
            Self::ExpiryDate => "Expiry date",
            Self::OlderThan => "Older Than",
        }
    }
}

/// Revealed passport data, unpacked.
///
/// A byte is revealed iff it is non-zero. An attribute is revealed iff any
/// of its bytes is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct DisclosureAttributeSet {
    bytes: Vec<u8>,
}

impl DisclosureAttributeSet {
    /// Wrap an unpacked 90-byte vector.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        if bytes.len() != REVEALED_DATA_LEN {
            return Err(ValidationError::InvalidRevealedData(format!(
                "expected {REVEALED_DATA_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// Unpack three field elements into the 90-byte vector.
    ///
    /// Each element must not carry bytes beyond its chunk length.
    pub fn unpack(packed: &[FieldElement; 3]) -> Result<Self, ValidationError> {
        let mut bytes = Vec::with_capacity(REVEALED_DATA_LEN);
        for (i, (element, len)) in packed.iter().zip(PACKED_CHUNK_LENGTHS).enumerate() {
            let le = element.to_le_bytes();
            if le[len..].iter().any(|b| *b != 0) {
                return Err(ValidationError::InvalidRevealedData(format!(
                    "packed element {i} exceeds {len} bytes"
                )));
            }
            bytes.extend_from_slice(&le[..len]);
        }
        Ok(Self { bytes })
    }

    /// Pack back into three field elements. Inverse of [`unpack`](Self::unpack).
    pub fn pack(&self) -> [FieldElement; 3] {
        let mut out = [FieldElement::ZERO; 3];
        let mut offset = 0;
        for (slot, len) in out.iter_mut().zip(PACKED_CHUNK_LENGTHS) {
            let mut be = [0u8; 32];
            for (j, byte) in self.bytes[offset..offset + len].iter().enumerate() {
                be[31 - j] = *byte;
            }
            // At most 31 bytes, always below the modulus.
            *slot = FieldElement::from_be_bytes(be).unwrap_or(FieldElement::ZERO);
            offset += len;
        }
        out
    }

    /// The raw 90-byte vector.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Per-byte reveal bitmap; bit `i` set iff byte `i` is non-zero.
    pub fn bitmap(&self) -> u128 {
        self.bytes
            .iter()
            .enumerate()
            .filter(|(_, b)| **b != 0)
            .fold(0u128, |acc, (i, _)| acc | (1u128 << i))
    }

    /// Whether any byte of `attribute` is revealed.
    pub fn is_revealed(&self, attribute: Attribute) -> bool {
        self.bytes[attribute.range()].iter().any(|b| *b != 0)
    }

    /// Raw MRZ text of an attribute, hidden bytes dropped.
    pub fn raw(&self, attribute: Attribute) -> Option<String> {
        if !self.is_revealed(attribute) {
            return None;
        }
        let text: String = self.bytes[attribute.range()]
            .iter()
            .filter(|b| **b != 0)
            .map(|b| char::from(*b))
            .collect();
        Some(text)
    }

    /// Display value of an attribute.
    ///
    /// MRZ filler `<` becomes a space; dates render as `DD-MM-YY`.
    pub fn get(&self, attribute: Attribute) -> Option<String> {
        let raw = self.raw(attribute)?;
        let value = match attribute {
            Attribute::DateOfBirth | Attribute::ExpiryDate if raw.len() == 6 && raw.is_ascii() => {
                format!("{}-{}-{}", &raw[4..6], &raw[2..4], &raw[0..2])
            }
            _ => raw
                .split('<')
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        };
        Some(value)
    }

    /// Revealed attributes with their display values, in vector order.
    pub fn revealed(&self) -> Vec<(Attribute, String)> {
        Attribute::ALL
            .into_iter()
            .filter_map(|attr| self.get(attr).map(|value| (attr, value)))
            .collect()
    }

    /// Passport expiry date, if revealed and well formed.
    pub fn expiry_date(&self) -> Option<PassportDate> {
        self.raw(Attribute::ExpiryDate)
            .and_then(|raw| PassportDate::parse_yymmdd(&raw).ok())
    }

    /// Minimum age proven by the circuit, if revealed.
    pub fn older_than(&self) -> Option<u32> {
        self.raw(Attribute::OlderThan)
            .and_then(|raw| raw.parse().ok())
    }
}

impl TryFrom<Vec<u8>> for DisclosureAttributeSet {
    type Error = ValidationError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_bytes(&bytes)
    }
}

impl From<DisclosureAttributeSet> for Vec<u8> {
    fn from(set: DisclosureAttributeSet) -> Self {
        set.bytes
    }
}

/// Builds a revealed-data vector attribute by attribute.
#[derive(Debug, Clone)]
pub struct DisclosureBuilder {
    bytes: [u8; REVEALED_DATA_LEN],
}

impl DisclosureBuilder {
    /// Start with everything hidden.
    pub fn new() -> Self {
        Self {
            bytes: [0u8; REVEALED_DATA_LEN],
        }
    }

    /// Reveal `attribute` with the given MRZ text, truncated or zero-padded
    /// to the attribute's width.
    pub fn reveal(mut self, attribute: Attribute, mrz_text: &str) -> Self {
        let text = mrz_text.as_bytes();
        for (i, slot) in self.bytes[attribute.range()].iter_mut().enumerate() {
            *slot = text.get(i).copied().unwrap_or(0);
        }
        self
    }

    /// Finish.
    pub fn build(self) -> DisclosureAttributeSet {
        DisclosureAttributeSet {
            bytes: self.bytes.to_vec(),
        }
    }
}

impl Default for DisclosureBuilder {
    fn default() -> Self {
        Self::new()
    }
}
