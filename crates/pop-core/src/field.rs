//! # BN254 Scalar Field Elements
//!
//! [`FieldElement`] is a 256-bit big-endian integer guaranteed to be a
//! canonical element of the BN254 scalar field (strictly less than the
//! modulus `r`). Circuit public signals travel as decimal strings (the
//! snarkjs convention); `0x`-prefixed hex is accepted as well.
//!
//! Conversion to and from `ark_bn254::Fr` is lossless because construction
//! rejects anything at or above the modulus.

use std::str::FromStr;

use ark_bn254::Fr;
use ark_ff::{BigInt, BigInteger, PrimeField};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// A canonical BN254 scalar field element.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FieldElement([u8; 32]);

impl FieldElement {
    /// The additive identity. Also the root of an empty commitment tree.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Embed a small integer.
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Interpret 32 big-endian bytes, rejecting values `>= r`.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Result<Self, ValidationError> {
        let candidate = Self(bytes);
        if Fr::from_bigint(candidate.to_bigint()).is_none() {
            return Err(ValidationError::InvalidFieldElement {
                value: candidate.to_hex(),
                reason: "not less than the BN254 scalar modulus".into(),
            });
        }
        Ok(candidate)
    }

    /// Interpret arbitrary big-endian bytes, reducing modulo `r`.
    pub fn from_be_bytes_reduced(bytes: &[u8]) -> Self {
        Self::from_fr(Fr::from_be_bytes_mod_order(bytes))
    }

    /// Parse a decimal string, or a hex string when prefixed with `0x`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::from_be_bytes(parse_uint256(s)?).map_err(|_| out_of_field(s))
    }

    /// Parse an unsigned decimal integer.
    pub fn from_decimal(s: &str) -> Result<Self, ValidationError> {
        Self::from_be_bytes(decimal_to_be_bytes(s)?).map_err(|_| out_of_field(s))
    }

    /// Parse up to 64 hex digits (no prefix).
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        Self::from_be_bytes(hex_to_be_bytes(s)?).map_err(|_| out_of_field(s))
    }

    /// Convert from an arkworks scalar.
    pub fn from_fr(fr: Fr) -> Self {
        let mut bytes = [0u8; 32];
        let be = fr.into_bigint().to_bytes_be();
        bytes[32 - be.len()..].copy_from_slice(&be);
        Self(bytes)
    }

    /// Convert to an arkworks scalar.
    pub fn to_fr(&self) -> Fr {
        Fr::from_be_bytes_mod_order(&self.0)
    }

    /// Big-endian byte representation.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Little-endian byte representation (the order circuits pack bytes in).
    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut out = self.0;
        out.reverse();
        out
    }

    /// Whether this is the zero element.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// The value as `u64`, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        if self.0[..24].iter().any(|b| *b != 0) {
            return None;
        }
        let mut tail = [0u8; 8];
        tail.copy_from_slice(&self.0[24..]);
        Some(u64::from_be_bytes(tail))
    }

    /// Lowercase hex, 64 digits, no prefix.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Unsigned decimal rendering.
    pub fn to_decimal(&self) -> String {
        uint256_to_decimal(&self.0)
    }

    fn to_bigint(self) -> BigInt<4> {
        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let start = 32 - (i + 1) * 8;
            let mut word = [0u8; 8];
            word.copy_from_slice(&self.0[start..start + 8]);
            *limb = u64::from_be_bytes(word);
        }
        BigInt::new(limbs)
    }
}

fn out_of_field(s: &str) -> ValidationError {
    ValidationError::InvalidFieldElement {
        value: s.to_string(),
        reason: "not less than the BN254 scalar modulus".into(),
    }
}

/// Parse a 256-bit unsigned integer given in decimal, or hex with a `0x` prefix.
///
/// No field reduction or range check beyond 256 bits; callers choose the field.
pub fn parse_uint256(s: &str) -> Result<[u8; 32], ValidationError> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => hex_to_be_bytes(hex),
        None => decimal_to_be_bytes(s),
    }
}

/// Render a 256-bit big-endian unsigned integer in decimal.
pub fn uint256_to_decimal(bytes: &[u8; 32]) -> String {
    let mut work = *bytes;
    let mut digits = Vec::with_capacity(78);
    while work.iter().any(|b| *b != 0) {
        let mut rem = 0u32;
        for byte in work.iter_mut() {
            let cur = (rem << 8) | u32::from(*byte);
            *byte = (cur / 10) as u8;
            rem = cur % 10;
        }
        digits.push(b'0' + rem as u8);
    }
    if digits.is_empty() {
        return "0".to_string();
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

fn decimal_to_be_bytes(s: &str) -> Result<[u8; 32], ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidFieldElement {
        value: s.to_string(),
        reason: reason.to_string(),
    };
    if s.is_empty() {
        return Err(invalid("empty string"));
    }
    let mut bytes = [0u8; 32];
    for ch in s.bytes() {
        if !ch.is_ascii_digit() {
            return Err(invalid("non-decimal character"));
        }
        let mut carry = u32::from(ch - b'0');
        for byte in bytes.iter_mut().rev() {
            let v = u32::from(*byte) * 10 + carry;
            *byte = (v & 0xff) as u8;
            carry = v >> 8;
        }
        if carry != 0 {
            return Err(invalid("exceeds 256 bits"));
        }
    }
    Ok(bytes)
}

fn hex_to_be_bytes(s: &str) -> Result<[u8; 32], ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidFieldElement {
        value: s.to_string(),
        reason: reason.to_string(),
    };
    if s.is_empty() || s.len() > 64 {
        return Err(invalid("expected 1 to 64 hex digits"));
    }
    let padded = format!("{s:0>64}");
    let mut bytes = [0u8; 32];
    for (i, chunk) in padded.as_bytes().chunks(2).enumerate() {
        let pair = std::str::from_utf8(chunk).map_err(|_| invalid("invalid hex"))?;
        bytes[i] = u8::from_str_radix(pair, 16).map_err(|_| invalid("invalid hex"))?;
    }
    Ok(bytes)
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<Fr> for FieldElement {
    fn from(fr: Fr) -> Self {
        Self::from_fr(fr)
    }
}

impl FromStr for FieldElement {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_decimal())
    }
}

impl std::fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FieldElement({})", self.to_decimal())
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MODULUS: &str =
        "21888242871839275222246405745257275088548364400416034343698204186575808495617";

    #[test]
    fn decimal_round_trip_of_known_value() {
        let s = "8518753152044246090169372947057357973469996808638122125210848696986717482788";
        let fe = FieldElement::from_decimal(s).unwrap();
        assert_eq!(fe.to_decimal(), s);
        assert_eq!(fe.to_string(), s);
    }

    #[test]
    fn zero_renders_as_zero() {
        assert_eq!(FieldElement::ZERO.to_decimal(), "0");
        assert_eq!(FieldElement::parse("0").unwrap(), FieldElement::ZERO);
    }

    #[test]
    fn modulus_is_rejected() {
        assert!(FieldElement::from_decimal(MODULUS).is_err());
    }

    #[test]
    fn modulus_minus_one_is_accepted() {
        let s = "21888242871839275222246405745257275088548364400416034343698204186575808495616";
        let fe = FieldElement::from_decimal(s).unwrap();
        assert_eq!(fe.to_fr(), -Fr::from(1u64));
    }

    #[test]
    fn overflowing_decimal_is_rejected() {
        let huge = "9".repeat(90);
        assert!(FieldElement::from_decimal(&huge).is_err());
    }

    #[test]
    fn non_digit_is_rejected() {
        assert!(FieldElement::from_decimal("12a").is_err());
        assert!(FieldElement::from_decimal("").is_err());
        assert!(FieldElement::from_decimal("-1").is_err());
    }

    #[test]
    fn hex_and_decimal_agree() {
        let a = FieldElement::parse("0xff").unwrap();
        let b = FieldElement::parse("255").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_u64(), Some(255));
    }

    #[test]
    fn fr_conversion_is_lossless() {
        let fe = FieldElement::from_u64(123_456_789);
        assert_eq!(FieldElement::from_fr(fe.to_fr()), fe);
    }

    #[test]
    fn reduction_wraps_modulus_to_zero() {
        let r = FieldElement::from_decimal(
            "21888242871839275222246405745257275088548364400416034343698204186575808495616",
        )
        .unwrap();
        let mut bytes = *r.as_bytes();
        bytes[31] += 1;
        assert_eq!(FieldElement::from_be_bytes_reduced(&bytes), FieldElement::ZERO);
    }

    #[test]
    fn little_endian_bytes_reverse_big_endian() {
        let fe = FieldElement::from_u64(0x0102);
        let le = fe.to_le_bytes();
        assert_eq!(le[0], 0x02);
        assert_eq!(le[1], 0x01);
        assert!(le[2..].iter().all(|b| *b == 0));
    }

    #[test]
    fn serde_uses_decimal_strings() {
        let fe = FieldElement::from_u64(42);
        assert_eq!(serde_json::to_string(&fe).unwrap(), "\"42\"");
        let back: FieldElement = serde_json::from_str("\"0x2a\"").unwrap();
        assert_eq!(back, fe);
        assert!(serde_json::from_str::<FieldElement>(&format!("\"{MODULUS}\"")).is_err());
    }

    proptest! {
        #[test]
        fn decimal_rendering_matches_u64(n in any::<u64>()) {
            let fe = FieldElement::from_u64(n);
            prop_assert_eq!(fe.to_decimal(), n.to_string());
            prop_assert_eq!(FieldElement::from_decimal(&n.to_string()).unwrap(), fe);
        }

        #[test]
        fn ordering_matches_integer_ordering(a in any::<u64>(), b in any::<u64>()) {
            prop_assert_eq!(FieldElement::from_u64(a).cmp(&FieldElement::from_u64(b)), a.cmp(&b));
        }
    }
}
