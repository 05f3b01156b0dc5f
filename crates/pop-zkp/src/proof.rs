//! # Proof Wire Format
//!
//! Groth16 proofs arrive as three curve points with coordinates in the
//! BN254 base field, written as decimal or `0x` hex strings. The layout is
//! the Solidity call-data order produced by snarkjs: the G2 point `b` has
//! each coordinate's two limbs swapped, `[[x.c1, x.c0], [y.c1, y.c0]]`.
//!
//! Coordinates stay as strings here. Base-field elements are not scalar
//! field elements, and only the Groth16 backend knows how to decode them.

use pop_core::{FieldElement, ValidationError};
use serde::{Deserialize, Serialize};

/// A Groth16 proof in Solidity call-data order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Groth16Proof {
    /// G1 point `A`: `[x, y]`.
    pub a: [String; 2],
    /// G2 point `B`: `[[x.c1, x.c0], [y.c1, y.c0]]`.
    pub b: [[String; 2]; 2],
    /// G1 point `C`: `[x, y]`.
    pub c: [String; 2],
}

/// A proof together with its ordered public signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallData {
    /// The proof points.
    pub proof: Groth16Proof,
    /// Public signals in circuit output order.
    pub public_signals: Vec<FieldElement>,
}

impl CallData {
    /// Parse the string printed by `snarkjs zkey export soliditycalldata`:
    /// four comma-separated JSON arrays `a, b, c, inputs`.
    pub fn from_solidity_calldata(raw: &str) -> Result<Self, ValidationError> {
        type Raw = ([String; 2], [[String; 2]; 2], [String; 2], Vec<String>);
        let (a, b, c, inputs): Raw = serde_json::from_str(&format!("[{}]", raw.trim()))
            .map_err(|e| ValidationError::InvalidFieldElement {
                value: "calldata".into(),
                reason: e.to_string(),
            })?;
        let public_signals = inputs
            .iter()
            .map(|s| FieldElement::parse(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            proof: Groth16Proof { a, b, c },
            public_signals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_solidity_calldata() {
        let raw = r#"["0x01", "0x02"],[["0x03", "0x04"],["0x05", "0x06"]],["0x07", "0x08"],["0x0a","0x0b","12"]"#;
        let call = CallData::from_solidity_calldata(raw).unwrap();
        assert_eq!(call.proof.a, ["0x01".to_string(), "0x02".to_string()]);
        assert_eq!(call.proof.b[1][0], "0x05");
        assert_eq!(
            call.public_signals,
            vec![FieldElement::from_u64(10), FieldElement::from_u64(11), FieldElement::from_u64(12)]
        );
    }

    #[test]
    fn rejects_truncated_calldata() {
        assert!(CallData::from_solidity_calldata(r#"["0x01", "0x02"]"#).is_err());
    }

    #[test]
    fn json_shape() {
        let call = CallData {
            proof: Groth16Proof {
                a: ["1".into(), "2".into()],
                b: [["3".into(), "4".into()], ["5".into(), "6".into()]],
                c: ["7".into(), "8".into()],
            },
            public_signals: vec![FieldElement::from_u64(9)],
        };
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["proof"]["b"][0][1], "4");
        assert_eq!(json["public_signals"][0], "9");
    }
}
