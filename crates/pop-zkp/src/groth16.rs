//! # Groth16 Verifier (BN254)
//!
//! Verifies proofs produced by circom/snarkjs against a
//! `verification_key.json`. Pairing math is delegated to `ark-groth16`;
//! this module only decodes keys and proof points.
//!
//! The verifying key is prepared once at load time, so each verification
//! is a single multi-pairing plus one MSM over the public inputs.
//!
//! ## Decoding Rules
//!
//! - Coordinates must be canonical base-field elements.
//! - Proof points must lie on the curve and in the prime-order subgroup.
//!   Violations are [`VerifyError::MalformedProof`], never a panic.
//! - Key points are projective triples; `z = 0` is the point at infinity,
//!   `z = 1` is affine, anything else is rejected.

use std::path::Path;

use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_ff::{BigInt, BigInteger, PrimeField};
use ark_groth16::{Groth16, PreparedVerifyingKey, Proof, VerifyingKey};
use ark_snark::SNARK;
use pop_core::field::{parse_uint256, uint256_to_decimal};
use pop_core::FieldElement;
use serde::{Deserialize, Serialize};

use crate::proof::Groth16Proof;
use crate::traits::{ProofVerifier, VerifyError};

/// snarkjs `verification_key.json`, as exported for a Groth16 circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKeyJson {
    /// Always `"groth16"`.
    pub protocol: String,
    /// Always `"bn128"` (snarkjs' name for BN254).
    pub curve: String,
    /// Number of public signals.
    #[serde(rename = "nPublic")]
    pub n_public: usize,
    pub vk_alpha_1: [String; 3],
    pub vk_beta_2: [[String; 2]; 3],
    pub vk_gamma_2: [[String; 2]; 3],
    pub vk_delta_2: [[String; 2]; 3],
    #[serde(rename = "IC")]
    pub ic: Vec<[String; 3]>,
}

impl VerificationKeyJson {
    /// Decode into an arkworks verifying key.
    pub fn to_ark(&self) -> Result<VerifyingKey<Bn254>, VerifyError> {
        if self.protocol != "groth16" {
            return Err(VerifyError::MalformedKey(format!(
                "unsupported protocol {:?}",
                self.protocol
            )));
        }
        if self.curve != "bn128" && self.curve != "bn254" {
            return Err(VerifyError::MalformedKey(format!("unsupported curve {:?}", self.curve)));
        }
        if self.ic.len() != self.n_public + 1 {
            return Err(VerifyError::MalformedKey(format!(
                "IC has {} points for {} public signals",
                self.ic.len(),
                self.n_public
            )));
        }
        let gamma_abc_g1 = self
            .ic
            .iter()
            .map(|p| key_g1(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(VerifyingKey {
            alpha_g1: key_g1(&self.vk_alpha_1)?,
            beta_g2: key_g2(&self.vk_beta_2)?,
            gamma_g2: key_g2(&self.vk_gamma_2)?,
            delta_g2: key_g2(&self.vk_delta_2)?,
            gamma_abc_g1,
        })
    }

    /// Encode an arkworks verifying key in snarkjs layout.
    pub fn from_ark(vk: &VerifyingKey<Bn254>) -> Self {
        Self {
            protocol: "groth16".into(),
            curve: "bn128".into(),
            n_public: vk.gamma_abc_g1.len().saturating_sub(1),
            vk_alpha_1: g1_triple(&vk.alpha_g1),
            vk_beta_2: g2_triple(&vk.beta_g2),
            vk_gamma_2: g2_triple(&vk.gamma_g2),
            vk_delta_2: g2_triple(&vk.delta_g2),
            ic: vk.gamma_abc_g1.iter().map(g1_triple).collect(),
        }
    }
}

impl Groth16Proof {
    /// Decode into an arkworks proof, validating every point.
    pub fn to_ark(&self) -> Result<Proof<Bn254>, VerifyError> {
        let a = checked_g1(fq(&self.a[0])?, fq(&self.a[1])?)?;
        let b = checked_g2(
            Fq2::new(fq(&self.b[0][1])?, fq(&self.b[0][0])?),
            Fq2::new(fq(&self.b[1][1])?, fq(&self.b[1][0])?),
        )?;
        let c = checked_g1(fq(&self.c[0])?, fq(&self.c[1])?)?;
        Ok(Proof { a, b, c })
    }

    /// Encode an arkworks proof in Solidity call-data order.
    pub fn from_ark(proof: &Proof<Bn254>) -> Self {
        Self {
            a: [fq_decimal(&proof.a.x), fq_decimal(&proof.a.y)],
            b: [
                [fq_decimal(&proof.b.x.c1), fq_decimal(&proof.b.x.c0)],
                [fq_decimal(&proof.b.y.c1), fq_decimal(&proof.b.y.c0)],
            ],
            c: [fq_decimal(&proof.c.x), fq_decimal(&proof.c.y)],
        }
    }
}

/// Groth16 verifier bound to one prepared verifying key.
pub struct Groth16Verifier {
    circuit: String,
    n_public: usize,
    pvk: PreparedVerifyingKey<Bn254>,
}

impl std::fmt::Debug for Groth16Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Groth16Verifier")
            .field("circuit", &self.circuit)
            .field("n_public", &self.n_public)
            .finish_non_exhaustive()
    }
}

impl Groth16Verifier {
    /// Prepare a verifier from an arkworks key.
    pub fn new(circuit: impl Into<String>, vk: &VerifyingKey<Bn254>) -> Result<Self, VerifyError> {
        let pvk = Groth16::<Bn254>::process_vk(vk).map_err(|e| VerifyError::MalformedKey(e.to_string()))?;
        Ok(Self {
            circuit: circuit.into(),
            n_public: vk.gamma_abc_g1.len().saturating_sub(1),
            pvk,
        })
    }

    /// Prepare a verifier from snarkjs key JSON text.
    pub fn from_json(circuit: impl Into<String>, json: &str) -> Result<Self, VerifyError> {
        let key: VerificationKeyJson =
            serde_json::from_str(json).map_err(|e| VerifyError::MalformedKey(e.to_string()))?;
        Self::new(circuit, &key.to_ark()?)
    }

    /// Prepare a verifier from a snarkjs key file.
    pub fn from_file(circuit: impl Into<String>, path: &Path) -> Result<Self, VerifyError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| VerifyError::MalformedKey(format!("{}: {e}", path.display())))?;
        Self::from_json(circuit, &json)
    }

    /// Number of public signals the key expects.
    pub fn n_public(&self) -> usize {
        self.n_public
    }
}

impl ProofVerifier for Groth16Verifier {
    fn circuit(&self) -> &str {
        &self.circuit
    }

    fn verify(&self, proof: &Groth16Proof, public_signals: &[FieldElement]) -> Result<bool, VerifyError> {
        if public_signals.len() != self.n_public {
            return Err(VerifyError::PublicInputCount {
                expected: self.n_public,
                actual: public_signals.len(),
            });
        }
        let proof = proof.to_ark()?;
        let inputs: Vec<Fr> = public_signals.iter().map(FieldElement::to_fr).collect();
        let valid = Groth16::<Bn254>::verify_with_processed_vk(&self.pvk, &inputs, &proof)
            .map_err(|e| VerifyError::Backend(e.to_string()))?;
        tracing::debug!(circuit = %self.circuit, valid, "groth16 verification");
        Ok(valid)
    }
}

fn fq(s: &str) -> Result<Fq, VerifyError> {
    let bytes = parse_uint256(s).map_err(|e| VerifyError::MalformedProof(e.to_string()))?;
    let mut limbs = [0u64; 4];
    for (i, limb) in limbs.iter_mut().enumerate() {
        let start = 32 - (i + 1) * 8;
        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[start..start + 8]);
        *limb = u64::from_be_bytes(word);
    }
    Fq::from_bigint(BigInt::new(limbs))
        .ok_or_else(|| VerifyError::MalformedProof(format!("coordinate {s} exceeds the base field")))
}

fn fq_decimal(value: &Fq) -> String {
    let be = value.into_bigint().to_bytes_be();
    let mut bytes = [0u8; 32];
    bytes[32 - be.len()..].copy_from_slice(&be);
    uint256_to_decimal(&bytes)
}

fn checked_g1(x: Fq, y: Fq) -> Result<G1Affine, VerifyError> {
    let point = G1Affine::new_unchecked(x, y);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(VerifyError::MalformedProof("G1 point not on curve".into()));
    }
    Ok(point)
}

fn checked_g2(x: Fq2, y: Fq2) -> Result<G2Affine, VerifyError> {
    let point = G2Affine::new_unchecked(x, y);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(VerifyError::MalformedProof("G2 point not in subgroup".into()));
    }
    Ok(point)
}

fn key_error(e: VerifyError) -> VerifyError {
    match e {
        VerifyError::MalformedProof(msg) => VerifyError::MalformedKey(msg),
        other => other,
    }
}

fn key_g1(p: &[String; 3]) -> Result<G1Affine, VerifyError> {
    let decode = || -> Result<G1Affine, VerifyError> {
        match p[2].trim() {
            "0" => Ok(G1Affine::identity()),
            "1" => checked_g1(fq(&p[0])?, fq(&p[1])?),
            z => Err(VerifyError::MalformedKey(format!("unexpected projective z {z:?}"))),
        }
    };
    decode().map_err(key_error)
}

fn key_g2(p: &[[String; 2]; 3]) -> Result<G2Affine, VerifyError> {
    let decode = || -> Result<G2Affine, VerifyError> {
        match (p[2][0].trim(), p[2][1].trim()) {
            ("0", "0") => Ok(G2Affine::identity()),
            ("1", "0") => checked_g2(
                Fq2::new(fq(&p[0][0])?, fq(&p[0][1])?),
                Fq2::new(fq(&p[1][0])?, fq(&p[1][1])?),
            ),
            z => Err(VerifyError::MalformedKey(format!("unexpected projective z {z:?}"))),
        }
    };
    decode().map_err(key_error)
}

fn g1_triple(p: &G1Affine) -> [String; 3] {
    if p.infinity {
        return ["0".into(), "1".into(), "0".into()];
    }
    [fq_decimal(&p.x), fq_decimal(&p.y), "1".into()]
}

fn g2_triple(p: &G2Affine) -> [[String; 2]; 3] {
    if p.infinity {
        return [
            ["0".into(), "0".into()],
            ["1".into(), "0".into()],
            ["0".into(), "0".into()],
        ];
    }
    [
        [fq_decimal(&p.x.c0), fq_decimal(&p.x.c1)],
        [fq_decimal(&p.y.c0), fq_decimal(&p.y.c1)],
        ["1".into(), "0".into()],
    ]
}
