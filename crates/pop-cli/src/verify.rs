//! # Verify Subcommand
//!
//! Checks one proof and its public signals outside the registry. The input
//! file holds either `{ "proof": ..., "public_signals": [...] }` JSON or the
//! raw string printed by `snarkjs zkey export soliditycalldata`.
//!
//! Exit status is 0 when the proof verifies and 1 when it does not.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use pop_zkp::{CallData, Groth16Verifier, MockVerifier, ProofVerifier};

/// Arguments for `pop verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// snarkjs `verification_key.json`.
    #[arg(long, conflicts_with = "mock", required_unless_present = "mock")]
    pub vk: Option<PathBuf>,

    /// Verify with the deterministic mock backend for this circuit name.
    #[arg(long, value_name = "CIRCUIT")]
    pub mock: Option<String>,

    /// Proof file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Read call data from JSON or Solidity call-data text.
pub fn load_call_data(path: &Path) -> Result<CallData> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Ok(call) = serde_json::from_str::<CallData>(&raw) {
        return Ok(call);
    }
    CallData::from_solidity_calldata(&raw).with_context(|| format!("unrecognized proof format: {}", path.display()))
}

fn load_verifier(args: &VerifyArgs) -> Result<Box<dyn ProofVerifier>> {
    match (&args.vk, &args.mock) {
        (Some(vk), _) => Ok(Box::new(
            Groth16Verifier::from_file("cli", vk).with_context(|| format!("failed to load {}", vk.display()))?,
        )),
        (None, Some(circuit)) => Ok(Box::new(MockVerifier::new(circuit.as_str()))),
        (None, None) => anyhow::bail!("either --vk or --mock is required"),
    }
}

/// Execute `pop verify`.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let verifier = load_verifier(args)?;
    let call = load_call_data(&args.file)?;
    let valid = verifier
        .verify(&call.proof, &call.public_signals)
        .context("proof could not be checked")?;
    tracing::info!(circuit = verifier.circuit(), valid, signals = call.public_signals.len(), "verified");
    if valid {
        println!("OK: proof is valid");
        Ok(0)
    } else {
        println!("FAIL: proof is invalid");
        Ok(1)
    }
}
