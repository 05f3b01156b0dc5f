//! # pop-cli — CLI Tool for the Passport Registry
//!
//! Offline companions to the HTTP service. Nothing here touches a running
//! registry; every subcommand works from files and arguments.
//!
//! ## Subcommands
//!
//! - `pop root`: root over an ordered leaf list.
//! - `pop proof`: inclusion witness for one leaf.
//! - `pop verify`: check a Groth16 proof against a snarkjs verification key.
//! - `pop unpack`: decode the three packed revealed-data signals.
//! - `pop config check`: load and validate a protocol YAML file.
//!
//! ```bash
//! pop root 1 2 3
//! pop proof --file leaves.txt 2 --hash sha256
//! pop verify --vk verification_key.json proof.json
//! pop config check config/protocol.yaml
//! ```

pub mod config;
pub mod tree;
pub mod unpack;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};
use pop_core::FieldElement;

/// Read field elements, one per line. Blank lines and `#` comments are
/// skipped.
pub fn read_elements(path: &Path) -> Result<Vec<FieldElement>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_elements(content.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with('#')))
}

/// Parse decimal or `0x` hex field elements.
pub fn parse_elements<'a>(raw: impl IntoIterator<Item = &'a str>) -> Result<Vec<FieldElement>> {
    raw.into_iter()
        .map(|s| FieldElement::parse(s).with_context(|| format!("invalid field element: {s}")))
        .collect()
}
