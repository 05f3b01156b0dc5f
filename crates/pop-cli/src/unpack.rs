//! # Unpack Subcommand
//!
//! Decodes the three packed revealed-data signals of a disclosure into
//! attribute values.

use anyhow::{Context, Result};
use clap::Args;
use pop_core::{DisclosureAttributeSet, FieldElement};
use serde::Serialize;

/// Arguments for `pop unpack`.
#[derive(Args, Debug)]
pub struct UnpackArgs {
    /// The three packed signals, in signal order.
    #[arg(value_name = "PACKED", num_args = 3, required = true)]
    pub packed: Vec<String>,

    /// Print raw MRZ text instead of display values.
    #[arg(long)]
    pub raw: bool,
}

/// One decoded attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnpackedAttribute {
    pub attribute: String,
    pub value: String,
}

/// Decode `packed` and list revealed attributes in vector order.
pub fn unpack(packed: [FieldElement; 3], raw: bool) -> Result<Vec<UnpackedAttribute>> {
    let set = DisclosureAttributeSet::unpack(&packed).context("packed data does not decode")?;
    Ok(set
        .revealed()
        .into_iter()
        .map(|(attribute, display)| UnpackedAttribute {
            attribute: attribute.label().to_string(),
            value: if raw { set.raw(attribute).unwrap_or(display) } else { display },
        })
        .collect())
}

/// Execute `pop unpack`. Prints a JSON array.
pub fn run_unpack(args: &UnpackArgs) -> Result<u8> {
    let elements = crate::parse_elements(args.packed.iter().map(String::as_str))?;
    let packed: [FieldElement; 3] = elements
        .try_into()
        .map_err(|v: Vec<FieldElement>| anyhow::anyhow!("expected 3 packed signals, got {}", v.len()))?;
    let attributes = unpack(packed, args.raw)?;
    println!("{}", serde_json::to_string_pretty(&attributes)?);
    Ok(0)
}
