//! # Config Subcommand
//!
//! `pop config check <FILE>` parses a protocol YAML file, loads every
//! verification key it names and prints a summary. Key paths resolve
//! against the file's directory, as they do in the API server.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use pop_registry::ProtocolConfig;

/// Arguments for `pop config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate a protocol config and load its verification keys.
    Check {
        /// Protocol YAML file.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Execute `pop config`.
pub fn run_config(args: &ConfigArgs) -> Result<u8> {
    match &args.command {
        ConfigCommand::Check { file } => cmd_check(file),
    }
}

fn cmd_check(path: &Path) -> Result<u8> {
    let config = ProtocolConfig::from_file(path).with_context(|| format!("invalid config: {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let protocol = config
        .build(base_dir)
        .with_context(|| format!("failed to load verifiers for {}", path.display()))?;

    println!("OK: {}", path.display());
    println!("  Hash:              {}", config.hash);
    println!("  Attestation id:    {}", config.attestation_id.value());
    println!("  Date tolerance:    {}s", config.date_tolerance_secs);
    println!("  Default validity:  {}s", config.default_validity_secs);
    for algorithm in protocol.algorithms() {
        println!("  Register circuit:  {} ({})", algorithm.name(), algorithm.id());
    }
    println!(
        "  Disclose circuit:  {}",
        if protocol.has_disclose_verifier() { "bound" } else { "none" }
    );
    println!(
        "  Certificate roots: {}",
        match protocol.certificate_roots().len() {
            0 => "check disabled".to_string(),
            n => n.to_string(),
        }
    );
    println!("  Country codes:     {}", config.country_codes.len());
    Ok(0)
}
