//! # pop CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pop_cli::config::{run_config, ConfigArgs};
use pop_cli::tree::{run_proof, run_root, ProofArgs, RootArgs};
use pop_cli::unpack::{run_unpack, UnpackArgs};
use pop_cli::verify::{run_verify, VerifyArgs};

/// Passport registry toolchain.
///
/// Offline tree roots and witnesses, proof verification, revealed-data
/// decoding and config validation.
#[derive(Parser, Debug)]
#[command(name = "pop", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the commitment tree root over an ordered leaf list.
    Root(RootArgs),

    /// Produce an inclusion witness for one leaf.
    Proof(ProofArgs),

    /// Verify a proof against a verification key.
    Verify(VerifyArgs),

    /// Decode packed revealed-data signals.
    Unpack(UnpackArgs),

    /// Protocol configuration tools.
    Config(ConfigArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Root(args) => run_root(&args),
        Commands::Proof(args) => run_proof(&args),
        Commands::Verify(args) => run_verify(&args),
        Commands::Unpack(args) => run_unpack(&args),
        Commands::Config(args) => run_config(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
