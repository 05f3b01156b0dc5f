//! # Tree Subcommands
//!
//! `pop root` and `pop proof` rebuild the commitment tree from an ordered
//! leaf list, the same way the registry does on insert.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use pop_core::FieldElement;
use pop_crypto::{HashFunction, LeanImt, MerkleProof};

/// Node hash selectable on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum HashArg {
    #[default]
    Poseidon,
    GrainPoseidon,
    Sha256,
}

impl From<HashArg> for HashFunction {
    fn from(arg: HashArg) -> Self {
        match arg {
            HashArg::Poseidon => HashFunction::Poseidon,
            HashArg::GrainPoseidon => HashFunction::GrainPoseidon,
            HashArg::Sha256 => HashFunction::Sha256,
        }
    }
}

/// Where the leaves come from.
#[derive(Args, Debug, Clone)]
pub struct LeafSource {
    /// File with one leaf per line, in insertion order.
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Node hash function.
    #[arg(long, value_enum, default_value_t = HashArg::Poseidon)]
    pub hash: HashArg,
}

impl LeafSource {
    fn load(&self, inline: &[String]) -> Result<Vec<FieldElement>> {
        let mut leaves = match &self.file {
            Some(path) => crate::read_elements(path)?,
            None => Vec::new(),
        };
        leaves.extend(crate::parse_elements(inline.iter().map(String::as_str))?);
        Ok(leaves)
    }
}

/// Arguments for `pop root`.
#[derive(Args, Debug)]
pub struct RootArgs {
    #[command(flatten)]
    pub source: LeafSource,

    /// Leaves, appended after any `--file` leaves.
    #[arg(value_name = "LEAF")]
    pub leaves: Vec<String>,
}

/// Arguments for `pop proof`.
#[derive(Args, Debug)]
pub struct ProofArgs {
    #[command(flatten)]
    pub source: LeafSource,

    /// Zero-based leaf index.
    #[arg(long, short)]
    pub index: usize,

    /// Leaves, appended after any `--file` leaves.
    #[arg(value_name = "LEAF")]
    pub leaves: Vec<String>,
}

/// Root over `leaves` in order. Empty yields zero.
pub fn compute_root(hash: HashFunction, leaves: &[FieldElement]) -> FieldElement {
    LeanImt::from_leaves(hash, leaves.iter().copied()).root()
}

/// Inclusion witness for `leaves[index]`.
pub fn compute_proof(hash: HashFunction, leaves: &[FieldElement], index: usize) -> Result<MerkleProof> {
    let tree = LeanImt::from_leaves(hash, leaves.iter().copied());
    Ok(tree.proof(index)?)
}

/// Execute `pop root`.
pub fn run_root(args: &RootArgs) -> Result<u8> {
    let leaves = args.source.load(&args.leaves)?;
    let hash = HashFunction::from(args.source.hash);
    tracing::debug!(leaves = leaves.len(), %hash, "computing root");
    println!("{}", compute_root(hash, &leaves));
    Ok(0)
}

/// Execute `pop proof`. Prints the witness as JSON.
pub fn run_proof(args: &ProofArgs) -> Result<u8> {
    let leaves = args.source.load(&args.leaves)?;
    if leaves.is_empty() {
        bail!("no leaves given");
    }
    let proof = compute_proof(args.source.hash.into(), &leaves, args.index)?;
    println!("{}", serde_json::to_string_pretty(&proof)?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pop_crypto::{root_from_leaves, NodeHasher};

    fn fe(n: u64) -> FieldElement {
        FieldElement::from_u64(n)
    }

    #[test]
    fn empty_root_is_zero() {
        assert_eq!(compute_root(HashFunction::Poseidon, &[]), FieldElement::ZERO);
    }

    #[test]
    fn root_matches_level_by_level_computation() {
        let leaves: Vec<_> = (1..=5).map(fe).collect();
        for hash in [HashFunction::Poseidon, HashFunction::GrainPoseidon, HashFunction::Sha256] {
            assert_eq!(compute_root(hash, &leaves), root_from_leaves(&hash, &leaves));
        }
    }

    #[test]
    fn three_leaf_root_carries_the_odd_node() {
        let h = HashFunction::Poseidon;
        let expected = h.hash_pair(&h.hash_pair(&fe(1), &fe(2)), &fe(3));
        assert_eq!(compute_root(h, &[fe(1), fe(2), fe(3)]), expected);
    }

    #[test]
    fn proof_verifies_against_the_root() {
        let leaves: Vec<_> = (10..17).map(fe).collect();
        let hash = HashFunction::Sha256;
        let proof = compute_proof(hash, &leaves, 4).unwrap();
        assert_eq!(proof.leaf, fe(14));
        assert_eq!(proof.root, compute_root(hash, &leaves));
        assert!(LeanImt::from_leaves(hash, leaves).verify_proof(&proof));
    }

    #[test]
    fn default_hash_arg_is_circomlib_poseidon() {
        let root = compute_root(HashArg::default().into(), &[fe(1), fe(2)]);
        let expected =
            FieldElement::parse("7853200120776062878684798364095072458815029376092732009249414926327459813530").unwrap();
        assert_eq!(root, expected);
        assert_eq!(HashFunction::from(HashArg::GrainPoseidon), HashFunction::GrainPoseidon);
    }

    #[test]
    fn proof_index_out_of_range() {
        assert!(compute_proof(HashFunction::Poseidon, &[fe(1)], 1).is_err());
    }

    #[test]
    fn file_leaves_come_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaves.txt");
        std::fs::write(&path, "1\n2\n").unwrap();
        let source = LeafSource {
            file: Some(path),
            hash: HashArg::Poseidon,
        };
        let leaves = source.load(&["3".to_string()]).unwrap();
        assert_eq!(leaves, vec![fe(1), fe(2), fe(3)]);
    }
}
