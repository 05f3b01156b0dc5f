//! # Commitment Registry
//!
//! Append-only set of passport commitments, stored as a lean incremental
//! Merkle tree. The root is a pure function of the insertion sequence:
//! it changes exactly when a leaf is appended.

use pop_core::{Commitment, FieldElement, ProtocolError};
use pop_crypto::{CryptoError, HashFunction, LeanImt, MerkleProof};
use serde::{Deserialize, Serialize};

/// Result of a successful insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertReceipt {
    /// Position assigned to the commitment. Immutable.
    pub leaf_index: usize,
    /// Root after insertion.
    pub root: FieldElement,
}

/// The commitment tree.
#[derive(Debug, Clone)]
pub struct CommitmentRegistry {
    tree: LeanImt<HashFunction>,
}

impl CommitmentRegistry {
    /// An empty registry hashing with `hash`.
    pub fn new(hash: HashFunction) -> Self {
        Self {
            tree: LeanImt::new(hash),
        }
    }

    /// Append `commitment`.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::DuplicateCommitment`] if it is already a leaf. The
    /// tree is untouched in that case.
    pub fn insert(&mut self, commitment: Commitment) -> Result<InsertReceipt, ProtocolError> {
        let leaf = commitment.value();
        if self.tree.contains(&leaf) {
            return Err(ProtocolError::DuplicateCommitment(leaf));
        }
        let leaf_index = self.tree.len();
        let root = self.tree.insert(leaf);
        Ok(InsertReceipt { leaf_index, root })
    }

    /// Current root. Zero when empty.
    pub fn current_root(&self) -> FieldElement {
        self.tree.root()
    }

    /// Inclusion proof for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Result<MerkleProof, CryptoError> {
        self.tree.proof(index)
    }

    /// Check an inclusion proof against this registry's hasher.
    pub fn verify_proof(&self, proof: &MerkleProof) -> bool {
        self.tree.verify_proof(proof)
    }

    /// Insertion index of `commitment`, if registered.
    pub fn index_of(&self, commitment: &Commitment) -> Option<usize> {
        self.tree.index_of(&commitment.value())
    }

    /// Whether `commitment` is a leaf.
    pub fn contains(&self, commitment: &Commitment) -> bool {
        self.tree.contains(&commitment.value())
    }

    /// Leaves in insertion order.
    pub fn leaves(&self) -> &[FieldElement] {
        self.tree.leaves()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Node hash the tree was built with.
    pub fn hash_function(&self) -> HashFunction {
        *self.tree.hasher()
    }
}

impl Default for CommitmentRegistry {
    fn default() -> Self {
        Self::new(HashFunction::default())
    }
}
