//! # Lean Incremental Merkle Tree
//!
//! An append-only binary Merkle tree with no padding. When a level has an
//! odd number of nodes, the last one is carried to the next level as-is
//! instead of being hashed with a zero or duplicated sibling. Consequences:
//!
//! - the root of an empty tree is zero;
//! - the root of a one-leaf tree is the leaf itself;
//! - `[c1, c2, c3]` has root `H(H(c1, c2), c3)`;
//! - depth grows only when the leaf count passes a power of two.
//!
//! Nodes are stored per level. Appending a leaf writes exactly one node on
//! each level (set-or-push) and hashes only along its own path.
//!
//! Inclusion proofs omit levels where the node was carried. Bit `i` of
//! [`MerkleProof::path_indices`] is 1 when the `i`-th sibling sits on the
//! left.

use std::collections::HashMap;

use pop_core::FieldElement;
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;
use crate::hash::NodeHasher;

/// Inclusion proof for one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Root the proof was generated against.
    pub root: FieldElement,
    /// The proven leaf.
    pub leaf: FieldElement,
    /// Leaf position in insertion order.
    pub leaf_index: usize,
    /// Compressed path: bit `i` set when `siblings[i]` is a left sibling.
    pub path_indices: u64,
    /// Sibling nodes from the leaf level upward, carried levels omitted.
    pub siblings: Vec<FieldElement>,
}

/// Append-only Merkle tree over field elements.
#[derive(Debug, Clone)]
pub struct LeanImt<H: NodeHasher> {
    hasher: H,
    /// `nodes[0]` are the leaves; `nodes[depth]` holds only the root.
    nodes: Vec<Vec<FieldElement>>,
    positions: HashMap<FieldElement, usize>,
}

impl<H: NodeHasher> LeanImt<H> {
    /// Create an empty tree.
    pub fn new(hasher: H) -> Self {
        Self {
            hasher,
            nodes: vec![Vec::new()],
            positions: HashMap::new(),
        }
    }

    /// Build a tree from leaves in order.
    pub fn from_leaves(hasher: H, leaves: impl IntoIterator<Item = FieldElement>) -> Self {
        let mut tree = Self::new(hasher);
        for leaf in leaves {
            tree.insert(leaf);
        }
        tree
    }

    /// The hasher this tree was built with.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.nodes[0].len()
    }

    /// Whether the tree has no leaves.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].is_empty()
    }

    /// Number of hashing levels above the leaves.
    pub fn depth(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Current root, zero when empty.
    pub fn root(&self) -> FieldElement {
        self.nodes
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or(FieldElement::ZERO)
    }

    /// Leaves in insertion order.
    pub fn leaves(&self) -> &[FieldElement] {
        &self.nodes[0]
    }

    /// Whether `leaf` has been inserted.
    pub fn contains(&self, leaf: &FieldElement) -> bool {
        self.positions.contains_key(leaf)
    }

    /// Position of the first occurrence of `leaf`.
    pub fn index_of(&self, leaf: &FieldElement) -> Option<usize> {
        self.positions.get(leaf).copied()
    }

    /// Append a leaf and return the new root.
    pub fn insert(&mut self, leaf: FieldElement) -> FieldElement {
        let index = self.len();
        let mut depth = self.depth();
        if (1usize << depth) < index + 1 {
            depth += 1;
            self.nodes.push(Vec::new());
        }

        let mut node = leaf;
        for level in 0..depth {
            let position = index >> level;
            set_or_push(&mut self.nodes[level], position, node);
            if position & 1 == 1 {
                let sibling = self.nodes[level][position - 1];
                node = self.hasher.hash_pair(&sibling, &node);
            }
        }
        self.nodes[depth] = vec![node];
        self.positions.entry(leaf).or_insert(index);
        node
    }

    /// Build an inclusion proof for the leaf at `leaf_index`.
    pub fn proof(&self, leaf_index: usize) -> Result<MerkleProof, CryptoError> {
        let size = self.len();
        if leaf_index >= size {
            return Err(CryptoError::IndexOutOfRange {
                index: leaf_index,
                size,
            });
        }

        let mut siblings = Vec::new();
        let mut path_indices = 0u64;
        let mut position = leaf_index;
        for level in 0..self.depth() {
            let is_right = position & 1 == 1;
            let sibling_position = if is_right { position - 1 } else { position + 1 };
            if let Some(sibling) = self.nodes[level].get(sibling_position) {
                if is_right {
                    path_indices |= 1 << siblings.len();
                }
                siblings.push(*sibling);
            }
            position >>= 1;
        }

        Ok(MerkleProof {
            root: self.root(),
            leaf: self.nodes[0][leaf_index],
            leaf_index,
            path_indices,
            siblings,
        })
    }

    /// Build an inclusion proof for a leaf by value.
    pub fn proof_of(&self, leaf: &FieldElement) -> Result<MerkleProof, CryptoError> {
        let index = self
            .index_of(leaf)
            .ok_or_else(|| CryptoError::LeafNotFound(leaf.to_string()))?;
        self.proof(index)
    }

    /// Check a proof's internal consistency using this tree's hasher.
    ///
    /// Does not require the proof's root to be the current root.
    pub fn verify_proof(&self, proof: &MerkleProof) -> bool {
        verify_proof(&self.hasher, proof)
    }
}

/// Recompute the root implied by `proof` and compare it to `proof.root`.
pub fn verify_proof<H: NodeHasher + ?Sized>(hasher: &H, proof: &MerkleProof) -> bool {
    if proof.siblings.len() >= 64 {
        return false;
    }
    let mut node = proof.leaf;
    for (i, sibling) in proof.siblings.iter().enumerate() {
        node = if (proof.path_indices >> i) & 1 == 1 {
            hasher.hash_pair(sibling, &node)
        } else {
            hasher.hash_pair(&node, sibling)
        };
    }
    node == proof.root
}

/// Compute the root over `leaves` level by level, carrying odd nodes.
///
/// Non-incremental; used to cross-check [`LeanImt`] and by tooling.
pub fn root_from_leaves<H: NodeHasher + ?Sized>(hasher: &H, leaves: &[FieldElement]) -> FieldElement {
    if leaves.is_empty() {
        return FieldElement::ZERO;
    }
    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| match pair {
                [left, right] => hasher.hash_pair(left, right),
                [carried] => *carried,
                _ => FieldElement::ZERO,
            })
            .collect();
    }
    level[0]
}

fn set_or_push(level: &mut Vec<FieldElement>, position: usize, node: FieldElement) {
    if position < level.len() {
        level[position] = node;
    } else {
        level.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{HashFunction, PoseidonHasher, Sha256Hasher};
    use proptest::prelude::*;

    fn fe(n: u64) -> FieldElement {
        FieldElement::from_u64(n)
    }

    fn h(l: FieldElement, r: FieldElement) -> FieldElement {
        Sha256Hasher.hash_pair(&l, &r)
    }

    #[test]
    fn empty_root_is_zero() {
        let tree = LeanImt::new(Sha256Hasher);
        assert_eq!(tree.root(), FieldElement::ZERO);
        assert_eq!(tree.depth(), 0);
        assert!(tree.is_empty());
    }

    #[test]
    fn single_leaf_root_is_leaf() {
        let mut tree = LeanImt::new(Sha256Hasher);
        assert_eq!(tree.insert(fe(11)), fe(11));
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn three_leaves_carry_the_third() {
        let tree = LeanImt::from_leaves(Sha256Hasher, [fe(1), fe(2), fe(3)]);
        assert_eq!(tree.root(), h(h(fe(1), fe(2)), fe(3)));
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn fourth_leaf_completes_the_tree() {
        let mut tree = LeanImt::from_leaves(Sha256Hasher, [fe(1), fe(2), fe(3)]);
        let root = tree.insert(fe(4));
        assert_eq!(root, h(h(fe(1), fe(2)), h(fe(3), fe(4))));
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn fifth_leaf_grows_depth() {
        let tree = LeanImt::from_leaves(Sha256Hasher, (1..=5).map(fe));
        let left = h(h(fe(1), fe(2)), h(fe(3), fe(4)));
        assert_eq!(tree.root(), h(left, fe(5)));
        assert_eq!(tree.depth(), 3);
    }

    fn decimal(s: &str) -> FieldElement {
        FieldElement::parse(s).unwrap()
    }

    #[test]
    fn circomlib_trees_expose_reference_nodes() {
        let h12 = decimal("7853200120776062878684798364095072458815029376092732009249414926327459813530");
        let h34 = decimal("14763215145315200506921711489642608356394854266165572616578112107564877678998");

        let three = LeanImt::from_leaves(PoseidonHasher, (1..=3).map(fe));
        let proof = three.proof(2).unwrap();
        assert_eq!(proof.siblings, vec![h12]);
        assert_eq!(three.root(), PoseidonHasher.hash_pair(&h12, &fe(3)));
        assert!(three.verify_proof(&proof));

        let four = LeanImt::from_leaves(PoseidonHasher, (1..=4).map(fe));
        let proof = four.proof(0).unwrap();
        assert_eq!(proof.siblings, vec![fe(2), h34]);
        assert_eq!(four.root(), PoseidonHasher.hash_pair(&h12, &h34));
        assert_eq!(four.root(), root_from_leaves(&HashFunction::Poseidon, four.leaves()));
        assert!(four.verify_proof(&proof));
    }

    #[test]
    fn insert_returns_current_root() {
        let mut tree = LeanImt::new(PoseidonHasher);
        for i in 1..=9 {
            let root = tree.insert(fe(i));
            assert_eq!(root, tree.root());
        }
    }

    #[test]
    fn index_of_reports_insertion_order() {
        let tree = LeanImt::from_leaves(Sha256Hasher, [fe(10), fe(20), fe(30)]);
        assert_eq!(tree.index_of(&fe(20)), Some(1));
        assert_eq!(tree.index_of(&fe(99)), None);
        assert!(tree.contains(&fe(30)));
        assert_eq!(tree.leaves(), &[fe(10), fe(20), fe(30)]);
    }

    #[test]
    fn proof_for_carried_leaf_skips_levels() {
        let tree = LeanImt::from_leaves(Sha256Hasher, [fe(1), fe(2), fe(3)]);
        let proof = tree.proof(2).unwrap();
        assert_eq!(proof.siblings, vec![h(fe(1), fe(2))]);
        assert_eq!(proof.path_indices, 1);
        assert!(tree.verify_proof(&proof));
    }

    #[test]
    fn proof_for_left_leaf() {
        let tree = LeanImt::from_leaves(Sha256Hasher, [fe(1), fe(2), fe(3)]);
        let proof = tree.proof(0).unwrap();
        assert_eq!(proof.siblings, vec![fe(2), fe(3)]);
        assert_eq!(proof.path_indices, 0);
        assert!(tree.verify_proof(&proof));
    }

    #[test]
    fn proof_out_of_range() {
        let tree = LeanImt::from_leaves(Sha256Hasher, [fe(1)]);
        assert_eq!(
            tree.proof(1),
            Err(CryptoError::IndexOutOfRange { index: 1, size: 1 })
        );
        assert!(LeanImt::new(Sha256Hasher).proof(0).is_err());
    }

    #[test]
    fn proof_of_unknown_leaf() {
        let tree = LeanImt::from_leaves(Sha256Hasher, [fe(1)]);
        assert!(matches!(tree.proof_of(&fe(2)), Err(CryptoError::LeafNotFound(_))));
        assert!(tree.proof_of(&fe(1)).is_ok());
    }

    #[test]
    fn tampered_proof_fails() {
        let tree = LeanImt::from_leaves(HashFunction::Poseidon, (1..=6).map(fe));
        let mut proof = tree.proof(3).unwrap();
        proof.siblings[0] = fe(999);
        assert!(!tree.verify_proof(&proof));

        let mut proof = tree.proof(3).unwrap();
        proof.path_indices ^= 1;
        assert!(!tree.verify_proof(&proof));

        let mut proof = tree.proof(3).unwrap();
        proof.leaf = fe(42);
        assert!(!tree.verify_proof(&proof));
    }

    #[test]
    fn stale_proof_still_verifies_against_its_own_root() {
        let mut tree = LeanImt::from_leaves(Sha256Hasher, (1..=3).map(fe));
        let proof = tree.proof(0).unwrap();
        tree.insert(fe(4));
        assert!(tree.verify_proof(&proof));
        assert_ne!(proof.root, tree.root());
    }

    #[test]
    fn all_indices_verify_for_various_sizes() {
        for size in 1..=17u64 {
            let tree = LeanImt::from_leaves(Sha256Hasher, (1..=size).map(fe));
            for i in 0..size as usize {
                let proof = tree.proof(i).unwrap();
                assert!(tree.verify_proof(&proof), "size {size} index {i}");
                assert_eq!(proof.root, tree.root());
            }
        }
    }

    proptest! {
        #[test]
        fn incremental_root_matches_batch(leaves in proptest::collection::vec(any::<u64>(), 0..40)) {
            let leaves: Vec<FieldElement> = leaves.into_iter().map(fe).collect();
            let tree = LeanImt::from_leaves(Sha256Hasher, leaves.iter().copied());
            prop_assert_eq!(tree.root(), root_from_leaves(&Sha256Hasher, &leaves));
        }

        #[test]
        fn every_proof_verifies(size in 1usize..33, pick in any::<prop::sample::Index>()) {
            let tree = LeanImt::from_leaves(Sha256Hasher, (0..size as u64).map(|i| fe(i + 100)));
            let index = pick.index(size);
            let proof = tree.proof(index).unwrap();
            prop_assert!(tree.verify_proof(&proof));
        }
    }
}
