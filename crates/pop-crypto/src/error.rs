use thiserror::Error;

/// Errors from tree queries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Leaf index past the end of the tree.
    #[error("leaf index {index} out of range for tree of size {size}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of leaves.
        size: usize,
    },

    /// Leaf value is not present in the tree.
    #[error("leaf {0} not found")]
    LeafNotFound(String),

    /// The Poseidon permutation rejected its inputs.
    #[error("poseidon: {0}")]
    Poseidon(String),
}
