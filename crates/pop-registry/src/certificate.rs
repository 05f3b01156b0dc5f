//! # Certificate Root Registry
//!
//! Register proofs attest that the passport's document signing certificate
//! is a leaf of a published certificate tree, and output that tree's root.
//! Only roots listed here are trusted. An empty registry disables the check.

use std::collections::BTreeSet;

use pop_core::{FieldElement, ProtocolError};

/// Trusted certificate-tree roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateRootRegistry {
    roots: BTreeSet<FieldElement>,
}

impl CertificateRootRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trust `root`. Returns `false` if it was already trusted.
    pub fn add(&mut self, root: FieldElement) -> bool {
        self.roots.insert(root)
    }

    /// Whether any root is configured.
    pub fn is_enabled(&self) -> bool {
        !self.roots.is_empty()
    }

    pub fn contains(&self, root: &FieldElement) -> bool {
        self.roots.contains(root)
    }

    /// Accept `root` if checking is disabled or the root is trusted.
    pub fn check(&self, root: &FieldElement) -> Result<(), ProtocolError> {
        if self.is_enabled() && !self.contains(root) {
            return Err(ProtocolError::InvalidMerkleRoot { submitted: *root });
        }
        Ok(())
    }

    pub fn roots(&self) -> impl Iterator<Item = &FieldElement> {
        self.roots.iter()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }
}

impl FromIterator<FieldElement> for CertificateRootRegistry {
    fn from_iter<I: IntoIterator<Item = FieldElement>>(iter: I) -> Self {
        Self {
            roots: iter.into_iter().collect(),
        }
    }
}
