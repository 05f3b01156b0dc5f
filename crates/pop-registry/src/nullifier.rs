//! # Nullifier Ledger
//!
//! Consumed nullifiers, partitioned by [`NullifierKind`]. A nullifier enters
//! a set at most once and leaves it only when the transaction that recorded
//! it is rolled back before commit.

use std::collections::HashSet;

use pop_core::{Nullifier, NullifierKind, ProtocolError};

/// Per-kind sets of consumed nullifiers.
#[derive(Debug, Clone, Default)]
pub struct NullifierLedger {
    register: HashSet<Nullifier>,
    disclose: HashSet<Nullifier>,
}

impl NullifierLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, kind: NullifierKind) -> &HashSet<Nullifier> {
        match kind {
            NullifierKind::Register => &self.register,
            NullifierKind::Disclose => &self.disclose,
        }
    }

    fn set_mut(&mut self, kind: NullifierKind) -> &mut HashSet<Nullifier> {
        match kind {
            NullifierKind::Register => &mut self.register,
            NullifierKind::Disclose => &mut self.disclose,
        }
    }

    pub fn is_used(&self, kind: NullifierKind, nullifier: &Nullifier) -> bool {
        self.set(kind).contains(nullifier)
    }

    /// Fail with [`ProtocolError::NullifierReuse`] if already consumed.
    pub fn check(&self, kind: NullifierKind, nullifier: &Nullifier) -> Result<(), ProtocolError> {
        if self.is_used(kind, nullifier) {
            return Err(ProtocolError::NullifierReuse {
                kind,
                nullifier: nullifier.value(),
            });
        }
        Ok(())
    }

    /// Consume `nullifier` for `kind`.
    pub fn record(&mut self, kind: NullifierKind, nullifier: Nullifier) -> Result<(), ProtocolError> {
        if !self.set_mut(kind).insert(nullifier) {
            return Err(ProtocolError::NullifierReuse {
                kind,
                nullifier: nullifier.value(),
            });
        }
        Ok(())
    }

    /// Undo a [`record`](Self::record) whose transaction failed.
    pub(crate) fn rollback(&mut self, kind: NullifierKind, nullifier: &Nullifier) -> bool {
        self.set_mut(kind).remove(nullifier)
    }

    /// Number of nullifiers consumed for `kind`.
    pub fn len(&self, kind: NullifierKind) -> usize {
        self.set(kind).len()
    }
}
