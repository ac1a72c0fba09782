//! Registry result types
//!
//! Defines result structures returned by registry operations.

use std::sync::Arc;

use crate::registry::ClientRecord;

/// Result of adding a record
#[derive(Debug)]
pub enum AddOutcome<E> {
    /// The key was absent; the record was appended at `position`.
    Inserted { position: usize },
    /// The key was present; the new record took over the existing slot.
    Replaced {
        position: usize,
        previous: Arc<ClientRecord<E>>,
    },
}

impl<E> AddOutcome<E> {
    /// Slot the added record occupies at the moment the call returned.
    pub fn position(&self) -> usize {
        match self {
            AddOutcome::Inserted { position } => *position,
            AddOutcome::Replaced { position, .. } => *position,
        }
    }

    pub fn is_replaced(&self) -> bool {
        matches!(self, AddOutcome::Replaced { .. })
    }
}
