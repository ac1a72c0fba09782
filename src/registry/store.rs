//! Client registry
//!
//! Tracks linked peers in an append-mostly sequence plus a key index, both
//! guarded by a single lock so no caller ever sees one updated without the other.

use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::registry::{AddOutcome, ClientKey, ClientRecord};

/// Sequence and index, always mutated together.
struct Slots<E> {
    clients: Vec<Arc<ClientRecord<E>>>,
    index: HashMap<ClientKey, usize>,
}

impl<E> Slots<E> {
    /// Swap-removes the slot at `position` and points the key of the record
    /// moved into it at its new position.
    fn detach(&mut self, position: usize) -> Arc<ClientRecord<E>> {
        let removed = self.clients.swap_remove(position);
        self.index.remove(removed.key());

        if let Some(moved) = self.clients.get(position) {
            self.index.insert(moved.key().clone(), position);
        }

        removed
    }

    fn insert(&mut self, record: Arc<ClientRecord<E>>) -> AddOutcome<E> {
        if let Some(&position) = self.index.get(record.key()) {
            debug!("Replacing client {} ({})", record.key(), record.label());
            let previous = std::mem::replace(&mut self.clients[position], record);
            return AddOutcome::Replaced { position, previous };
        }

        let position = self.clients.len();
        debug!("Adding client {} ({})", record.key(), record.label());
        self.index.insert(record.key().clone(), position);
        self.clients.push(record);

        AddOutcome::Inserted { position }
    }
}

/// Registry of linked peers, safe to share between threads.
///
/// Writers (`add`, `remove`, `remove_key`) take the lock exclusively; readers
/// (`find`, `list`, `len`, `verify`) share it. The lock only ever guards
/// in-memory bookkeeping and is released before any handle is returned.
pub struct ClientRegistry<E> {
    slots: RwLock<Slots<E>>,
}

impl<E> ClientRegistry<E> {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(Slots {
                clients: Vec::new(),
                index: HashMap::new(),
            }),
        }
    }

    /// Links a record, replacing any record already registered under its key.
    ///
    /// A replacement keeps the existing slot, so no other key moves.
    pub fn add(&self, record: Arc<ClientRecord<E>>) -> AddOutcome<E> {
        self.slots.write().insert(record)
    }

    /// Like `add`, but refuses a new key once `capacity` records are linked.
    ///
    /// Replacing a record already registered under the key is always allowed.
    /// A `capacity` of 0 means unlimited. The check and the insert happen
    /// under one lock, so concurrent callers never overshoot the cap.
    pub fn add_within(
        &self,
        record: Arc<ClientRecord<E>>,
        capacity: usize,
    ) -> Option<AddOutcome<E>> {
        let mut slots = self.slots.write();

        if capacity > 0
            && slots.clients.len() >= capacity
            && !slots.index.contains_key(record.key())
        {
            debug!("Registry full, refusing client {}", record.key());
            return None;
        }

        Some(slots.insert(record))
    }

    /// Unlinks `record` if it is still the record registered under its key.
    ///
    /// Returns `None` when the key is unknown or when the slot now holds a
    /// different record (the peer relinked after `record` was obtained).
    pub fn remove(&self, record: &Arc<ClientRecord<E>>) -> Option<Arc<ClientRecord<E>>> {
        let mut slots = self.slots.write();

        let position = *slots.index.get(record.key())?;
        if !Arc::ptr_eq(&slots.clients[position], record) {
            debug!("Ignoring stale removal of client {}", record.key());
            return None;
        }

        debug!("Removing client {} ({})", record.key(), record.label());
        Some(slots.detach(position))
    }

    /// Unlinks whatever record is registered under `key`.
    pub fn remove_key(&self, key: &ClientKey) -> Option<Arc<ClientRecord<E>>> {
        let mut slots = self.slots.write();

        let position = *slots.index.get(key)?;
        debug!("Removing client {} by key", key);
        Some(slots.detach(position))
    }

    /// Looks a peer up by address and port.
    ///
    /// Fails only when the identity itself is malformed; an unknown peer is
    /// `Ok(None)`. The returned handle may be unlinked by another thread at
    /// any moment after this call returns.
    pub fn find(
        &self,
        address: &str,
        port: u16,
    ) -> Result<Option<Arc<ClientRecord<E>>>, RegistryError> {
        let key = ClientKey::new(address, port)?;
        Ok(self.find_key(&key))
    }

    pub fn find_key(&self, key: &ClientKey) -> Option<Arc<ClientRecord<E>>> {
        let slots = self.slots.read();
        let position = *slots.index.get(key)?;
        // Indexed positions are always in bounds; a miss here is corruption, not absence.
        Some(Arc::clone(&slots.clients[position]))
    }

    pub fn contains(&self, key: &ClientKey) -> bool {
        self.slots.read().index.contains_key(key)
    }

    /// Point-in-time copy of every linked record, in slot order.
    pub fn list(&self) -> Vec<Arc<ClientRecord<E>>> {
        self.slots.read().clients.clone()
    }

    pub fn len(&self) -> usize {
        self.slots.read().clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that every index entry points at an in-bounds slot holding a
    /// record with that key, and that every slot is indexed exactly once.
    pub fn verify(&self) -> Result<(), RegistryError> {
        let slots = self.slots.read();

        for (key, &position) in &slots.index {
            match slots.clients.get(position) {
                None => {
                    return Err(RegistryError::InternalInconsistency(format!(
                        "stale index for {}: {} >= {}",
                        key,
                        position,
                        slots.clients.len()
                    )));
                }
                Some(record) if record.key() != key => {
                    return Err(RegistryError::InternalInconsistency(format!(
                        "index for {} points at slot {} holding {}",
                        key,
                        position,
                        record.key()
                    )));
                }
                Some(_) => {}
            }
        }

        // Every indexed key maps to a distinct slot, so equal sizes rule out
        // both orphaned records and duplicate identities.
        if slots.index.len() != slots.clients.len() {
            return Err(RegistryError::InternalInconsistency(format!(
                "{} index entries for {} clients",
                slots.index.len(),
                slots.clients.len()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
impl<E> ClientRegistry<E> {
    /// Drops the last slot without touching the index, leaving it inconsistent.
    pub(crate) fn corrupt_drop_last_slot(&self) {
        self.slots.write().clients.pop();
    }
}

impl<E> Default for ClientRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}
