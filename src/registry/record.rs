//! Module `record`
//!
//! Defines the identity key and the record stored for every linked peer.

use std::fmt;
use std::net::SocketAddr;

use crate::error::RegistryError;
use crate::utils::validation::{is_valid_address, is_valid_port};

/// Identity of a linked peer: its network address and UDP source port.
///
/// Two records with equal keys name the same peer. A `ClientKey` can only be
/// built through [`ClientKey::new`], so every key held by the registry has
/// already passed identity validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientKey {
    address: String,
    port: u16,
}

impl ClientKey {
    /// Builds a key, rejecting malformed identities.
    pub fn new(address: impl Into<String>, port: u16) -> Result<Self, RegistryError> {
        let address = address.into();

        if !is_valid_address(&address) {
            return Err(RegistryError::InvalidIdentity(format!(
                "malformed address {:?}",
                address
            )));
        }

        if !is_valid_port(port) {
            return Err(RegistryError::InvalidIdentity(format!(
                "port {} for {}",
                port, address
            )));
        }

        Ok(Self { address, port })
    }

    /// Returns the peer's network address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the peer's UDP source port.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl TryFrom<SocketAddr> for ClientKey {
    type Error = RegistryError;

    fn try_from(addr: SocketAddr) -> Result<Self, Self::Error> {
        ClientKey::new(addr.ip().to_string(), addr.port())
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.address.contains(':') {
            write!(f, "[{}]:{}", self.address, self.port)
        } else {
            write!(f, "{}:{}", self.address, self.port)
        }
    }
}

/// One linked peer.
///
/// Identity fields are fixed at construction. The `extra` payload belongs to
/// whichever collaborator created the record; the registry never reads or
/// writes it. Records are shared as `Arc<ClientRecord<E>>` between the
/// registry and its callers, so a payload that changes after insertion must
/// carry its own synchronization (a mutex, atomics). The registry only
/// guarantees that a record is never relocated without its index entry being
/// rewritten in the same critical section.
#[derive(Debug)]
pub struct ClientRecord<E> {
    key: ClientKey,
    label: String,
    extra: E,
}

impl<E> ClientRecord<E> {
    pub fn new(key: ClientKey, label: impl Into<String>, extra: E) -> Self {
        Self {
            key,
            label: label.into(),
            extra,
        }
    }

    pub fn key(&self) -> &ClientKey {
        &self.key
    }

    pub fn address(&self) -> &str {
        self.key.address()
    }

    pub fn port(&self) -> u16 {
        self.key.port()
    }

    /// Returns the protocol label (callsign). Not unique across records.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the collaborator-owned payload.
    pub fn extra(&self) -> &E {
        &self.extra
    }
}
