//! Timeout sweeper
//!
//! Unlinks gateways that stopped polling.

use log::info;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::RegistryError;
use crate::registry::{ClientRecord, ClientRegistry};
use crate::server::session::PeerSession;

/// Removes every gateway idle for at least `timeout`, then checks the registry.
///
/// Works on a snapshot, so packets handled meanwhile never block on the sweep.
/// A gateway that relinks between the snapshot and its removal keeps its new
/// record. An `InternalInconsistency` error means the registry can no longer
/// be trusted.
pub fn sweep(
    registry: &ClientRegistry<PeerSession>,
    now: Instant,
    timeout: Duration,
) -> Result<Vec<Arc<ClientRecord<PeerSession>>>, RegistryError> {
    let mut expired = Vec::new();

    for record in registry.list() {
        if !record.extra().is_expired(now, timeout) {
            continue;
        }

        if let Some(removed) = registry.remove(&record) {
            info!(
                "Unlinking {} ({}), silent for {}s",
                removed.label(),
                removed.key(),
                removed.extra().idle_for(now).as_secs()
            );
            expired.push(removed);
        }
    }

    registry.verify()?;
    Ok(expired)
}
