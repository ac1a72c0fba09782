//! Error handlers
//!
//! Decides how loudly an error is reported and whether the reflector keeps serving.

use crate::error::types::{RegistryError, ReflectorError};
use log::{debug, error, warn};

/// Log a reflector error at a severity matching its kind
pub fn handle_error(err: &ReflectorError) {
    match err {
        // Junk datagrams are routine on an open UDP port.
        ReflectorError::Protocol(_) => debug!("Dropping packet: {}", err),
        ReflectorError::Registry(RegistryError::InvalidIdentity(_)) => {
            warn!("Rejected peer: {}", err)
        }
        _ => error!("Reflector error: {}", err),
    }
}

/// Whether the reflector must stop after this error
pub fn is_fatal(err: &ReflectorError) -> bool {
    match err {
        ReflectorError::Registry(RegistryError::InternalInconsistency(_)) => true,
        ReflectorError::Config(_) => true,
        ReflectorError::Registry(RegistryError::InvalidIdentity(_)) => false,
        ReflectorError::Protocol(_) => false,
        ReflectorError::IoError(_) => false,
    }
}
