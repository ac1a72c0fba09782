//! Client registry
//!
//! Tracks which peers are linked to the reflector. Safe for concurrent use by
//! the packet receiver, the timeout sweeper and the admin console.

pub mod record;
pub mod results;
pub mod store;

pub use record::{ClientKey, ClientRecord};
pub use results::AddOutcome;
pub use store::ClientRegistry;
