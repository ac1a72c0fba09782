//! Reflector server
//!
//! This module contains the UDP reflector, the packet handlers, the per-peer
//! session payload and the timeout sweeper that drive the client registry.

pub mod core;
pub mod relay;
pub mod session;
pub mod sweeper;

pub use self::core::Reflector;
pub use relay::{Outbound, Relay};
pub use session::PeerSession;
