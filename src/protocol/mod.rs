//! YSF protocol implementation
//!
//! Handles packet parsing and response generation.

pub mod packets;
pub mod parser;
pub mod responses;

pub use packets::Packet;
pub use parser::parse_packet;
pub use responses::{poll_reply, reflector_id, status_reply};
