//! YSF response handling
//!
//! Builds the packets the reflector sends back to gateways.

use crate::protocol::packets::{POLL_LENGTH, POLL_TAG, STATUS_TAG};

/// Callsign the reflector announces in poll replies.
pub const REFLECTOR_CALLSIGN: &[u8; 10] = b"REFLECTOR ";

pub const STATUS_NAME_LENGTH: usize = 16;
pub const STATUS_DESCRIPTION_LENGTH: usize = 14;
pub const STATUS_REPLY_LENGTH: usize = 4 + 5 + STATUS_NAME_LENGTH + STATUS_DESCRIPTION_LENGTH + 3;

/// Highest client count a status reply can carry.
pub const MAX_REPORTED_CLIENTS: usize = 999;

/// Reply sent to every poll from a linked gateway
pub fn poll_reply() -> [u8; POLL_LENGTH] {
    let mut reply = [0u8; POLL_LENGTH];
    reply[..4].copy_from_slice(POLL_TAG);
    reply[4..].copy_from_slice(REFLECTOR_CALLSIGN);
    reply
}

/// Format a status reply: tag, 5-digit id, padded name and description, 3-digit count
pub fn status_reply(id: u32, name: &str, description: &str, clients: usize) -> Vec<u8> {
    let mut reply = Vec::with_capacity(STATUS_REPLY_LENGTH);
    reply.extend_from_slice(STATUS_TAG);
    reply.extend_from_slice(format!("{:05}", id % 100_000).as_bytes());
    push_padded(&mut reply, name, STATUS_NAME_LENGTH);
    push_padded(&mut reply, description, STATUS_DESCRIPTION_LENGTH);
    reply.extend_from_slice(format!("{:03}", clients.min(MAX_REPORTED_CLIENTS)).as_bytes());
    reply
}

fn push_padded(out: &mut Vec<u8>, text: &str, width: usize) {
    let bytes: Vec<u8> = text
        .bytes()
        .map(|b| if b.is_ascii_graphic() { b } else { b' ' })
        .take(width)
        .collect();
    out.extend_from_slice(&bytes);
    out.resize(out.len() + width - bytes.len(), b' ');
}

/// Derive the 5-digit status id from the reflector name (Jenkins one-at-a-time hash)
pub fn reflector_id(name: &str) -> u32 {
    let mut hash: u32 = 0;
    for b in name.bytes() {
        hash = hash.wrapping_add(u32::from(b));
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash = hash.wrapping_add(hash << 15);
    hash % 100_000
}
