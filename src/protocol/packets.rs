//! Module `packets`
//!
//! Defines the YSF packets the reflector understands and their fixed sizes.

/// Width of every callsign field on the wire, space padded.
pub const CALLSIGN_LENGTH: usize = 10;

/// Length of the packet tag (`YSFP`, `YSFU`, `YSFD`, `YSFS`).
pub const TAG_LENGTH: usize = 4;

pub const POLL_TAG: &[u8; 4] = b"YSFP";
pub const UNLINK_TAG: &[u8; 4] = b"YSFU";
pub const DATA_TAG: &[u8; 4] = b"YSFD";
pub const STATUS_TAG: &[u8; 4] = b"YSFS";

pub const POLL_LENGTH: usize = TAG_LENGTH + CALLSIGN_LENGTH;
pub const UNLINK_LENGTH: usize = TAG_LENGTH + CALLSIGN_LENGTH;
pub const DATA_LENGTH: usize = 155;
pub const STATUS_REQUEST_LENGTH: usize = TAG_LENGTH;

/// Largest datagram the receiver needs to buffer.
pub const MAX_PACKET_LENGTH: usize = DATA_LENGTH;

/// A parsed inbound packet.
///
/// Data packets borrow the raw datagram so they can be forwarded untouched.
#[derive(Debug, PartialEq)]
pub enum Packet<'a> {
    /// Link request or keepalive from a gateway.
    Poll { callsign: String },
    /// Gateway leaving the reflector.
    Unlink { callsign: String },
    /// Voice or data frame to relay to every other linked gateway.
    Data {
        gateway: String,
        source: String,
        destination: String,
        raw: &'a [u8],
    },
    /// Directory or dashboard asking for the reflector's status.
    StatusRequest,
}
