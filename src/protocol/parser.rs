//! YSF packet parsing
//!
//! Turns raw datagrams into [`Packet`]s. Anything else is a [`ProtocolError`].

use crate::error::ProtocolError;
use crate::protocol::packets::*;

/// Parse a raw datagram into a `Packet`
pub fn parse_packet(raw: &[u8]) -> Result<Packet<'_>, ProtocolError> {
    if raw.len() < TAG_LENGTH {
        return Err(ProtocolError::TooShort(raw.len()));
    }

    let mut tag = [0u8; TAG_LENGTH];
    tag.copy_from_slice(&raw[..TAG_LENGTH]);

    match &tag {
        POLL_TAG => {
            expect_length("poll", raw, POLL_LENGTH)?;
            Ok(Packet::Poll {
                callsign: parse_callsign(&raw[4..14])?,
            })
        }
        UNLINK_TAG => {
            expect_length("unlink", raw, UNLINK_LENGTH)?;
            Ok(Packet::Unlink {
                callsign: parse_callsign(&raw[4..14])?,
            })
        }
        DATA_TAG => {
            expect_length("data", raw, DATA_LENGTH)?;
            Ok(Packet::Data {
                gateway: parse_callsign(&raw[4..14])?,
                source: parse_callsign(&raw[14..24])?,
                destination: parse_callsign(&raw[24..34])?,
                raw,
            })
        }
        STATUS_TAG => {
            expect_length("status", raw, STATUS_REQUEST_LENGTH)?;
            Ok(Packet::StatusRequest)
        }
        _ => Err(ProtocolError::UnknownTag(tag)),
    }
}

fn expect_length(tag: &'static str, raw: &[u8], expected: usize) -> Result<(), ProtocolError> {
    if raw.len() != expected {
        return Err(ProtocolError::InvalidLength {
            tag,
            expected,
            actual: raw.len(),
        });
    }
    Ok(())
}

/// Decode a space or NUL padded callsign field.
///
/// Source and destination fields may legitimately be blank, so an empty
/// result is accepted; non-printable bytes are not.
fn parse_callsign(field: &[u8]) -> Result<String, ProtocolError> {
    let trimmed = field
        .iter()
        .rposition(|&b| b != b' ' && b != 0)
        .map_or(&field[..0], |last| &field[..=last]);

    if trimmed.iter().any(|&b| !(b.is_ascii_graphic() || b == b' ')) {
        return Err(ProtocolError::MalformedCallsign(
            String::from_utf8_lossy(field).into_owned(),
        ));
    }

    Ok(String::from_utf8_lossy(trimmed).into_owned())
}
