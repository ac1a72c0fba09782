//! Packet handlers for the reflector.
//!
//! Each inbound packet is dispatched to a handler that updates the client
//! registry and says what, if anything, goes back out on the socket. No I/O
//! happens here.

use log::{debug, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::ReflectorConfig;
use crate::error::ReflectorError;
use crate::protocol::{Packet, parse_packet, poll_reply, status_reply};
use crate::registry::{ClientKey, ClientRecord, ClientRegistry};
use crate::server::session::PeerSession;

/// Datagram to send, and every peer it goes to.
#[derive(Debug, PartialEq)]
pub struct Outbound {
    pub payload: Vec<u8>,
    pub targets: Vec<SocketAddr>,
}

impl Outbound {
    fn reply(payload: Vec<u8>, to: SocketAddr) -> Self {
        Self {
            payload,
            targets: vec![to],
        }
    }
}

/// Routes packets between linked gateways.
pub struct Relay {
    registry: Arc<ClientRegistry<PeerSession>>,
    status_id: u32,
    name: String,
    description: String,
    max_clients: usize,
}

impl Relay {
    pub fn new(registry: Arc<ClientRegistry<PeerSession>>, config: &ReflectorConfig) -> Self {
        Self {
            registry,
            status_id: config.status_id(),
            name: config.name.clone(),
            description: config.description.clone(),
            max_clients: config.max_clients,
        }
    }

    pub fn registry(&self) -> &Arc<ClientRegistry<PeerSession>> {
        &self.registry
    }

    /// Dispatches a received datagram to its handler.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Outbound))` - a reply or forwarded frame to send.
    /// * `Ok(None)` - nothing to send.
    /// * `Err` - the datagram or its sender was rejected.
    pub fn handle_packet(
        &self,
        raw: &[u8],
        from: SocketAddr,
        now: Instant,
    ) -> Result<Option<Outbound>, ReflectorError> {
        match parse_packet(raw)? {
            Packet::Poll { callsign } => self.handle_poll(&callsign, from, now),
            Packet::Unlink { callsign } => self.handle_unlink(&callsign, from),
            Packet::Data {
                gateway,
                source,
                destination,
                raw,
            } => self.handle_data(raw, &gateway, &source, &destination, from, now),
            Packet::StatusRequest => Ok(Some(self.handle_status(from))),
        }
    }

    /// Links a new gateway or refreshes a linked one, then answers the poll.
    fn handle_poll(
        &self,
        callsign: &str,
        from: SocketAddr,
        now: Instant,
    ) -> Result<Option<Outbound>, ReflectorError> {
        let key = ClientKey::try_from(from)?;

        match self.registry.find_key(&key) {
            Some(record) => record.extra().touch(now),
            None => {
                let record = ClientRecord::new(key, callsign, PeerSession::new(from, now));
                let record = Arc::new(record);
                if self
                    .registry
                    .add_within(Arc::clone(&record), self.max_clients)
                    .is_none()
                {
                    warn!(
                        "Refusing {} at {}: {} clients linked",
                        callsign,
                        record.key(),
                        self.max_clients
                    );
                    return Ok(None);
                }
                info!(
                    "Adding {} ({}), {} clients linked",
                    record.label(),
                    record.key(),
                    self.registry.len()
                );
            }
        }

        Ok(Some(Outbound::reply(poll_reply().to_vec(), from)))
    }

    fn handle_unlink(
        &self,
        callsign: &str,
        from: SocketAddr,
    ) -> Result<Option<Outbound>, ReflectorError> {
        let key = ClientKey::try_from(from)?;

        if let Some(record) = self.registry.find_key(&key)
            && self.registry.remove(&record).is_some()
        {
            info!("Removing {} ({}) unlinked", callsign, key);
        }

        Ok(None)
    }

    /// Forwards a frame from a linked gateway to every other linked gateway.
    fn handle_data(
        &self,
        raw: &[u8],
        gateway: &str,
        source: &str,
        destination: &str,
        from: SocketAddr,
        now: Instant,
    ) -> Result<Option<Outbound>, ReflectorError> {
        let key = ClientKey::try_from(from)?;

        let Some(sender) = self.registry.find_key(&key) else {
            debug!("Data from unlinked gateway {} at {}", gateway, key);
            return Ok(None);
        };
        sender.extra().touch(now);

        let targets: Vec<SocketAddr> = self
            .registry
            .list()
            .iter()
            .filter(|record| record.key() != &key)
            .map(|record| record.extra().peer())
            .collect();

        debug!(
            "Frame {} -> {} via {}, relaying to {} gateways",
            source,
            destination,
            gateway,
            targets.len()
        );

        if targets.is_empty() {
            return Ok(None);
        }

        Ok(Some(Outbound {
            payload: raw.to_vec(),
            targets,
        }))
    }

    fn handle_status(&self, from: SocketAddr) -> Outbound {
        let payload = status_reply(
            self.status_id,
            &self.name,
            &self.description,
            self.registry.len(),
        );
        Outbound::reply(payload, from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;
    use crate::protocol::packets::{DATA_LENGTH, DATA_TAG, POLL_TAG, UNLINK_TAG};
    use std::time::Duration;

    fn relay(max_clients: usize) -> Relay {
        let config = ReflectorConfig {
            name: "Test".into(),
            description: "Unit tests".into(),
            reflector_id: Some(7),
            max_clients,
            ..ReflectorConfig::default()
        };
        Relay::new(Arc::new(ClientRegistry::new()), &config)
    }

    fn addr(i: u16) -> SocketAddr {
        format!("127.0.0.{}:{}", i, 42000 + i).parse().unwrap()
    }

    fn packet(tag: &[u8; 4], callsign: &str) -> Vec<u8> {
        let mut raw = tag.to_vec();
        raw.extend_from_slice(format!("{:<10}", callsign).as_bytes());
        raw
    }

    fn frame(gateway: &str) -> Vec<u8> {
        let mut raw = packet(DATA_TAG, gateway);
        raw.extend_from_slice(b"SRC       ALL       ");
        raw.resize(DATA_LENGTH, 0);
        raw
    }

    #[test]
    fn test_poll_links_and_replies() {
        let relay = relay(0);
        let now = Instant::now();

        let out = relay
            .handle_packet(&packet(POLL_TAG, "GW1"), addr(1), now)
            .unwrap()
            .unwrap();
        assert_eq!(out.payload, b"YSFPREFLECTOR ");
        assert_eq!(out.targets, vec![addr(1)]);

        let record = relay.registry().find("127.0.0.1", 42001).unwrap().unwrap();
        assert_eq!(record.label(), "GW1");
        assert_eq!(record.extra().peer(), addr(1));
    }

    #[test]
    fn test_repeated_poll_keeps_record() {
        let relay = relay(0);
        let start = Instant::now();
        let later = start + Duration::from_secs(20);

        relay.handle_packet(&packet(POLL_TAG, "GW1"), addr(1), start).unwrap();
        let first = relay.registry().find("127.0.0.1", 42001).unwrap().unwrap();
        relay.handle_packet(&packet(POLL_TAG, "GW1"), addr(1), later).unwrap();
        let second = relay.registry().find("127.0.0.1", 42001).unwrap().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.extra().last_seen(), later);
        assert_eq!(relay.registry().len(), 1);
    }

    #[test]
    fn test_unlink_removes_client() {
        let relay = relay(0);
        let now = Instant::now();
        relay.handle_packet(&packet(POLL_TAG, "GW1"), addr(1), now).unwrap();

        let out = relay
            .handle_packet(&packet(UNLINK_TAG, "GW1"), addr(1), now)
            .unwrap();
        assert!(out.is_none());
        assert!(relay.registry().is_empty());

        // Unlinking again is harmless.
        assert!(relay
            .handle_packet(&packet(UNLINK_TAG, "GW1"), addr(1), now)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_data_forwarded_to_other_clients() {
        let relay = relay(0);
        let now = Instant::now();
        for i in 1..=3 {
            relay
                .handle_packet(&packet(POLL_TAG, &format!("GW{}", i)), addr(i), now)
                .unwrap();
        }

        let raw = frame("GW2");
        let out = relay.handle_packet(&raw, addr(2), now).unwrap().unwrap();
        assert_eq!(out.payload, raw);
        let mut targets = out.targets;
        targets.sort();
        assert_eq!(targets, vec![addr(1), addr(3)]);
    }

    #[test]
    fn test_data_from_unlinked_gateway_dropped() {
        let relay = relay(0);
        let now = Instant::now();
        relay.handle_packet(&packet(POLL_TAG, "GW1"), addr(1), now).unwrap();

        let out = relay.handle_packet(&frame("GW9"), addr(9), now).unwrap();
        assert!(out.is_none());
        assert_eq!(relay.registry().len(), 1);
    }

    #[test]
    fn test_status_reports_client_count() {
        let relay = relay(0);
        let now = Instant::now();
        relay.handle_packet(&packet(POLL_TAG, "GW1"), addr(1), now).unwrap();
        relay.handle_packet(&packet(POLL_TAG, "GW2"), addr(2), now).unwrap();

        let out = relay.handle_packet(b"YSFS", addr(5), now).unwrap().unwrap();
        assert_eq!(
            String::from_utf8(out.payload).unwrap(),
            "YSFS00007Test            Unit tests    002"
        );
        assert_eq!(out.targets, vec![addr(5)]);
    }

    #[test]
    fn test_max_clients_enforced() {
        let relay = relay(1);
        let now = Instant::now();
        relay.handle_packet(&packet(POLL_TAG, "GW1"), addr(1), now).unwrap();

        let out = relay.handle_packet(&packet(POLL_TAG, "GW2"), addr(2), now).unwrap();
        assert!(out.is_none());
        assert_eq!(relay.registry().len(), 1);

        // Linked gateways still get their keepalive answered.
        assert!(relay
            .handle_packet(&packet(POLL_TAG, "GW1"), addr(1), now)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_garbage_rejected() {
        let relay = relay(0);
        let err = relay
            .handle_packet(b"HELLO", addr(1), Instant::now())
            .unwrap_err();
        assert!(matches!(
            err,
            ReflectorError::Protocol(ProtocolError::UnknownTag(_))
        ));
        assert!(relay.registry().is_empty());
    }

    #[test]
    fn test_port_zero_sender_rejected() {
        let relay = relay(0);
        let from: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let err = relay
            .handle_packet(&packet(POLL_TAG, "GW1"), from, Instant::now())
            .unwrap_err();
        assert!(matches!(err, ReflectorError::Registry(_)));
        assert!(relay.registry().is_empty());
    }
}
