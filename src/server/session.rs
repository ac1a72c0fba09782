//! Peer session state
//!
//! The payload each registry record carries for a linked gateway.

use parking_lot::Mutex;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Session state of one linked gateway.
///
/// Shared between the receiver (which refreshes `last_seen`) and the sweeper
/// (which reads it), so the timestamp sits behind its own lock. The registry
/// never touches it.
#[derive(Debug)]
pub struct PeerSession {
    peer: SocketAddr,
    linked_at: Instant,
    last_seen: Mutex<Instant>,
}

impl PeerSession {
    pub fn new(peer: SocketAddr, now: Instant) -> Self {
        Self {
            peer,
            linked_at: now,
            last_seen: Mutex::new(now),
        }
    }

    /// Socket address packets for this gateway are sent to.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn linked_at(&self) -> Instant {
        self.linked_at
    }

    pub fn last_seen(&self) -> Instant {
        *self.last_seen.lock()
    }

    /// Records traffic from the gateway. Never moves the timestamp backwards.
    pub fn touch(&self, now: Instant) {
        let mut last_seen = self.last_seen.lock();
        if now > *last_seen {
            *last_seen = now;
        }
    }

    /// Time since the gateway was last heard, zero if `now` is earlier.
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_seen())
    }

    pub fn is_expired(&self, now: Instant, timeout: Duration) -> bool {
        self.idle_for(now) >= timeout
    }
}
