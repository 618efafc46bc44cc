//! The transport seam.
//!
//! The protocol core never talks to a network itself: it hands each outbound
//! payload to a [`Transport`], one recipient at a time, fire-and-forget.
//! A send failure is reported to the caller but never retried here.
//!
//! [`MemoryTransport`] is an in-process implementation that records every
//! send; tests use it both to assert on outbound traffic and to relay
//! payloads between managers by hand.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use huddle_state::Peer;

/// A failed send to a single peer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("send to {peer} failed: {reason}")]
pub struct SendError {
    /// The intended recipient.
    pub peer: Peer,
    /// Human-readable reason from the transport.
    pub reason: String,
}

/// Delivers one text payload to one peer address.
///
/// Implementations must not block the caller on network progress; queueing
/// and actual delivery are the transport's business. There is no delivery
/// acknowledgment and no ordering guarantee between sends to different
/// recipients.
pub trait Transport {
    /// Send `payload` to `peer`. Fire-and-forget: an `Ok` return means the
    /// payload was accepted for delivery, not that it arrived.
    fn send(&self, peer: &Peer, payload: &str) -> std::result::Result<(), SendError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, peer: &Peer, payload: &str) -> std::result::Result<(), SendError> {
        (**self).send(peer, payload)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, peer: &Peer, payload: &str) -> std::result::Result<(), SendError> {
        (**self).send(peer, payload)
    }
}

/// In-process transport that records every send.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Mutex<Vec<(Peer, String)>>,
    unreachable: Mutex<BTreeSet<Peer>>,
}

impl MemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return everything sent so far, in send order.
    pub fn take_sent(&self) -> Vec<(Peer, String)> {
        std::mem::take(&mut self.sent.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Payloads sent to `peer` so far, in send order, without draining.
    pub fn sent_to(&self, peer: &Peer) -> Vec<String> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(to, _)| to == peer)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    /// Make every future send to `peer` fail, simulating an unreachable
    /// address.
    pub fn mark_unreachable(&self, peer: Peer) {
        self.unreachable
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(peer);
    }
}

impl Transport for MemoryTransport {
    fn send(&self, peer: &Peer, payload: &str) -> std::result::Result<(), SendError> {
        if self
            .unreachable
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(peer)
        {
            return Err(SendError {
                peer: peer.clone(),
                reason: "peer marked unreachable".into(),
            });
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((peer.clone(), payload.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(addr: &str) -> Peer {
        Peer::parse(addr).unwrap()
    }

    #[test]
    fn records_sends_in_order() {
        let transport = MemoryTransport::new();
        transport.send(&peer("a"), "IN").unwrap();
        transport.send(&peer("b"), "RP").unwrap();

        assert_eq!(transport.sent_to(&peer("a")), vec!["IN"]);
        let all = transport.take_sent();
        assert_eq!(all, vec![(peer("a"), "IN".into()), (peer("b"), "RP".into())]);
        assert!(transport.take_sent().is_empty());
    }

    #[test]
    fn unreachable_peer_fails() {
        let transport = MemoryTransport::new();
        transport.mark_unreachable(peer("gone"));
        let err = transport.send(&peer("gone"), "IN").unwrap_err();
        assert_eq!(err.peer, peer("gone"));
        assert!(transport.sent_to(&peer("gone")).is_empty());
    }
}
