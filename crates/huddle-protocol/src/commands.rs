//! The command layer: locally initiated operations.
//!
//! Each command validates its arguments first and fails with an
//! [`Error`](crate::error::Error) before touching state or sending anything.
//! After that, its side effects are exactly two: the new content of the
//! [`NetworkState`] and the payloads handed to the [`Transport`].
//!
//! These functions operate on an already-locked state; [`NetworkManager`]
//! (crate::manager::NetworkManager) is the public surface and holds the lock
//! across each call so commands never interleave with dispatch.

use tracing::{debug, warn};

use huddle_state::{Invitation, NetworkState, Peer};
use huddle_wire::{codec, RequestKind};

use crate::error::{Error, Result};
use crate::transport::Transport;

/// Send an Invite to `peer` and record the outstanding invitation.
pub(crate) fn invite<T: Transport>(
    state: &mut NetworkState,
    transport: &T,
    peer: &Peer,
) -> Result<()> {
    transport.send(peer, &codec::encode::<&str>(RequestKind::Invite, &[]))?;
    state.add_invited(peer.clone());
    debug!(%peer, "invitation sent");
    Ok(())
}

/// Accept an invitation: leave any current network, adopt the inviter as our
/// first subscriber, and tell them we accepted.
pub(crate) fn accept_invitation<T: Transport>(
    state: &mut NetworkState,
    transport: &T,
    invitation: &Invitation,
) -> Result<()> {
    let inviter = invitation.inviter();
    quit_network(state, transport)?;
    state.add_subscriber(inviter.clone());
    transport.send(
        inviter,
        &codec::encode::<&str>(RequestKind::AcceptInvitation, &[]),
    )?;
    debug!(%inviter, "accepted invitation");
    Ok(())
}

/// Add `peer` to our subscriber set and flood the fact to the (new) set.
pub(crate) fn add_peer<T: Transport>(
    state: &mut NetworkState,
    transport: &T,
    peer: &Peer,
) -> Result<()> {
    state.add_subscriber(peer.clone());
    broadcast(
        state,
        transport,
        &codec::encode(RequestKind::AddPeer, &[peer.as_str()]),
    );
    Ok(())
}

/// Set `key` to `value` locally and broadcast the pair.
pub(crate) fn add_resource<T: Transport>(
    state: &mut NetworkState,
    transport: &T,
    key: &str,
    value: &str,
) -> Result<()> {
    validate_key(key)?;
    validate_value(value)?;
    state.set_resource(key.to_string(), value.to_string());
    broadcast(
        state,
        transport,
        &codec::encode(RequestKind::AddResource, &[key, value]),
    );
    Ok(())
}

/// Remove `key` locally and broadcast the removal.
pub(crate) fn remove_resource<T: Transport>(
    state: &mut NetworkState,
    transport: &T,
    key: &str,
) -> Result<()> {
    validate_key(key)?;
    state.remove_resource(key);
    broadcast(
        state,
        transport,
        &codec::encode(RequestKind::RemoveResource, &[key]),
    );
    Ok(())
}

/// Announce our departure to every subscriber, then reset all local state.
pub(crate) fn quit_network<T: Transport>(state: &mut NetworkState, transport: &T) -> Result<()> {
    broadcast(
        state,
        transport,
        &codec::encode::<&str>(RequestKind::QuitNetwork, &[]),
    );
    state.clear();
    Ok(())
}

/// Send `payload` to every current subscriber. Per-recipient failures are
/// logged and do not stop the rest of the fan-out; there is no retry.
pub(crate) fn broadcast<T: Transport>(state: &NetworkState, transport: &T, payload: &str) {
    for peer in state.subscribers() {
        if let Err(err) = transport.send(&peer, payload) {
            warn!(%err, "broadcast send failed, continuing");
        }
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::EmptyKey);
    }
    if !codec::is_wire_safe(key) {
        return Err(Error::TrailingBackslash("key"));
    }
    Ok(())
}

fn validate_value(value: &str) -> Result<()> {
    if !codec::is_wire_safe(value) {
        return Err(Error::TrailingBackslash("value"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;

    fn peer(addr: &str) -> Peer {
        Peer::parse(addr).unwrap()
    }

    #[test]
    fn invite_sends_and_records() {
        let mut state = NetworkState::new();
        let transport = MemoryTransport::new();
        let bob = peer("bob");

        invite(&mut state, &transport, &bob).unwrap();

        assert!(state.is_invited(&bob));
        assert_eq!(transport.sent_to(&bob), vec!["IN"]);
    }

    #[test]
    fn invite_send_failure_leaves_no_trace() {
        let mut state = NetworkState::new();
        let transport = MemoryTransport::new();
        let bob = peer("bob");
        transport.mark_unreachable(bob.clone());

        assert!(invite(&mut state, &transport, &bob).is_err());
        assert!(!state.is_invited(&bob));
    }

    #[test]
    fn accept_invitation_leaves_old_network_first() {
        let mut state = NetworkState::new();
        let transport = MemoryTransport::new();
        let old = peer("old-member");
        let inviter = peer("inviter");
        state.add_subscriber(old.clone());
        state.set_resource("stale".into(), "entry".into());

        accept_invitation(&mut state, &transport, &Invitation::new(inviter.clone())).unwrap();

        // the old network was told we quit, then everything was reset
        assert_eq!(transport.sent_to(&old), vec!["RP"]);
        assert_eq!(state.subscribers(), vec![inviter.clone()]);
        assert_eq!(state.resource_count(), 0);
        assert_eq!(transport.sent_to(&inviter), vec!["AI"]);
    }

    #[test]
    fn add_peer_floods_new_set() {
        let mut state = NetworkState::new();
        let transport = MemoryTransport::new();
        let carol = peer("carol");
        state.add_subscriber(carol.clone());
        let bob = peer("bob");

        add_peer(&mut state, &transport, &bob).unwrap();

        assert!(state.is_subscriber(&bob));
        // the new set includes bob himself
        assert_eq!(transport.sent_to(&carol), vec!["AP¤bob"]);
        assert_eq!(transport.sent_to(&bob), vec!["AP¤bob"]);
    }

    #[test]
    fn add_resource_validates_before_mutating() {
        let mut state = NetworkState::new();
        let transport = MemoryTransport::new();
        state.add_subscriber(peer("carol"));

        assert_eq!(
            add_resource(&mut state, &transport, "", "v"),
            Err(Error::EmptyKey)
        );
        assert_eq!(
            add_resource(&mut state, &transport, "k\\", "v"),
            Err(Error::TrailingBackslash("key"))
        );
        assert_eq!(
            add_resource(&mut state, &transport, "k", "v\\"),
            Err(Error::TrailingBackslash("value"))
        );
        assert_eq!(state.resource_count(), 0);
        assert!(transport.take_sent().is_empty());
    }

    #[test]
    fn add_resource_sets_and_broadcasts() {
        let mut state = NetworkState::new();
        let transport = MemoryTransport::new();
        let carol = peer("carol");
        state.add_subscriber(carol.clone());

        add_resource(&mut state, &transport, "k¤1", "v").unwrap();

        assert_eq!(state.get_resource("k¤1"), Some("v"));
        assert_eq!(transport.sent_to(&carol), vec!["AR¤k\\¤1¤v"]);
    }

    #[test]
    fn remove_resource_is_total_even_when_absent() {
        let mut state = NetworkState::new();
        let transport = MemoryTransport::new();
        let carol = peer("carol");
        state.add_subscriber(carol.clone());

        remove_resource(&mut state, &transport, "ghost").unwrap();
        assert_eq!(transport.sent_to(&carol), vec!["RR¤ghost"]);
    }

    #[test]
    fn quit_broadcasts_then_clears() {
        let mut state = NetworkState::new();
        let transport = MemoryTransport::new();
        let carol = peer("carol");
        state.add_subscriber(carol.clone());
        state.add_invited(peer("bob"));
        state.set_resource("k".into(), "v".into());

        quit_network(&mut state, &transport).unwrap();

        assert_eq!(transport.sent_to(&carol), vec!["RP"]);
        assert!(state.is_empty());
    }

    #[test]
    fn broadcast_survives_unreachable_recipient() {
        let mut state = NetworkState::new();
        let transport = MemoryTransport::new();
        let dead = peer("dead");
        let live = peer("live");
        state.add_subscriber(dead.clone());
        state.add_subscriber(live.clone());
        transport.mark_unreachable(dead);

        add_resource(&mut state, &transport, "k", "v").unwrap();
        assert_eq!(transport.sent_to(&live), vec!["AR¤k¤v"]);
    }
}
