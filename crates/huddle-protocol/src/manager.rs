//! The network manager: one local peer's handle on its network.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use huddle_state::{Invitation, NetworkState, Peer};

use crate::commands;
use crate::diagnostics::{Diagnostics, LogDiagnostics};
use crate::dispatch::{self, Inbound};
use crate::error::Result;
use crate::transport::Transport;

/// Decides what happens when an invitation arrives.
///
/// If no handler is registered, the manager accepts every invitation
/// automatically; if one is, the manager only hands it the [`Invitation`]
/// and the handler chooses whether (and when) to call
/// [`NetworkManager::accept_invitation`].
pub trait JoinHandler: Send + Sync {
    fn on_invitation(&self, invitation: Invitation);
}

/// One local peer's view of, and interface to, its network.
///
/// Owns the [`NetworkState`] replica behind a mutex: every command and every
/// inbound dispatch runs under the lock from start to finish, so mutations
/// are linearizable and a message is never half-applied when the next one is
/// considered. Nothing here blocks on the network — sends are fire-and-forget
/// calls into the [`Transport`].
pub struct NetworkManager<T: Transport> {
    local: Peer,
    transport: T,
    state: Mutex<NetworkState>,
    join_handler: Option<Box<dyn JoinHandler>>,
    diagnostics: Box<dyn Diagnostics>,
}

impl<T: Transport> NetworkManager<T> {
    /// Create a manager for the local peer identity, starting with no
    /// network joined. Drop diagnostics go to `tracing` by default.
    pub fn new(local: Peer, transport: T) -> Self {
        Self {
            local,
            transport,
            state: Mutex::new(NetworkState::new()),
            join_handler: None,
            diagnostics: Box::new(LogDiagnostics),
        }
    }

    /// The local peer identity this manager speaks for.
    pub fn local(&self) -> &Peer {
        &self.local
    }

    /// Register a join handler. Must be called before the manager is shared.
    pub fn set_join_handler(&mut self, handler: Box<dyn JoinHandler>) {
        self.join_handler = Some(handler);
    }

    /// Replace the diagnostics sink. Must be called before the manager is
    /// shared.
    pub fn set_diagnostics(&mut self, diagnostics: Box<dyn Diagnostics>) {
        self.diagnostics = diagnostics;
    }

    // --- commands ---

    /// Invite `peer` to join our network.
    pub fn invite(&self, peer: &Peer) -> Result<()> {
        commands::invite(&mut self.lock(), &self.transport, peer)
    }

    /// Accept an invitation, leaving any network we are currently part of.
    pub fn accept_invitation(&self, invitation: &Invitation) -> Result<()> {
        commands::accept_invitation(&mut self.lock(), &self.transport, invitation)
    }

    /// Add `peer` to the subscriber set and flood the fact.
    pub fn add_peer(&self, peer: &Peer) -> Result<()> {
        commands::add_peer(&mut self.lock(), &self.transport, peer)
    }

    /// Set a dictionary entry locally and broadcast it.
    pub fn add_resource(&self, key: &str, value: &str) -> Result<()> {
        commands::add_resource(&mut self.lock(), &self.transport, key, value)
    }

    /// Remove a dictionary entry locally and broadcast the removal.
    pub fn remove_resource(&self, key: &str) -> Result<()> {
        commands::remove_resource(&mut self.lock(), &self.transport, key)
    }

    /// Leave the network: announce it to every subscriber, then reset all
    /// local state.
    pub fn quit_network(&self) -> Result<()> {
        commands::quit_network(&mut self.lock(), &self.transport)
    }

    // --- queries ---

    /// Look up a dictionary entry. Purely local, nothing is sent.
    pub fn get_resource(&self, key: &str) -> Option<String> {
        self.lock().get_resource(key).map(str::to_string)
    }

    /// Snapshot of the subscriber set, sorted by address.
    pub fn subscribers(&self) -> Vec<Peer> {
        self.lock().subscribers()
    }

    /// Snapshot of the peers with an outstanding invitation from us.
    pub fn invited_peers(&self) -> Vec<Peer> {
        self.lock().invited()
    }

    /// Snapshot of the dictionary, sorted by key.
    pub fn resource_pairs(&self) -> Vec<(String, String)> {
        self.lock().resource_pairs()
    }

    // --- inbound ---

    /// Process one inbound payload from `sender`.
    ///
    /// This is the transport's receive callback. Violations are dropped and
    /// reported to the diagnostics sink; valid invitations go to the join
    /// handler, or are auto-accepted when none is registered. The state lock
    /// is released before the handler runs, so a handler may call straight
    /// back into this manager.
    pub fn on_receive(&self, sender: &Peer, payload: &str) {
        let outcome = dispatch::dispatch(
            &mut self.lock(),
            &self.transport,
            &self.local,
            sender,
            payload,
        );
        match outcome {
            Ok(Inbound::Handled) => {}
            Ok(Inbound::Invitation(invitation)) => match &self.join_handler {
                Some(handler) => handler.on_invitation(invitation),
                None => {
                    debug!(inviter = %invitation.inviter(), "no join handler set, accepting automatically");
                    if let Err(err) = self.accept_invitation(&invitation) {
                        warn!(%err, "automatic accept failed");
                    }
                }
            },
            Err(reason) => self.diagnostics.message_dropped(sender, &reason),
        }
    }

    fn lock(&self) -> MutexGuard<'_, NetworkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DropReason;
    use crate::transport::MemoryTransport;
    use std::sync::{Arc, Mutex};

    fn peer(addr: &str) -> Peer {
        Peer::parse(addr).unwrap()
    }

    #[test]
    fn invite_then_accept_round() {
        let transport = Arc::new(MemoryTransport::new());
        let manager = NetworkManager::new(peer("alice"), transport.clone());
        let bob = peer("bob");

        manager.invite(&bob).unwrap();
        assert_eq!(manager.invited_peers(), vec![bob.clone()]);
        assert_eq!(transport.sent_to(&bob), vec!["IN"]);

        manager.on_receive(&bob, "AI");
        assert_eq!(manager.subscribers(), vec![bob.clone()]);
        assert!(manager.invited_peers().is_empty());
    }

    #[test]
    fn inbound_invite_auto_accepts_without_handler() {
        let transport = Arc::new(MemoryTransport::new());
        let manager = NetworkManager::new(peer("bob"), transport.clone());
        let alice = peer("alice");

        manager.on_receive(&alice, "IN");

        assert_eq!(manager.subscribers(), vec![alice.clone()]);
        assert_eq!(transport.sent_to(&alice), vec!["AI"]);
    }

    #[test]
    fn inbound_invite_goes_to_handler_when_set() {
        struct Recorder(Arc<Mutex<Vec<Invitation>>>);
        impl JoinHandler for Recorder {
            fn on_invitation(&self, invitation: Invitation) {
                self.0.lock().unwrap().push(invitation);
            }
        }

        let transport = Arc::new(MemoryTransport::new());
        let mut manager = NetworkManager::new(peer("bob"), transport.clone());
        let received = Arc::new(Mutex::new(Vec::new()));
        manager.set_join_handler(Box::new(Recorder(received.clone())));

        let alice = peer("alice");
        manager.on_receive(&alice, "IN");

        // nothing accepted, nothing sent; the handler has the invitation
        assert!(manager.subscribers().is_empty());
        assert!(transport.sent_to(&alice).is_empty());
        let invitations = received.lock().unwrap();
        assert_eq!(invitations.len(), 1);
        assert_eq!(invitations[0].inviter(), &alice);
    }

    #[test]
    fn dropped_messages_reach_diagnostics() {
        struct Capture(Arc<Mutex<Vec<(Peer, DropReason)>>>);
        impl Diagnostics for Capture {
            fn message_dropped(&self, sender: &Peer, reason: &DropReason) {
                self.0.lock().unwrap().push((sender.clone(), reason.clone()));
            }
        }

        let drops = Arc::new(Mutex::new(Vec::new()));
        let mut manager = NetworkManager::new(peer("alice"), MemoryTransport::new());
        manager.set_diagnostics(Box::new(Capture(drops.clone())));

        let stranger = peer("stranger");
        manager.on_receive(&stranger, "AR¤k¤v");

        let drops = drops.lock().unwrap();
        assert_eq!(drops.len(), 1);
        assert_eq!(drops[0].0, stranger);
        assert!(matches!(drops[0].1, DropReason::NotSubscriber { .. }));
    }

    #[test]
    fn get_resource_is_local_only() {
        let transport = Arc::new(MemoryTransport::new());
        let manager = NetworkManager::new(peer("alice"), transport.clone());

        manager.add_resource("k", "v").unwrap();
        transport.take_sent();

        assert_eq!(manager.get_resource("k"), Some("v".into()));
        assert_eq!(manager.get_resource("ghost"), None);
        assert!(transport.take_sent().is_empty());
    }

    #[test]
    fn quit_clears_everything() {
        let transport = Arc::new(MemoryTransport::new());
        let manager = NetworkManager::new(peer("alice"), transport.clone());
        let bob = peer("bob");

        manager.invite(&peer("pending")).unwrap();
        manager.add_peer(&bob).unwrap();
        manager.add_resource("k", "v").unwrap();

        manager.quit_network().unwrap();
        assert!(manager.subscribers().is_empty());
        assert!(manager.invited_peers().is_empty());
        assert!(manager.resource_pairs().is_empty());
        assert_eq!(
            transport.sent_to(&bob).last().map(String::as_str),
            Some("RP")
        );
    }
}
