//! Invitations to join a network.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::peer::Peer;

/// A received invitation to join the inviter's network.
///
/// Transient: produced when an Invite message arrives and handed to the join
/// handler (or auto-accepted); never stored by the protocol itself.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Invitation {
    inviter: Peer,
}

impl Invitation {
    /// Create an invitation from the peer who sent it.
    pub fn new(inviter: Peer) -> Self {
        Self { inviter }
    }

    /// The peer whose network we are invited to join.
    pub fn inviter(&self) -> &Peer {
        &self.inviter
    }
}
