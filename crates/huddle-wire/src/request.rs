//! Request codes - the two-character prefix identifying each operation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The operation kinds carried on the wire.
///
/// Each kind maps to a fixed two-character code placed at the start of every
/// payload. The table is closed: any other code is unknown and the payload
/// carrying it is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RequestKind {
    /// Ask a peer to join our network. No fields.
    Invite,
    /// Accept a previously received invite. No fields.
    AcceptInvitation,
    /// Add one or more peers to the subscriber set. One peer address per field.
    AddPeer,
    /// The sender leaves the network. No fields.
    QuitNetwork,
    /// Set dictionary entries. Alternating key and value fields.
    AddResource,
    /// Remove dictionary entries. One key per field.
    RemoveResource,
}

impl RequestKind {
    /// Every kind, in wire-code order.
    pub const ALL: [RequestKind; 6] = [
        RequestKind::Invite,
        RequestKind::AcceptInvitation,
        RequestKind::AddPeer,
        RequestKind::QuitNetwork,
        RequestKind::AddResource,
        RequestKind::RemoveResource,
    ];

    /// The two-character wire code for this kind.
    ///
    /// `QuitNetwork` is `RP` ("remove peer") on the wire.
    pub const fn code(self) -> &'static str {
        match self {
            RequestKind::Invite => "IN",
            RequestKind::AcceptInvitation => "AI",
            RequestKind::AddPeer => "AP",
            RequestKind::QuitNetwork => "RP",
            RequestKind::AddResource => "AR",
            RequestKind::RemoveResource => "RR",
        }
    }

    /// Look up a kind by wire code. Returns `None` for anything not in the
    /// table, including the empty string.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.code() == code)
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invite => write!(f, "Invite"),
            Self::AcceptInvitation => write!(f, "AcceptInvitation"),
            Self::AddPeer => write!(f, "AddPeer"),
            Self::QuitNetwork => write!(f, "QuitNetwork"),
            Self::AddResource => write!(f, "AddResource"),
            Self::RemoveResource => write!(f, "RemoveResource"),
        }
    }
}
