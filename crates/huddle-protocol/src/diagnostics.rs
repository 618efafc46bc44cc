//! Drop reasons and the diagnostics collaborator.
//!
//! This protocol sends no negative acknowledgments: when an inbound message
//! violates a rule it is dropped wholesale and the reason goes to the local
//! [`Diagnostics`] sink only. Diagnostics never affect control flow.

use thiserror::Error;
use tracing::warn;

use huddle_state::Peer;
use huddle_wire::RequestKind;

/// Why an inbound message was dropped without effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DropReason {
    /// The payload failed to decode: no code, unknown code, or a trailing
    /// unescaped backslash.
    #[error("malformed payload: {0}")]
    Malformed(#[from] huddle_wire::Error),

    /// A kind that takes no fields arrived with some.
    #[error("{kind} message carries {count} unexpected fields")]
    UnexpectedFields { kind: RequestKind, count: usize },

    /// A kind that requires fields arrived with none.
    #[error("{kind} message carries no fields")]
    MissingFields { kind: RequestKind },

    /// An AcceptInvitation arrived from a peer we never invited.
    #[error("AcceptInvitation from a peer we never invited")]
    NotInvited,

    /// The sender is not in our subscriber set, so it is not authorized to
    /// mutate our view.
    #[error("{kind} from a peer outside our network")]
    NotSubscriber { kind: RequestKind },

    /// An AddPeer field is not a syntactically valid peer address. The whole
    /// message is discarded, including its valid fields.
    #[error("AddPeer field {field:?} is not a valid peer address: {source}")]
    InvalidPeer {
        field: String,
        source: huddle_state::Error,
    },

    /// An AddResource message whose field count leaves a key without a value.
    #[error("AddResource message contains a key with no value")]
    UnpairedKey,
}

/// Receives human-readable drop reasons for inbound messages.
pub trait Diagnostics: Send + Sync {
    /// Called once per dropped message, after the drop decision is final.
    fn message_dropped(&self, sender: &Peer, reason: &DropReason);
}

/// Default diagnostics sink: forwards every drop to `tracing::warn!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn message_dropped(&self, sender: &Peer, reason: &DropReason) {
        warn!(%sender, %reason, "dropping inbound message");
    }
}
