//! Huddle Protocol - group membership and dictionary replication over a
//! narrow peer-addressed transport.
//!
//! A set of addressable peers forms an ad-hoc network and keeps two pieces
//! of shared state converged: who is a member (the subscriber set) and a
//! string key/value dictionary. Convergence is driven purely by short text
//! payloads, one recipient per send, with no ordering, acknowledgment, or
//! delivery guarantee — a lost message is only repaired when a later message
//! restates the same fact.
//!
//! # Overview
//!
//! The [`NetworkManager`] is the single entry point. It owns the local
//! [`NetworkState`] replica behind a mutex, so local commands and inbound
//! dispatch are linearizable on the same state:
//!
//! - **Commands** ([`NetworkManager::invite`], [`NetworkManager::add_resource`],
//!   [`NetworkManager::quit_network`], ...) validate their arguments, mutate
//!   local state, and fan messages out to one peer or the whole subscriber
//!   set through the injected [`Transport`].
//! - **Dispatch** ([`NetworkManager::on_receive`]) decodes an inbound
//!   payload, checks it against the per-kind field-count and authorization
//!   rules, and applies it atomically: any violation drops the whole message
//!   with a [`DropReason`] handed to the [`Diagnostics`] collaborator, and
//!   nothing ever goes back to the remote sender.
//!
//! # Example
//!
//! ```
//! use huddle_protocol::{MemoryTransport, NetworkManager, Peer};
//!
//! let alice = Peer::parse("alice:9000").unwrap();
//! let bob = Peer::parse("bob:9000").unwrap();
//!
//! let manager = NetworkManager::new(alice, MemoryTransport::new());
//! manager.invite(&bob).unwrap();
//!
//! // Bob answers; the manager bootstraps him and records the membership.
//! manager.on_receive(&bob, "AI");
//! assert_eq!(manager.subscribers(), vec![bob]);
//! ```

pub mod commands;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod manager;
pub mod transport;

pub use diagnostics::{Diagnostics, DropReason, LogDiagnostics};
pub use error::{Error, Result};
pub use manager::{JoinHandler, NetworkManager};
pub use transport::{MemoryTransport, SendError, Transport};

// Re-export the value types the API surfaces, for convenience.
pub use huddle_state::{Invitation, NetworkState, Peer};
pub use huddle_wire::RequestKind;
