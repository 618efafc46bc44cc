//! Error types for huddle-protocol commands.
//!
//! These are the *local* tier of the protocol's two error tiers: argument
//! and precondition failures reported synchronously to the command caller,
//! before any state mutation or send. The other tier, violations found in
//! inbound messages, never surfaces as an error at all — see
//! [`DropReason`](crate::diagnostics::DropReason).

use thiserror::Error;

use crate::transport::SendError;

/// Result type for huddle-protocol commands.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the command layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A peer argument is not a syntactically valid address.
    #[error("invalid peer address: {0}")]
    InvalidPeer(#[from] huddle_state::Error),

    /// A resource key is empty.
    #[error("resource key is empty")]
    EmptyKey,

    /// A resource key or value ends in a backslash, which cannot be encoded
    /// unambiguously.
    #[error("resource {0} ends in a backslash")]
    TrailingBackslash(&'static str),

    /// A direct (single-recipient) send failed. The command is not retried;
    /// per-recipient failures during a broadcast are logged instead.
    #[error(transparent)]
    Send(#[from] SendError),
}
