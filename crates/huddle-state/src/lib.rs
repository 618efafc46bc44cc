//! Huddle State - peer identity and the local replica of shared state.
//!
//! A [`Peer`] is a validated, opaque address string; [`NetworkState`] is one
//! node's view of the group it belongs to: the subscriber set, the set of
//! peers with an outstanding invitation from us, and the replicated resource
//! dictionary. The state store is plain data — all mutation policy (who may
//! change what, and when) lives in `huddle-protocol`.

pub mod error;
pub mod invitation;
pub mod peer;
pub mod store;

pub use error::{Error, Result};
pub use invitation::Invitation;
pub use peer::{Peer, MAX_ADDRESS_LEN};
pub use store::NetworkState;
