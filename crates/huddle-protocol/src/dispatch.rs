//! Inbound message dispatch.
//!
//! One call per inbound `(sender, payload)` pair: decode, check the
//! per-kind field-count and authorization rules, then apply the effect.
//! A message either applies completely or not at all — the first violation
//! aborts with a [`DropReason`] and no state has been touched by then,
//! except for AcceptInvitation whose checks all precede its effects.

use tracing::{trace, warn};

use huddle_state::{Invitation, NetworkState, Peer};
use huddle_wire::{codec, RequestKind};

use crate::commands;
use crate::diagnostics::DropReason;
use crate::transport::Transport;

/// What a successful dispatch produced.
#[derive(Debug)]
pub(crate) enum Inbound {
    /// The message was fully applied.
    Handled,
    /// The message was a valid Invite; the caller decides whether to hand
    /// the invitation to a join handler or auto-accept it.
    Invitation(Invitation),
}

pub(crate) fn dispatch<T: Transport>(
    state: &mut NetworkState,
    transport: &T,
    local: &Peer,
    sender: &Peer,
    payload: &str,
) -> std::result::Result<Inbound, DropReason> {
    let decoded = codec::decode(payload)?;
    let kind = decoded.kind;
    let fields = decoded.fields;
    trace!(%sender, %kind, fields = fields.len(), "inbound message");

    match kind {
        RequestKind::Invite => {
            expect_no_fields(kind, &fields)?;
            Ok(Inbound::Invitation(Invitation::new(sender.clone())))
        }

        RequestKind::AcceptInvitation => {
            expect_no_fields(kind, &fields)?;
            if !state.is_invited(sender) {
                return Err(DropReason::NotInvited);
            }
            state.remove_invited(sender);
            bootstrap(state, transport, sender);
            // flood the new member to everyone who was already in,
            // then record the membership locally
            commands::broadcast(
                state,
                transport,
                &codec::encode(RequestKind::AddPeer, &[sender.as_str()]),
            );
            state.add_subscriber(sender.clone());
            Ok(Inbound::Handled)
        }

        RequestKind::AddPeer => {
            require_subscriber(state, sender, kind)?;
            if fields.is_empty() {
                return Err(DropReason::MissingFields { kind });
            }
            // parse everything before applying anything
            let mut peers = Vec::with_capacity(fields.len());
            for field in &fields {
                match Peer::parse(field) {
                    Ok(peer) => peers.push(peer),
                    Err(source) => {
                        return Err(DropReason::InvalidPeer {
                            field: field.clone(),
                            source,
                        })
                    }
                }
            }
            for peer in peers {
                // our own membership stays implicit
                if &peer != local {
                    state.add_subscriber(peer);
                }
            }
            Ok(Inbound::Handled)
        }

        RequestKind::QuitNetwork => {
            expect_no_fields(kind, &fields)?;
            if !state.remove_subscriber(sender) {
                return Err(DropReason::NotSubscriber { kind });
            }
            Ok(Inbound::Handled)
        }

        RequestKind::AddResource => {
            require_subscriber(state, sender, kind)?;
            if fields.is_empty() {
                return Err(DropReason::MissingFields { kind });
            }
            if fields.len() % 2 != 0 {
                return Err(DropReason::UnpairedKey);
            }
            // in wire order: a duplicate key within one message resolves to
            // its last pair
            for pair in fields.chunks_exact(2) {
                state.set_resource(pair[0].clone(), pair[1].clone());
            }
            Ok(Inbound::Handled)
        }

        RequestKind::RemoveResource => {
            require_subscriber(state, sender, kind)?;
            if fields.is_empty() {
                return Err(DropReason::MissingFields { kind });
            }
            for key in &fields {
                state.remove_resource(key);
            }
            Ok(Inbound::Handled)
        }
    }
}

/// Bring a freshly accepted peer up to date: our subscriber list, then the
/// full dictionary. Both replies go only to that peer; failures are logged,
/// never reported back (there is no channel to report them on).
fn bootstrap<T: Transport>(state: &NetworkState, transport: &T, joiner: &Peer) {
    let subscribers = state.subscribers();
    let addresses: Vec<&str> = subscribers.iter().map(Peer::as_str).collect();
    // sent even with zero subscribers; the joiner drops a field-less
    // AddPeer, which is harmless since there is nobody to learn about
    send_logged(
        transport,
        joiner,
        &codec::encode(RequestKind::AddPeer, &addresses),
    );

    let pairs = state.resource_pairs();
    if !pairs.is_empty() {
        let mut fields = Vec::with_capacity(pairs.len() * 2);
        for (key, value) in &pairs {
            fields.push(key.as_str());
            fields.push(value.as_str());
        }
        send_logged(
            transport,
            joiner,
            &codec::encode(RequestKind::AddResource, &fields),
        );
    }
}

fn send_logged<T: Transport>(transport: &T, peer: &Peer, payload: &str) {
    if let Err(err) = transport.send(peer, payload) {
        warn!(%err, "bootstrap send failed");
    }
}

fn expect_no_fields(kind: RequestKind, fields: &[String]) -> Result<(), DropReason> {
    if fields.is_empty() {
        Ok(())
    } else {
        Err(DropReason::UnexpectedFields {
            kind,
            count: fields.len(),
        })
    }
}

fn require_subscriber(
    state: &NetworkState,
    sender: &Peer,
    kind: RequestKind,
) -> Result<(), DropReason> {
    if state.is_subscriber(sender) {
        Ok(())
    } else {
        Err(DropReason::NotSubscriber { kind })
    }
}
