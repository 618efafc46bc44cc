//! The local replica of shared network state.

use std::collections::{BTreeMap, BTreeSet};

use crate::peer::Peer;

/// One node's view of the network it belongs to.
///
/// Holds the subscriber set (excluding the local peer, whose membership is
/// implicit), the set of peers we have invited and who have not yet answered,
/// and the replicated resource dictionary. Backed by ordered collections so
/// every snapshot enumerates deterministically.
///
/// All mutating operations are total: they either fully apply or change
/// nothing, and they report whether the state actually changed so callers
/// can react (e.g. "was already absent").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkState {
    subscribers: BTreeSet<Peer>,
    invited: BTreeSet<Peer>,
    resources: BTreeMap<String, String>,
}

impl NetworkState {
    /// Create an empty state: no network joined.
    pub fn new() -> Self {
        Self::default()
    }

    // --- subscribers ---

    /// Add a subscriber. Returns `false` if it was already present.
    pub fn add_subscriber(&mut self, peer: Peer) -> bool {
        self.subscribers.insert(peer)
    }

    /// Remove a subscriber. Returns `false` if it was not present.
    pub fn remove_subscriber(&mut self, peer: &Peer) -> bool {
        self.subscribers.remove(peer)
    }

    /// Whether the given peer is currently a member of our network view.
    pub fn is_subscriber(&self, peer: &Peer) -> bool {
        self.subscribers.contains(peer)
    }

    /// Snapshot of the subscriber set, sorted by address.
    pub fn subscribers(&self) -> Vec<Peer> {
        self.subscribers.iter().cloned().collect()
    }

    /// Number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // --- invited peers ---

    /// Record an outstanding invitation to `peer`. Re-inviting an already
    /// invited peer keeps a single outstanding entry; returns `false` then.
    pub fn add_invited(&mut self, peer: Peer) -> bool {
        self.invited.insert(peer)
    }

    /// Clear the outstanding invitation for `peer`. Returns `false` if there
    /// was none.
    pub fn remove_invited(&mut self, peer: &Peer) -> bool {
        self.invited.remove(peer)
    }

    /// Whether we have an outstanding invitation to `peer`.
    pub fn is_invited(&self, peer: &Peer) -> bool {
        self.invited.contains(peer)
    }

    /// Snapshot of the invited set, sorted by address.
    pub fn invited(&self) -> Vec<Peer> {
        self.invited.iter().cloned().collect()
    }

    // --- resource dictionary ---

    /// Set `key` to `value`, returning the previous value if any.
    pub fn set_resource(&mut self, key: String, value: String) -> Option<String> {
        self.resources.insert(key, value)
    }

    /// Look up the value for `key`.
    pub fn get_resource(&self, key: &str) -> Option<&str> {
        self.resources.get(key).map(String::as_str)
    }

    /// Remove `key`, returning its value if it was present. Removing an
    /// absent key is a no-op.
    pub fn remove_resource(&mut self, key: &str) -> Option<String> {
        self.resources.remove(key)
    }

    /// Snapshot of all key/value pairs, sorted by key. Used for bootstrap.
    pub fn resource_pairs(&self) -> Vec<(String, String)> {
        self.resources
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Number of dictionary entries.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    // --- lifecycle ---

    /// Whether there is no network state at all.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty() && self.invited.is_empty() && self.resources.is_empty()
    }

    /// Reset to "no network joined": clears subscribers, invited peers, and
    /// the dictionary together.
    pub fn clear(&mut self) {
        self.subscribers.clear();
        self.invited.clear();
        self.resources.clear();
    }
}
