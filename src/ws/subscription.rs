//! Per-connection subscription manager.
//!
//! Tracks which brews a WebSocket client is subscribed to and
//! provides server-side event filtering.

use std::collections::HashSet;

use super::messages::WILDCARD;
use crate::domain::BrewId;

/// Manages the set of brew subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed brews. If `subscribe_all` is true, this set is ignored.
    brew_ids: HashSet<BrewId>,
    /// Whether the client subscribes to all brews (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds brews to the subscription set. `"*"` enables the wildcard.
    /// Returns the explicit ids that were added.
    pub fn subscribe(&mut self, ids: &[BrewId]) -> Vec<BrewId> {
        let mut added = Vec::new();
        for id in ids {
            if id.as_str() == WILDCARD {
                self.subscribe_all = true;
            } else if !id.is_blank() {
                self.brew_ids.insert(id.clone());
                added.push(id.clone());
            }
        }
        added
    }

    /// Removes brews from the subscription set. `"*"` clears the wildcard.
    pub fn unsubscribe(&mut self, ids: &[BrewId]) {
        for id in ids {
            if id.as_str() == WILDCARD {
                self.subscribe_all = false;
            } else {
                self.brew_ids.remove(id);
            }
        }
    }

    /// Returns `true` if the given brew matches the subscription filter.
    #[must_use]
    pub fn matches(&self, brew_id: &BrewId) -> bool {
        self.subscribe_all || self.brew_ids.contains(brew_id)
    }

    /// Returns the number of explicitly subscribed brews.
    #[must_use]
    pub fn count(&self) -> usize {
        self.brew_ids.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(&BrewId::new("1")));
    }

    #[test]
    fn subscribe_specific_brew() {
        let mut mgr = SubscriptionManager::new();
        let added = mgr.subscribe(&[BrewId::new("1")]);
        assert_eq!(added, vec![BrewId::new("1")]);
        assert!(mgr.matches(&BrewId::new("1")));
        assert!(!mgr.matches(&BrewId::new("2")));
    }

    #[test]
    fn wildcard_matches_everything() {
        let mut mgr = SubscriptionManager::new();
        let added = mgr.subscribe(&[BrewId::new(WILDCARD)]);
        assert!(added.is_empty());
        assert!(mgr.is_subscribed_all());
        assert!(mgr.matches(&BrewId::new("anything")));

        mgr.unsubscribe(&[BrewId::new(WILDCARD)]);
        assert!(!mgr.matches(&BrewId::new("anything")));
    }

    #[test]
    fn unsubscribe_removes_brew() {
        let mut mgr = SubscriptionManager::new();
        let id = BrewId::new("7");
        mgr.subscribe(std::slice::from_ref(&id));
        assert!(mgr.matches(&id));
        mgr.unsubscribe(std::slice::from_ref(&id));
        assert!(!mgr.matches(&id));
    }

    #[test]
    fn count_ignores_blanks_and_duplicates() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[BrewId::new("1"), BrewId::new("1"), BrewId::new(" ")]);
        assert_eq!(mgr.count(), 1);
    }
}
