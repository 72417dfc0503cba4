//! Mounted trackers keyed by brew.
//!
//! [`TrackerRegistry`] holds at most one live [`BrewSessionTracker`] per
//! [`BrewId`]. Mounting activates a tracker; unmounting deactivates it and
//! removes it. A brew id is constant for a tracker's lifetime, so watching a
//! different brew always means mounting a fresh tracker.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;

use super::clock::Clock;
use super::session_tracker::{BrewSessionTracker, TrackerOptions};
use crate::client::BrewApi;
use crate::domain::{BrewId, BrewStatus, EventBus, TrackerEvent};
use crate::error::WatchError;

/// Lightweight summary of a mounted tracker for list endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrackerSummary {
    /// Tracked brew.
    pub brew_id: BrewId,
    /// Recipe name, once known.
    pub recipe_name: Option<String>,
    /// Overall session status, once known.
    pub status: Option<BrewStatus>,
    /// `true` until the initial fetch settles.
    pub loading_initial: bool,
    /// `true` when the initial fetch failed.
    pub has_error: bool,
    /// Whether the temperature log is being polled.
    pub temperature_polling: bool,
    /// When a session payload was last applied.
    pub last_session_at: Option<DateTime<Utc>>,
}

impl From<&BrewSessionTracker> for TrackerSummary {
    fn from(tracker: &BrewSessionTracker) -> Self {
        let snap = tracker.snapshot();
        Self {
            brew_id: snap.brew_id,
            recipe_name: snap
                .session
                .as_ref()
                .and_then(|s| s.recipe_snapshot.name.clone()),
            status: snap.session.as_ref().map(|s| s.status),
            loading_initial: snap.loading_initial,
            has_error: snap.error.is_some(),
            temperature_polling: snap.temperature_polling,
            last_session_at: snap.last_session_at,
        }
    }
}

/// Central store of mounted trackers.
#[derive(Debug)]
pub struct TrackerRegistry {
    trackers: RwLock<HashMap<BrewId, Arc<BrewSessionTracker>>>,
    api: Arc<dyn BrewApi>,
    clock: Arc<dyn Clock>,
    events: EventBus,
    options: TrackerOptions,
}

impl TrackerRegistry {
    /// Creates an empty registry whose trackers share `api`, `clock` and
    /// `events`.
    #[must_use]
    pub fn new(
        api: Arc<dyn BrewApi>,
        clock: Arc<dyn Clock>,
        events: EventBus,
        options: TrackerOptions,
    ) -> Self {
        Self {
            trackers: RwLock::new(HashMap::new()),
            api,
            clock,
            events,
            options,
        }
    }

    /// Timer cadences applied to new trackers.
    #[must_use]
    pub const fn options(&self) -> TrackerOptions {
        self.options
    }

    /// Activates a tracker for `brew_id`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidRequest`] for a blank id and
    /// [`WatchError::TrackerExists`] if the brew is already tracked.
    pub async fn mount(&self, brew_id: BrewId) -> Result<Arc<BrewSessionTracker>, WatchError> {
        if brew_id.is_blank() {
            return Err(WatchError::InvalidRequest("brew_id must not be empty".to_string()));
        }
        let mut map = self.trackers.write().await;
        if map.contains_key(&brew_id) {
            return Err(WatchError::TrackerExists(brew_id));
        }

        let tracker = Arc::new(BrewSessionTracker::activate(
            brew_id.clone(),
            Arc::clone(&self.api),
            Arc::clone(&self.clock),
            self.events.clone(),
            self.options,
        ));
        map.insert(brew_id.clone(), Arc::clone(&tracker));
        drop(map);

        let _ = self.events.publish(TrackerEvent::TrackerMounted {
            brew_id,
            timestamp: Utc::now(),
        });
        Ok(tracker)
    }

    /// Returns the tracker for `brew_id`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::TrackerNotFound`] if the brew is not tracked.
    pub async fn get(&self, brew_id: &BrewId) -> Result<Arc<BrewSessionTracker>, WatchError> {
        self.find(brew_id)
            .await
            .ok_or_else(|| WatchError::TrackerNotFound(brew_id.clone()))
    }

    /// Returns the tracker for `brew_id`, if mounted.
    pub async fn find(&self, brew_id: &BrewId) -> Option<Arc<BrewSessionTracker>> {
        self.trackers.read().await.get(brew_id).cloned()
    }

    /// Deactivates and removes the tracker for `brew_id`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::TrackerNotFound`] if the brew is not tracked.
    pub async fn unmount(&self, brew_id: &BrewId) -> Result<(), WatchError> {
        let tracker = self
            .trackers
            .write()
            .await
            .remove(brew_id)
            .ok_or_else(|| WatchError::TrackerNotFound(brew_id.clone()))?;
        tracker.deactivate();

        let _ = self.events.publish(TrackerEvent::TrackerUnmounted {
            brew_id: brew_id.clone(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Summaries of all mounted trackers, ordered by brew id.
    pub async fn list(&self) -> Vec<TrackerSummary> {
        let map = self.trackers.read().await;
        let mut summaries: Vec<TrackerSummary> = map
            .values()
            .map(|tracker| TrackerSummary::from(tracker.as_ref()))
            .collect();
        summaries.sort_by(|a, b| a.brew_id.cmp(&b.brew_id));
        summaries
    }

    /// Returns the number of mounted trackers.
    pub async fn len(&self) -> usize {
        self.trackers.read().await.len()
    }

    /// Returns `true` if no tracker is mounted.
    pub async fn is_empty(&self) -> bool {
        self.trackers.read().await.is_empty()
    }

    /// Deactivates and removes every tracker. Returns how many were stopped.
    pub async fn shutdown(&self) -> usize {
        let drained: Vec<_> = self.trackers.write().await.drain().collect();
        for (_, tracker) in &drained {
            tracker.deactivate();
        }
        tracing::info!(count = drained.len(), "all trackers deactivated");
        drained.len()
    }
}
