//! Brew service: orchestrates trackers and backend brew actions.

use std::sync::Arc;

use chrono::Utc;

use crate::client::{BrewApi, StartBrewRequest, StartBrewResponse};
use crate::domain::{BrewId, EventBus, TrackerEvent};
use crate::error::WatchError;
use crate::tracker::{TrackerRegistry, TrackerSummary, TrackerView};

/// Orchestration layer for tracker and brew operations.
///
/// Owns references to the [`TrackerRegistry`] for live state, the
/// [`BrewApi`] for backend actions and the [`EventBus`] for event emission.
#[derive(Debug, Clone)]
pub struct BrewService {
    registry: Arc<TrackerRegistry>,
    api: Arc<dyn BrewApi>,
    event_bus: EventBus,
}

impl BrewService {
    /// Creates a new `BrewService`.
    #[must_use]
    pub fn new(registry: Arc<TrackerRegistry>, api: Arc<dyn BrewApi>, event_bus: EventBus) -> Self {
        Self {
            registry,
            api,
            event_bus,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`TrackerRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<TrackerRegistry> {
        &self.registry
    }

    /// Starts tracking a brew.
    ///
    /// # Errors
    ///
    /// Returns a [`WatchError`] if the id is blank or already tracked.
    pub async fn mount_tracker(&self, brew_id: BrewId) -> Result<TrackerSummary, WatchError> {
        let tracker = self.registry.mount(brew_id).await?;
        tracing::info!(brew_id = %tracker.brew_id(), "tracker mounted");
        Ok(TrackerSummary::from(tracker.as_ref()))
    }

    /// Stops tracking a brew.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::TrackerNotFound`] if the brew is not tracked.
    pub async fn unmount_tracker(&self, brew_id: &BrewId) -> Result<(), WatchError> {
        self.registry.unmount(brew_id).await?;
        tracing::info!(%brew_id, "tracker unmounted");
        Ok(())
    }

    /// Summaries of all mounted trackers.
    pub async fn list_trackers(&self) -> Vec<TrackerSummary> {
        self.registry.list().await
    }

    /// Renders the current view of a tracked brew.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::TrackerNotFound`] if the brew is not tracked.
    pub async fn view(&self, brew_id: &BrewId) -> Result<TrackerView, WatchError> {
        let tracker = self.registry.get(brew_id).await?;
        Ok(TrackerView::render(&tracker.snapshot()))
    }

    /// Re-runs the initial fetch of a tracker stuck on a blocking error; a
    /// healthy tracker is refreshed in the background instead.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::TrackerNotFound`] if the brew is not tracked or
    /// its tracker has already been deactivated.
    pub async fn retry(&self, brew_id: &BrewId) -> Result<TrackerView, WatchError> {
        let tracker = self.registry.get(brew_id).await?;
        if !tracker.retry_initial() {
            return Err(WatchError::TrackerNotFound(brew_id.clone()));
        }
        Ok(TrackerView::render(&tracker.snapshot()))
    }

    /// Asks the backend to end a brew, then refreshes its tracker (if any)
    /// so the status change shows up without waiting for the next poll.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Upstream`] if the backend rejects the request.
    pub async fn end_brew(&self, brew_id: &BrewId) -> Result<(), WatchError> {
        self.api.end_brew(brew_id).await?;
        tracing::info!(%brew_id, "brew end requested");

        let _ = self.event_bus.publish(TrackerEvent::BrewEndRequested {
            brew_id: brew_id.clone(),
            timestamp: Utc::now(),
        });
        if let Some(tracker) = self.registry.find(brew_id).await {
            let _ = tracker.refresh();
        }
        Ok(())
    }

    /// Starts a brew on the backend and optionally begins tracking it.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidRequest`] for missing identifiers and
    /// [`WatchError::Upstream`] if the backend rejects the request.
    pub async fn start_brew(
        &self,
        request: &StartBrewRequest,
        watch: bool,
    ) -> Result<StartBrewResponse, WatchError> {
        for (field, value) in [
            ("recipe_id", &request.recipe_id),
            ("brewery_id", &request.brewery_id),
            ("user_id", &request.user_id),
            ("secret_key", &request.secret_key),
        ] {
            if value.trim().is_empty() {
                return Err(WatchError::InvalidRequest(format!("{field} must not be empty")));
            }
        }

        let response = self.api.start_brew(request).await?;
        tracing::info!(brew_id = %response.id, recipe_id = %request.recipe_id, "brew started");

        if watch {
            match self.registry.mount(response.id.clone()).await {
                Ok(_) | Err(WatchError::TrackerExists(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(response)
    }

    /// Checks that a brewery's controller is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidRequest`] for a blank id and
    /// [`WatchError::Upstream`] when the controller is unreachable.
    pub async fn test_brewery_connection(&self, brewery_id: &str) -> Result<(), WatchError> {
        if brewery_id.trim().is_empty() {
            return Err(WatchError::InvalidRequest(
                "brewery_id must not be empty".to_string(),
            ));
        }
        self.api.test_brewery_connection(brewery_id).await?;
        Ok(())
    }

    /// Deactivates every tracker.
    pub async fn shutdown(&self) -> usize {
        self.registry.shutdown().await
    }
}
