//! Domain events reflecting tracker read-model changes.
//!
//! Every applied change publishes a [`TrackerEvent`] through the
//! [`super::EventBus`]. Events are forwarded to WebSocket subscribers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{BrewId, BrewStatus};

/// Domain event emitted whenever a tracker's read model changes.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum TrackerEvent {
    /// A tracker was mounted for a brew.
    TrackerMounted {
        /// Tracked brew.
        brew_id: BrewId,
        /// Mount time.
        timestamp: DateTime<Utc>,
    },

    /// A tracker was deactivated and removed.
    TrackerUnmounted {
        /// Tracked brew.
        brew_id: BrewId,
        /// Unmount time.
        timestamp: DateTime<Utc>,
    },

    /// A fresh session payload was applied.
    SessionUpdated {
        /// Tracked brew.
        brew_id: BrewId,
        /// Overall status.
        status: BrewStatus,
        /// Mash stage status.
        mash_status: BrewStatus,
        /// Boil stage status.
        boil_status: BrewStatus,
        /// Apply time.
        timestamp: DateTime<Utc>,
    },

    /// The initial session fetch failed; the error is user-visible.
    InitialLoadFailed {
        /// Tracked brew.
        brew_id: BrewId,
        /// Failure message.
        message: String,
        /// Failure time.
        timestamp: DateTime<Utc>,
    },

    /// Temperature samples were replaced.
    TemperatureUpdated {
        /// Tracked brew.
        brew_id: BrewId,
        /// Number of samples in the new log.
        sample_count: usize,
        /// Most recent reading, if any.
        latest_celsius: Option<f64>,
        /// Apply time.
        timestamp: DateTime<Utc>,
    },

    /// The temperature-log poll was started or stopped.
    TemperaturePolling {
        /// Tracked brew.
        brew_id: BrewId,
        /// Whether the poll is now running.
        active: bool,
        /// Change time.
        timestamp: DateTime<Utc>,
    },

    /// The display clock advanced; countdowns should be re-rendered.
    ClockTicked {
        /// Tracked brew.
        brew_id: BrewId,
        /// New `now` reference.
        now: DateTime<Utc>,
    },

    /// The backend accepted a request to end the brew.
    BrewEndRequested {
        /// Brew being ended.
        brew_id: BrewId,
        /// Request time.
        timestamp: DateTime<Utc>,
    },
}

impl TrackerEvent {
    /// Returns the brew this event belongs to.
    #[must_use]
    pub const fn brew_id(&self) -> &BrewId {
        match self {
            Self::TrackerMounted { brew_id, .. }
            | Self::TrackerUnmounted { brew_id, .. }
            | Self::SessionUpdated { brew_id, .. }
            | Self::InitialLoadFailed { brew_id, .. }
            | Self::TemperatureUpdated { brew_id, .. }
            | Self::TemperaturePolling { brew_id, .. }
            | Self::ClockTicked { brew_id, .. }
            | Self::BrewEndRequested { brew_id, .. } => brew_id,
        }
    }

    /// Event type discriminator as serialized on the wire.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::TrackerMounted { .. } => "tracker_mounted",
            Self::TrackerUnmounted { .. } => "tracker_unmounted",
            Self::SessionUpdated { .. } => "session_updated",
            Self::InitialLoadFailed { .. } => "initial_load_failed",
            Self::TemperatureUpdated { .. } => "temperature_updated",
            Self::TemperaturePolling { .. } => "temperature_polling",
            Self::ClockTicked { .. } => "clock_ticked",
            Self::BrewEndRequested { .. } => "brew_end_requested",
        }
    }
}
