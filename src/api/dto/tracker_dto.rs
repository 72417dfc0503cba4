//! Tracker and brew-action request/response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::PaginationMeta;
use crate::domain::BrewId;
use crate::tracker::TrackerSummary;

/// Request body for `POST /trackers`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MountTrackerRequest {
    /// Brew to track. Accepts a string or a number.
    pub brew_id: BrewId,
}

/// Response body for `POST /trackers`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MountTrackerResponse {
    /// Tracked brew.
    pub brew_id: BrewId,
    /// Mount time.
    pub mounted_at: DateTime<Utc>,
    /// Polling cadence in milliseconds.
    pub poll_interval_ms: u64,
    /// Display clock cadence in milliseconds.
    pub clock_tick_ms: u64,
}

/// Paginated tracker list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrackerListResponse {
    /// Trackers on this page.
    pub data: Vec<TrackerSummary>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Query parameters for `POST /brews/start`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StartBrewParams {
    /// Mount a tracker for the new brew. Defaults to `true`.
    #[serde(default)]
    pub watch: Option<bool>,
}

/// Response body for brew actions that only acknowledge.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Brew or brewery the action targeted.
    pub target: String,
    /// Short outcome description.
    pub status: String,
    /// Completion time.
    pub timestamp: DateTime<Utc>,
}
