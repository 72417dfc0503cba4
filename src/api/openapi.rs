//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::{
    ActionResponse, MountTrackerRequest, MountTrackerResponse, PaginationMeta,
    TrackerListResponse,
};
use super::handlers::{brews, system, trackers};
use crate::client::{StartBrewRequest, StartBrewResponse};
use crate::domain::{BrewId, BrewStatus, RecipeSnapshot, Stage, TemperatureSample};
use crate::error::{ErrorBody, ErrorResponse};
use crate::tracker::TrackerSummary;
use crate::tracker::view::{EndedSummary, PendingHint, StageView, TemperatureReading, TrackerView};

/// Generated OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "brew-watch",
        description = "Live brew-session tracker for the brewing backend"
    ),
    paths(
        trackers::mount_tracker,
        trackers::list_trackers,
        trackers::get_tracker,
        trackers::delete_tracker,
        trackers::retry_tracker,
        brews::start_brew,
        brews::end_brew,
        brews::test_brewery_connection,
        system::health_handler,
        system::stages_handler,
    ),
    components(schemas(
        ActionResponse,
        BrewId,
        BrewStatus,
        EndedSummary,
        ErrorBody,
        ErrorResponse,
        MountTrackerRequest,
        MountTrackerResponse,
        PaginationMeta,
        PendingHint,
        RecipeSnapshot,
        Stage,
        StageView,
        StartBrewRequest,
        StartBrewResponse,
        TemperatureReading,
        TemperatureSample,
        TrackerListResponse,
        TrackerSummary,
        TrackerView,
    )),
    tags(
        (name = "Trackers", description = "Live brew trackers"),
        (name = "Brews", description = "Brew actions forwarded to the backend"),
        (name = "System", description = "Health and catalog"),
    )
)]
pub struct ApiDoc;
