//! Tracker handlers: mount, list, view, unmount, retry.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{
    MountTrackerRequest, MountTrackerResponse, PaginationParams, TrackerListResponse,
};
use crate::app_state::AppState;
use crate::domain::BrewId;
use crate::error::{ErrorResponse, WatchError};
use crate::tracker::TrackerView;

/// `POST /trackers`: Start tracking a brew.
///
/// # Errors
///
/// Returns [`WatchError::InvalidRequest`] for a blank id and
/// [`WatchError::TrackerExists`] if the brew is already tracked.
#[utoipa::path(
    post,
    path = "/api/v1/trackers",
    tag = "Trackers",
    summary = "Mount a tracker",
    description = "Starts polling the brew session and, while the brew is running, its temperature log.",
    request_body = MountTrackerRequest,
    responses(
        (status = 201, description = "Tracker mounted", body = MountTrackerResponse),
        (status = 400, description = "Blank brew id", body = ErrorResponse),
        (status = 409, description = "Brew already tracked", body = ErrorResponse),
    )
)]
pub async fn mount_tracker(
    State(state): State<AppState>,
    Json(req): Json<MountTrackerRequest>,
) -> Result<impl IntoResponse, WatchError> {
    let summary = state.brew_service.mount_tracker(req.brew_id).await?;
    let options = state.brew_service.registry().options();

    let response = MountTrackerResponse {
        brew_id: summary.brew_id,
        mounted_at: Utc::now(),
        poll_interval_ms: options.poll_interval_ms(),
        clock_tick_ms: options.clock_tick_ms(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /trackers`: List mounted trackers.
#[utoipa::path(
    get,
    path = "/api/v1/trackers",
    tag = "Trackers",
    summary = "List trackers",
    description = "Returns a paginated list of mounted trackers ordered by brew id.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated tracker list", body = TrackerListResponse),
    )
)]
pub async fn list_trackers(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> impl IntoResponse {
    let summaries = state.brew_service.list_trackers().await;
    let (data, pagination) = params.paginate(summaries);
    Json(TrackerListResponse { data, pagination })
}

/// `GET /trackers/{brew_id}`: Current view of a tracked brew.
///
/// # Errors
///
/// Returns [`WatchError::TrackerNotFound`] if the brew is not tracked.
#[utoipa::path(
    get,
    path = "/api/v1/trackers/{brew_id}",
    tag = "Trackers",
    summary = "Get tracker view",
    description = "Renders the brewing timeline with elapsed and remaining times at the tracker's display clock.",
    params(
        ("brew_id" = String, Path, description = "Brew id"),
    ),
    responses(
        (status = 200, description = "Tracker view", body = TrackerView),
        (status = 404, description = "Brew not tracked", body = ErrorResponse),
    )
)]
pub async fn get_tracker(
    State(state): State<AppState>,
    Path(brew_id): Path<String>,
) -> Result<impl IntoResponse, WatchError> {
    let view = state.brew_service.view(&BrewId::new(brew_id)).await?;
    Ok(Json(view))
}

/// `DELETE /trackers/{brew_id}`: Stop tracking a brew.
///
/// # Errors
///
/// Returns [`WatchError::TrackerNotFound`] if the brew is not tracked.
#[utoipa::path(
    delete,
    path = "/api/v1/trackers/{brew_id}",
    tag = "Trackers",
    summary = "Unmount a tracker",
    description = "Cancels every timer of the tracker. Responses still in flight are discarded.",
    params(
        ("brew_id" = String, Path, description = "Brew id"),
    ),
    responses(
        (status = 204, description = "Tracker unmounted"),
        (status = 404, description = "Brew not tracked", body = ErrorResponse),
    )
)]
pub async fn delete_tracker(
    State(state): State<AppState>,
    Path(brew_id): Path<String>,
) -> Result<impl IntoResponse, WatchError> {
    state
        .brew_service
        .unmount_tracker(&BrewId::new(brew_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /trackers/{brew_id}/retry`: Re-run a failed initial load.
///
/// # Errors
///
/// Returns [`WatchError::TrackerNotFound`] if the brew is not tracked.
#[utoipa::path(
    post,
    path = "/api/v1/trackers/{brew_id}/retry",
    tag = "Trackers",
    summary = "Retry the initial load",
    description = "With a blocking error, shows the loading state again and re-runs the initial fetch; a success clears the error. A healthy tracker is refreshed in the background and keeps its last good state on failure.",
    params(
        ("brew_id" = String, Path, description = "Brew id"),
    ),
    responses(
        (status = 202, description = "Retry scheduled", body = TrackerView),
        (status = 404, description = "Brew not tracked", body = ErrorResponse),
    )
)]
pub async fn retry_tracker(
    State(state): State<AppState>,
    Path(brew_id): Path<String>,
) -> Result<impl IntoResponse, WatchError> {
    let view = state.brew_service.retry(&BrewId::new(brew_id)).await?;
    Ok((StatusCode::ACCEPTED, Json(view)))
}

/// Tracker routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trackers", post(mount_tracker).get(list_trackers))
        .route(
            "/trackers/{brew_id}",
            get(get_tracker).delete(delete_tracker),
        )
        .route("/trackers/{brew_id}/retry", post(retry_tracker))
}
