//! Brew action handlers: start, end, brewery connection test.
//!
//! These forward to the brewing backend. Ending a brew also refreshes its
//! tracker so the new status does not wait for the next poll.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{ActionResponse, StartBrewParams};
use crate::app_state::AppState;
use crate::client::{StartBrewRequest, StartBrewResponse};
use crate::domain::BrewId;
use crate::error::{ErrorResponse, WatchError};

/// `POST /brews/start`: Start a brew on the backend.
///
/// # Errors
///
/// Returns [`WatchError::InvalidRequest`] for missing identifiers and
/// [`WatchError::Upstream`] if the backend rejects the request.
#[utoipa::path(
    post,
    path = "/api/v1/brews/start",
    tag = "Brews",
    summary = "Start a brew",
    description = "Creates a brew session on the backend. Unless `watch=false`, a tracker is mounted for the new brew.",
    params(StartBrewParams),
    request_body = StartBrewRequest,
    responses(
        (status = 201, description = "Brew started", body = StartBrewResponse),
        (status = 400, description = "Missing identifiers", body = ErrorResponse),
        (status = 502, description = "Backend failure", body = ErrorResponse),
    )
)]
pub async fn start_brew(
    State(state): State<AppState>,
    Query(params): Query<StartBrewParams>,
    Json(req): Json<StartBrewRequest>,
) -> Result<impl IntoResponse, WatchError> {
    let watch = params.watch.unwrap_or(true);
    let response = state.brew_service.start_brew(&req, watch).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /brews/{brew_id}/end`: End a brew.
///
/// # Errors
///
/// Returns [`WatchError::Upstream`] if the backend rejects the request.
#[utoipa::path(
    post,
    path = "/api/v1/brews/{brew_id}/end",
    tag = "Brews",
    summary = "End a brew",
    params(
        ("brew_id" = String, Path, description = "Brew id"),
    ),
    responses(
        (status = 200, description = "Brew end requested", body = ActionResponse),
        (status = 502, description = "Backend failure", body = ErrorResponse),
    )
)]
pub async fn end_brew(
    State(state): State<AppState>,
    Path(brew_id): Path<String>,
) -> Result<impl IntoResponse, WatchError> {
    let brew_id = BrewId::new(brew_id);
    state.brew_service.end_brew(&brew_id).await?;
    Ok(Json(ActionResponse {
        target: brew_id.to_string(),
        status: "ended".to_string(),
        timestamp: Utc::now(),
    }))
}

/// `GET /breweries/{brewery_id}/test-connection`: Probe a brewery controller.
///
/// # Errors
///
/// Returns [`WatchError::Upstream`] when the controller is unreachable.
#[utoipa::path(
    get,
    path = "/api/v1/breweries/{brewery_id}/test-connection",
    tag = "Brews",
    summary = "Test brewery connection",
    params(
        ("brewery_id" = String, Path, description = "Brewery id"),
    ),
    responses(
        (status = 200, description = "Controller reachable", body = ActionResponse),
        (status = 502, description = "Controller unreachable", body = ErrorResponse),
        (status = 504, description = "Controller timed out", body = ErrorResponse),
    )
)]
pub async fn test_brewery_connection(
    State(state): State<AppState>,
    Path(brewery_id): Path<String>,
) -> Result<impl IntoResponse, WatchError> {
    state
        .brew_service
        .test_brewery_connection(&brewery_id)
        .await?;
    Ok(Json(ActionResponse {
        target: brewery_id,
        status: "connected".to_string(),
        timestamp: Utc::now(),
    }))
}

/// Brew action routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/brews/start", post(start_brew))
        .route("/brews/{brew_id}/end", post(end_brew))
        .route(
            "/breweries/{brewery_id}/test-connection",
            get(test_brewery_connection),
        )
}
