//! System endpoints: health check and stage catalog.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::Stage;
use crate::domain::brew::BOIL_TARGET_TEMP_C;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    trackers: usize,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, mounted tracker count and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let trackers = state.brew_service.registry().len().await;
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            trackers,
        }),
    )
}

/// Brewing stage info.
#[derive(Debug, Serialize, ToSchema)]
pub struct StageInfo {
    stage: Stage,
    label: &'static str,
    target_temp_source: &'static str,
    fixed_target_temp_c: Option<f64>,
    duration_source: &'static str,
}

/// `GET /config/stages`: List brewing stages.
#[utoipa::path(
    get,
    path = "/config/stages",
    tag = "System",
    summary = "List brewing stages",
    description = "Returns the stages a tracker renders, in brewing order, and where their targets come from.",
    responses(
        (status = 200, description = "Stage catalog", body = Vec<StageInfo>),
    )
)]
pub async fn stages_handler() -> impl IntoResponse {
    let stages: Vec<StageInfo> = Stage::ALL
        .iter()
        .map(|&stage| match stage {
            Stage::Mash => StageInfo {
                stage,
                label: stage.label(),
                target_temp_source: "recipe mashTempC",
                fixed_target_temp_c: None,
                duration_source: "recipe mashTimeMin",
            },
            Stage::Boil => StageInfo {
                stage,
                label: stage.label(),
                target_temp_source: "fixed",
                fixed_target_temp_c: Some(BOIL_TARGET_TEMP_C),
                duration_source: "recipe boilTimeMin",
            },
        })
        .collect();
    (StatusCode::OK, Json(stages))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/stages", get(stages_handler))
}
