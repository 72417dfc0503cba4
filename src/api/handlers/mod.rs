//! REST endpoint handlers organized by resource.

pub mod brews;
pub mod system;
pub mod trackers;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(trackers::routes())
        .merge(brews::routes())
}
