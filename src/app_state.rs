//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::BrewService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Brew service for all tracker and backend operations.
    pub brew_service: Arc<BrewService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}
