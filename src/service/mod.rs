//! Service layer: business logic orchestration.
//!
//! [`BrewService`] coordinates the tracker registry and the brewing
//! backend, and emits events through the [`super::domain::EventBus`].

pub mod brew_service;

pub use brew_service::BrewService;
