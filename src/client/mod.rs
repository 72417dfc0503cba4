//! Client layer: the brewing backend as seen by the tracker.
//!
//! [`BrewApi`] is the seam between timer-driven acquisition and the
//! network. [`HttpBrewApi`] is the production implementation; tests swap in
//! scripted backends.

pub mod dto;
pub mod error;
pub mod http;

use async_trait::async_trait;

pub use dto::{EndBrewRequest, StartBrewRequest, StartBrewResponse};
pub use error::ClientError;
pub use http::HttpBrewApi;

use crate::domain::{BrewId, BrewSession, TemperatureSample};

/// Operations the brewing backend exposes to this service.
#[async_trait]
pub trait BrewApi: Send + Sync + std::fmt::Debug {
    /// `GET /brews/watch/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, non-2xx status or an
    /// undecodable body.
    async fn fetch_session(&self, brew_id: &BrewId) -> Result<BrewSession, ClientError>;

    /// `GET /brews/temperature_logs?brew_id={id}`, oldest sample first.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, non-2xx status or an
    /// undecodable body.
    async fn fetch_temperature_logs(
        &self,
        brew_id: &BrewId,
    ) -> Result<Vec<TemperatureSample>, ClientError>;

    /// `POST /brews/end` with `{ brew_id }`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the backend rejects or never receives
    /// the request.
    async fn end_brew(&self, brew_id: &BrewId) -> Result<(), ClientError>;

    /// `POST /brews/start`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the backend rejects the request or its
    /// response carries no id.
    async fn start_brew(&self, request: &StartBrewRequest)
    -> Result<StartBrewResponse, ClientError>;

    /// `GET /brewery/test-connection?brewery_id={id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the brewery's controller is unreachable.
    async fn test_brewery_connection(&self, brewery_id: &str) -> Result<(), ClientError>;
}
