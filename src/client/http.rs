//! `reqwest` implementation of [`BrewApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use super::{BrewApi, ClientError, EndBrewRequest, StartBrewRequest, StartBrewResponse};
use crate::domain::{BrewId, BrewSession, TemperatureSample};

/// HTTP client for the brewing backend.
///
/// Bodies are read fully and decoded with `serde_json`, so a payload that
/// does not match the model fails the whole request instead of yielding a
/// partially parsed value.
#[derive(Debug, Clone)]
pub struct HttpBrewApi {
    client: Client,
    base_url: Url,
}

impl HttpBrewApi {
    /// Creates a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] if `base_url` is not an
    /// absolute URL that can carry a path, or if the HTTP client cannot be
    /// built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Wraps an existing `reqwest` client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] if `base_url` is invalid.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidRequest(format!("invalid base url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidRequest(format!(
                "base url cannot carry a path: {base_url}"
            )));
        }
        Ok(Self { client, base_url })
    }

    /// Returns the backend base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::InvalidRequest(format!("base url cannot carry a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl BrewApi for HttpBrewApi {
    async fn fetch_session(&self, brew_id: &BrewId) -> Result<BrewSession, ClientError> {
        let url = self.endpoint(&["brews", "watch", brew_id.as_str()])?;
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    async fn fetch_temperature_logs(
        &self,
        brew_id: &BrewId,
    ) -> Result<Vec<TemperatureSample>, ClientError> {
        let mut url = self.endpoint(&["brews", "temperature_logs"])?;
        url.query_pairs_mut().append_pair("brew_id", brew_id.as_str());
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    async fn end_brew(&self, brew_id: &BrewId) -> Result<(), ClientError> {
        let url = self.endpoint(&["brews", "end"])?;
        let body = EndBrewRequest {
            brew_id: brew_id.clone(),
        };
        let response = self.client.post(url).json(&body).send().await?;
        check_status(response).await.map(|_| ())
    }

    async fn start_brew(
        &self,
        request: &StartBrewRequest,
    ) -> Result<StartBrewResponse, ClientError> {
        let url = self.endpoint(&["brews", "start"])?;
        let response = self.client.post(url).json(request).send().await?;
        decode(response).await
    }

    async fn test_brewery_connection(&self, brewery_id: &str) -> Result<(), ClientError> {
        let mut url = self.endpoint(&["brewery", "test-connection"])?;
        url.query_pairs_mut().append_pair("brewery_id", brewery_id);
        let response = self.client.get(url).send().await?;
        check_status(response).await.map(|_| ())
    }
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("error").to_string()
    } else {
        body
    };
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
