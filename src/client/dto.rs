//! Request and response bodies of the backend's brew actions.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::BrewId;

/// Body of `POST /brews/start`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StartBrewRequest {
    /// Recipe being brewed.
    pub recipe_id: String,
    /// Full recipe document, frozen as the brew's snapshot.
    #[schema(value_type = Object)]
    pub recipe_snapshot: serde_json::Value,
    /// Brewery running the brew.
    pub brewery_id: String,
    /// Brewer starting the session.
    pub user_id: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Pairing key the brewing controller presents to claim the brew.
    pub secret_key: String,
}

/// Response of `POST /brews/start`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StartBrewResponse {
    /// Identifier of the new brew session.
    pub id: BrewId,
}

/// Body of `POST /brews/end`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndBrewRequest {
    /// Brew to end.
    pub brew_id: BrewId,
}
