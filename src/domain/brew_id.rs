//! Type-safe brew session identifier.
//!
//! [`BrewId`] wraps the backend's opaque identifier. The backend has served
//! both numeric and string ids over time, so deserialization accepts either
//! and the id always renders as a string.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Identifier of a brew session on the brewing backend.
///
/// Used as the key in [`crate::tracker::TrackerRegistry`], as the event
/// discriminator, and as the WebSocket subscription target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct BrewId(String);

impl BrewId {
    /// Creates a `BrewId` from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the identifier is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for BrewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BrewId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BrewId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for BrewId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for BrewId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Text(s) => Self(s),
            Wire::Unsigned(n) => Self(n.to_string()),
            Wire::Signed(n) => Self(n.to_string()),
        })
    }
}
