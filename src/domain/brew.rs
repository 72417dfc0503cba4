//! Brew session model as served by `GET /brews/watch/{id}`.
//!
//! The tracker never mutates a [`BrewSession`]; every transition happens on
//! the backend in response to user or controller actions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::BrewId;
use super::timestamp;

/// Nominal boil temperature shown as the boil target (`95 °C+`).
pub const BOIL_TARGET_TEMP_C: f64 = 95.0;

/// Lifecycle status shared by the overall session and by each stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BrewStatus {
    /// Not started yet (waiting for the brewing controller).
    #[default]
    Pending,
    /// Running.
    Started,
    /// Finished.
    Ended,
}

/// Stage statuses use the same three-state lifecycle as the session.
pub type StageStatus = BrewStatus;

impl BrewStatus {
    /// Returns `true` while brewing is live and temperature telemetry flows.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Started)
    }

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Started => "started",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for BrewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timed brewing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Mash: steep grains at the recipe mash temperature.
    Mash,
    /// Boil: boil the wort for the recipe boil time.
    Boil,
}

impl Stage {
    /// All stages in brewing order.
    pub const ALL: [Self; 2] = [Self::Mash, Self::Boil];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mash => "mash",
            Self::Boil => "boil",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mash => "Mash",
            Self::Boil => "Boil",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable copy of the recipe taken when the brew was started.
///
/// Only the fields the tracker renders are modelled; anything else in the
/// snapshot is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSnapshot {
    /// Recipe name.
    #[serde(default)]
    pub name: Option<String>,
    /// Beer style.
    #[serde(default)]
    pub style: Option<String>,
    /// Target mash temperature in °C.
    #[serde(default)]
    pub mash_temp_c: Option<f64>,
    /// Target mash duration in minutes.
    #[serde(default)]
    pub mash_time_min: Option<f64>,
    /// Target boil duration in minutes.
    #[serde(default)]
    pub boil_time_min: Option<f64>,
    /// Target alcohol by volume.
    #[serde(default, rename = "targetABV")]
    pub target_abv: Option<f64>,
}

impl RecipeSnapshot {
    /// Target duration for `stage`, in minutes.
    #[must_use]
    pub const fn target_minutes(&self, stage: Stage) -> Option<f64> {
        match stage {
            Stage::Mash => self.mash_time_min,
            Stage::Boil => self.boil_time_min,
        }
    }

    /// Target temperature for `stage`, in °C.
    #[must_use]
    pub const fn target_temp_c(&self, stage: Stage) -> Option<f64> {
        match stage {
            Stage::Mash => self.mash_temp_c,
            Stage::Boil => Some(BOIL_TARGET_TEMP_C),
        }
    }
}

/// One brew session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BrewSession {
    /// Backend identifier.
    pub id: BrewId,
    /// Overall session status.
    pub status: BrewStatus,
    /// Session creation time.
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    /// Session end time, present once `status` is `ended`.
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub ended_at: Option<DateTime<Utc>>,
    /// Recipe as it was when the brew started.
    #[serde(default)]
    pub recipe_snapshot: RecipeSnapshot,
    /// Mash stage status.
    #[serde(default)]
    pub mash_status: StageStatus,
    /// Boil stage status.
    #[serde(default)]
    pub boil_status: StageStatus,
    /// Mash start time.
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub mash_start: Option<DateTime<Utc>>,
    /// Mash end time.
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub mash_end: Option<DateTime<Utc>>,
    /// Boil start time.
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub boil_start: Option<DateTime<Utc>>,
    /// Boil end time.
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub boil_end: Option<DateTime<Utc>>,
    /// Brewer's notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Pairing key the brewing controller uses to claim a pending brew.
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Measured original gravity.
    #[serde(default)]
    pub original_gravity: Option<f64>,
    /// Measured final gravity.
    #[serde(default)]
    pub final_gravity: Option<f64>,
    /// Measured alcohol by volume.
    #[serde(default)]
    pub abv: Option<f64>,
}

impl BrewSession {
    /// Status of `stage`.
    #[must_use]
    pub const fn stage_status(&self, stage: Stage) -> StageStatus {
        match stage {
            Stage::Mash => self.mash_status,
            Stage::Boil => self.boil_status,
        }
    }

    /// Start timestamp of `stage`, if it has started.
    #[must_use]
    pub const fn stage_start(&self, stage: Stage) -> Option<DateTime<Utc>> {
        match stage {
            Stage::Mash => self.mash_start,
            Stage::Boil => self.boil_start,
        }
    }

    /// End timestamp of `stage`, if it has ended.
    #[must_use]
    pub const fn stage_end(&self, stage: Stage) -> Option<DateTime<Utc>> {
        match stage {
            Stage::Mash => self.mash_end,
            Stage::Boil => self.boil_end,
        }
    }

    /// Returns `true` while the overall status is `started`.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Display anomaly: boil started before mash ended. Never corrected.
    #[must_use]
    pub fn has_stage_overlap(&self) -> bool {
        matches!((self.mash_end, self.boil_start), (Some(end), Some(start)) if start < end)
    }
}
