//! Pure stage-timing derivation.
//!
//! Everything here is a function of a [`BrewSession`] (or its timestamps)
//! and an explicit `now`. Nothing reads the clock or touches the network,
//! so the tracker's timers and these calculations can be tested apart.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

use super::{BrewSession, Stage};

/// Rendered by [`elapsed`] for a stage that has not started.
pub const NOT_STARTED: &str = "-";

/// Rendered by [`Remaining::Completed`].
pub const COMPLETED: &str = "Completed";

const MS_PER_MINUTE: i64 = 60_000;

/// Time left in a stage relative to its recipe target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    /// Target end is still in the future; strictly positive.
    Left(TimeDelta),
    /// `now` is at or past `start + target`.
    Completed,
}

impl Remaining {
    /// Strictly positive time left, or `None` once completed.
    #[must_use]
    pub const fn left(&self) -> Option<TimeDelta> {
        match self {
            Self::Left(delta) => Some(*delta),
            Self::Completed => None,
        }
    }

    /// Returns `true` once the target duration has fully elapsed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str(COMPLETED),
            Self::Left(delta) => {
                let ms = delta.num_milliseconds();
                let mins = ms / MS_PER_MINUTE;
                let secs = (ms % MS_PER_MINUTE) / 1_000;
                write!(f, "{mins}m {secs:02}s remaining")
            }
        }
    }
}

/// Converts a recipe target in minutes into a duration.
///
/// Zero, negative and non-finite targets count as "no target".
#[must_use]
pub fn target_delta(minutes: f64) -> Option<TimeDelta> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let ms = (minutes * 60_000.0).round() as i64;
    TimeDelta::try_milliseconds(ms)
}

/// Duration from `start` to `end`, or to `now` while the stage is running.
#[must_use]
pub fn elapsed_duration(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<TimeDelta> {
    start.map(|start| end.unwrap_or(now) - start)
}

/// Elapsed stage time as whole minutes (`"47 min"`), or `"-"` without a start.
#[must_use]
pub fn elapsed(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> String {
    match elapsed_duration(start, end, now) {
        Some(delta) => format!("{} min", round_minutes(delta)),
        None => NOT_STARTED.to_string(),
    }
}

/// Time left until `start + target_minutes`.
///
/// `None` when either the start or the target is missing.
#[must_use]
pub fn remaining(
    start: Option<DateTime<Utc>>,
    target_minutes: Option<f64>,
    now: DateTime<Utc>,
) -> Option<Remaining> {
    let start = start?;
    let target = target_delta(target_minutes?)?;
    let due = start.checked_add_signed(target)?;
    let left = due - now;
    if left <= TimeDelta::zero() {
        Some(Remaining::Completed)
    } else {
        Some(Remaining::Left(left))
    }
}

/// [`elapsed`] for one stage of a session.
#[must_use]
pub fn stage_elapsed(session: &BrewSession, stage: Stage, now: DateTime<Utc>) -> String {
    elapsed(session.stage_start(stage), session.stage_end(stage), now)
}

/// [`remaining`] for one stage of a session, using its recipe snapshot target.
#[must_use]
pub fn stage_remaining(session: &BrewSession, stage: Stage, now: DateTime<Utc>) -> Option<Remaining> {
    remaining(
        session.stage_start(stage),
        session.recipe_snapshot.target_minutes(stage),
        now,
    )
}

// Half-minutes round up, negative spans included.
fn round_minutes(delta: TimeDelta) -> i64 {
    (delta.num_milliseconds() + MS_PER_MINUTE / 2).div_euclid(MS_PER_MINUTE)
}
