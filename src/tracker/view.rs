//! Presentation read model rendered from a [`TrackerSnapshot`].
//!
//! This is what REST and WebSocket clients display: the brewing timeline
//! with live countdowns, the current temperature, the pending-brew pairing
//! hint and the ended-brew summary.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::state::TrackerSnapshot;
use crate::domain::progress::COMPLETED;
use crate::domain::temperature::display_celsius;
use crate::domain::{BrewId, BrewSession, BrewStatus, Stage, TemperatureSample};

/// Rendered tracker state.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrackerView {
    /// Tracked brew.
    pub brew_id: BrewId,
    /// `true` until the initial fetch settles.
    pub loading_initial: bool,
    /// Blocking initial-load error.
    pub error: Option<String>,
    /// Recipe name shown as the page title.
    pub headline: Option<String>,
    /// Overall session status.
    pub status: Option<BrewStatus>,
    /// Session creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Session end time.
    pub ended_at: Option<DateTime<Utc>>,
    /// Mash and boil rows, in brewing order. Empty before the first fetch.
    pub stages: Vec<StageView>,
    /// Latest temperature reading.
    pub current_temperature: Option<TemperatureReading>,
    /// Full temperature log as last fetched.
    pub temperature_samples: Vec<TemperatureSample>,
    /// Whether the temperature log is still being polled.
    pub temperature_polling: bool,
    /// Pairing hint while the brew waits for its controller.
    pub pending: Option<PendingHint>,
    /// Brew log once the session has ended.
    pub summary: Option<EndedSummary>,
    /// Set when boil started before mash ended; shown, never corrected.
    pub stage_overlap: bool,
    /// Display clock the countdowns were rendered at.
    pub now: DateTime<Utc>,
}

/// One row of the brewing timeline.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StageView {
    /// Stage.
    pub stage: Stage,
    /// Stage label.
    pub label: String,
    /// Stage status.
    pub status: BrewStatus,
    /// Recipe target temperature in °C.
    pub target_temp_c: Option<f64>,
    /// Recipe target duration in minutes.
    pub target_minutes: Option<f64>,
    /// Stage start.
    pub started_at: Option<DateTime<Utc>>,
    /// Stage end.
    pub ended_at: Option<DateTime<Utc>>,
    /// Elapsed time, `"-"` before the stage starts.
    pub elapsed: String,
    /// Countdown while the stage runs, `"Completed"` once it has ended,
    /// `None` while pending or without start or target.
    pub remaining: Option<String>,
}

/// The most recent temperature sample, formatted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TemperatureReading {
    /// Reading in °C.
    pub celsius: f64,
    /// Reading rounded to two decimals with unit.
    pub display: String,
    /// When it was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Shown while the brew is pending.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PendingHint {
    /// What the brewer should expect.
    pub message: String,
    /// Key to enter on the brewing controller.
    pub secret_key: Option<String>,
}

/// Brew log shown once the session has ended.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EndedSummary {
    /// Measured original gravity.
    pub original_gravity: Option<f64>,
    /// Measured final gravity.
    pub final_gravity: Option<f64>,
    /// Measured ABV, or the recipe target when none was measured.
    pub abv: Option<f64>,
    /// Brewer's notes.
    pub notes: Option<String>,
}

impl TrackerView {
    /// Renders `snapshot` at its display clock.
    #[must_use]
    pub fn render(snapshot: &TrackerSnapshot) -> Self {
        let session = snapshot.session.as_ref();
        let stages = session.map_or_else(Vec::new, |s| {
            Stage::ALL
                .iter()
                .map(|&stage| stage_view(s, stage, snapshot))
                .collect()
        });

        Self {
            brew_id: snapshot.brew_id.clone(),
            loading_initial: snapshot.loading_initial,
            error: snapshot.error.clone(),
            headline: session.and_then(|s| s.recipe_snapshot.name.clone()),
            status: session.map(|s| s.status),
            created_at: session.map(|s| s.created_at),
            ended_at: session.and_then(|s| s.ended_at),
            stages,
            current_temperature: snapshot.latest_temperature().map(|sample| TemperatureReading {
                celsius: sample.temperature_celsius,
                display: display_celsius(sample.temperature_celsius),
                recorded_at: sample.recorded_at,
            }),
            temperature_samples: snapshot.temperature_samples.clone(),
            temperature_polling: snapshot.temperature_polling,
            pending: session.and_then(pending_hint),
            summary: session.and_then(ended_summary),
            stage_overlap: session.is_some_and(BrewSession::has_stage_overlap),
            now: snapshot.now,
        }
    }
}

fn stage_view(session: &BrewSession, stage: Stage, snapshot: &TrackerSnapshot) -> StageView {
    let status = session.stage_status(stage);
    let remaining = match status {
        BrewStatus::Pending => None,
        BrewStatus::Started => snapshot.remaining(stage).map(|r| r.to_string()),
        BrewStatus::Ended => Some(COMPLETED.to_string()),
    };
    StageView {
        stage,
        label: stage.label().to_string(),
        status,
        target_temp_c: session.recipe_snapshot.target_temp_c(stage),
        target_minutes: session.recipe_snapshot.target_minutes(stage),
        started_at: session.stage_start(stage),
        ended_at: session.stage_end(stage),
        elapsed: snapshot.elapsed(stage),
        remaining,
    }
}

fn pending_hint(session: &BrewSession) -> Option<PendingHint> {
    (session.status == BrewStatus::Pending).then(|| PendingHint {
        message: "Trying to connect to brewing controller...".to_string(),
        secret_key: session.secret_key.clone(),
    })
}

fn ended_summary(session: &BrewSession) -> Option<EndedSummary> {
    (session.status == BrewStatus::Ended).then(|| EndedSummary {
        original_gravity: session.original_gravity,
        final_gravity: session.final_gravity,
        abv: session.abv.or(session.recipe_snapshot.target_abv),
        notes: session.notes.clone(),
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::RecipeSnapshot;
    use chrono::{TimeDelta, TimeZone};

    fn t0() -> DateTime<Utc> {
        let Some(ts) = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).single() else {
            panic!("valid timestamp");
        };
        ts
    }

    fn session(status: BrewStatus) -> BrewSession {
        BrewSession {
            id: BrewId::new("b-1"),
            status,
            created_at: t0(),
            ended_at: None,
            recipe_snapshot: RecipeSnapshot {
                name: Some("Pale Ale".to_string()),
                mash_temp_c: Some(66.0),
                mash_time_min: Some(60.0),
                boil_time_min: Some(60.0),
                target_abv: Some(5.0),
                ..RecipeSnapshot::default()
            },
            mash_status: BrewStatus::Started,
            boil_status: BrewStatus::Pending,
            mash_start: Some(t0()),
            mash_end: None,
            boil_start: None,
            boil_end: None,
            notes: Some("smells great".to_string()),
            secret_key: Some("K-123".to_string()),
            original_gravity: Some(1.050),
            final_gravity: None,
            abv: None,
        }
    }

    fn snapshot(session: Option<BrewSession>, now: DateTime<Utc>) -> TrackerSnapshot {
        TrackerSnapshot {
            brew_id: BrewId::new("b-1"),
            session,
            temperature_samples: vec![TemperatureSample {
                recorded_at: now,
                temperature_celsius: 65.5,
            }],
            loading_initial: false,
            error: None,
            now,
            last_session_at: Some(now),
            temperature_polling: true,
            active: true,
        }
    }

    #[test]
    fn renders_timeline_rows_with_countdown() {
        let view = TrackerView::render(&snapshot(
            Some(session(BrewStatus::Started)),
            t0() + TimeDelta::minutes(45),
        ));
        assert_eq!(view.headline.as_deref(), Some("Pale Ale"));
        assert_eq!(view.stages.len(), 2);

        let Some(mash) = view.stages.first() else {
            panic!("mash row");
        };
        assert_eq!(mash.stage, Stage::Mash);
        assert_eq!(mash.remaining.as_deref(), Some("15m 00s remaining"));
        assert_eq!(mash.elapsed, "45 min");

        let Some(boil) = view.stages.get(1) else {
            panic!("boil row");
        };
        assert_eq!(boil.elapsed, "-");
        assert!(boil.remaining.is_none());
        assert_eq!(boil.target_temp_c, Some(95.0));

        assert!(view.pending.is_none());
        assert!(view.summary.is_none());
        assert_eq!(view.current_temperature.map(|t| t.display).as_deref(), Some("65.50°C"));
    }

    #[test]
    fn mash_ended_early_shows_completed_not_countdown() {
        let mut brew = session(BrewStatus::Started);
        brew.mash_status = BrewStatus::Ended;
        brew.mash_end = Some(t0() + TimeDelta::minutes(30));
        brew.boil_status = BrewStatus::Started;
        brew.boil_start = Some(t0() + TimeDelta::minutes(35));

        let view = TrackerView::render(&snapshot(Some(brew), t0() + TimeDelta::minutes(45)));
        let Some(mash) = view.stages.first() else {
            panic!("mash row");
        };
        assert_eq!(mash.status, BrewStatus::Ended);
        assert_eq!(mash.elapsed, "30 min");
        assert_eq!(mash.remaining.as_deref(), Some("Completed"));

        let Some(boil) = view.stages.get(1) else {
            panic!("boil row");
        };
        assert_eq!(boil.remaining.as_deref(), Some("50m 00s remaining"));
    }

    #[test]
    fn pending_stage_has_no_countdown() {
        let mut brew = session(BrewStatus::Started);
        brew.mash_status = BrewStatus::Pending;
        let view = TrackerView::render(&snapshot(Some(brew), t0() + TimeDelta::minutes(5)));
        let Some(mash) = view.stages.first() else {
            panic!("mash row");
        };
        assert!(mash.remaining.is_none());
    }

    #[test]
    fn pending_brew_shows_pairing_key() {
        let view = TrackerView::render(&snapshot(Some(session(BrewStatus::Pending)), t0()));
        let Some(hint) = view.pending else {
            panic!("pending hint expected");
        };
        assert_eq!(hint.secret_key.as_deref(), Some("K-123"));
    }

    #[test]
    fn ended_summary_falls_back_to_recipe_abv() {
        let view = TrackerView::render(&snapshot(Some(session(BrewStatus::Ended)), t0()));
        let Some(summary) = view.summary else {
            panic!("summary expected");
        };
        assert_eq!(summary.abv, Some(5.0));
        assert_eq!(summary.original_gravity, Some(1.050));
        assert_eq!(summary.notes.as_deref(), Some("smells great"));
    }

    #[test]
    fn empty_before_first_fetch() {
        let mut snap = snapshot(None, t0());
        snap.loading_initial = true;
        let view = TrackerView::render(&snap);
        assert!(view.loading_initial);
        assert!(view.stages.is_empty());
        assert!(view.status.is_none());
        assert!(!view.stage_overlap);
    }
}
