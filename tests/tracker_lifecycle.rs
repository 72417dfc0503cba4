//! Tracker lifecycle against a scripted backend under paused time.

#![allow(clippy::panic)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;

use brew_watch::client::ClientError;
use brew_watch::domain::{BrewId, BrewStatus, EventBus, Remaining, Stage, TrackerEvent};
use brew_watch::tracker::{BrewSessionTracker, ManualClock, TrackerOptions};

use common::{ScriptedApi, sample, session, settle, t0};

const POLL: Duration = Duration::from_secs(10);

fn options() -> TrackerOptions {
    TrackerOptions {
        poll_interval: POLL,
        clock_tick: Duration::from_secs(1),
    }
}

fn activate(api: &Arc<ScriptedApi>, clock: &Arc<ManualClock>, events: &EventBus) -> BrewSessionTracker {
    BrewSessionTracker::activate(
        BrewId::new("b-1"),
        Arc::clone(api) as Arc<dyn brew_watch::client::BrewApi>,
        Arc::clone(clock) as Arc<dyn brew_watch::tracker::Clock>,
        events.clone(),
        options(),
    )
}

fn server_error() -> ClientError {
    ClientError::Status {
        status: 500,
        message: "boom".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn initial_failure_is_visible_until_a_fetch_succeeds() {
    let api = ScriptedApi::new(Err(server_error()));
    let clock = Arc::new(ManualClock::new(t0()));
    let tracker = activate(&api, &clock, &EventBus::new(64));

    let snap = tracker.snapshot();
    assert!(snap.loading_initial);

    settle().await;
    let snap = tracker.snapshot();
    assert!(!snap.loading_initial);
    assert!(snap.error.is_some());
    assert!(snap.session.is_none());

    // Polling keeps retrying at the fixed interval; failures change nothing.
    tokio::time::sleep(POLL).await;
    assert_eq!(api.session_calls(), 2);
    assert!(tracker.snapshot().error.is_some());

    api.set_session(Ok(session("b-1", BrewStatus::Pending)));
    tokio::time::sleep(POLL).await;
    let snap = tracker.snapshot();
    assert!(snap.session.is_some());
    assert!(snap.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn retry_reruns_the_initial_fetch() {
    let api = ScriptedApi::new(Err(server_error()));
    let clock = Arc::new(ManualClock::new(t0()));
    let tracker = activate(&api, &clock, &EventBus::new(64));
    settle().await;
    assert!(tracker.snapshot().error.is_some());

    api.set_session(Ok(session("b-1", BrewStatus::Pending)));
    assert!(tracker.retry_initial());
    assert!(tracker.snapshot().loading_initial);
    settle().await;

    let snap = tracker.snapshot();
    assert!(!snap.loading_initial);
    assert!(snap.error.is_none());
    assert_eq!(api.session_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn retry_on_healthy_tracker_keeps_last_good_session() {
    let api = ScriptedApi::new(Ok(session("b-1", BrewStatus::Started)));
    let clock = Arc::new(ManualClock::new(t0()));
    let tracker = activate(&api, &clock, &EventBus::new(256));
    settle().await;
    assert!(tracker.snapshot().session.is_some());

    api.set_session(Err(ClientError::Timeout));
    assert!(tracker.retry_initial());
    assert!(!tracker.snapshot().loading_initial);
    settle().await;

    let snap = tracker.snapshot();
    assert_eq!(api.session_calls(), 2);
    assert!(!snap.loading_initial);
    assert!(snap.error.is_none());
    assert_eq!(snap.session.map(|s| s.status), Some(BrewStatus::Started));
}

#[tokio::test(start_paused = true)]
async fn background_failure_keeps_last_state() {
    let api = ScriptedApi::new(Ok(session("b-1", BrewStatus::Started)));
    let clock = Arc::new(ManualClock::new(t0()));
    let tracker = activate(&api, &clock, &EventBus::new(64));
    settle().await;
    assert_eq!(tracker.snapshot().session.map(|s| s.status), Some(BrewStatus::Started));

    api.set_session(Err(ClientError::Timeout));
    tokio::time::sleep(POLL * 3).await;

    let snap = tracker.snapshot();
    assert!(api.session_calls() >= 4);
    assert!(snap.error.is_none());
    assert_eq!(snap.session.map(|s| s.status), Some(BrewStatus::Started));
}

#[tokio::test(start_paused = true)]
async fn temperature_polls_only_while_started() {
    let api = ScriptedApi::new(Ok(session("b-1", BrewStatus::Pending)));
    api.set_temperature(Ok(vec![sample(0, 64.5), sample(10, 65.25)]));
    let clock = Arc::new(ManualClock::new(t0()));
    let tracker = activate(&api, &clock, &EventBus::new(256));

    settle().await;
    tokio::time::sleep(POLL * 2).await;
    assert_eq!(api.temperature_calls(), 0);
    assert!(!tracker.snapshot().temperature_polling);

    api.set_session(Ok(session("b-1", BrewStatus::Started)));
    tokio::time::sleep(POLL).await;
    let snap = tracker.snapshot();
    assert!(snap.temperature_polling);
    assert!(api.temperature_calls() >= 1);
    assert_eq!(snap.temperature_samples.len(), 2);
    assert_eq!(snap.latest_temperature().map(|s| s.temperature_celsius), Some(65.25));

    api.set_session(Ok(session("b-1", BrewStatus::Ended)));
    tokio::time::sleep(POLL).await;
    assert!(!tracker.snapshot().temperature_polling);
    let calls_after_end = api.temperature_calls();

    tokio::time::sleep(POLL * 3).await;
    assert_eq!(api.temperature_calls(), calls_after_end);
    // Samples from the running phase stay visible.
    assert_eq!(tracker.snapshot().temperature_samples.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn temperature_failure_keeps_samples() {
    let api = ScriptedApi::new(Ok(session("b-1", BrewStatus::Started)));
    api.set_temperature(Ok(vec![sample(0, 66.0)]));
    let clock = Arc::new(ManualClock::new(t0()));
    let tracker = activate(&api, &clock, &EventBus::new(256));
    settle().await;
    assert_eq!(tracker.snapshot().temperature_samples.len(), 1);

    api.set_temperature(Err(ClientError::Timeout));
    tokio::time::sleep(POLL * 2).await;
    let snap = tracker.snapshot();
    assert_eq!(snap.temperature_samples.len(), 1);
    assert!(snap.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn deactivate_discards_in_flight_response() {
    let api = ScriptedApi::new(Ok(session("b-1", BrewStatus::Started)));
    let gate = api.gate_sessions();
    let clock = Arc::new(ManualClock::new(t0()));
    let events = EventBus::new(256);
    let mut rx = events.subscribe();
    let tracker = activate(&api, &clock, &events);

    settle().await;
    assert_eq!(api.session_calls(), 1);

    tracker.deactivate();
    gate.add_permits(100);
    tokio::time::sleep(POLL * 6).await;

    let snap = tracker.snapshot();
    assert!(!snap.active);
    assert!(snap.loading_initial);
    assert!(snap.session.is_none());
    assert!(!snap.temperature_polling);
    assert_eq!(api.session_calls(), 1);
    assert_eq!(api.temperature_calls(), 0);

    while let Ok(event) = rx.try_recv() {
        assert!(
            !matches!(event, TrackerEvent::SessionUpdated { .. } | TrackerEvent::TemperatureUpdated { .. }),
            "update published after deactivation: {event:?}"
        );
    }

    // Idempotent, and a stopped tracker cannot be restarted.
    tracker.deactivate();
    assert!(!tracker.refresh());
    assert!(!tracker.retry_initial());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_tracker_stops_polling() {
    let api = ScriptedApi::new(Ok(session("b-1", BrewStatus::Started)));
    let clock = Arc::new(ManualClock::new(t0()));
    let tracker = activate(&api, &clock, &EventBus::new(256));
    settle().await;
    drop(tracker);

    let sessions = api.session_calls();
    let temperatures = api.temperature_calls();
    tokio::time::sleep(POLL * 5).await;
    assert_eq!(api.session_calls(), sessions);
    assert_eq!(api.temperature_calls(), temperatures);
}

#[tokio::test(start_paused = true)]
async fn mash_countdown_follows_display_clock() {
    let api = ScriptedApi::new(Ok(session("b-1", BrewStatus::Started)));
    let clock = Arc::new(ManualClock::new(t0() + TimeDelta::minutes(45)));
    let tracker = activate(&api, &clock, &EventBus::new(256));
    settle().await;

    assert_eq!(tracker.elapsed(Stage::Mash), "45 min");
    assert_eq!(
        tracker.remaining(Stage::Mash),
        Some(Remaining::Left(TimeDelta::minutes(15)))
    );
    assert_eq!(tracker.elapsed(Stage::Boil), "-");
    assert_eq!(tracker.remaining(Stage::Boil), None);

    clock.advance(TimeDelta::seconds(30));
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(
        tracker.remaining(Stage::Mash).map(|r| r.to_string()).as_deref(),
        Some("14m 30s remaining")
    );

    clock.set(t0() + TimeDelta::minutes(61));
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(tracker.remaining(Stage::Mash), Some(Remaining::Completed));
    assert_eq!(tracker.elapsed(Stage::Mash), "61 min");
}

#[tokio::test(start_paused = true)]
async fn refresh_fetches_outside_the_cadence() {
    let api = ScriptedApi::new(Ok(session("b-1", BrewStatus::Pending)));
    let clock = Arc::new(ManualClock::new(t0()));
    let tracker = activate(&api, &clock, &EventBus::new(64));
    settle().await;
    assert_eq!(api.session_calls(), 1);

    api.set_session(Ok(session("b-1", BrewStatus::Started)));
    assert!(tracker.refresh());
    settle().await;
    assert_eq!(api.session_calls(), 2);
    assert_eq!(tracker.snapshot().session.map(|s| s.status), Some(BrewStatus::Started));
}
