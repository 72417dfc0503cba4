//! Live tracker for one brew session.
//!
//! A [`BrewSessionTracker`] runs up to three timers against one brew:
//!
//! ```text
//! session poll      every poll_interval   GET /brews/watch/{id}
//! temperature poll  every poll_interval   GET /brews/temperature_logs   (only while status = started)
//! clock tick        every clock_tick      advances `now`, no network
//! ```
//!
//! All results flow through [`TrackerState`], which discards anything that
//! arrives after [`BrewSessionTracker::deactivate`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use super::clock::Clock;
use super::periodic::{FirstTick, PeriodicTask, spawn_guarded};
use super::state::{FetchKind, SessionOutcome, TrackerSnapshot, TrackerState};
use crate::client::BrewApi;
use crate::domain::{BrewId, EventBus, Remaining, Stage, TrackerEvent};

/// Default cadence of both network polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default cadence of the display clock.
pub const DEFAULT_CLOCK_TICK: Duration = Duration::from_secs(1);

/// Timer cadences for a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerOptions {
    /// Cadence of the session poll and of the temperature-log poll.
    pub poll_interval: Duration,
    /// Cadence of the display clock.
    pub clock_tick: Duration,
}

impl TrackerOptions {
    /// Poll cadence in whole milliseconds, saturating at `u64::MAX`.
    #[must_use]
    pub fn poll_interval_ms(&self) -> u64 {
        saturating_millis(self.poll_interval)
    }

    /// Clock cadence in whole milliseconds, saturating at `u64::MAX`.
    #[must_use]
    pub fn clock_tick_ms(&self) -> u64 {
        saturating_millis(self.clock_tick)
    }
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            clock_tick: DEFAULT_CLOCK_TICK,
        }
    }
}

#[derive(Debug)]
struct Shared {
    brew_id: BrewId,
    api: Arc<dyn BrewApi>,
    clock: Arc<dyn Clock>,
    events: EventBus,
    options: TrackerOptions,
    token: CancellationToken,
    state: RwLock<TrackerState>,
    session_seq: AtomicU64,
    temperature_seq: AtomicU64,
    // Lock order: temperature_poll before state.
    temperature_poll: Mutex<Option<PeriodicTask>>,
}

impl Shared {
    async fn fetch_session(self: Arc<Self>, kind: FetchKind) {
        let seq = self.session_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self
            .api
            .fetch_session(&self.brew_id)
            .await
            .map_err(|e| e.to_string());
        self.apply_session(seq, kind, result);
    }

    fn apply_session(
        self: &Arc<Self>,
        seq: u64,
        kind: FetchKind,
        result: Result<crate::domain::BrewSession, String>,
    ) {
        let now = self.clock.now();
        let mut poll = self.temperature_poll.lock();

        let outcome = {
            let mut state = self.state.write();
            let outcome = state.apply_session(seq, kind, result, now);
            if let SessionOutcome::Applied { status, .. } = &outcome {
                state.set_temperature_polling(status.is_active());
            }
            outcome
        };

        match outcome {
            SessionOutcome::Applied {
                status,
                mash_status,
                boil_status,
            } => {
                tracing::debug!(brew_id = %self.brew_id, seq, %status, %mash_status, %boil_status, "session applied");
                let _ = self.events.publish(TrackerEvent::SessionUpdated {
                    brew_id: self.brew_id.clone(),
                    status,
                    mash_status,
                    boil_status,
                    timestamp: Utc::now(),
                });
                self.sync_temperature_poll(&mut poll, status.is_active());
            }
            SessionOutcome::InitialFailed(message) => {
                tracing::error!(brew_id = %self.brew_id, error = %message, "initial brew fetch failed");
                let _ = self.events.publish(TrackerEvent::InitialLoadFailed {
                    brew_id: self.brew_id.clone(),
                    message,
                    timestamp: Utc::now(),
                });
            }
            SessionOutcome::BackgroundFailed(message) => {
                tracing::warn!(brew_id = %self.brew_id, error = %message, "brew poll failed; keeping last state");
            }
            SessionOutcome::Stale => {
                tracing::debug!(brew_id = %self.brew_id, seq, "discarding superseded session response");
            }
            SessionOutcome::Inactive => {}
        }
    }

    fn sync_temperature_poll(self: &Arc<Self>, poll: &mut Option<PeriodicTask>, live: bool) {
        match (live, poll.is_some()) {
            (true, false) => {
                let weak: Weak<Self> = Arc::downgrade(self);
                *poll = Some(PeriodicTask::spawn(
                    "temperature-poll",
                    self.options.poll_interval,
                    FirstTick::Immediate,
                    &self.token,
                    move || {
                        let shared = weak.upgrade();
                        async move {
                            if let Some(shared) = shared {
                                shared.fetch_temperature().await;
                            }
                        }
                    },
                ));
                tracing::info!(brew_id = %self.brew_id, "temperature polling started");
            }
            (false, true) => {
                if let Some(task) = poll.take() {
                    task.cancel();
                }
                tracing::info!(brew_id = %self.brew_id, "temperature polling stopped");
            }
            _ => return,
        }
        let _ = self.events.publish(TrackerEvent::TemperaturePolling {
            brew_id: self.brew_id.clone(),
            active: live,
            timestamp: Utc::now(),
        });
    }

    async fn fetch_temperature(self: Arc<Self>) {
        let seq = self.temperature_seq.fetch_add(1, Ordering::SeqCst) + 1;
        match self.api.fetch_temperature_logs(&self.brew_id).await {
            Ok(samples) => {
                let sample_count = samples.len();
                let latest_celsius = samples.last().map(|s| s.temperature_celsius);
                if self.state.write().apply_temperature(seq, samples) {
                    tracing::trace!(brew_id = %self.brew_id, sample_count, "temperature log applied");
                    let _ = self.events.publish(TrackerEvent::TemperatureUpdated {
                        brew_id: self.brew_id.clone(),
                        sample_count,
                        latest_celsius,
                        timestamp: Utc::now(),
                    });
                }
            }
            Err(e) => {
                tracing::warn!(brew_id = %self.brew_id, error = %e, "temperature poll failed; keeping last samples");
            }
        }
    }

    fn tick(&self) {
        let now = self.clock.now();
        if self.state.write().tick(now) {
            tracing::trace!(brew_id = %self.brew_id, %now, "clock tick");
            let _ = self.events.publish(TrackerEvent::ClockTicked {
                brew_id: self.brew_id.clone(),
                now,
            });
        }
    }
}

/// Polls one brew session and keeps a renderable read model of it.
///
/// Created with [`BrewSessionTracker::activate`]; stopped with
/// [`BrewSessionTracker::deactivate`] or by dropping it.
#[derive(Debug)]
pub struct BrewSessionTracker {
    shared: Arc<Shared>,
    timers: Mutex<Vec<PeriodicTask>>,
}

impl BrewSessionTracker {
    /// Starts tracking `brew_id`: issues the initial fetch and starts the
    /// session poll and the display clock.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn activate(
        brew_id: BrewId,
        api: Arc<dyn BrewApi>,
        clock: Arc<dyn Clock>,
        events: EventBus,
        options: TrackerOptions,
    ) -> Self {
        let now = clock.now();
        let shared = Arc::new(Shared {
            state: RwLock::new(TrackerState::new(brew_id.clone(), now)),
            brew_id,
            api,
            clock,
            events,
            options,
            token: CancellationToken::new(),
            session_seq: AtomicU64::new(0),
            temperature_seq: AtomicU64::new(0),
            temperature_poll: Mutex::new(None),
        });

        spawn_guarded(
            &shared.token,
            Arc::clone(&shared).fetch_session(FetchKind::Initial),
        );

        let poller = Arc::downgrade(&shared);
        let session_poll = PeriodicTask::spawn(
            "session-poll",
            options.poll_interval,
            FirstTick::AfterPeriod,
            &shared.token,
            move || {
                let shared = poller.upgrade();
                async move {
                    if let Some(shared) = shared {
                        shared.fetch_session(FetchKind::Background).await;
                    }
                }
            },
        );

        let ticker = Arc::downgrade(&shared);
        let clock_tick = PeriodicTask::spawn(
            "clock-tick",
            options.clock_tick,
            FirstTick::AfterPeriod,
            &shared.token,
            move || {
                if let Some(shared) = ticker.upgrade() {
                    shared.tick();
                }
                std::future::ready(())
            },
        );

        tracing::info!(
            brew_id = %shared.brew_id,
            poll_ms = options.poll_interval_ms(),
            tick_ms = options.clock_tick_ms(),
            "tracker activated"
        );

        Self {
            shared,
            timers: Mutex::new(vec![session_poll, clock_tick]),
        }
    }

    /// Tracked brew.
    #[must_use]
    pub fn brew_id(&self) -> &BrewId {
        &self.shared.brew_id
    }

    /// Timer cadences this tracker runs with.
    #[must_use]
    pub fn options(&self) -> TrackerOptions {
        self.shared.options
    }

    /// Returns `true` until deactivated.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.shared.state.read().is_active()
    }

    /// Copies the current read model.
    #[must_use]
    pub fn snapshot(&self) -> TrackerSnapshot {
        self.shared.state.read().snapshot()
    }

    /// Elapsed time of `stage` at the display clock.
    #[must_use]
    pub fn elapsed(&self, stage: Stage) -> String {
        self.snapshot().elapsed(stage)
    }

    /// Remaining time of `stage` at the display clock.
    #[must_use]
    pub fn remaining(&self, stage: Stage) -> Option<Remaining> {
        self.snapshot().remaining(stage)
    }

    /// Issues one extra background fetch outside the poll cadence.
    ///
    /// Returns `false` if the tracker is no longer active.
    pub fn refresh(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        spawn_guarded(
            &self.shared.token,
            Arc::clone(&self.shared).fetch_session(FetchKind::Background),
        );
        true
    }

    /// Re-runs the initial fetch after a blocking error. A tracker with no
    /// blocking error gets a background refresh instead, so its last good
    /// session is never replaced by an error.
    ///
    /// Returns `false` if the tracker is no longer active.
    pub fn retry_initial(&self) -> bool {
        let Some(kind) = self.shared.state.write().begin_retry() else {
            return false;
        };
        tracing::info!(brew_id = %self.shared.brew_id, ?kind, "retrying brew fetch");
        spawn_guarded(
            &self.shared.token,
            Arc::clone(&self.shared).fetch_session(kind),
        );
        true
    }

    /// Stops every timer and freezes the read model.
    ///
    /// Synchronous: once this returns no timer callback fires and no
    /// in-flight response is applied. Idempotent.
    pub fn deactivate(&self) {
        if !self.shared.state.write().deactivate() {
            return;
        }
        self.shared.token.cancel();
        for timer in self.timers.lock().drain(..) {
            timer.cancel();
        }
        if let Some(task) = self.shared.temperature_poll.lock().take() {
            task.cancel();
        }
        tracing::info!(brew_id = %self.shared.brew_id, "tracker deactivated");
    }
}

impl Drop for BrewSessionTracker {
    fn drop(&mut self) {
        self.deactivate();
    }
}
