//! Tracker read model and the rules for applying fetch results to it.
//!
//! [`TrackerState`] is mutated only through the `apply_*` methods, which
//! enforce the acquisition rules independently of any timer:
//!
//! - results arriving after deactivation are discarded;
//! - an older request never overwrites a newer applied one
//!   (last-request-wins, by sequence number);
//! - only the initial fetch may surface an error to the user, and any
//!   successful fetch clears it.

use chrono::{DateTime, Utc};

use crate::domain::progress::{self, Remaining};
use crate::domain::{BrewId, BrewSession, BrewStatus, Stage, TemperatureSample};

/// Which fetch produced a session result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// The fetch issued on activation (or by an explicit retry).
    Initial,
    /// A repeating poll or a one-off refresh.
    Background,
}

/// What applying a session result did to the read model.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// A new session replaced the previous one.
    Applied {
        /// Overall status of the applied session.
        status: BrewStatus,
        /// Mash stage status.
        mash_status: BrewStatus,
        /// Boil stage status.
        boil_status: BrewStatus,
    },
    /// The initial fetch failed; `error` now holds the message.
    InitialFailed(String),
    /// A background fetch failed; nothing changed.
    BackgroundFailed(String),
    /// A newer request already landed; nothing changed except settling the
    /// initial-load flag.
    Stale,
    /// The tracker is deactivated; nothing changed.
    Inactive,
}

/// Point-in-time copy of a tracker's read model.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSnapshot {
    /// Tracked brew.
    pub brew_id: BrewId,
    /// Latest fetched session, `None` before the first success.
    pub session: Option<BrewSession>,
    /// Latest fetched temperature log.
    pub temperature_samples: Vec<TemperatureSample>,
    /// `true` until the initial fetch settles.
    pub loading_initial: bool,
    /// User-visible initial-load failure.
    pub error: Option<String>,
    /// Display clock reference.
    pub now: DateTime<Utc>,
    /// When a session payload was last applied.
    pub last_session_at: Option<DateTime<Utc>>,
    /// Whether the temperature-log poll is running.
    pub temperature_polling: bool,
    /// Whether the tracker is still active.
    pub active: bool,
}

impl TrackerSnapshot {
    /// Elapsed time of `stage` at `now`; `"-"` without a session or start.
    #[must_use]
    pub fn elapsed(&self, stage: Stage) -> String {
        self.session.as_ref().map_or_else(
            || progress::NOT_STARTED.to_string(),
            |session| progress::stage_elapsed(session, stage, self.now),
        )
    }

    /// Remaining time of `stage` at `now`; `None` without start or target.
    #[must_use]
    pub fn remaining(&self, stage: Stage) -> Option<Remaining> {
        self.session
            .as_ref()
            .and_then(|session| progress::stage_remaining(session, stage, self.now))
    }

    /// Most recent temperature reading.
    #[must_use]
    pub fn latest_temperature(&self) -> Option<&TemperatureSample> {
        self.temperature_samples.last()
    }
}

/// Mutable read model guarded by the tracker's lock.
#[derive(Debug)]
pub struct TrackerState {
    brew_id: BrewId,
    session: Option<BrewSession>,
    temperature_samples: Vec<TemperatureSample>,
    loading_initial: bool,
    error: Option<String>,
    now: DateTime<Utc>,
    last_session_at: Option<DateTime<Utc>>,
    temperature_polling: bool,
    active: bool,
    session_seq: u64,
    temperature_seq: u64,
}

impl TrackerState {
    /// Fresh state for a just-activated tracker.
    #[must_use]
    pub const fn new(brew_id: BrewId, now: DateTime<Utc>) -> Self {
        Self {
            brew_id,
            session: None,
            temperature_samples: Vec::new(),
            loading_initial: true,
            error: None,
            now,
            last_session_at: None,
            temperature_polling: false,
            active: true,
            session_seq: 0,
            temperature_seq: 0,
        }
    }

    /// Copies the read model out.
    #[must_use]
    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            brew_id: self.brew_id.clone(),
            session: self.session.clone(),
            temperature_samples: self.temperature_samples.clone(),
            loading_initial: self.loading_initial,
            error: self.error.clone(),
            now: self.now,
            last_session_at: self.last_session_at,
            temperature_polling: self.temperature_polling,
            active: self.active,
        }
    }

    /// Returns `true` until [`Self::deactivate`] is called.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Overall status of the current session.
    #[must_use]
    pub fn status(&self) -> Option<BrewStatus> {
        self.session.as_ref().map(|s| s.status)
    }

    /// Applies the result of session request number `seq`.
    pub fn apply_session(
        &mut self,
        seq: u64,
        kind: FetchKind,
        result: Result<BrewSession, String>,
        at: DateTime<Utc>,
    ) -> SessionOutcome {
        if !self.active {
            return SessionOutcome::Inactive;
        }
        if kind == FetchKind::Initial {
            self.loading_initial = false;
        }
        let newest = seq > self.session_seq;

        match result {
            Ok(session) => {
                self.error = None;
                if !newest {
                    return SessionOutcome::Stale;
                }
                self.session_seq = seq;
                let outcome = SessionOutcome::Applied {
                    status: session.status,
                    mash_status: session.mash_status,
                    boil_status: session.boil_status,
                };
                self.session = Some(session);
                self.last_session_at = Some(at);
                outcome
            }
            Err(message) => match kind {
                FetchKind::Initial if newest => {
                    self.error = Some(message.clone());
                    SessionOutcome::InitialFailed(message)
                }
                FetchKind::Initial => SessionOutcome::Stale,
                FetchKind::Background => SessionOutcome::BackgroundFailed(message),
            },
        }
    }

    /// Replaces the temperature log with the result of request `seq`.
    ///
    /// Returns `true` if the samples were applied.
    pub fn apply_temperature(&mut self, seq: u64, samples: Vec<TemperatureSample>) -> bool {
        if !self.active || seq <= self.temperature_seq {
            return false;
        }
        self.temperature_seq = seq;
        self.temperature_samples = samples;
        true
    }

    /// Records whether the temperature poll is running.
    pub fn set_temperature_polling(&mut self, running: bool) {
        if self.active {
            self.temperature_polling = running;
        }
    }

    /// Decides how a retry request is fetched.
    ///
    /// Only a tracker showing a blocking error re-arms `loading_initial` and
    /// gets another initial-class fetch. A healthy tracker gets a background
    /// fetch, so a failure cannot replace its last good session with an
    /// error. Returns `None` once deactivated.
    pub fn begin_retry(&mut self) -> Option<FetchKind> {
        if !self.active {
            return None;
        }
        if self.error.is_some() {
            self.loading_initial = true;
            Some(FetchKind::Initial)
        } else {
            Some(FetchKind::Background)
        }
    }

    /// Advances the display clock. Returns `true` if applied.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if self.active {
            self.now = now;
        }
        self.active
    }

    /// Freezes the read model. Returns `false` if already inactive.
    pub fn deactivate(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        self.temperature_polling = false;
        was_active
    }
}
