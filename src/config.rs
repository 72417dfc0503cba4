//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::time::Duration;

use crate::domain::BrewId;
use crate::error::WatchError;
use crate::tracker::TrackerOptions;

/// Top-level service configuration.
///
/// Loaded once at startup via [`WatchConfig::from_env`].
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Base URL of the brewing backend.
    pub brew_api_url: String,

    /// Cadence of the session and temperature-log polls.
    pub poll_interval: Duration,

    /// Cadence of the display clock.
    pub clock_tick: Duration,

    /// Per-request timeout against the brewing backend.
    pub http_timeout: Duration,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Brews to start tracking at startup.
    pub watch_brew_ids: Vec<BrewId>,

    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl WatchConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Config`] if `LISTEN_ADDR` is set but cannot be
    /// parsed as a [`SocketAddr`].
    pub fn from_env() -> Result<Self, WatchError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|e| WatchError::Config(format!("LISTEN_ADDR: {e}")))?;

        let brew_api_url = std::env::var("BREW_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());

        let poll_interval = Duration::from_millis(parse_env("POLL_INTERVAL_MS", 10_000));
        let clock_tick = Duration::from_millis(parse_env("CLOCK_TICK_MS", 1_000));
        let http_timeout = Duration::from_secs(parse_env("HTTP_TIMEOUT_SECS", 10));
        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 1_024);

        let watch_brew_ids = std::env::var("WATCH_BREW_IDS")
            .map(|raw| parse_id_list(&raw))
            .unwrap_or_default();

        let log_json = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            listen_addr,
            brew_api_url,
            poll_interval,
            clock_tick,
            http_timeout,
            event_bus_capacity,
            watch_brew_ids,
            log_json,
        })
    }

    /// Timer cadences for new trackers. Zero intervals are clamped to 1 ms.
    #[must_use]
    pub fn tracker_options(&self) -> TrackerOptions {
        let floor = Duration::from_millis(1);
        TrackerOptions {
            poll_interval: self.poll_interval.max(floor),
            clock_tick: self.clock_tick.max(floor),
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Splits a comma-separated id list, skipping blanks.
fn parse_id_list(raw: &str) -> Vec<BrewId> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(BrewId::from)
        .collect()
}
