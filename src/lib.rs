//! # brew-watch
//!
//! Live brew-session tracker for a homebrewing backend.
//!
//! For every brew it is asked to watch, the service polls the backend's
//! session and temperature-log endpoints, keeps a read model of the brew
//! and derives mash and boil progress (elapsed time and countdown) from a
//! once-per-second display clock. The result is served over REST and
//! streamed as events over WebSocket.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── BrewService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── TrackerRegistry (tracker/)
//!     ├── BrewSessionTracker ── timers: initial fetch, session poll,
//!     │                          temperature poll, display clock
//!     │
//!     └── BrewApi (client/) ──► brewing backend
//! ```

pub mod api;
pub mod app_state;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod tracker;
pub mod ws;
