//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams [`TrackerEvent`]s for the brews
//! a client subscribed to and answers `get_view` requests.
//!
//! [`TrackerEvent`]: crate::domain::TrackerEvent

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
