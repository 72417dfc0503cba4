//! Domain layer: brew model, pure progress derivation, and events.
//!
//! This module holds the wire model of a brew session and its temperature
//! log, the stage-timing calculations the presentation layer renders, and
//! the event bus that fans tracker changes out to subscribers.

pub mod brew;
pub mod brew_id;
pub mod event_bus;
pub mod progress;
pub mod temperature;
pub mod timestamp;
pub mod tracker_event;

pub use brew::{BrewSession, BrewStatus, RecipeSnapshot, Stage, StageStatus};
pub use brew_id::BrewId;
pub use event_bus::EventBus;
pub use progress::Remaining;
pub use temperature::TemperatureSample;
pub use tracker_event::TrackerEvent;
