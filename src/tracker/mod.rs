//! Tracker layer: timer-driven acquisition of brew state.
//!
//! [`BrewSessionTracker`] polls one brew and keeps its read model,
//! [`TrackerRegistry`] owns the mounted trackers, and [`TrackerView`]
//! renders a snapshot for presentation clients.

pub mod clock;
pub mod periodic;
pub mod registry;
pub mod session_tracker;
pub mod state;
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use periodic::{FirstTick, PeriodicTask};
pub use registry::{TrackerRegistry, TrackerSummary};
pub use session_tracker::{BrewSessionTracker, TrackerOptions};
pub use state::{FetchKind, SessionOutcome, TrackerSnapshot, TrackerState};
pub use view::TrackerView;
