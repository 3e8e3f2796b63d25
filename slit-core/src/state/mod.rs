//! Sorting state machine
//!
//! Defines the authoritative runtime behavior of the machine.
//! One event in, one atomic transition out, plus the side effects
//! the caller must carry out.

pub mod events;
pub mod machine;

pub use events::{Event, InputSource, Material, Notification, Sensor};
pub use machine::{Effect, Effects, Phase, SessionStats, SortingMachine, SortingSession};
