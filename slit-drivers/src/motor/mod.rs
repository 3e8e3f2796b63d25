//! Motor driver implementations
//!
//! - Gated motor: two terminals, mutually exclusive energization
//! - Sequencer: timed routines with supersession

pub mod gated;
pub mod sequencer;

pub use gated::{GatedMotor, MotorError};
pub use sequencer::{MotorSequencer, SequenceOutcome};
