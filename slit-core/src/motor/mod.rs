//! Gate motor model
//!
//! Both gates are driven open-loop by two-terminal motors. A routine is a
//! timed list of drive phases that always ends de-energized. At most one
//! routine owns a motor; ownership is tracked with generation tickets.

pub mod ownership;
pub mod sequence;

pub use ownership::{SequenceOwner, SequenceTicket};
pub use sequence::{Drive, Gate, MotorSequence, Routine, SequenceStep, MAX_SEQUENCE_STEPS};
