//! Sound module drivers
//!
//! - Module: executes the reset/play/next pulse protocol
//! - Channel: one tone at a time, callers wait their turn

pub mod channel;
pub mod module;

pub use channel::SoundChannel;
pub use module::{SoundError, SoundModule};
