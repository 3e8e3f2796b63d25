//! Configuration types
//!
//! Board-agnostic timing configuration and the parser for the
//! `[timing]` table of `machine.toml`.

pub mod parse;
pub mod timings;

pub use parse::{parse_timings, ParseError};
pub use timings::{ConfigError, MachineTimings};
