//! Board-agnostic core logic for the waste sorting firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Sorting state machine (phases, classification, confirmation)
//! - Self-validating watchdog timeouts
//! - Gate motor sequences and ownership tokens
//! - Feedback tones and the sound module pulse protocol
//! - Timing configuration and its parser
//! - Hardware abstraction traits

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod motor;
pub mod sound;
pub mod state;
pub mod traits;
pub mod watchdog;
