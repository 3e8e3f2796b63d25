//! Hardware driver implementations
//!
//! This crate provides concrete implementations on top of `embedded-hal`
//! pins and `embedded-hal-async` delays:
//!
//! - Gated two-terminal motors and the supersedable motor sequencer
//! - The pulse-driven sound module and the serialized sound channel

#![no_std]
#![deny(unsafe_code)]

pub mod motor;
pub mod sound;

#[cfg(test)]
pub(crate) mod mock;
