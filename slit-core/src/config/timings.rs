//! Timing configuration
//!
//! All durations are in milliseconds. Defaults match the gate mechanics
//! and sound module of the reference machine.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sound::Tone;

/// Machine timing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MachineTimings {
    /// Top gate opened, nothing else happened: classify as paper
    pub paper_timeout_ms: u32,
    /// Object on the sort board, no metal seen: classify as plastic
    pub plastic_timeout_ms: u32,
    /// Top gate opening phase
    pub top_open_ms: u32,
    /// Top gate closing phase
    pub top_close_ms: u32,
    /// Sort gate tilt towards the metal bin
    pub metal_down_ms: u32,
    /// Sort gate return from the metal bin
    pub metal_up_ms: u32,
    /// Sort gate tilt towards the plastic bin
    pub plastic_down_ms: u32,
    /// Sort gate return from the plastic bin
    pub plastic_up_ms: u32,
    /// Width of one sound module control pulse
    pub pulse_ms: u32,
    /// Input glitch filter window
    pub debounce_ms: u32,
}

impl Default for MachineTimings {
    fn default() -> Self {
        Self {
            paper_timeout_ms: 10_000,
            plastic_timeout_ms: 3_000,
            top_open_ms: 500,
            top_close_ms: 600,
            metal_down_ms: 500,
            metal_up_ms: 500,
            plastic_down_ms: 500,
            plastic_up_ms: 500,
            pulse_ms: 150,
            debounce_ms: 400,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A duration that must be positive is zero
    ZeroDuration(&'static str),
    /// Pulse width does not fit inside the shortest tone
    PulseTooLong,
}

impl MachineTimings {
    /// Check the timings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("paper_timeout_ms", self.paper_timeout_ms),
            ("plastic_timeout_ms", self.plastic_timeout_ms),
            ("top_open_ms", self.top_open_ms),
            ("top_close_ms", self.top_close_ms),
            ("metal_down_ms", self.metal_down_ms),
            ("metal_up_ms", self.metal_up_ms),
            ("plastic_down_ms", self.plastic_down_ms),
            ("plastic_up_ms", self.plastic_up_ms),
            ("pulse_ms", self.pulse_ms),
        ];
        for (name, value) in required {
            if value == 0 {
                return Err(ConfigError::ZeroDuration(name));
            }
        }

        let shortest_tone = Tone::ALL
            .iter()
            .map(|t| t.duration_ms())
            .min()
            .unwrap_or(0);
        if self.pulse_ms > shortest_tone {
            return Err(ConfigError::PulseTooLong);
        }

        Ok(())
    }
}
