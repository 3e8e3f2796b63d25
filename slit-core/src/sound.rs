//! Feedback tones and the sound module protocol
//!
//! The sound module has three active-low control lines: `reset`, `play`
//! and `next`. Tones are addressed purely by position: after a reset and
//! a play pulse the module plays its first track, and every `next` pulse
//! advances one track. A pulse is: line low, wait the pulse width, line
//! high.
//!
//! [`Tone::program`] spells out the exact line activity for one tone so
//! that drivers only have to execute it.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Feedback tones, in the order they are stored on the sound module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Tone {
    /// Object classified, press the matching button
    Waiting,
    /// Confirmation matched
    Ok,
    /// Wrong button
    Error,
    /// Button pressed before anything was classified
    NotYet,
}

impl Tone {
    /// All tones, in track order
    pub const ALL: [Tone; 4] = [Tone::Waiting, Tone::Ok, Tone::Error, Tone::NotYet];

    /// Track index on the sound module (number of `next` pulses)
    pub fn index(self) -> u8 {
        match self {
            Tone::Waiting => 0,
            Tone::Ok => 1,
            Tone::Error => 2,
            Tone::NotYet => 3,
        }
    }

    /// How long the track plays before the module is reset
    pub fn duration_ms(self) -> u32 {
        match self {
            Tone::Waiting => 2900,
            Tone::Ok => 2150,
            Tone::Error => 2800,
            Tone::NotYet => 3500,
        }
    }

    /// Line activity needed to play this tone
    pub fn program(self) -> SoundProgram {
        let mut steps = Vec::new();
        // Capacity covers the largest index; pushes cannot fail
        let _ = steps.push(SoundStep::Pulse(SoundLine::Reset));
        let _ = steps.push(SoundStep::Settle);
        let _ = steps.push(SoundStep::Pulse(SoundLine::Play));
        for _ in 0..self.index() {
            let _ = steps.push(SoundStep::Pulse(SoundLine::Next));
            let _ = steps.push(SoundStep::Settle);
        }
        let _ = steps.push(SoundStep::Hold(self.duration_ms()));
        let _ = steps.push(SoundStep::Pulse(SoundLine::Reset));
        let _ = steps.push(SoundStep::Settle);
        SoundProgram { steps }
    }
}

/// Control lines of the sound module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SoundLine {
    Reset,
    Play,
    Next,
}

/// One step of line activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SoundStep {
    /// Line low, wait the pulse width, line high
    Pulse(SoundLine),
    /// Wait the pulse width with all lines idle
    Settle,
    /// Wait while the track plays
    Hold(u32),
}

/// Longest program: 3 lead-in, 2 per advance, 3 trailing
pub const MAX_PROGRAM_STEPS: usize = 12;

/// Ordered line activity for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundProgram {
    steps: Vec<SoundStep, MAX_PROGRAM_STEPS>,
}

impl SoundProgram {
    /// Steps in execution order
    pub fn steps(&self) -> &[SoundStep] {
        &self.steps
    }

    /// Count pulses on one line
    pub fn pulses_on(&self, line: SoundLine) -> usize {
        self.steps
            .iter()
            .filter(|s| **s == SoundStep::Pulse(line))
            .count()
    }

    /// Total time the program takes with the given pulse width
    pub fn duration_ms(&self, pulse_ms: u32) -> u32 {
        self.steps
            .iter()
            .map(|s| match s {
                SoundStep::Pulse(_) | SoundStep::Settle => pulse_ms,
                SoundStep::Hold(ms) => *ms,
            })
            .sum()
    }
}

/// Reset pulse issued once at startup so the module is in a known state
pub fn boot_reset_program() -> SoundProgram {
    let mut steps = Vec::new();
    let _ = steps.push(SoundStep::Pulse(SoundLine::Reset));
    SoundProgram { steps }
}
