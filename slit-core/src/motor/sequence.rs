//! Timed gate sequences

use heapless::Vec;

use crate::config::MachineTimings;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The two gated motors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Gate {
    /// Trap door under the intake
    Top,
    /// Tilting board above the metal and plastic bins
    Sort,
}

/// Terminal energization of a two-terminal motor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Drive {
    /// Left terminal energized
    Left,
    /// Right terminal energized
    Right,
    /// Both terminals de-energized
    #[default]
    Stop,
}

/// One held drive phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceStep {
    pub drive: Drive,
    pub hold_ms: u32,
}

/// Maximum phases in one sequence
pub const MAX_SEQUENCE_STEPS: usize = 4;

/// Ordered drive phases, followed by an implicit stop
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MotorSequence {
    steps: Vec<SequenceStep, MAX_SEQUENCE_STEPS>,
}

impl MotorSequence {
    /// Phases in order (the trailing stop is not listed)
    pub fn steps(&self) -> &[SequenceStep] {
        &self.steps
    }

    /// Total time the motor is energized
    pub fn duration_ms(&self) -> u32 {
        self.steps.iter().map(|s| s.hold_ms).sum()
    }

    fn two_phase(first: Drive, first_ms: u32, second: Drive, second_ms: u32) -> Self {
        let mut steps = Vec::new();
        let _ = steps.push(SequenceStep {
            drive: first,
            hold_ms: first_ms,
        });
        let _ = steps.push(SequenceStep {
            drive: second,
            hold_ms: second_ms,
        });
        Self { steps }
    }
}

/// Canonical gate routines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Routine {
    /// Open then close the top gate to drop the object
    OpenTopGate,
    /// Tilt the sort board towards the metal bin and back
    DivertMetal,
    /// Tilt the sort board towards the plastic bin and back
    DivertPlastic,
}

impl Routine {
    /// Motor this routine drives
    pub fn gate(self) -> Gate {
        match self {
            Routine::OpenTopGate => Gate::Top,
            Routine::DivertMetal | Routine::DivertPlastic => Gate::Sort,
        }
    }

    /// Concrete phases for the configured timings
    ///
    /// Metal and plastic tilt the sort board in opposite directions.
    pub fn sequence(self, timings: &MachineTimings) -> MotorSequence {
        match self {
            Routine::OpenTopGate => MotorSequence::two_phase(
                Drive::Left,
                timings.top_open_ms,
                Drive::Right,
                timings.top_close_ms,
            ),
            Routine::DivertMetal => MotorSequence::two_phase(
                Drive::Left,
                timings.metal_down_ms,
                Drive::Right,
                timings.metal_up_ms,
            ),
            Routine::DivertPlastic => MotorSequence::two_phase(
                Drive::Right,
                timings.plastic_down_ms,
                Drive::Left,
                timings.plastic_up_ms,
            ),
        }
    }
}
