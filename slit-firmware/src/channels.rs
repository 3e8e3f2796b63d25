//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! The controller is the only consumer of [`EVENT_CHANNEL`]; every other
//! task reacts to commands it produces.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use slit_core::motor::{Gate, Routine};
use slit_core::sound::Tone;
use slit_core::state::Notification;
use slit_core::watchdog::Watchdog;

/// Channel capacity for machine events
const EVENT_CHANNEL_SIZE: usize = 8;

/// Channel capacity for watchdog arm requests
const WATCHDOG_ARM_SIZE: usize = 4;

/// Channel capacity for queued tones
const TONE_CHANNEL_SIZE: usize = 4;

/// Request to schedule a watchdog
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct ArmRequest {
    pub watchdog: Watchdog,
    /// Milliseconds since boot when the request was made
    pub armed_at_ms: u64,
    pub after_ms: u32,
}

/// Sensor, button and watchdog events for the controller
pub static EVENT_CHANNEL: Channel<CriticalSectionRawMutex, Notification, EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Watchdogs to schedule (controller -> watchdog task)
pub static WATCHDOG_ARM: Channel<CriticalSectionRawMutex, ArmRequest, WATCHDOG_ARM_SIZE> =
    Channel::new();

/// Routine for the top gate; a new value replaces the running one
pub static TOP_GATE_CMD: Signal<CriticalSectionRawMutex, Routine> = Signal::new();

/// Routine for the sort gate; a new value replaces the running one
pub static SORT_GATE_CMD: Signal<CriticalSectionRawMutex, Routine> = Signal::new();

/// Tones to play, in order
pub static TONE_CHANNEL: Channel<CriticalSectionRawMutex, Tone, TONE_CHANNEL_SIZE> =
    Channel::new();

/// Command signal for one gate
pub fn gate_commands(gate: Gate) -> &'static Signal<CriticalSectionRawMutex, Routine> {
    match gate {
        Gate::Top => &TOP_GATE_CMD,
        Gate::Sort => &SORT_GATE_CMD,
    }
}
