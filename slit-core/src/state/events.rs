//! Events that trigger state transitions

use crate::watchdog::Watchdog;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Material an object can be classified as
///
/// Also identifies the confirmation button the operator presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Material {
    Plastic,
    Metal,
    Paper,
}

impl Material {
    /// All materials, in button order
    pub const ALL: [Material; 3] = [Material::Plastic, Material::Metal, Material::Paper];

    /// Position in [`Material::ALL`]
    pub fn index(self) -> usize {
        match self {
            Material::Plastic => 0,
            Material::Metal => 1,
            Material::Paper => 2,
        }
    }
}

/// Sensors along the object's path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Sensor {
    /// Object dropped onto the top gate
    Top,
    /// Object reached the sort board
    Sort,
    /// Inductive sensor saw metal
    Inductive,
}

/// One of the six edge-triggered event sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputSource {
    Sensor(Sensor),
    Button(Material),
}

impl InputSource {
    /// Every input wired to the board
    pub const ALL: [InputSource; 6] = [
        InputSource::Sensor(Sensor::Top),
        InputSource::Sensor(Sensor::Sort),
        InputSource::Sensor(Sensor::Inductive),
        InputSource::Button(Material::Plastic),
        InputSource::Button(Material::Metal),
        InputSource::Button(Material::Paper),
    ];

    /// The event this source raises on an edge
    pub fn event(self) -> Event {
        match self {
            InputSource::Sensor(sensor) => Event::SensorTriggered(sensor),
            InputSource::Button(material) => Event::ButtonPressed(material),
        }
    }
}

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A sensor edge arrived
    SensorTriggered(Sensor),
    /// Operator pressed a confirmation button
    ButtonPressed(Material),
    /// A watchdog deadline elapsed (may be stale)
    WatchdogExpired(Watchdog),
}

impl Event {
    /// Check if this event comes from the operator
    pub fn is_user_event(&self) -> bool {
        matches!(self, Event::ButtonPressed(_))
    }

    /// Check if this event comes from a timer rather than hardware
    pub fn is_timer_event(&self) -> bool {
        matches!(self, Event::WatchdogExpired(_))
    }
}

/// An event together with its arrival time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Notification {
    pub event: Event,
    /// Milliseconds since boot
    pub at_ms: u64,
}

impl Notification {
    pub fn new(event: Event, at_ms: u64) -> Self {
        Self { event, at_ms }
    }
}
