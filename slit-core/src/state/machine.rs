//! Sorting state machine definition
//!
//! All motor and sound behavior is a function of the current session and
//! an event. [`SortingMachine::handle`] is one atomic transition: the
//! caller serializes events and carries out the returned effects in order.
//!
//! No event is ever rejected. Late, early and stale events are absorbed
//! as no-ops or answered with the `NotYet` tone.

use heapless::Vec;

use super::events::{Event, Material, Sensor};
use crate::config::MachineTimings;
use crate::motor::Routine;
use crate::sound::Tone;
use crate::watchdog::{Watchdog, WatchdogKind};

/// Session phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Idle, no object in flight
    #[default]
    Sleeping,
    /// Top gate opened, object in transit
    Falling,
    /// Object passed the sort-zone sensor
    OnSortBoard,
    /// Classified, waiting for the operator's button
    AwaitingConfirmation,
}

impl Phase {
    /// Check if an object is between the top gate and a decision
    pub fn is_in_transit(&self) -> bool {
        matches!(self, Phase::Falling | Phase::OnSortBoard)
    }

    /// Check if a new object may start a session
    pub fn accepts_new_object(&self) -> bool {
        matches!(self, Phase::Sleeping | Phase::AwaitingConfirmation)
    }
}

/// The single live session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SortingSession {
    pub phase: Phase,
    /// Set exactly while `phase == AwaitingConfirmation`
    pub classified: Option<Material>,
    /// Bumped each time a session leaves `Sleeping`
    pub epoch: u32,
}

impl SortingSession {
    /// Check the classification/phase invariant
    pub fn is_consistent(&self) -> bool {
        self.classified.is_some() == (self.phase == Phase::AwaitingConfirmation)
    }
}

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Start a gate routine, superseding whatever runs on that gate
    Run(Routine),
    /// Schedule a watchdog
    ArmWatchdog { watchdog: Watchdog, after_ms: u32 },
    /// Queue a feedback tone
    Play(Tone),
}

/// Maximum effects produced by one transition
pub const MAX_EFFECTS: usize = 4;

/// Effects of one transition, in execution order
pub type Effects = Vec<Effect, MAX_EFFECTS>;

/// Counters for logging, reset only at power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionStats {
    /// Confirmed objects, indexed by [`Material::index`]
    pub confirmed: [u32; 3],
    /// Wrong button pressed while awaiting confirmation
    pub mismatched: u32,
    /// Button pressed with nothing to confirm
    pub premature: u32,
    /// Unconfirmed sessions discarded by a new object
    pub abandoned: u32,
    /// Watchdogs that fired after their session moved on
    pub stale_watchdogs: u32,
}

impl SessionStats {
    /// Confirmed objects of one material
    pub fn confirmed_count(&self, material: Material) -> u32 {
        self.confirmed[material.index()]
    }

    /// Total confirmed objects
    pub fn total_confirmed(&self) -> u32 {
        self.confirmed.iter().sum()
    }
}

/// The sorting state machine
#[derive(Debug, Clone)]
pub struct SortingMachine {
    session: SortingSession,
    paper_timeout_ms: u32,
    plastic_timeout_ms: u32,
    stats: SessionStats,
}

impl Default for SortingMachine {
    fn default() -> Self {
        Self::new(&MachineTimings::default())
    }
}

impl SortingMachine {
    /// Create a sleeping machine
    pub fn new(timings: &MachineTimings) -> Self {
        Self {
            session: SortingSession::default(),
            paper_timeout_ms: timings.paper_timeout_ms,
            plastic_timeout_ms: timings.plastic_timeout_ms,
            stats: SessionStats::default(),
        }
    }

    /// Current session snapshot
    pub fn session(&self) -> SortingSession {
        self.session
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// Current classification, if any
    pub fn classified(&self) -> Option<Material> {
        self.session.classified
    }

    /// Counters since power-up
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Process one event and return the effects to carry out
    pub fn handle(&mut self, event: Event) -> Effects {
        let mut effects = Effects::new();

        match event {
            Event::SensorTriggered(Sensor::Top) => self.on_top_sensor(&mut effects),
            Event::SensorTriggered(Sensor::Sort) => self.on_sort_sensor(&mut effects),
            Event::SensorTriggered(Sensor::Inductive) => self.on_inductive_sensor(&mut effects),
            Event::WatchdogExpired(watchdog) => self.on_watchdog(watchdog, &mut effects),
            Event::ButtonPressed(material) => self.on_button(material, &mut effects),
        }

        effects
    }

    fn on_top_sensor(&mut self, effects: &mut Effects) {
        if !self.session.phase.accepts_new_object() {
            return;
        }
        if self.session.phase == Phase::AwaitingConfirmation {
            // Operator never confirmed; drop the old session silently
            self.stats.abandoned = self.stats.abandoned.saturating_add(1);
            self.reset();
        }

        self.session.epoch = self.session.epoch.wrapping_add(1);
        self.session.phase = Phase::Falling;

        push(effects, Effect::Run(Routine::OpenTopGate));
        push(
            effects,
            Effect::ArmWatchdog {
                watchdog: Watchdog::new(WatchdogKind::Paper, self.session.epoch),
                after_ms: self.paper_timeout_ms,
            },
        );
    }

    fn on_sort_sensor(&mut self, effects: &mut Effects) {
        if self.session.phase != Phase::Falling {
            return;
        }

        self.session.phase = Phase::OnSortBoard;
        push(
            effects,
            Effect::ArmWatchdog {
                watchdog: Watchdog::new(WatchdogKind::Plastic, self.session.epoch),
                after_ms: self.plastic_timeout_ms,
            },
        );
    }

    fn on_inductive_sensor(&mut self, effects: &mut Effects) {
        if !self.session.phase.is_in_transit() {
            return;
        }
        self.classify(Material::Metal, Some(Routine::DivertMetal), effects);
    }

    fn on_watchdog(&mut self, watchdog: Watchdog, effects: &mut Effects) {
        if !watchdog.is_live(self.session.phase, self.session.epoch) {
            self.stats.stale_watchdogs = self.stats.stale_watchdogs.saturating_add(1);
            return;
        }

        let routine = match watchdog.kind {
            // Paper already fell into its bin by gravity
            WatchdogKind::Paper => None,
            WatchdogKind::Plastic => Some(Routine::DivertPlastic),
        };
        self.classify(watchdog.kind.material(), routine, effects);
    }

    fn on_button(&mut self, material: Material, effects: &mut Effects) {
        if self.session.phase != Phase::AwaitingConfirmation {
            self.stats.premature = self.stats.premature.saturating_add(1);
            push(effects, Effect::Play(Tone::NotYet));
            return;
        }

        if self.session.classified == Some(material) {
            let count = &mut self.stats.confirmed[material.index()];
            *count = count.saturating_add(1);
            push(effects, Effect::Play(Tone::Ok));
            self.reset();
        } else {
            self.stats.mismatched = self.stats.mismatched.saturating_add(1);
            push(effects, Effect::Play(Tone::Error));
        }
    }

    fn classify(&mut self, material: Material, routine: Option<Routine>, effects: &mut Effects) {
        self.session.classified = Some(material);
        self.session.phase = Phase::AwaitingConfirmation;

        if let Some(routine) = routine {
            push(effects, Effect::Run(routine));
        }
        push(effects, Effect::Play(Tone::Waiting));
    }

    fn reset(&mut self) {
        self.session.phase = Phase::Sleeping;
        self.session.classified = None;
    }
}

fn push(effects: &mut Effects, effect: Effect) {
    // No transition produces more than MAX_EFFECTS
    let _ = effects.push(effect);
}
