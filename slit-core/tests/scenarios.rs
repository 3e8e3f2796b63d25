//! End-to-end sorting scenarios on a virtual clock
//!
//! The harness plays the role of the firmware: it feeds events to the
//! machine, arms watchdogs in a queue, and records motor and tone effects.

use proptest::prelude::*;

use slit_core::config::MachineTimings;
use slit_core::motor::Routine;
use slit_core::sound::Tone;
use slit_core::state::{Effect, Event, Material, Phase, Sensor, SortingMachine};
use slit_core::watchdog::WatchdogQueue;

struct Harness {
    machine: SortingMachine,
    watchdogs: WatchdogQueue<8>,
    now_ms: u64,
    tones: Vec<Tone>,
    routines: Vec<Routine>,
}

impl Harness {
    fn new() -> Self {
        Self {
            machine: SortingMachine::new(&MachineTimings::default()),
            watchdogs: WatchdogQueue::new(),
            now_ms: 0,
            tones: Vec::new(),
            routines: Vec::new(),
        }
    }

    fn send(&mut self, event: Event) {
        for effect in self.machine.handle(event) {
            match effect {
                Effect::Run(routine) => self.routines.push(routine),
                Effect::ArmWatchdog { watchdog, after_ms } => {
                    self.watchdogs.arm(self.now_ms, after_ms, watchdog);
                }
                Effect::Play(tone) => self.tones.push(tone),
            }
        }
        assert!(self.machine.session().is_consistent());
    }

    fn sensor(&mut self, sensor: Sensor) {
        self.send(Event::SensorTriggered(sensor));
    }

    fn press(&mut self, material: Material) {
        self.send(Event::ButtonPressed(material));
    }

    /// Move the clock forward, firing every watchdog that falls due
    fn advance(&mut self, ms: u64) {
        let target = self.now_ms + ms;
        while let Some(deadline) = self.watchdogs.next_deadline() {
            if deadline > target {
                break;
            }
            self.now_ms = deadline;
            while let Some(watchdog) = self.watchdogs.pop_expired(self.now_ms) {
                self.send(Event::WatchdogExpired(watchdog));
            }
        }
        self.now_ms = target;
    }

    fn clear_log(&mut self) {
        self.tones.clear();
        self.routines.clear();
    }
}

#[test]
fn scenario_metal_right_after_top() {
    let mut h = Harness::new();
    h.sensor(Sensor::Top);
    h.sensor(Sensor::Inductive);

    assert_eq!(h.machine.phase(), Phase::AwaitingConfirmation);
    assert_eq!(h.machine.classified(), Some(Material::Metal));
    assert_eq!(h.tones, [Tone::Waiting]);
    assert_eq!(h.routines, [Routine::OpenTopGate, Routine::DivertMetal]);

    // The paper watchdog still fires later, and must do nothing
    h.clear_log();
    h.advance(20_000);
    assert!(h.tones.is_empty());
    assert!(h.routines.is_empty());
    assert_eq!(h.machine.classified(), Some(Material::Metal));
}

#[test]
fn scenario_plastic_by_timeout() {
    let mut h = Harness::new();
    h.sensor(Sensor::Top);
    h.advance(800);
    h.sensor(Sensor::Sort);

    h.advance(2_999);
    assert_eq!(h.machine.phase(), Phase::OnSortBoard);
    assert!(h.tones.is_empty());

    h.advance(1);
    assert_eq!(h.machine.phase(), Phase::AwaitingConfirmation);
    assert_eq!(h.machine.classified(), Some(Material::Plastic));
    assert_eq!(h.tones, [Tone::Waiting]);
    assert_eq!(h.routines, [Routine::OpenTopGate, Routine::DivertPlastic]);

    // The earlier paper deadline passes without effect
    h.advance(10_000);
    assert_eq!(h.tones, [Tone::Waiting]);
    assert_eq!(h.machine.classified(), Some(Material::Plastic));
}

#[test]
fn scenario_paper_by_timeout() {
    let mut h = Harness::new();
    h.sensor(Sensor::Top);

    h.advance(9_999);
    assert_eq!(h.machine.phase(), Phase::Falling);

    h.advance(1);
    assert_eq!(h.machine.classified(), Some(Material::Paper));
    assert_eq!(h.tones, [Tone::Waiting]);
    assert_eq!(h.routines, [Routine::OpenTopGate]);
}

#[test]
fn scenario_button_while_sleeping() {
    let mut h = Harness::new();
    h.press(Material::Metal);

    assert_eq!(h.tones, [Tone::NotYet]);
    assert_eq!(h.machine.phase(), Phase::Sleeping);
    assert_eq!(h.machine.classified(), None);
    assert!(h.routines.is_empty());
}

#[test]
fn scenario_abandoned_object() {
    let mut h = Harness::new();
    h.sensor(Sensor::Top);
    h.sensor(Sensor::Inductive);
    h.clear_log();

    h.sensor(Sensor::Top);
    assert_eq!(h.machine.phase(), Phase::Falling);
    assert_eq!(h.machine.classified(), None);
    assert_eq!(h.routines, [Routine::OpenTopGate]);
    assert!(h.tones.is_empty());
    assert_eq!(h.machine.stats().abandoned, 1);

    // The new session classifies on its own timeline
    h.advance(5_000);
    h.sensor(Sensor::Sort);
    h.advance(3_000);
    assert_eq!(h.machine.classified(), Some(Material::Plastic));
    assert_eq!(h.tones, [Tone::Waiting]);
}

#[test]
fn scenario_stale_paper_from_previous_session() {
    let mut h = Harness::new();
    h.sensor(Sensor::Top);
    h.sensor(Sensor::Inductive);
    h.press(Material::Metal);
    h.advance(6_000);

    // Second object falls; the first paper watchdog is due in 4 s
    h.sensor(Sensor::Top);
    h.clear_log();
    h.advance(4_000);
    assert_eq!(h.machine.phase(), Phase::Falling);
    assert!(h.tones.is_empty());

    // Its own watchdog still classifies on time
    h.advance(6_000);
    assert_eq!(h.machine.classified(), Some(Material::Paper));
    assert_eq!(h.tones, [Tone::Waiting]);
}

#[test]
fn full_cycle_with_retry() {
    let mut h = Harness::new();
    h.sensor(Sensor::Top);
    h.sensor(Sensor::Sort);
    h.advance(3_000);
    h.press(Material::Metal);
    h.press(Material::Plastic);

    assert_eq!(h.tones, [Tone::Waiting, Tone::Error, Tone::Ok]);
    assert_eq!(h.machine.phase(), Phase::Sleeping);
    assert_eq!(h.machine.stats().confirmed_count(Material::Plastic), 1);
    assert_eq!(h.machine.stats().mismatched, 1);
    assert_eq!(h.machine.stats().total_confirmed(), 1);
}

#[test]
fn held_back_watchdog_checked_on_delivery() {
    let mut h = Harness::new();
    h.sensor(Sensor::Top);

    // Paper is due, but the controller has no room for it yet
    h.now_ms = 10_000;
    let held = h.watchdogs.peek_expired(h.now_ms).unwrap();

    // The object reaches the sort board before the expiry gets through
    h.sensor(Sensor::Sort);
    assert_eq!(h.watchdogs.len(), 2);
    assert_eq!(h.watchdogs.peek_expired(h.now_ms), Some(held));

    assert_eq!(h.watchdogs.pop_expired(h.now_ms), Some(held));
    h.send(Event::WatchdogExpired(held));
    assert_eq!(h.machine.phase(), Phase::OnSortBoard);
    assert_eq!(h.machine.stats().stale_watchdogs, 1);

    h.advance(3_000);
    assert_eq!(h.machine.classified(), Some(Material::Plastic));
    assert_eq!(h.routines, [Routine::OpenTopGate, Routine::DivertPlastic]);
}

fn any_event() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Sensor(Sensor::Top)),
        Just(Step::Sensor(Sensor::Sort)),
        Just(Step::Sensor(Sensor::Inductive)),
        Just(Step::Press(Material::Plastic)),
        Just(Step::Press(Material::Metal)),
        Just(Step::Press(Material::Paper)),
        (0u64..12_000).prop_map(Step::Wait),
    ]
}

#[derive(Debug, Clone)]
enum Step {
    Sensor(Sensor),
    Press(Material),
    Wait(u64),
}

proptest! {
    #[test]
    fn classification_set_only_while_awaiting(steps in prop::collection::vec(any_event(), 0..60)) {
        let mut h = Harness::new();
        for step in steps {
            match step {
                Step::Sensor(s) => h.sensor(s),
                Step::Press(m) => h.press(m),
                Step::Wait(ms) => h.advance(ms),
            }
            let session = h.machine.session();
            prop_assert!(session.is_consistent());
        }
    }

    #[test]
    fn matching_press_always_confirms(steps in prop::collection::vec(any_event(), 0..40)) {
        let mut h = Harness::new();
        for step in steps {
            match step {
                Step::Sensor(s) => h.sensor(s),
                Step::Press(m) => h.press(m),
                Step::Wait(ms) => h.advance(ms),
            }
        }
        if let Some(material) = h.machine.classified() {
            for other in Material::ALL.into_iter().filter(|m| *m != material) {
                h.tones.clear();
                h.press(other);
                prop_assert_eq!(&h.tones, &[Tone::Error]);
                prop_assert_eq!(h.machine.phase(), Phase::AwaitingConfirmation);
            }
            h.tones.clear();
            h.press(material);
            prop_assert_eq!(&h.tones, &[Tone::Ok]);
            prop_assert_eq!(h.machine.phase(), Phase::Sleeping);
            prop_assert_eq!(h.machine.classified(), None);
        }
    }

    #[test]
    fn stale_watchdogs_have_no_effect(steps in prop::collection::vec(any_event(), 0..40)) {
        let mut h = Harness::new();
        for step in steps {
            match step {
                Step::Sensor(s) => h.sensor(s),
                Step::Press(m) => h.press(m),
                Step::Wait(ms) => h.advance(ms),
            }
        }
        // Replay every possible watchdog from every earlier session
        let session = h.machine.session();
        for epoch in 0..=session.epoch {
            for kind in [slit_core::watchdog::WatchdogKind::Paper, slit_core::watchdog::WatchdogKind::Plastic] {
                let watchdog = slit_core::watchdog::Watchdog::new(kind, epoch);
                if watchdog.is_live(session.phase, session.epoch) {
                    continue;
                }
                let effects = h.machine.handle(Event::WatchdogExpired(watchdog));
                prop_assert!(effects.is_empty());
                prop_assert_eq!(h.machine.session(), session);
            }
        }
    }
}
