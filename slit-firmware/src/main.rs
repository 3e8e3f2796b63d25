//! SLIT - Waste Sorting Machine Firmware
//!
//! Main firmware binary for the RP2040-based sorting bin. Objects drop
//! through a motorized top gate onto a tilting sort board; optical and
//! inductive sensors classify them as plastic, metal or paper, and the
//! operator confirms with one of three buttons.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use slit_core::config::{parse_timings, MachineTimings};
use slit_core::motor::Gate;
use slit_core::state::{InputSource, Material, Sensor};
use slit_drivers::motor::{GatedMotor, MotorSequencer};
use slit_drivers::sound::{SoundChannel, SoundModule};

use crate::tasks::{GateSequencer, SoundPlayer};

/// Embedded default configuration (compiled into firmware)
/// Edit machine.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../machine.toml");

mod channels;
mod tasks;

// Static cells for drivers shared with tasks (must live forever)
static TOP_GATE: StaticCell<GateSequencer> = StaticCell::new();
static SORT_GATE: StaticCell<GateSequencer> = StaticCell::new();
static SOUND: StaticCell<SoundPlayer> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("SLIT firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let timings = load_timings();
    info!("Timings: {:?}", timings);

    // Sensors and buttons are pulled up and pulled to ground when active
    let inputs = [
        (Input::new(p.PIN_3, Pull::Up), InputSource::Sensor(Sensor::Top)),
        (Input::new(p.PIN_2, Pull::Up), InputSource::Sensor(Sensor::Sort)),
        (Input::new(p.PIN_4, Pull::Up), InputSource::Sensor(Sensor::Inductive)),
        (Input::new(p.PIN_6, Pull::Up), InputSource::Button(Material::Plastic)),
        (Input::new(p.PIN_7, Pull::Up), InputSource::Button(Material::Metal)),
        (Input::new(p.PIN_8, Pull::Up), InputSource::Button(Material::Paper)),
    ];

    // Gate motors: one output per direction, both low = stopped
    let top_motor = unwrap!(GatedMotor::new(
        Output::new(p.PIN_10, Level::Low),
        Output::new(p.PIN_11, Level::Low),
    ));
    let sort_motor = unwrap!(GatedMotor::new(
        Output::new(p.PIN_12, Level::Low),
        Output::new(p.PIN_13, Level::Low),
    ));
    let top_gate: &'static GateSequencer = TOP_GATE.init(MotorSequencer::new(top_motor));
    let sort_gate: &'static GateSequencer = SORT_GATE.init(MotorSequencer::new(sort_motor));
    info!("Gate motors initialized");

    // Sound module control lines idle high
    let module = unwrap!(SoundModule::new(
        Output::new(p.PIN_16, Level::High),
        Output::new(p.PIN_17, Level::High),
        Output::new(p.PIN_18, Level::High),
        Delay,
        timings.pulse_ms,
    ));
    let sound: &'static SoundPlayer = SOUND.init(SoundChannel::new(module));
    info!("Sound module initialized");

    // Spawn tasks
    for (pin, source) in inputs {
        spawner
            .spawn(tasks::input_task(pin, source, timings.debounce_ms))
            .unwrap();
    }
    spawner.spawn(tasks::controller_task(timings)).unwrap();
    spawner.spawn(tasks::watchdog_task()).unwrap();
    spawner
        .spawn(tasks::gate_motor_task(Gate::Top, top_gate, timings))
        .unwrap();
    spawner
        .spawn(tasks::gate_motor_task(Gate::Sort, sort_gate, timings))
        .unwrap();
    spawner.spawn(tasks::sound_task(sound)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse the embedded machine.toml, falling back to built-in timings
fn load_timings() -> MachineTimings {
    let timings = match parse_timings(EMBEDDED_CONFIG) {
        Ok(timings) => timings,
        Err(e) => {
            error!("machine.toml parse error: {:?}, using defaults", e);
            return MachineTimings::default();
        }
    };

    match timings.validate() {
        Ok(()) => timings,
        Err(e) => {
            error!("machine.toml rejected: {:?}, using defaults", e);
            MachineTimings::default()
        }
    }
}
