//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod controller;
pub mod gate_motor;
pub mod inputs;
pub mod sound;
pub mod watchdog;

use embassy_rp::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Delay;

use slit_drivers::motor::{GatedMotor, MotorSequencer};
use slit_drivers::sound::SoundChannel;

pub use controller::controller_task;
pub use gate_motor::gate_motor_task;
pub use inputs::input_task;
pub use sound::sound_task;
pub use watchdog::watchdog_task;

/// Sequencer for one gate motor on two GPIO outputs
pub type GateSequencer = MotorSequencer<CriticalSectionRawMutex, GatedMotor<Output<'static>>>;

/// Sound module shared by the sound task
pub type SoundPlayer = SoundChannel<CriticalSectionRawMutex, Output<'static>, Delay>;
