//! Pulse-driven sound module
//!
//! Executes [`SoundProgram`]s on the module's three control lines. Lines
//! idle high; a pulse pulls one low for the pulse width and releases it.
//!
//! ```ignore
//! let mut module = SoundModule::new(reset, play, next, Delay, 150)?;
//! module.reset().await?;
//! module.play(Tone::Ok).await?;
//! ```

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use slit_core::sound::{boot_reset_program, SoundLine, SoundProgram, SoundStep, Tone};

/// Errors that can occur while driving the sound module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SoundError {
    /// A control line rejected a write
    Pin(SoundLine),
}

/// Sound module on three control lines
pub struct SoundModule<P, D> {
    reset: P,
    play: P,
    next: P,
    delay: D,
    pulse_ms: u32,
}

impl<P: OutputPin, D: DelayNs> SoundModule<P, D> {
    /// Create the driver and park all lines at their idle (high) level
    pub fn new(reset: P, play: P, next: P, delay: D, pulse_ms: u32) -> Result<Self, SoundError> {
        let mut module = Self {
            reset,
            play,
            next,
            delay,
            pulse_ms,
        };
        for line in [SoundLine::Reset, SoundLine::Play, SoundLine::Next] {
            module.set(line, true)?;
        }
        Ok(module)
    }

    /// Pulse width in milliseconds
    pub fn pulse_ms(&self) -> u32 {
        self.pulse_ms
    }

    /// Put the module in a known state (done once at startup)
    pub async fn reset(&mut self) -> Result<(), SoundError> {
        self.execute(&boot_reset_program()).await
    }

    /// Play one tone to the end
    pub async fn play(&mut self, tone: Tone) -> Result<(), SoundError> {
        self.execute(&tone.program()).await
    }

    /// Execute a program step by step
    pub async fn execute(&mut self, program: &SoundProgram) -> Result<(), SoundError> {
        for step in program.steps() {
            match *step {
                SoundStep::Pulse(line) => {
                    self.set(line, false)?;
                    self.delay.delay_ms(self.pulse_ms).await;
                    self.set(line, true)?;
                }
                SoundStep::Settle => self.delay.delay_ms(self.pulse_ms).await,
                SoundStep::Hold(ms) => self.delay.delay_ms(ms).await,
            }
        }
        Ok(())
    }

    fn set(&mut self, line: SoundLine, high: bool) -> Result<(), SoundError> {
        let pin = match line {
            SoundLine::Reset => &mut self.reset,
            SoundLine::Play => &mut self.play,
            SoundLine::Next => &mut self.next,
        };
        let result = if high { pin.set_high() } else { pin.set_low() };
        result.map_err(|_| SoundError::Pin(line))
    }
}
