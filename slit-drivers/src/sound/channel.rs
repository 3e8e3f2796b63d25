//! Serialized sound channel
//!
//! The module can only play one tone at a time. [`SoundChannel::play`]
//! waits on an async mutex until the module is free, so callers suspend
//! instead of polling. No tone is ever cut short by a later request.
//!
//! In the firmware a single sound task is the only caller, so request
//! order is set by the tone queue feeding that task. The mutex keeps
//! concurrent callers from interleaving pulses and serves them in
//! arrival order.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use slit_core::sound::Tone;

use super::module::{SoundError, SoundModule};

/// Shared access to one sound module
pub struct SoundChannel<M: RawMutex, P, D> {
    module: Mutex<M, SoundModule<P, D>>,
    playing: BlockingMutex<M, Cell<Option<Tone>>>,
    pulse_ms: u32,
}

impl<M: RawMutex, P: OutputPin, D: DelayNs> SoundChannel<M, P, D> {
    pub fn new(module: SoundModule<P, D>) -> Self {
        let pulse_ms = module.pulse_ms();
        Self {
            module: Mutex::new(module),
            playing: BlockingMutex::new(Cell::new(None)),
            pulse_ms,
        }
    }

    /// How long the channel stays busy for one tone
    pub fn tone_duration_ms(&self, tone: Tone) -> u32 {
        tone.program().duration_ms(self.pulse_ms)
    }

    /// Wait for the channel, then play `tone` to the end
    pub async fn play(&self, tone: Tone) -> Result<(), SoundError> {
        let mut module = self.module.lock().await;
        self.playing.lock(|p| p.set(Some(tone)));
        let result = module.play(tone).await;
        self.playing.lock(|p| p.set(None));
        result
    }

    /// Reset the module, waiting for any tone in progress
    pub async fn reset(&self) -> Result<(), SoundError> {
        self.module.lock().await.reset().await
    }

    /// Tone currently playing, if any
    pub fn current(&self) -> Option<Tone> {
        self.playing.lock(|p| p.get())
    }

    /// Check if a tone is playing
    pub fn is_busy(&self) -> bool {
        self.current().is_some()
    }
}
