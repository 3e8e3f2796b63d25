//! Sound task
//!
//! Resets the sound module once at boot, then plays queued tones one after
//! another. Each tone plays to the end before the next one starts.

use defmt::*;

use super::SoundPlayer;
use crate::channels::TONE_CHANNEL;

/// Sound playback task
#[embassy_executor::task]
pub async fn sound_task(sound: &'static SoundPlayer) {
    info!("Sound task started");

    if let Err(e) = sound.reset().await {
        warn!("Sound module reset failed: {:?}", e);
    }

    loop {
        let tone = TONE_CHANNEL.receive().await;
        debug!("Playing {:?} ({} ms)", tone, sound.tone_duration_ms(tone));
        if let Err(e) = sound.play(tone).await {
            warn!("Tone {:?} failed: {:?}", tone, e);
        }
    }
}
