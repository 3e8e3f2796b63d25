//! Sensor and button input task
//!
//! One task instance per input. All inputs are pulled up and active low,
//! so an event is a falling edge.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Instant};

use slit_core::state::{InputSource, Notification};

use crate::channels::EVENT_CHANNEL;

/// Input watcher task
///
/// Edges closer than `debounce_ms` to the last accepted edge are dropped.
#[embassy_executor::task(pool_size = 6)]
pub async fn input_task(mut pin: Input<'static>, source: InputSource, debounce_ms: u32) {
    info!("Input task started: {:?}", source);

    let window = Duration::from_millis(debounce_ms as u64);
    let mut last: Option<Instant> = None;

    loop {
        pin.wait_for_falling_edge().await;
        let now = Instant::now();

        if let Some(prev) = last {
            if now.duration_since(prev) < window {
                trace!("Glitch on {:?} ignored", source);
                continue;
            }
        }
        last = Some(now);

        debug!("Edge on {:?}", source);
        EVENT_CHANNEL
            .send(Notification::new(source.event(), now.as_millis()))
            .await;
    }
}
