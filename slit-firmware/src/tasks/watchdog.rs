//! Watchdog timer task
//!
//! Keeps pending watchdogs in deadline order and feeds expired ones back to
//! the controller. Whether an expiry still matters is the controller's
//! call: this task never drops a watchdog because the machine moved on.
//!
//! A due watchdog stays in the queue until the event channel takes it.
//! The send races against new arm requests, so the controller can always
//! hand over a watchdog even while the event channel is full.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Timer};

use slit_core::state::{Event, Notification};
use slit_core::watchdog::WatchdogQueue;

use crate::channels::{EVENT_CHANNEL, WATCHDOG_ARM};

/// Pending watchdog capacity
const MAX_PENDING: usize = 4;

/// Watchdog task
#[embassy_executor::task]
pub async fn watchdog_task() {
    info!("Watchdog task started");

    let mut queue: WatchdogQueue<MAX_PENDING> = WatchdogQueue::new();

    loop {
        let now_ms = Instant::now().as_millis();
        let due = queue.peek_expired(now_ms);
        let deadline = queue.next_deadline();

        let fire = async {
            match (due, deadline) {
                (Some(watchdog), _) => {
                    EVENT_CHANNEL
                        .send(Notification::new(Event::WatchdogExpired(watchdog), now_ms))
                        .await;
                    true
                }
                (None, Some(ms)) => {
                    Timer::at(Instant::from_millis(ms)).await;
                    false
                }
                (None, None) => core::future::pending::<bool>().await,
            }
        };

        match select(WATCHDOG_ARM.receive(), fire).await {
            Either::First(request) => {
                debug!(
                    "Arming {:?} for {} ms",
                    request.watchdog, request.after_ms
                );
                if let Some(evicted) =
                    queue.arm(request.armed_at_ms, request.after_ms, request.watchdog)
                {
                    warn!("Watchdog queue full, dropped {:?}", evicted.watchdog);
                }
            }
            Either::Second(true) => {
                let delivered = queue.pop_expired(now_ms);
                debug!("Watchdog fired: {:?}", delivered);
            }
            // A deadline passed; the next round delivers it
            Either::Second(false) => {}
        }
    }
}
