//! Main controller task
//!
//! Owns the sorting state machine. Events are handled strictly one at a
//! time, in arrival order, and the resulting effects are dispatched before
//! the next event is taken.

use defmt::*;

use slit_core::config::MachineTimings;
use slit_core::state::{Effect, Event, SortingMachine};

use crate::channels::{gate_commands, ArmRequest, EVENT_CHANNEL, TONE_CHANNEL, WATCHDOG_ARM};

/// Controller task - main coordination loop
#[embassy_executor::task]
pub async fn controller_task(timings: MachineTimings) {
    info!("Controller task started");

    let mut machine = SortingMachine::new(&timings);

    loop {
        let notification = EVENT_CHANNEL.receive().await;
        let event = notification.event;

        let before = machine.session();
        let effects = machine.handle(event);
        let after = machine.session();

        if before.phase != after.phase {
            info!(
                "{:?} -> {:?} on {:?} at {} ms",
                before.phase, after.phase, event, notification.at_ms
            );
        }
        if after.classified.is_some() && after.classified != before.classified {
            info!("Classified as {:?}", after.classified);
        }
        if effects.is_empty() && before == after {
            debug!("Absorbed {:?} in {:?}", event, after.phase);
        }
        if let Event::ButtonPressed(material) = event {
            let stats = machine.stats();
            if after.phase != before.phase {
                info!(
                    "{:?} confirmed, {} objects sorted",
                    material,
                    stats.total_confirmed()
                );
            }
            debug!("Stats: {:?}", stats);
        }

        for effect in effects {
            dispatch(effect, notification.at_ms).await;
        }
    }
}

/// Carry out one effect; watchdog deadlines count from the event's arrival
async fn dispatch(effect: Effect, at_ms: u64) {
    match effect {
        Effect::Run(routine) => gate_commands(routine.gate()).signal(routine),
        Effect::ArmWatchdog { watchdog, after_ms } => {
            WATCHDOG_ARM
                .send(ArmRequest {
                    watchdog,
                    armed_at_ms: at_ms,
                    after_ms,
                })
                .await
        }
        Effect::Play(tone) => TONE_CHANNEL.send(tone).await,
    }
}
