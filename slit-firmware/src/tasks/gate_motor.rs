//! Gate motor task
//!
//! One instance per gate. Waits for a routine on the gate's command signal
//! and runs it. A routine arriving mid-run cancels the running one; the
//! sequencer then stops the motor before the new routine's first phase.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::Delay;

use slit_core::config::MachineTimings;
use slit_core::motor::{Gate, Routine};
use slit_drivers::motor::SequenceOutcome;

use super::GateSequencer;
use crate::channels::gate_commands;

/// Gate motor control task
#[embassy_executor::task(pool_size = 2)]
pub async fn gate_motor_task(
    gate: Gate,
    sequencer: &'static GateSequencer,
    timings: MachineTimings,
) {
    info!("Gate motor task started: {:?}", gate);

    let commands = gate_commands(gate);
    let mut delay = Delay;
    let mut routine = commands.wait().await;

    loop {
        if routine.gate() != gate {
            warn!("{:?} routed to {:?} gate, ignored", routine, gate);
            routine = commands.wait().await;
            continue;
        }

        let ticket = match sequencer.supersede() {
            Ok(ticket) => ticket,
            Err(e) => {
                warn!("{:?} gate stop failed: {:?}", gate, e);
                routine = commands.wait().await;
                continue;
            }
        };

        let sequence = routine.sequence(&timings);
        info!(
            "{:?} gate: {:?} for {} ms (ticket {})",
            gate,
            routine,
            sequence.duration_ms(),
            ticket.generation()
        );

        let next: Routine = match select(
            sequencer.run(ticket, &sequence, &mut delay),
            commands.wait(),
        )
        .await
        {
            Either::First(Ok(SequenceOutcome::Completed)) => {
                debug!("{:?} gate: {:?} done", gate, routine);
                commands.wait().await
            }
            Either::First(Ok(SequenceOutcome::Superseded)) => {
                debug!("{:?} gate: {:?} superseded", gate, routine);
                commands.wait().await
            }
            Either::First(Err(e)) => {
                warn!("{:?} gate: {:?} failed: {:?}", gate, routine, e);
                commands.wait().await
            }
            Either::Second(next) => {
                info!("{:?} gate: {:?} replaced by {:?}", gate, routine, next);
                next
            }
        };
        routine = next;
    }
}
