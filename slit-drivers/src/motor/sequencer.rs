//! Supersedable motor sequencer
//!
//! Runs a [`MotorSequence`] on one gate motor: each phase is applied and
//! held, then the motor is stopped. Starting a new routine supersedes the
//! running one. The motor and its [`SequenceOwner`] sit behind one
//! blocking mutex, and every device write re-checks the ticket inside
//! that critical section. A superseded run therefore cannot touch the
//! pins again, however late it wakes up.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal_async::delay::DelayNs;

use slit_core::motor::{Drive, MotorSequence, SequenceOwner, SequenceTicket};
use slit_core::traits::GateMotorDriver;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceOutcome {
    /// All phases ran and the motor was stopped
    Completed,
    /// Another routine took the motor first
    Superseded,
}

struct Slot<G> {
    motor: G,
    owner: SequenceOwner,
}

/// Owns one gate motor and arbitrates routines on it
pub struct MotorSequencer<M: RawMutex, G> {
    slot: Mutex<M, RefCell<Slot<G>>>,
}

impl<M: RawMutex, G: GateMotorDriver> MotorSequencer<M, G> {
    pub fn new(motor: G) -> Self {
        Self {
            slot: Mutex::new(RefCell::new(Slot {
                motor,
                owner: SequenceOwner::new(),
            })),
        }
    }

    /// Invalidate the running routine, stop the motor, and take ownership
    pub fn supersede(&self) -> Result<SequenceTicket, G::Error> {
        self.slot.lock(|cell| {
            let mut slot = cell.borrow_mut();
            let ticket = slot.owner.supersede();
            slot.motor.stop()?;
            Ok(ticket)
        })
    }

    /// Run `sequence` while `ticket` stays current
    pub async fn run<D: DelayNs>(
        &self,
        ticket: SequenceTicket,
        sequence: &MotorSequence,
        delay: &mut D,
    ) -> Result<SequenceOutcome, G::Error> {
        for step in sequence.steps() {
            if !self.apply(ticket, step.drive)? {
                return Ok(SequenceOutcome::Superseded);
            }
            delay.delay_ms(step.hold_ms).await;
        }

        if self.apply(ticket, Drive::Stop)? {
            Ok(SequenceOutcome::Completed)
        } else {
            Ok(SequenceOutcome::Superseded)
        }
    }

    /// Supersede whatever is running, then run `sequence`
    pub async fn start<D: DelayNs>(
        &self,
        sequence: &MotorSequence,
        delay: &mut D,
    ) -> Result<SequenceOutcome, G::Error> {
        let ticket = self.supersede()?;
        self.run(ticket, sequence, delay).await
    }

    /// Drive state currently applied to the motor
    pub fn current_drive(&self) -> Drive {
        self.slot.lock(|cell| cell.borrow().motor.current_drive())
    }

    /// Write `drive` if `ticket` still owns the motor
    fn apply(&self, ticket: SequenceTicket, drive: Drive) -> Result<bool, G::Error> {
        self.slot.lock(|cell| {
            let mut slot = cell.borrow_mut();
            if !slot.owner.is_current(ticket) {
                return Ok(false);
            }
            slot.motor.drive(drive)?;
            Ok(true)
        })
    }
}
