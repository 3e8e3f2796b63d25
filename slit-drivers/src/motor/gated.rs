//! Gated two-terminal motor driver
//!
//! Each gate motor is wired to two outputs. Energizing the left terminal
//! turns the motor one way, the right terminal the other way, and both
//! de-energized stops it. The driver never energizes both: it always
//! releases the opposite terminal before energizing the requested one.
//!
//! ```ignore
//! let mut motor = GatedMotor::new(left_pin, right_pin)?;
//! motor.drive(Drive::Left)?;
//! // ... hold ...
//! motor.stop()?;
//! ```

use embedded_hal::digital::OutputPin;

use slit_core::motor::Drive;
use slit_core::traits::GateMotorDriver;

/// Errors that can occur with motor operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// An output pin rejected a write
    Pin,
}

/// Two-terminal gate motor
pub struct GatedMotor<P> {
    left: P,
    right: P,
    drive: Drive,
}

impl<P: OutputPin> GatedMotor<P> {
    /// Create a motor driver and make sure both terminals start released
    pub fn new(left: P, right: P) -> Result<Self, MotorError> {
        let mut motor = Self {
            left,
            right,
            drive: Drive::Stop,
        };
        motor.release_both()?;
        Ok(motor)
    }

    fn release_both(&mut self) -> Result<(), MotorError> {
        self.left.set_low().map_err(|_| MotorError::Pin)?;
        self.right.set_low().map_err(|_| MotorError::Pin)?;
        Ok(())
    }
}

impl<P: OutputPin> GateMotorDriver for GatedMotor<P> {
    type Error = MotorError;

    fn drive(&mut self, drive: Drive) -> Result<(), MotorError> {
        // Record Stop first so a failed write never reports a live terminal
        self.drive = Drive::Stop;
        match drive {
            Drive::Stop => self.release_both()?,
            Drive::Left => {
                self.right.set_low().map_err(|_| MotorError::Pin)?;
                self.left.set_high().map_err(|_| MotorError::Pin)?;
            }
            Drive::Right => {
                self.left.set_low().map_err(|_| MotorError::Pin)?;
                self.right.set_high().map_err(|_| MotorError::Pin)?;
            }
        }
        self.drive = drive;
        Ok(())
    }

    fn current_drive(&self) -> Drive {
        self.drive
    }
}
