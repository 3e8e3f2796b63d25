//! Gate motor driver trait

use crate::motor::Drive;

/// A two-terminal motor driven open-loop
///
/// Implementations must never energize both terminals at once.
pub trait GateMotorDriver {
    /// Error raised by the underlying outputs
    type Error;

    /// Apply a drive state
    fn drive(&mut self, drive: Drive) -> Result<(), Self::Error>;

    /// Last drive state applied
    fn current_drive(&self) -> Drive;

    /// De-energize both terminals
    fn stop(&mut self) -> Result<(), Self::Error> {
        self.drive(Drive::Stop)
    }

    /// Check if either terminal is energized
    fn is_running(&self) -> bool {
        self.current_drive() != Drive::Stop
    }
}
