//! Sequence ownership tokens
//!
//! Each motor keeps a generation counter. Starting a routine supersedes
//! the previous owner by bumping the generation; the running routine must
//! hold a ticket for the current generation before every device write.

/// Proof of ownership of a motor for one routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceTicket {
    generation: u32,
}

impl SequenceTicket {
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Generation counter for one motor
#[derive(Debug, Clone, Default)]
pub struct SequenceOwner {
    generation: u32,
}

impl SequenceOwner {
    pub const fn new() -> Self {
        Self { generation: 0 }
    }

    /// Invalidate every outstanding ticket and issue a new one
    pub fn supersede(&mut self) -> SequenceTicket {
        self.generation = self.generation.wrapping_add(1);
        SequenceTicket {
            generation: self.generation,
        }
    }

    /// Check whether `ticket` still owns the motor
    pub fn is_current(&self, ticket: SequenceTicket) -> bool {
        ticket.generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supersede_invalidates_previous() {
        let mut owner = SequenceOwner::new();
        let first = owner.supersede();
        assert!(owner.is_current(first));

        let second = owner.supersede();
        assert!(!owner.is_current(first));
        assert!(owner.is_current(second));
        assert_ne!(first, second);
    }

    #[test]
    fn test_generation_wraps() {
        let mut owner = SequenceOwner {
            generation: u32::MAX,
        };
        let ticket = owner.supersede();
        assert_eq!(ticket.generation(), 0);
        assert!(owner.is_current(ticket));
    }
}
