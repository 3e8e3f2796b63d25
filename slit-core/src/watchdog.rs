//! Self-validating timeouts
//!
//! A watchdog is a delayed "classify if nothing else happens" action.
//! There is no cancel operation: when a watchdog fires, the state machine
//! re-checks the live session and drops the watchdog if the session has
//! moved on. Several stale watchdogs can therefore be pending at once.
//!
//! [`WatchdogQueue`] is the bookkeeping for pending deadlines. The firmware
//! timer task owns one and feeds expired entries back as events.

use heapless::Vec;

use crate::state::{Material, Phase};

/// Which timeout a watchdog implements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchdogKind {
    /// Nothing reached the sort board: the object fell into the paper path
    Paper,
    /// Object sat on the sort board without tripping the inductive sensor
    Plastic,
}

impl WatchdogKind {
    /// Phase the session must still be in for the watchdog to act
    pub fn expected_phase(self) -> Phase {
        match self {
            WatchdogKind::Paper => Phase::Falling,
            WatchdogKind::Plastic => Phase::OnSortBoard,
        }
    }

    /// Classification applied when the watchdog acts
    pub fn material(self) -> Material {
        match self {
            WatchdogKind::Paper => Material::Paper,
            WatchdogKind::Plastic => Material::Plastic,
        }
    }
}

/// A pending timeout bound to one sorting session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Watchdog {
    pub kind: WatchdogKind,
    /// Session epoch at arm time
    pub epoch: u32,
}

impl Watchdog {
    pub fn new(kind: WatchdogKind, epoch: u32) -> Self {
        Self { kind, epoch }
    }

    /// Check whether this watchdog may still act on a session
    pub fn is_live(&self, phase: Phase, epoch: u32) -> bool {
        self.epoch == epoch && self.kind.expected_phase() == phase
    }
}

/// A watchdog with its absolute deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingWatchdog {
    pub deadline_ms: u64,
    pub watchdog: Watchdog,
}

/// Bounded set of pending watchdogs
///
/// Arming into a full queue evicts the entry with the earliest deadline.
/// Only the most recently armed watchdog can still be live, so an
/// evicted entry would have been a no-op anyway.
#[derive(Debug, Clone, Default)]
pub struct WatchdogQueue<const N: usize> {
    pending: Vec<PendingWatchdog, N>,
}

impl<const N: usize> WatchdogQueue<N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self { pending: Vec::new() }
    }

    /// Schedule `watchdog` to fire `after_ms` from `now_ms`
    ///
    /// Returns the evicted entry if the queue was full.
    pub fn arm(&mut self, now_ms: u64, after_ms: u32, watchdog: Watchdog) -> Option<PendingWatchdog> {
        let entry = PendingWatchdog {
            deadline_ms: now_ms.saturating_add(after_ms as u64),
            watchdog,
        };

        let evicted = if self.pending.is_full() {
            self.earliest_index().map(|i| self.pending.swap_remove(i))
        } else {
            None
        };

        // Capacity was made above (N == 0 drops everything)
        let _ = self.pending.push(entry);
        evicted
    }

    /// Earliest pending deadline, if any
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.iter().map(|p| p.deadline_ms).min()
    }

    /// Earliest watchdog whose deadline has passed, left in the queue
    ///
    /// Lets the owner hold a due entry until it can be delivered, then
    /// take it with [`pop_expired`](Self::pop_expired).
    pub fn peek_expired(&self, now_ms: u64) -> Option<Watchdog> {
        let i = self.earliest_index()?;
        let entry = &self.pending[i];
        (entry.deadline_ms <= now_ms).then_some(entry.watchdog)
    }

    /// Remove and return the earliest watchdog whose deadline has passed
    ///
    /// Call repeatedly until `None` to drain everything due.
    pub fn pop_expired(&mut self, now_ms: u64) -> Option<Watchdog> {
        let i = self.earliest_index()?;
        if self.pending[i].deadline_ms > now_ms {
            return None;
        }
        Some(self.pending.swap_remove(i).watchdog)
    }

    /// Number of pending watchdogs
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn earliest_index(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| p.deadline_ms)
            .map(|(i, _)| i)
    }
}
