//! Deterministic timer queue over simulated time
//!
//! Spawners never sleep. Each pending spawn is an entry keyed by its due time,
//! and cancelling removes the entry outright, so a cancelled callback can
//! never run late.

use std::collections::BTreeMap;
use std::time::Duration;

/// Handle to a scheduled entry; ordering is (due time, insertion order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId {
    due: Duration,
    seq: u64,
}

impl TimerId {
    pub fn due(&self) -> Duration {
        self.due
    }
}

/// Timer queue carrying a payload `K` per entry
#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    now: Duration,
    next_seq: u64,
    pending: BTreeMap<TimerId, K>,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            pending: BTreeMap::new(),
        }
    }
}

impl<K> Scheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward; due entries are collected with [`Self::pop_due`]
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    /// Schedule `key` at an absolute time
    pub fn schedule_at(&mut self, due: Duration, key: K) -> TimerId {
        let id = TimerId {
            due,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending.insert(id, key);
        id
    }

    /// Schedule `key` `delay` after the current time
    pub fn schedule_after(&mut self, delay: Duration, key: K) -> TimerId {
        self.schedule_at(self.now.saturating_add(delay), key)
    }

    /// Remove a pending entry; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.pending.remove(&id).is_some()
    }

    /// Pop the earliest entry that is due at the current time
    pub fn pop_due(&mut self) -> Option<(TimerId, K)> {
        let (&id, _) = self.pending.first_key_value()?;
        if id.due > self.now {
            return None;
        }
        self.pending.remove_entry(&id)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Seconds to a non-negative [`Duration`]
///
/// Negative and NaN give zero; values too large for a `Duration` saturate.
pub fn secs(value: f32) -> Duration {
    Duration::try_from_secs_f32(value.max(0.0)).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut timers = Scheduler::new();
        timers.schedule_after(secs(2.0), "late");
        timers.schedule_after(secs(1.0), "early");
        timers.schedule_after(secs(1.0), "early-second");

        assert!(timers.pop_due().is_none());
        timers.advance(secs(2.5));

        let fired: Vec<_> = std::iter::from_fn(|| timers.pop_due().map(|(_, k)| k)).collect();
        assert_eq!(fired, vec!["early", "early-second", "late"]);
    }

    #[test]
    fn test_cancelled_entry_never_fires() {
        let mut timers = Scheduler::new();
        let id = timers.schedule_after(secs(1.0), 7u8);
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));

        timers.advance(secs(5.0));
        assert!(timers.pop_due().is_none());
        assert_eq!(timers.pending_len(), 0);
    }

    #[test]
    fn test_due_exactly_now() {
        let mut timers = Scheduler::new();
        timers.advance(secs(1.0));
        let id = timers.schedule_after(Duration::ZERO, ());
        assert_eq!(timers.pop_due().map(|(fired, _)| fired), Some(id));
    }

    #[test]
    fn test_secs_saturates() {
        assert_eq!(secs(-1.0), Duration::ZERO);
        assert_eq!(secs(f32::NAN), Duration::ZERO);
        assert_eq!(secs(f32::INFINITY), Duration::MAX);
        assert_eq!(secs(1e30), Duration::MAX);
        assert_eq!(secs(0.5), Duration::from_millis(500));
    }

    #[test]
    fn test_far_future_entry_stays_pending() {
        let mut timers = Scheduler::new();
        timers.schedule_after(Duration::MAX, ());
        timers.advance(secs(1e6));
        assert!(timers.pop_due().is_none());
        assert_eq!(timers.pending_len(), 1);
    }
}
