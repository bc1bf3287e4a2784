//! Pending timer queue.
//!
//! Timers never fire on their own: the owner polls with the current time and
//! receives due events in order. Once scheduled, a timer fires unless the
//! whole queue is cleared at teardown.

use crate::particles::RunId;
use std::time::Duration;

/// What a timer delivers when it comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The roll animation has finished.
    RollSettled,
    /// The particle overlay of `run` has finished.
    EffectCompleted { run: RunId },
    /// The frost melt has finished.
    MeltFinished,
}

#[derive(Debug, Clone)]
struct Timer {
    due: Duration,
    seq: u64,
    event: Event,
}

/// Timers ordered by due time, ties broken by scheduling order.
#[derive(Debug, Default)]
pub struct Timers {
    pending: Vec<Timer>,
    next_seq: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Duration, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Timer { due, seq, event });
    }

    /// Earliest due time, if anything is pending.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|t| t.due).min()
    }

    /// Remove and return the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, Event)> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)?;
        let timer = self.pending.swap_remove(index);
        Some((timer.due, timer.event))
    }

    /// Drop every pending timer, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
