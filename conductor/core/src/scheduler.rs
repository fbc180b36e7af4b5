//! Tick-Driven Scheduler
//!
//! A priority queue of pending timed jobs. Nothing in the engine sleeps or
//! chains timers: animators schedule a job with a due time, and the render
//! loop drains every job whose due time has been reached on each tick.
//!
//! Jobs due at the same instant run in the order they were scheduled.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

/// A job waiting for its due time
#[derive(Debug)]
struct Pending<J> {
    due: Duration,
    seq: u64,
    job: J,
}

impl<J> PartialEq for Pending<J> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<J> Eq for Pending<J> {}

impl<J> PartialOrd for Pending<J> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<J> Ord for Pending<J> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Min-heap of timed jobs keyed by (due time, insertion order)
#[derive(Debug)]
pub struct Scheduler<J> {
    queue: BinaryHeap<Reverse<Pending<J>>>,
    next_seq: u64,
}

impl<J> Scheduler<J> {
    /// Create an empty scheduler
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `job` to run once the clock reaches `due`
    pub fn schedule_at(&mut self, due: Duration, job: J) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Pending { due, seq, job }));
    }

    /// Schedule `job` to run `delay` after `now`
    pub fn schedule_after(&mut self, now: Duration, delay: Duration, job: J) {
        self.schedule_at(now + delay, job);
    }

    /// Remove and return the earliest job due at or before `now`
    ///
    /// Returns the job together with its due time so that follow-up jobs can
    /// be scheduled on a fixed cadence regardless of frame jitter.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, J)> {
        if self.queue.peek()?.0.due > now {
            return None;
        }
        self.queue.pop().map(|Reverse(p)| (p.due, p.job))
    }

    /// Due time of the earliest pending job
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|Reverse(p)| p.due)
    }

    /// Drop every pending job
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Number of pending jobs
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<J> Default for Scheduler<J> {
    fn default() -> Self {
        Self::new()
    }
}
