//! Deterministic one-shot delay queue driven by simulated time.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    time::Duration,
};

/// Priority queue of payloads that become due after a simulated delay.
///
/// Payloads pop in nondecreasing order of their fire time; payloads sharing a
/// fire time pop in the order they were scheduled. Entries cannot be
/// cancelled once scheduled.
#[derive(Debug)]
pub struct DelayQueue<T> {
    now: Duration,
    next_sequence: u64,
    entries: BinaryHeap<Reverse<Entry<T>>>,
}

impl<T> DelayQueue<T> {
    /// Creates an empty queue whose clock starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_sequence: 0,
            entries: BinaryHeap::new(),
        }
    }

    /// Simulated time elapsed since the queue was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of payloads still waiting to fire.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no payloads are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schedules `payload` to become due `delay` after the current time.
    pub fn schedule(&mut self, delay: Duration, payload: T) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.entries.push(Reverse(Entry {
            fire_at: self.now.saturating_add(delay),
            sequence,
            payload,
        }));
    }

    /// Moves the clock forward without firing anything.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    /// Removes and returns the earliest payload whose fire time has been reached.
    pub fn pop_due(&mut self) -> Option<T> {
        let due = self
            .entries
            .peek()
            .is_some_and(|Reverse(entry)| entry.fire_at <= self.now);
        if !due {
            return None;
        }
        self.entries.pop().map(|Reverse(entry)| entry.payload)
    }
}

impl<T> Default for DelayQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct Entry<T> {
    fire_at: Duration,
    sequence: u64,
    payload: T,
}

impl<T> Entry<T> {
    fn key(&self) -> (Duration, u64) {
        (self.fire_at, self.sequence)
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(queue: &mut DelayQueue<&'static str>) -> Vec<&'static str> {
        std::iter::from_fn(|| queue.pop_due()).collect()
    }

    #[test]
    fn nothing_fires_before_its_time() {
        let mut queue = DelayQueue::new();
        queue.schedule(Duration::from_millis(100), "late");

        queue.advance(Duration::from_millis(99));
        assert!(drain(&mut queue).is_empty());

        queue.advance(Duration::from_millis(1));
        assert_eq!(drain(&mut queue), vec!["late"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn fires_in_time_order_then_scheduling_order() {
        let mut queue = DelayQueue::new();
        queue.schedule(Duration::from_millis(30), "c");
        queue.schedule(Duration::from_millis(10), "a");
        queue.schedule(Duration::from_millis(30), "d");
        queue.schedule(Duration::from_millis(10), "b");
        queue.schedule(Duration::ZERO, "now");

        assert_eq!(drain(&mut queue), vec!["now"]);

        queue.advance(Duration::from_secs(1));
        assert_eq!(drain(&mut queue), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn delays_are_relative_to_the_current_clock() {
        let mut queue = DelayQueue::new();
        queue.advance(Duration::from_millis(500));
        queue.schedule(Duration::from_millis(20), "relative");

        queue.advance(Duration::from_millis(19));
        assert!(drain(&mut queue).is_empty());
        assert_eq!(queue.len(), 1);

        queue.advance(Duration::from_millis(1));
        assert_eq!(drain(&mut queue), vec!["relative"]);
        assert_eq!(queue.now(), Duration::from_millis(520));
    }
}
