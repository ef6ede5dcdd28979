//! Tick-ordered event queue.
//!
//! Events are stored in a min-heap keyed by `(tick, insertion_order)`.
//! Earlier ticks are popped first; events due on the same tick come out in
//! the order they were pushed.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Entry<E> {
    event: E,
    tick: u64,
    /// Monotonic push counter, breaks ties FIFO.
    seq: u64,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick && self.seq == other.seq
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.tick
            .cmp(&other.tick)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// A priority queue of events keyed by the tick they fall due.
pub struct EventQueue<E> {
    heap: BinaryHeap<Reverse<Entry<E>>>,
    seq: u64,
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Queue `event` to fall due at `tick`.
    pub fn push(&mut self, event: E, tick: u64) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(Entry { event, tick, seq }));
    }

    /// Tick of the earliest queued event.
    pub fn next_tick(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(e)| e.tick)
    }

    /// Pop the earliest event if it is due at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<(E, u64)> {
        if self.next_tick()? > now {
            return None;
        }
        self.heap.pop().map(|Reverse(e)| (e.event, e.tick))
    }

    /// Pop the earliest event regardless of its tick.
    pub fn pop(&mut self) -> Option<(E, u64)> {
        self.heap.pop().map(|Reverse(e)| (e.event, e.tick))
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
