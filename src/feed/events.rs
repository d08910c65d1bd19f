//! src/feed/events.rs
//!
//! Bounded history of layout events for the on-screen log.

use std::collections::VecDeque;

#[derive(Debug)]
pub struct EventLog {
    entries: VecDeque<(u64, String)>,
    max_entries: usize,
    next_seq: u64,
}

impl EventLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
            next_seq: 0,
        }
    }

    /// Record an event; the oldest entry falls off once full.
    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push_back((self.next_seq, message.into()));
        self.next_seq += 1;
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// Entries with their sequence numbers, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> {
        self.entries.iter().map(|(seq, msg)| (*seq, msg.as_str()))
    }
}
