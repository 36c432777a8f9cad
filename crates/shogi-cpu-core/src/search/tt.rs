//! Transposition table.
//!
//! Keys already include the side to move, so one table serves both the
//! maximizing and minimizing plies of a search. An entry is only trusted
//! when it was searched at least as deep as the current request.

use std::collections::HashMap;

/// How a stored score relates to the true value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// True value is at least the score.
    Lower,
    /// True value is at most the score.
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
}

pub struct TranspositionTable {
    map: HashMap<u64, TtEntry>,
    capacity: usize,
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> Self {
        TranspositionTable {
            map: HashMap::with_capacity(capacity.min(1 << 16)),
            capacity: capacity.max(1),
        }
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entry for `key` searched to at least `depth`.
    pub fn probe(&self, key: u64, depth: u8) -> Option<TtEntry> {
        self.map.get(&key).copied().filter(|e| e.depth >= depth)
    }

    /// Stores an entry, wiping the whole table first when it is full.
    pub fn store(&mut self, key: u64, entry: TtEntry) {
        if self.map.len() >= self.capacity && !self.map.contains_key(&key) {
            log::debug!("transposition table full ({} entries), clearing", self.map.len());
            self.map.clear();
        }
        self.map.insert(key, entry);
    }
}
