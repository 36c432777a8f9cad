//! Position history and repetition (sennichite) judgement.

use crate::types::Side;
use serde::{Deserialize, Serialize};

/// Occurrences of one position that end the game.
pub const REPETITION_THRESHOLD: usize = 4;

/// One recorded position, appended after every completed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub key: u64,
    pub side_to_move: Side,
    /// The side that delivered check to reach this position, if any.
    pub checker: Option<Side>,
}

impl HistoryEntry {
    /// The side whose move produced this position.
    #[inline]
    pub fn mover(&self) -> Side {
        self.side_to_move.opponent()
    }
}

/// Result of a repetition query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Repetition {
    None,
    Draw,
    /// `checker` kept the opponent in check throughout and loses.
    PerpetualCheck { checker: Side },
}

impl Repetition {
    #[inline]
    pub fn is_repetition(self) -> bool {
        !matches!(self, Repetition::None)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionHistory {
    entries: Vec<HistoryEntry>,
}

impl PositionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: u64, side_to_move: Side, checker: Option<Side>) {
        self.entries.push(HistoryEntry { key, side_to_move, checker });
    }

    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn occurrences(&self, key: u64) -> usize {
        self.entries.iter().filter(|e| e.key == key).count()
    }

    /// Judges the most recent entry with the default threshold.
    pub fn check(&self) -> Repetition {
        self.check_with_threshold(REPETITION_THRESHOLD)
    }

    /// Judges the most recent entry.
    ///
    /// Below `threshold` occurrences nothing happens. Otherwise the entries
    /// from the first occurrence through the latest are inspected. A side
    /// whose every move in that span gave check loses by perpetual check;
    /// the replies of the defender do not break the streak. If neither side
    /// or both sides checked throughout, it is a plain draw.
    pub fn check_with_threshold(&self, threshold: usize) -> Repetition {
        let Some(last) = self.entries.last() else {
            return Repetition::None;
        };
        if self.occurrences(last.key) < threshold {
            return Repetition::None;
        }
        let Some(first) = self.entries.iter().position(|e| e.key == last.key) else {
            return Repetition::None;
        };
        let span = &self.entries[first..];
        let checked_throughout = |side: Side| {
            let mut moves = span.iter().filter(|e| e.mover() == side).peekable();
            moves.peek().is_some() && moves.all(|e| e.checker == Some(side))
        };
        match Side::ALL.map(checked_throughout) {
            [true, false] => Repetition::PerpetualCheck { checker: Side::ALL[0] },
            [false, true] => Repetition::PerpetualCheck { checker: Side::ALL[1] },
            _ => Repetition::Draw,
        }
    }
}
