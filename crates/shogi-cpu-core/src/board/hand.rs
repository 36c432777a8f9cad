//! Captured-piece pool

use crate::types::PieceKind;
use serde::{Deserialize, Serialize};

/// Multiset of base kinds a side may drop. Order of capture is not kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hand {
    counts: [u8; 7],
}

impl Hand {
    pub const fn new() -> Self {
        Hand { counts: [0; 7] }
    }

    #[inline]
    pub fn count(&self, kind: PieceKind) -> u8 {
        kind.hand_index().map_or(0, |i| self.counts[i])
    }

    #[inline]
    pub fn contains(&self, kind: PieceKind) -> bool {
        self.count(kind) > 0
    }

    /// Returns `false` for the king, which never enters a pool.
    pub(crate) fn add(&mut self, kind: PieceKind) -> bool {
        match kind.hand_index() {
            Some(i) => {
                self.counts[i] = self.counts[i].saturating_add(1);
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove(&mut self, kind: PieceKind) -> bool {
        match kind.hand_index() {
            Some(i) if self.counts[i] > 0 => {
                self.counts[i] -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&c| u32::from(c)).sum()
    }

    /// Non-empty entries in SFEN order (R, B, G, S, N, L, P).
    pub fn iter(&self) -> impl Iterator<Item = (PieceKind, u8)> + '_ {
        PieceKind::HAND_ORDER.into_iter().filter_map(|kind| {
            let n = self.count(kind);
            (n > 0).then_some((kind, n))
        })
    }

    /// Distinct kinds with at least one piece.
    pub fn kinds(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.iter().map(|(kind, _)| kind)
    }
}
