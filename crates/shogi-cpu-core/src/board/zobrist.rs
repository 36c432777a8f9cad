//! Zobrist keys for position identity

use crate::types::{Piece, PieceKind, Side, Square};

const HAND_KINDS: usize = 7;

/// Random key tables, generated at compile time.
pub struct Zobrist {
    /// XORed in when the CPU is to move.
    pub side: u64,
    /// [Piece::code()][Square::index()]
    pub psq: [[u64; Square::NUM]; 32],
    /// Additive hand keys: [Side][hand index], multiplied by the count.
    pub hand: [[u64; HAND_KINDS]; Side::NUM],
}

impl Zobrist {
    pub const fn init() -> Self {
        let mut zobrist = Zobrist {
            side: 0,
            psq: [[0; Square::NUM]; 32],
            hand: [[0; HAND_KINDS]; Side::NUM],
        };

        let mut seed = 0x123456789ABCDEF0u64;

        seed = xorshift64(seed);
        zobrist.side = seed;

        let mut code = 0;
        while code < 32 {
            let mut sq = 0;
            while sq < Square::NUM {
                seed = xorshift64(seed);
                zobrist.psq[code][sq] = seed;
                sq += 1;
            }
            code += 1;
        }

        let mut side = 0;
        while side < Side::NUM {
            let mut kind = 0;
            while kind < HAND_KINDS {
                seed = xorshift64(seed);
                zobrist.hand[side][kind] = seed;
                kind += 1;
            }
            side += 1;
        }

        zobrist
    }
}

const fn xorshift64(mut x: u64) -> u64 {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

pub static ZOBRIST: Zobrist = Zobrist::init();

#[inline]
pub fn zobrist_psq(piece: Piece, sq: Square) -> u64 {
    ZOBRIST.psq[piece.code()][sq.index()]
}

/// Key for one piece of `kind` in `side`'s pool. Kings never reach a pool.
#[inline]
pub fn zobrist_hand(side: Side, kind: PieceKind) -> u64 {
    match kind.hand_index() {
        Some(idx) => ZOBRIST.hand[side.index()][idx],
        None => 0,
    }
}

#[inline]
pub fn zobrist_side() -> u64 {
    ZOBRIST.side
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_nonzero_and_distinct() {
        let mut seen = std::collections::HashSet::new();
        assert!(seen.insert(ZOBRIST.side));
        for row in ZOBRIST.psq.iter() {
            for &key in row.iter() {
                assert_ne!(key, 0);
                assert!(seen.insert(key));
            }
        }
        for side in ZOBRIST.hand.iter() {
            for &key in side.iter() {
                assert!(seen.insert(key));
            }
        }
    }
}
