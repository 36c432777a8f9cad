//! Legal move tree counting, a regression aid for the move generator.

use shogi_cpu_core::Side;
use shogi_cpu_core::board::Board;
use shogi_cpu_core::movegen::all_legal_moves;
use shogi_cpu_core::notation::move_to_usi;

/// Leaf count of the legal move tree `depth` plies deep.
pub fn perft(board: &mut Board, side: Side, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = all_legal_moves(board, side);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mv in moves {
        let Some(token) = board.apply_virtual(mv, side) else {
            continue;
        };
        nodes += perft(board, side.opponent(), depth - 1);
        board.undo_virtual(token);
    }
    nodes
}

/// Per-root-move leaf counts, in generation order.
pub fn perft_divide(board: &mut Board, side: Side, depth: u32) -> Vec<(String, u64)> {
    let mut out = Vec::new();
    if depth == 0 {
        return out;
    }
    for mv in all_legal_moves(board, side) {
        let Some(token) = board.apply_virtual(mv, side) else {
            continue;
        };
        out.push((move_to_usi(mv), perft(board, side.opponent(), depth - 1)));
        board.undo_virtual(token);
    }
    out
}
