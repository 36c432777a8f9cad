//! Mandatory and optional promotion.

use shogi_cpu_core::board::Board;
use shogi_cpu_core::movegen::legal_moves_from;
use shogi_cpu_core::notation::parse_sfen;
use shogi_cpu_core::{Move, Square};

fn board(sfen: &str) -> Board {
    parse_sfen(sfen).unwrap().board
}

#[test]
fn test_pawn_to_last_rank_must_promote() {
    let mut b = board("k8/4P4/9/9/9/9/9/9/8K b - 1");
    let moves = legal_moves_from(&mut b, Square::new(1, 4));
    assert_eq!(moves.as_slice(), &[Move::normal(Square::new(1, 4), Square::new(0, 4), true)]);
}

#[test]
fn test_lance_to_last_rank_must_promote() {
    let mut b = board("k8/9/9/4L4/9/9/9/9/8K b - 1");
    let moves = legal_moves_from(&mut b, Square::new(3, 4));
    let to_last: Vec<_> = moves.iter().filter(|m| m.to() == Square::new(0, 4)).collect();
    assert_eq!(to_last.len(), 1);
    assert!(to_last[0].is_promote());
    // 5b and 5c may promote or not.
    assert_eq!(moves.iter().filter(|m| m.to() == Square::new(1, 4)).count(), 2);
    assert_eq!(moves.iter().filter(|m| m.to() == Square::new(2, 4)).count(), 2);
}

#[test]
fn test_knight_to_last_two_ranks_must_promote() {
    let mut b = board("k8/9/9/4N4/9/9/9/9/8K b - 1");
    let moves = legal_moves_from(&mut b, Square::new(3, 4));
    assert_eq!(moves.len(), 2);
    assert!(moves.iter().all(|m| m.is_promote()));
}

#[test]
fn test_silver_entering_zone_may_choose() {
    let mut b = board("k8/9/9/4S4/9/9/9/9/8K b - 1");
    let moves = legal_moves_from(&mut b, Square::new(3, 4));
    // Three forward steps into the zone, both variants each, plus two
    // backward diagonals outside it.
    assert_eq!(moves.len(), 8);
    assert_eq!(moves.iter().filter(|m| m.is_promote()).count(), 3);
}

#[test]
fn test_leaving_zone_may_promote() {
    let mut b = board("k8/9/4S4/9/9/9/9/9/8K b - 1");
    let moves = legal_moves_from(&mut b, Square::new(2, 4));
    let back = Square::new(3, 3);
    assert!(moves.contains(&Move::normal(Square::new(2, 4), back, true)));
    assert!(moves.contains(&Move::normal(Square::new(2, 4), back, false)));
}

#[test]
fn test_gold_and_promoted_never_offer_promotion() {
    let mut b = board("k8/9/9/3G+P4/9/9/9/9/8K b - 1");
    assert!(legal_moves_from(&mut b, Square::new(3, 3)).iter().all(|m| !m.is_promote()));
    assert!(legal_moves_from(&mut b, Square::new(3, 4)).iter().all(|m| !m.is_promote()));
}

#[test]
fn test_cpu_pawn_must_promote_on_row_eight() {
    let mut b = board("k8/9/9/9/9/9/9/4p4/K8 w - 1");
    let moves = legal_moves_from(&mut b, Square::new(7, 4));
    assert_eq!(moves.as_slice(), &[Move::normal(Square::new(7, 4), Square::new(8, 4), true)]);
}
