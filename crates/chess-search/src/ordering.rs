//! MVV-LVA move ordering.
//!
//! Captures come first, most valuable victim first and, among equal
//! victims, least valuable attacker first. Quiet moves follow, ordered by
//! the cheapest mover.

use chess_engine::Move;

const ORDERING_BASE: i32 = 10_000;
const CAPTURE_SCALE: i32 = 100;

/// Ordering key of a move; higher sorts first.
///
/// Every capture key exceeds every quiet-move key, even a king taking a
/// pawn.
pub fn ordering_key(mv: &Move) -> i32 {
    let attacker = mv.moved_piece().value();
    match mv.captured_piece() {
        Some(victim) => (victim.value() - attacker + ORDERING_BASE) * CAPTURE_SCALE,
        None => ORDERING_BASE - attacker,
    }
}

/// Returns `moves` sorted by descending [`ordering_key`]. Equal keys keep
/// their generation order.
pub fn sort_moves(moves: &[Move]) -> Vec<Move> {
    let mut sorted = moves.to_vec();
    sorted.sort_by_key(|mv| std::cmp::Reverse(ordering_key(mv)));
    sorted
}
