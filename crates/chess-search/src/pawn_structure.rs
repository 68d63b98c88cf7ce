//! Pawn structure scoring.
//!
//! Doubled and isolated pawns are penalized, passed pawns earn a bonus that
//! grows with how far they have advanced.

use chess_core::{Color, PieceKind, Square};
use chess_engine::Position;

pub const DOUBLED_PAWN_PENALTY: i32 = -10;
pub const ISOLATED_PAWN_PENALTY: i32 = -10;

/// Bonus for a passed pawn, indexed by rows advanced from its start row.
pub const PASSED_PAWN_BONUS: [i32; 7] = [0, 10, 20, 35, 60, 100, 150];

/// Scores the pawn structure of `color`.
pub fn pawn_structure_score(position: &Position, color: Color) -> i32 {
    let own = pawn_squares(position, color);
    let enemy = pawn_squares(position, color.opposite());

    let mut per_column = [0i32; 8];
    for sq in &own {
        per_column[sq.column() as usize] += 1;
    }

    let doubled: i32 = per_column
        .iter()
        .filter(|&&n| n > 1)
        .map(|&n| (n - 1) * DOUBLED_PAWN_PENALTY)
        .sum();

    let mut score = doubled;
    for &sq in &own {
        let column = sq.column() as usize;
        let left = column.checked_sub(1).map_or(0, |c| per_column[c]);
        let right = per_column.get(column + 1).copied().unwrap_or(0);
        if left == 0 && right == 0 {
            score += ISOLATED_PAWN_PENALTY;
        }
        if is_passed(sq, color, &enemy) {
            score += PASSED_PAWN_BONUS[rows_advanced(sq, color)];
        }
    }
    score
}

fn pawn_squares(position: &Position, color: Color) -> Vec<Square> {
    position
        .active_pieces(color)
        .filter(|p| p.kind() == PieceKind::Pawn)
        .map(|p| p.square())
        .collect()
}

/// No enemy pawn stands ahead of `sq` on its own or an adjacent column.
fn is_passed(sq: Square, color: Color, enemy: &[Square]) -> bool {
    !enemy.iter().any(|e| {
        let column_gap = (e.column() as i8 - sq.column() as i8).abs();
        let ahead = match color {
            Color::White => e.row() < sq.row(),
            Color::Black => e.row() > sq.row(),
        };
        column_gap <= 1 && ahead
    })
}

fn rows_advanced(sq: Square, color: Color) -> usize {
    let advanced = match color {
        Color::White => 6i8 - sq.row() as i8,
        Color::Black => sq.row() as i8 - 1,
    };
    advanced.clamp(0, 6) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(fen: &str, color: Color) -> i32 {
        pawn_structure_score(&Position::from_fen(fen).unwrap(), color)
    }

    #[test]
    fn start_position_is_neutral() {
        let position = Position::standard();
        assert_eq!(pawn_structure_score(&position, Color::White), 0);
        assert_eq!(pawn_structure_score(&position, Color::Black), 0);
    }

    #[test]
    fn doubled_and_isolated() {
        // White pawns on a2, a3: doubled, both isolated, neither passed.
        let fen = "4k3/p7/8/8/8/P7/P7/4K3 w - - 0 1";
        assert_eq!(
            score(fen, Color::White),
            DOUBLED_PAWN_PENALTY + 2 * ISOLATED_PAWN_PENALTY
        );
    }

    #[test]
    fn passed_pawn_grows_with_advance() {
        let back = score("4k3/8/8/8/8/8/3PP3/4K3 w - - 0 1", Color::White);
        let forward = score("4k3/8/3PP3/8/8/8/8/4K3 w - - 0 1", Color::White);
        assert_eq!(back, 0);
        assert_eq!(forward, 2 * PASSED_PAWN_BONUS[4]);
    }

    #[test]
    fn blocked_by_adjacent_enemy() {
        // Black pawn on f7 stops the e-pawn from being passed.
        let fen = "4k3/5p2/8/8/4P3/8/8/4K3 w - - 0 1";
        assert_eq!(score(fen, Color::White), ISOLATED_PAWN_PENALTY);
        assert_eq!(score(fen, Color::Black), ISOLATED_PAWN_PENALTY);
    }
}
