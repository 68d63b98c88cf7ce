//! King tropism: how close the opponent's pieces stand to the king.

use chess_core::{Color, Piece, PieceKind};
use chess_engine::Position;

/// The closest opposing piece to a king.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KingDistance {
    pub enemy: Piece,
    pub distance: u8,
}

/// Finds the nearest opposing piece that is neither a pawn nor the king.
///
/// Ties go to the more valuable piece.
pub fn closest_attacker(position: &Position, color: Color) -> Option<KingDistance> {
    let king = position.king(color).square();
    position
        .active_pieces(color.opposite())
        .filter(|p| !matches!(p.kind(), PieceKind::Pawn | PieceKind::King))
        .map(|enemy| KingDistance {
            enemy,
            distance: enemy.square().distance(king),
        })
        .min_by_key(|kd| (kd.distance, -kd.enemy.value()))
}

/// Penalty for the closest attacker: its value in pawns times how near it
/// is. A piece seven squares away, or no piece at all, costs nothing.
pub fn king_safety_score(position: &Position, color: Color) -> i32 {
    closest_attacker(position, color).map_or(0, |kd| {
        let nearness = 7 - i32::from(kd.distance);
        -(kd.enemy.value() / 100) * nearness
    })
}
