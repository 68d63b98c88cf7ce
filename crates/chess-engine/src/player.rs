//! Legality filter.
//!
//! A [`Player`] is a read-only view of one side of a [`Position`]: its legal
//! moves (pseudo-legal moves plus the castles it may take), whether its king
//! is in check, and whether it has any move that does not leave the king
//! attacked. Everything is computed once in [`Player::new`].

use chess_core::{Color, Piece, PieceKind, Square};

use crate::movegen::{attacked_squares, pseudo_legal_moves, MoveList};
use crate::position::{king_home, rook_homes};
use crate::{Bitboard, Move, MoveStatus, MoveTransition, Position};

/// Fixed squares involved in one castle.
struct CastleLane {
    king_side: bool,
    rook: Square,
    king_to: Square,
    rook_to: Square,
    /// Squares between king and rook.
    between: &'static [Square],
    /// Squares the king passes over or lands on.
    transit: &'static [Square],
}

fn castle_lanes(color: Color) -> [CastleLane; 2] {
    match color {
        Color::White => [
            CastleLane {
                king_side: true,
                rook: Square::H1,
                king_to: Square::G1,
                rook_to: Square::F1,
                between: &[Square::F1, Square::G1],
                transit: &[Square::F1, Square::G1],
            },
            CastleLane {
                king_side: false,
                rook: Square::A1,
                king_to: Square::C1,
                rook_to: Square::D1,
                between: &[Square::D1, Square::C1, Square::B1],
                transit: &[Square::D1, Square::C1],
            },
        ],
        Color::Black => [
            CastleLane {
                king_side: true,
                rook: Square::H8,
                king_to: Square::G8,
                rook_to: Square::F8,
                between: &[Square::F8, Square::G8],
                transit: &[Square::F8, Square::G8],
            },
            CastleLane {
                king_side: false,
                rook: Square::A8,
                king_to: Square::C8,
                rook_to: Square::D8,
                between: &[Square::D8, Square::C8, Square::B8],
                transit: &[Square::D8, Square::C8],
            },
        ],
    }
}

/// One side's legality view of a position.
#[derive(Clone)]
pub struct Player<'a> {
    position: &'a Position,
    color: Color,
    legal_moves: MoveList,
    in_check: bool,
    has_escape_moves: bool,
}

impl<'a> Player<'a> {
    /// Builds the view for `color`.
    pub fn new(position: &'a Position, color: Color) -> Self {
        let opponent_attacks = attacked_squares(position, color.opposite());
        let king = position.king(color);
        let in_check = opponent_attacks.contains(king.square());

        let mut legal_moves = pseudo_legal_moves(position, color);
        if !in_check {
            push_castles(position, king, opponent_attacks, &mut legal_moves);
        }

        let mut player = Player {
            position,
            color,
            legal_moves,
            in_check,
            has_escape_moves: false,
        };
        player.has_escape_moves = player
            .legal_moves
            .iter()
            .any(|&mv| player.leaves_king_safe(mv));
        player
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn position(&self) -> &'a Position {
        self.position
    }

    #[inline]
    pub fn king(&self) -> Piece {
        self.position.king(self.color)
    }

    pub fn active_pieces(&self) -> impl Iterator<Item = Piece> + 'a {
        self.position.active_pieces(self.color)
    }

    /// Pseudo-legal moves plus available castles.
    ///
    /// Members may still leave the king attacked; [`make_move`](Self::make_move)
    /// reports those as [`MoveStatus::LeavesPlayerInCheck`].
    #[inline]
    pub fn legal_moves(&self) -> &[Move] {
        self.legal_moves.as_slice()
    }

    /// Legal moves whose transition is [`MoveStatus::Done`].
    pub fn verified_moves(&self) -> Vec<Move> {
        self.legal_moves
            .iter()
            .copied()
            .filter(|&mv| self.leaves_king_safe(mv))
            .collect()
    }

    #[inline]
    pub fn is_in_check(&self) -> bool {
        self.in_check
    }

    #[inline]
    pub fn is_in_check_mate(&self) -> bool {
        self.in_check && !self.has_escape_moves
    }

    #[inline]
    pub fn is_in_stalemate(&self) -> bool {
        !self.in_check && !self.has_escape_moves
    }

    #[inline]
    pub fn is_castled(&self) -> bool {
        self.position.has_castled(self.color)
    }

    /// True while king and king-side rook are both unmoved on their home squares.
    pub fn is_king_side_castle_capable(&self) -> bool {
        self.castle_capable(true)
    }

    /// True while king and queen-side rook are both unmoved on their home squares.
    pub fn is_queen_side_castle_capable(&self) -> bool {
        self.castle_capable(false)
    }

    /// The view of the other side of the same position.
    pub fn opponent(&self) -> Player<'a> {
        Player::new(self.position, self.color.opposite())
    }

    /// Attempts a move.
    ///
    /// Moves outside [`legal_moves`](Self::legal_moves) are rejected with
    /// [`MoveStatus::IllegalMove`]; moves exposing the king with
    /// [`MoveStatus::LeavesPlayerInCheck`]. A rejected transition carries the
    /// original position.
    pub fn make_move(&self, mv: Move) -> MoveTransition<'a> {
        if !self.legal_moves.contains(&mv) {
            return MoveTransition::rejected(self.position, mv, MoveStatus::IllegalMove);
        }
        let successor = mv.execute(self.position);
        if king_attacked(&successor, self.color) {
            return MoveTransition::rejected(self.position, mv, MoveStatus::LeavesPlayerInCheck);
        }
        MoveTransition::done(self.position, successor, mv)
    }

    fn leaves_king_safe(&self, mv: Move) -> bool {
        !king_attacked(&mv.execute(self.position), self.color)
    }

    fn castle_capable(&self, king_side: bool) -> bool {
        let king = self.king();
        if !king.is_first_move() || king.square() != king_home(self.color) {
            return false;
        }
        let (king_side_rook, queen_side_rook) = rook_homes(self.color);
        let rook = if king_side {
            king_side_rook
        } else {
            queen_side_rook
        };
        unmoved_rook(self.position, rook, self.color).is_some()
    }
}

impl std::fmt::Debug for Player<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("color", &self.color)
            .field("legal_moves", &self.legal_moves.len())
            .field("in_check", &self.in_check)
            .field("has_escape_moves", &self.has_escape_moves)
            .finish()
    }
}

fn king_attacked(position: &Position, color: Color) -> bool {
    attacked_squares(position, color.opposite()).contains(position.king(color).square())
}

fn unmoved_rook(position: &Position, square: Square, color: Color) -> Option<Piece> {
    position
        .piece_at(square)
        .filter(|p| p.kind() == PieceKind::Rook && p.color() == color && p.is_first_move())
}

/// Appends the castles `king` may take. The caller has already checked that
/// the king is not in check.
fn push_castles(position: &Position, king: Piece, opponent_attacks: Bitboard, moves: &mut MoveList) {
    let color = king.color();
    if !king.is_first_move() || king.square() != king_home(color) {
        return;
    }
    for lane in castle_lanes(color) {
        let Some(rook) = unmoved_rook(position, lane.rook, color) else {
            continue;
        };
        if lane.between.iter().any(|&sq| position.is_occupied(sq)) {
            continue;
        }
        if opponent_attacks.contains_any(lane.transit) {
            continue;
        }
        moves.push(Move::castle(
            position,
            king,
            lane.king_to,
            rook,
            lane.rook_to,
            lane.king_side,
        ));
    }
}
