//! Pseudo-legal move generation.
//!
//! Each piece kind has a generator function, looked up by
//! [`PieceKind::index`] in [`GENERATORS`]. Generators only follow the
//! movement rules of the piece; whether a move leaves the mover's own king
//! attacked is decided by [`Player`](crate::Player).
//!
//! Steps carry their horizontal displacement so that a step from the edge
//! files never wraps onto the opposite side of the board (+9 from the h-file
//! would otherwise land on the a-file one row down).

pub mod perft;

use chess_core::{Color, Piece, PieceKind, Square, TABLES};

use crate::{Bitboard, Move, Position};

/// A list of moves with a fixed maximum capacity.
///
/// Positions hold at most 16 pieces per side (enforced by
/// [`PositionBuilder::build`](crate::PositionBuilder::build)). No piece has
/// more than 27 destinations, promotion is queen-only, and the king adds at
/// most 8 steps and 2 castles, so one side never has more than
/// 15 * 27 + 10 = 415 pseudo-legal moves.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of moves held.
    pub const MAX_MOVES: usize = 416;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        assert!(self.len < Self::MAX_MOVES, "move list overflow");
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn contains(&self, m: &Move) -> bool {
        self.as_slice().contains(m)
    }

}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// A single displacement on the board.
#[derive(Debug, Clone, Copy)]
struct Step {
    /// Square-index delta.
    offset: i8,
    /// Column delta; negative is toward the a-file.
    columns: i8,
}

impl Step {
    const fn new(offset: i8, columns: i8) -> Self {
        Step { offset, columns }
    }

    /// Returns the square reached from `from`, or `None` if the step leaves
    /// the board or wraps around an edge file.
    #[inline]
    fn apply(self, from: Square) -> Option<Square> {
        if self.columns < 0 && TABLES.first_column(from) {
            return None;
        }
        if self.columns <= -2 && TABLES.second_column(from) {
            return None;
        }
        if self.columns > 0 && TABLES.eighth_column(from) {
            return None;
        }
        if self.columns >= 2 && TABLES.seventh_column(from) {
            return None;
        }
        from.offset(self.offset)
    }
}

const KNIGHT_STEPS: [Step; 8] = [
    Step::new(-17, -1),
    Step::new(-15, 1),
    Step::new(-10, -2),
    Step::new(-6, 2),
    Step::new(6, -2),
    Step::new(10, 2),
    Step::new(15, -1),
    Step::new(17, 1),
];

const BISHOP_STEPS: [Step; 4] = [
    Step::new(-9, -1),
    Step::new(-7, 1),
    Step::new(7, -1),
    Step::new(9, 1),
];

const ROOK_STEPS: [Step; 4] = [
    Step::new(-8, 0),
    Step::new(-1, -1),
    Step::new(1, 1),
    Step::new(8, 0),
];

/// Queen directions and king steps.
const ROYAL_STEPS: [Step; 8] = [
    Step::new(-9, -1),
    Step::new(-8, 0),
    Step::new(-7, 1),
    Step::new(-1, -1),
    Step::new(1, 1),
    Step::new(7, -1),
    Step::new(8, 0),
    Step::new(9, 1),
];

/// Diagonal steps a pawn of `color` captures along.
#[inline]
const fn pawn_capture_steps(color: Color) -> [Step; 2] {
    let dir = color.direction();
    [Step::new(7 * dir, -dir), Step::new(9 * dir, dir)]
}

/// Step set and sliding flag for a non-pawn piece kind.
const fn pattern(kind: PieceKind) -> (&'static [Step], bool) {
    match kind {
        PieceKind::Knight => (&KNIGHT_STEPS, false),
        PieceKind::Bishop => (&BISHOP_STEPS, true),
        PieceKind::Rook => (&ROOK_STEPS, true),
        PieceKind::Queen => (&ROYAL_STEPS, true),
        PieceKind::King | PieceKind::Pawn => (&ROYAL_STEPS, false),
    }
}

/// Visits every square a non-pawn piece reaches, with the piece standing
/// there (if any). Sliders stop at the first occupied square; own pieces are
/// visited too and left to the caller to filter.
fn visit_targets<F>(position: &Position, piece: Piece, mut visit: F)
where
    F: FnMut(Square, Option<Piece>),
{
    let (steps, slides) = pattern(piece.kind());
    for &step in steps {
        let mut current = piece.square();
        while let Some(target) = step.apply(current) {
            let occupant = position.piece_at(target);
            visit(target, occupant);
            if !slides || occupant.is_some() {
                break;
            }
            current = target;
        }
    }
}

type Generator = fn(&Position, Piece, &mut MoveList);

/// Move generators indexed by [`PieceKind::index`].
const GENERATORS: [Generator; 6] = [
    pawn_moves,
    officer_moves,
    officer_moves,
    officer_moves,
    officer_moves,
    officer_moves,
];

/// Appends the pseudo-legal moves of one piece.
#[inline]
pub fn piece_moves(position: &Position, piece: Piece, moves: &mut MoveList) {
    GENERATORS[piece.kind().index()](position, piece, moves);
}

fn officer_moves(position: &Position, piece: Piece, moves: &mut MoveList) {
    visit_targets(position, piece, |target, occupant| match occupant {
        None => moves.push(Move::quiet(position, piece, target)),
        Some(other) if other.color() != piece.color() => {
            moves.push(Move::capture(position, piece, target, other))
        }
        Some(_) => {}
    });
}

fn pawn_moves(position: &Position, pawn: Piece, moves: &mut MoveList) {
    let color = pawn.color();
    let from = pawn.square();

    if let Some(push) = from.offset(8 * color.direction()) {
        if !position.is_occupied(push) {
            if color.is_promotion_square(push) {
                moves.push(Move::promotion(position, pawn, push, None));
            } else {
                moves.push(Move::quiet(position, pawn, push));
            }

            if pawn.is_first_move() && color.is_pawn_start_square(from) {
                if let Some(jump) = from.offset(16 * color.direction()) {
                    if !position.is_occupied(jump) {
                        moves.push(Move::pawn_jump(position, pawn, jump));
                    }
                }
            }
        }
    }

    for step in pawn_capture_steps(color) {
        let Some(target) = step.apply(from) else {
            continue;
        };
        match position.piece_at(target) {
            Some(other) if other.color() != color => {
                if color.is_promotion_square(target) {
                    moves.push(Move::promotion(position, pawn, target, Some(other)));
                } else {
                    moves.push(Move::capture(position, pawn, target, other));
                }
            }
            Some(_) => {}
            None => {
                // The jumped pawn stands beside us, on the side we capture toward.
                if let Some(jumped) = position.en_passant_pawn() {
                    if jumped.color() != color && from.offset(step.columns) == Some(jumped.square())
                    {
                        moves.push(Move::en_passant(position, pawn, target, jumped));
                    }
                }
            }
        }
    }
}

/// Generates the pseudo-legal moves of every piece of `color`.
///
/// Castling is not included; it depends on attack information and is added
/// by [`Player`](crate::Player).
pub fn pseudo_legal_moves(position: &Position, color: Color) -> MoveList {
    let mut moves = MoveList::new();
    for piece in position.active_pieces(color) {
        piece_moves(position, piece, &mut moves);
    }
    moves
}

/// Squares controlled by `color`.
///
/// Every destination of a non-pawn pseudo-legal capture or quiet move, plus
/// both pawn capture diagonals whether or not anything stands there. A king
/// is in check exactly when its square is in the opponent's set.
pub fn attacked_squares(position: &Position, color: Color) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for piece in position.active_pieces(color) {
        if piece.kind() == PieceKind::Pawn {
            for step in pawn_capture_steps(color) {
                if let Some(target) = step.apply(piece.square()) {
                    attacks.set(target);
                }
            }
        } else {
            visit_targets(position, piece, |target, occupant| {
                if occupant.map_or(true, |p| p.color() != color) {
                    attacks.set(target);
                }
            });
        }
    }
    attacks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MoveKind;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn moves_of(position: &Position, square: &str) -> Vec<Move> {
        let mut moves = MoveList::new();
        piece_moves(position, position.piece_at(sq(square)).unwrap(), &mut moves);
        moves.as_slice().to_vec()
    }

    #[test]
    fn standard_position_has_twenty_pseudo_legal_moves() {
        let pos = Position::standard();
        assert_eq!(pseudo_legal_moves(&pos, Color::White).len(), 20);
        assert_eq!(pseudo_legal_moves(&pos, Color::Black).len(), 20);
    }

    #[test]
    fn knight_on_edge_does_not_wrap() {
        let pos = Position::from_fen("4k3/8/8/7N/8/8/8/4K3 w - - 0 1").unwrap();
        let targets: Vec<Square> = moves_of(&pos, "h5").iter().map(|m| m.destination()).collect();
        assert_eq!(targets.len(), 4);
        for name in ["g7", "f6", "f4", "g3"] {
            assert!(targets.contains(&sq(name)), "missing {}", name);
        }
    }

    #[test]
    fn bishop_on_h_file_does_not_wrap() {
        let pos = Position::from_fen("4k3/8/8/8/7B/8/8/K7 w - - 0 1").unwrap();
        let targets: Vec<Square> = moves_of(&pos, "h4").iter().map(|m| m.destination()).collect();
        assert_eq!(targets.len(), 7);
        assert!(!targets.contains(&sq("a4")));
        assert!(!targets.contains(&sq("a5")));
        assert!(targets.contains(&sq("d8")));
        assert!(targets.contains(&sq("e1")));
    }

    #[test]
    fn rook_stops_at_pieces() {
        let pos = Position::from_fen("4k3/8/8/8/r2R1P2/8/8/4K3 w - - 0 1").unwrap();
        let moves = moves_of(&pos, "d4");
        let captures: Vec<&Move> = moves.iter().filter(|m| m.is_capture()).collect();
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].destination(), sq("a4"));
        // b4 c4 a4 e4 d5 d6 d7 d8 d3 d2 d1
        assert_eq!(moves.len(), 11);
    }

    #[test]
    fn pawn_jump_needs_both_squares_empty() {
        let pos = Position::from_fen("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1").unwrap();
        let moves = moves_of(&pos, "e2");
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].kind(), MoveKind::Quiet);

        let blocked = Position::from_fen("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1").unwrap();
        assert!(moves_of(&blocked, "e2").is_empty());
    }

    #[test]
    fn en_passant_capture_is_generated() {
        let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let moves = moves_of(&pos, "e5");
        let ep: Vec<&Move> = moves
            .iter()
            .filter(|m| m.kind() == MoveKind::EnPassant)
            .collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].destination(), sq("d6"));
        assert_eq!(ep[0].captured_piece().unwrap().square(), sq("d5"));
    }

    #[test]
    fn black_pawn_promotes_on_first_row() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/p7/4K3 b - - 0 1").unwrap();
        let moves = moves_of(&pos, "a2");
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].kind(), MoveKind::Promotion);
        assert_eq!(moves[0].destination(), Square::A1);
    }

    #[test]
    fn pawn_attacks_include_empty_diagonals() {
        let pos = Position::standard();
        let attacks = attacked_squares(&pos, Color::White);
        assert!(attacks.contains(sq("d3")));
        assert!(attacks.contains(sq("f3")));
        assert!(!attacks.contains(sq("e4")));
        assert!(!attacks.contains(Square::E1));
    }
}
