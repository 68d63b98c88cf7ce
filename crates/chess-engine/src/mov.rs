//! Move model.
//!
//! A [`Move`] is a tagged value that knows how to derive the successor
//! position from the position it was generated in ([`Move::execute`]) and
//! how to rebuild that position from the successor ([`Move::undo`]).

use chess_core::{Color, Piece, PieceKind, Square};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::Position;

/// Kind of move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Non-capturing move of any piece, including single pawn pushes.
    Quiet,
    Capture,
    /// Pawn advancing two squares from its starting row.
    PawnJump,
    EnPassant,
    /// Pawn push onto the last row (always becomes a queen).
    Promotion,
    PromotionCapture,
    KingSideCastle,
    QueenSideCastle,
    /// Placeholder returned when no legal move matches a request.
    Null,
}

impl MoveKind {
    #[inline]
    pub const fn is_capture(self) -> bool {
        matches!(
            self,
            MoveKind::Capture | MoveKind::EnPassant | MoveKind::PromotionCapture
        )
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        matches!(self, MoveKind::Promotion | MoveKind::PromotionCapture)
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self, MoveKind::KingSideCastle | MoveKind::QueenSideCastle)
    }
}

/// The rook half of a castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastleRook {
    rook: Piece,
    destination: Square,
}

impl CastleRook {
    /// The rook as it stood before castling.
    #[inline]
    pub const fn rook(self) -> Piece {
        self.rook
    }

    #[inline]
    pub const fn start(self) -> Square {
        self.rook.square()
    }

    #[inline]
    pub const fn destination(self) -> Square {
        self.destination
    }
}

/// A chess move bound to the position it was generated in.
///
/// Equality is structural: two moves are equal when they come from the same
/// position (by Zobrist key), move the same piece to the same square, and
/// have the same kind.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    kind: MoveKind,
    origin: u64,
    piece: Piece,
    destination: Square,
    captured: Option<Piece>,
    castle: Option<CastleRook>,
    prior_en_passant: Option<Piece>,
    prior_halfmove_clock: u32,
}

impl Move {
    /// The null move. Never legal; executing it returns the position unchanged.
    pub const NULL: Move = Move {
        kind: MoveKind::Null,
        origin: 0,
        piece: Piece::new(PieceKind::Pawn, Color::White, Square::A8),
        destination: Square::A8,
        captured: None,
        castle: None,
        prior_en_passant: None,
        prior_halfmove_clock: 0,
    };

    fn new(
        kind: MoveKind,
        position: &Position,
        piece: Piece,
        destination: Square,
        captured: Option<Piece>,
        castle: Option<CastleRook>,
    ) -> Self {
        Move {
            kind,
            origin: position.zobrist_hash(),
            piece,
            destination,
            captured,
            castle,
            prior_en_passant: position.en_passant_pawn(),
            prior_halfmove_clock: position.halfmove_clock(),
        }
    }

    pub(crate) fn quiet(position: &Position, piece: Piece, destination: Square) -> Self {
        Self::new(MoveKind::Quiet, position, piece, destination, None, None)
    }

    pub(crate) fn capture(
        position: &Position,
        piece: Piece,
        destination: Square,
        captured: Piece,
    ) -> Self {
        Self::new(
            MoveKind::Capture,
            position,
            piece,
            destination,
            Some(captured),
            None,
        )
    }

    pub(crate) fn pawn_jump(position: &Position, pawn: Piece, destination: Square) -> Self {
        Self::new(MoveKind::PawnJump, position, pawn, destination, None, None)
    }

    pub(crate) fn en_passant(
        position: &Position,
        pawn: Piece,
        destination: Square,
        captured: Piece,
    ) -> Self {
        Self::new(
            MoveKind::EnPassant,
            position,
            pawn,
            destination,
            Some(captured),
            None,
        )
    }

    pub(crate) fn promotion(
        position: &Position,
        pawn: Piece,
        destination: Square,
        captured: Option<Piece>,
    ) -> Self {
        let kind = if captured.is_some() {
            MoveKind::PromotionCapture
        } else {
            MoveKind::Promotion
        };
        Self::new(kind, position, pawn, destination, captured, None)
    }

    pub(crate) fn castle(
        position: &Position,
        king: Piece,
        destination: Square,
        rook: Piece,
        rook_destination: Square,
        king_side: bool,
    ) -> Self {
        let kind = if king_side {
            MoveKind::KingSideCastle
        } else {
            MoveKind::QueenSideCastle
        };
        let castle = CastleRook {
            rook,
            destination: rook_destination,
        };
        Self::new(kind, position, king, destination, None, Some(castle))
    }

    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Zobrist key of the position this move was generated in.
    #[inline]
    pub const fn origin_key(&self) -> u64 {
        self.origin
    }

    /// The piece being moved, as it stood before the move.
    #[inline]
    pub const fn moved_piece(&self) -> Piece {
        self.piece
    }

    #[inline]
    pub const fn origin_square(&self) -> Square {
        self.piece.square()
    }

    #[inline]
    pub const fn destination(&self) -> Square {
        self.destination
    }

    /// The captured piece. For en passant this stands beside the destination.
    #[inline]
    pub const fn captured_piece(&self) -> Option<Piece> {
        self.captured
    }

    #[inline]
    pub const fn castle_rook(&self) -> Option<CastleRook> {
        self.castle
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.kind.is_capture()
    }

    #[inline]
    pub const fn is_castle(&self) -> bool {
        self.kind.is_castle()
    }

    #[inline]
    pub const fn is_promotion(&self) -> bool {
        self.kind.is_promotion()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.kind == MoveKind::Null
    }

    /// Returns the move in coordinate form, e.g. "e2e4".
    pub fn to_coordinates(&self) -> String {
        format!("{}{}", self.origin_square(), self.destination)
    }

    /// Derives the successor position.
    ///
    /// The move must have been generated from `position`. Legality is not
    /// checked here.
    pub fn execute(&self, position: &Position) -> Position {
        if self.is_null() {
            return position.clone();
        }
        debug_assert_eq!(self.origin, position.zobrist_hash());

        let mover = self.piece.color();
        let mut board = position.board;
        board[self.piece.square().index() as usize] = None;
        if let Some(captured) = self.captured {
            board[captured.square().index() as usize] = None;
        }

        let mut moved = self.piece.moved_to(self.destination);
        if self.is_promotion() {
            moved = moved.promoted();
        }
        board[self.destination.index() as usize] = Some(moved);

        let mut castled = position.castled;
        if let Some(castle) = self.castle {
            board[castle.start().index() as usize] = None;
            board[castle.destination.index() as usize] = Some(castle.rook.moved_to(castle.destination));
            castled[mover.index()] = true;
        }

        let mut kings = position.kings;
        if self.piece.kind() == PieceKind::King {
            kings[mover.index()] = moved;
        }

        let en_passant_pawn = (self.kind == MoveKind::PawnJump).then_some(moved);
        let halfmove_clock = if self.piece.kind() == PieceKind::Pawn || self.is_capture() {
            0
        } else {
            position.halfmove_clock + 1
        };
        let fullmove_number = match mover {
            Color::White => position.fullmove_number,
            Color::Black => position.fullmove_number + 1,
        };

        Position::assemble(
            board,
            mover.opposite(),
            en_passant_pawn,
            castled,
            halfmove_clock,
            fullmove_number,
            position.ply + 1,
            kings,
        )
    }

    /// Rebuilds the position this move was executed from.
    ///
    /// `successor` must be the position [`execute`](Self::execute) returned.
    pub fn undo(&self, successor: &Position) -> Position {
        if self.is_null() {
            return successor.clone();
        }

        let mover = self.piece.color();
        let mut board = successor.board;
        board[self.destination.index() as usize] = None;
        board[self.piece.square().index() as usize] = Some(self.piece);
        if let Some(captured) = self.captured {
            board[captured.square().index() as usize] = Some(captured);
        }

        let mut castled = successor.castled;
        if let Some(castle) = self.castle {
            board[castle.destination.index() as usize] = None;
            board[castle.start().index() as usize] = Some(castle.rook);
            castled[mover.index()] = false;
        }

        let mut kings = successor.kings;
        if self.piece.kind() == PieceKind::King {
            kings[mover.index()] = self.piece;
        }

        let fullmove_number = match mover {
            Color::White => successor.fullmove_number,
            Color::Black => successor.fullmove_number.saturating_sub(1),
        };

        Position::assemble(
            board,
            mover,
            self.prior_en_passant,
            castled,
            self.prior_halfmove_clock,
            fullmove_number,
            successor.ply.saturating_sub(1),
            kings,
        )
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.origin == other.origin
            && self.piece == other.piece
            && self.destination == other.destination
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.origin.hash(state);
        self.piece.hash(state);
        self.destination.hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "null");
        }
        write!(f, "{}", self.to_coordinates())
    }
}

/// Outcome of attempting a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStatus {
    Done,
    /// The move is not among the player's legal moves.
    IllegalMove,
    /// The move would leave the mover's own king attacked.
    LeavesPlayerInCheck,
}

impl MoveStatus {
    #[inline]
    pub const fn is_done(self) -> bool {
        matches!(self, MoveStatus::Done)
    }
}

/// Result of [`Player::make_move`](crate::Player::make_move).
///
/// A rejected move carries an unchanged copy of the original position.
#[derive(Debug, Clone)]
pub struct MoveTransition<'a> {
    from: &'a Position,
    to: Position,
    mv: Move,
    status: MoveStatus,
}

impl<'a> MoveTransition<'a> {
    pub(crate) fn done(from: &'a Position, to: Position, mv: Move) -> Self {
        MoveTransition {
            from,
            to,
            mv,
            status: MoveStatus::Done,
        }
    }

    pub(crate) fn rejected(from: &'a Position, mv: Move, status: MoveStatus) -> Self {
        MoveTransition {
            from,
            to: from.clone(),
            mv,
            status,
        }
    }

    #[inline]
    pub fn from_position(&self) -> &'a Position {
        self.from
    }

    #[inline]
    pub fn to_position(&self) -> &Position {
        &self.to
    }

    /// Consumes the transition, returning the resulting position.
    #[inline]
    pub fn into_position(self) -> Position {
        self.to
    }

    #[inline]
    pub fn mv(&self) -> Move {
        self.mv
    }

    #[inline]
    pub fn status(&self) -> MoveStatus {
        self.status
    }
}

/// Resolves moves from square pairs, as a board GUI or PGN loader supplies them.
pub struct MoveFactory;

impl MoveFactory {
    /// Returns the legal move of the side to move going from `from` to `to`,
    /// or [`Move::NULL`] when there is none.
    pub fn create_move(position: &Position, from: Square, to: Square) -> Move {
        position
            .current_player()
            .legal_moves()
            .iter()
            .find(|m| m.origin_square() == from && m.destination() == to)
            .copied()
            .unwrap_or(Move::NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn pawn_jump_sets_en_passant_pawn() {
        let pos = Position::standard();
        let mv = MoveFactory::create_move(&pos, sq("e2"), sq("e4"));
        assert_eq!(mv.kind(), MoveKind::PawnJump);

        let next = mv.execute(&pos);
        let pawn = next.en_passant_pawn().unwrap();
        assert_eq!(pawn.square(), sq("e4"));
        assert!(!pawn.is_first_move());
        assert_eq!(next.side_to_move(), Color::Black);
        assert_eq!(next.ply(), 1);
        assert_eq!(next.piece_at(sq("e2")), None);
    }

    #[test]
    fn execute_is_deterministic() {
        let pos = Position::standard();
        let mv = MoveFactory::create_move(&pos, sq("g1"), sq("f3"));
        assert_eq!(mv.execute(&pos), mv.execute(&pos));
        assert_eq!(mv.execute(&pos).halfmove_clock(), 1);
    }

    #[test]
    fn undo_restores_position() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 7").unwrap();
        for mv in pos.current_player().legal_moves() {
            let next = mv.execute(&pos);
            assert_eq!(mv.undo(&next), pos, "undo failed for {}", mv);
        }
    }

    #[test]
    fn castle_moves_rook() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let mv = MoveFactory::create_move(&pos, Square::E1, Square::G1);
        assert_eq!(mv.kind(), MoveKind::KingSideCastle);
        let rook = mv.castle_rook().unwrap();
        assert_eq!(rook.start(), Square::H1);
        assert_eq!(rook.destination(), Square::F1);

        let next = mv.execute(&pos);
        assert_eq!(next.piece_at(Square::F1).unwrap().kind(), PieceKind::Rook);
        assert_eq!(next.piece_at(Square::H1), None);
        assert_eq!(next.king(Color::White).square(), Square::G1);
        assert!(next.has_castled(Color::White));
        assert!(!next.has_castled(Color::Black));
    }

    #[test]
    fn promotion_produces_queen() {
        let pos = Position::from_fen("1n5k/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let push = MoveFactory::create_move(&pos, sq("a7"), sq("a8"));
        let capture = MoveFactory::create_move(&pos, sq("a7"), sq("b8"));
        assert_eq!(push.kind(), MoveKind::Promotion);
        assert_eq!(capture.kind(), MoveKind::PromotionCapture);
        assert_eq!(
            capture.captured_piece().map(|p| p.kind()),
            Some(PieceKind::Knight)
        );
        let next = capture.execute(&pos);
        assert_eq!(next.piece_at(sq("b8")).unwrap().kind(), PieceKind::Queen);
        assert_eq!(capture.undo(&next), pos);
    }

    #[test]
    fn unknown_pair_yields_null_move() {
        let pos = Position::standard();
        let mv = MoveFactory::create_move(&pos, sq("e2"), sq("e5"));
        assert!(mv.is_null());
        assert_eq!(mv, Move::NULL);
        assert_eq!(mv.execute(&pos), pos);
    }

    #[test]
    fn moves_from_different_positions_differ() {
        let a = Position::standard();
        let b = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kkq - 0 1")
            .unwrap();
        let ma = MoveFactory::create_move(&a, sq("g1"), sq("f3"));
        let mb = MoveFactory::create_move(&b, sq("g1"), sq("f3"));
        assert_eq!(ma.origin_square(), mb.origin_square());
        assert_ne!(ma, mb);
    }

    #[test]
    fn coordinates() {
        let pos = Position::standard();
        let mv = MoveFactory::create_move(&pos, sq("b1"), sq("c3"));
        assert_eq!(mv.to_string(), "b1c3");
        assert_eq!(Move::NULL.to_string(), "null");
    }
}
