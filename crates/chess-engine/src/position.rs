//! Chess position representation.
//!
//! A [`Position`] is an immutable snapshot: 64 squares each holding an
//! optional [`Piece`], the side to move, the pawn that may be captured en
//! passant, and bookkeeping counters. Applying a move produces a new
//! position; nothing here mutates in place.

use chess_core::{CastlingRights, Color, FenError, FenParser, Piece, PieceKind, Square};
use std::fmt;
use thiserror::Error;

use crate::movegen::attacked_squares;
use crate::zobrist::ZOBRIST;
use crate::{Move, Player};

/// Errors raised when a position fails structural validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("{0} has no king")]
    MissingKing(Color),

    #[error("{0} has more than one king")]
    TooManyKings(Color),

    #[error("{0} has more than 16 pieces")]
    TooManyPieces(Color),

    #[error("invalid en passant pawn: {0}")]
    InvalidEnPassant(String),

    #[error("{0} is in check but it is not their turn")]
    NonMoverInCheck(Color),
}

/// Complete chess position state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub(crate) board: [Option<Piece>; 64],
    pub(crate) side_to_move: Color,
    /// Pawn that jumped two squares on the previous ply.
    pub(crate) en_passant_pawn: Option<Piece>,
    pub(crate) castled: [bool; 2],
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    /// Index of this position in the caller's move history.
    pub(crate) ply: usize,
    pub(crate) kings: [Piece; 2],
    pub(crate) hash: u64,
}

impl Position {
    /// Creates the standard starting position.
    pub fn standard() -> Self {
        Self::from_fen(FenParser::STARTPOS).expect("STARTPOS is valid")
    }

    /// Returns a builder for assembling a custom position.
    pub fn builder() -> PositionBuilder {
        PositionBuilder::new()
    }

    /// Creates a position from a FEN string.
    ///
    /// Castling rights become first-move flags on the king and rooks, pawns on
    /// their starting row keep their first-move flag, and the en passant target
    /// square resolves to the pawn that just jumped past it.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let parsed = FenParser::parse(fen)?;
        let rights = parsed.castling;
        let mut builder = PositionBuilder::new();

        for &(square, kind, color) in &parsed.placement {
            let first_move = match kind {
                PieceKind::Pawn => color.is_pawn_start_square(square),
                PieceKind::King => {
                    square == king_home(color)
                        && (rights.king_side(color) || rights.queen_side(color))
                }
                PieceKind::Rook => {
                    let (king_side_rook, queen_side_rook) = rook_homes(color);
                    (square == king_side_rook && rights.king_side(color))
                        || (square == queen_side_rook && rights.queen_side(color))
                }
                _ => false,
            };
            builder.set_piece(Piece::with_first_move(kind, color, square, first_move));
        }

        if let Some(target) = parsed.en_passant {
            let pawn_color = parsed.active_color.opposite();
            let pawn = target
                .offset(8 * pawn_color.direction())
                .and_then(|sq| builder.board[sq.index() as usize])
                .filter(|p| p.kind() == PieceKind::Pawn && p.color() == pawn_color)
                .ok_or_else(|| {
                    PositionError::InvalidEnPassant(format!(
                        "no {} pawn in front of {}",
                        pawn_color, target
                    ))
                })?;
            builder.set_en_passant_pawn(Some(pawn));
        }

        builder
            .set_side_to_move(parsed.active_color)
            .set_halfmove_clock(parsed.halfmove_clock)
            .set_fullmove_number(parsed.fullmove_number);
        builder.build()
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for row in 0..8u8 {
            let mut empty_count = 0;
            for column in 0..8u8 {
                match self.board[(row * 8 + column) as usize] {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if row < 7 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        fen.push_str(&self.castling_rights().to_fen_field());

        fen.push(' ');
        match self.en_passant_target() {
            Some(sq) => fen.push_str(sq.to_algebraic()),
            None => fen.push('-'),
        }

        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }

    /// Returns the piece at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board[sq.index() as usize]
    }

    /// Returns true if a piece stands on `sq`.
    #[inline]
    pub fn is_occupied(&self, sq: Square) -> bool {
        self.board[sq.index() as usize].is_some()
    }

    /// Iterates over the pieces of one side, in square order.
    pub fn active_pieces(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        self.all_pieces().filter(move |p| p.color() == color)
    }

    /// Iterates over every piece on the board, in square order.
    pub fn all_pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.board.iter().flatten().copied()
    }

    /// Returns the king of the given side.
    #[inline]
    pub fn king(&self, color: Color) -> Piece {
        self.kings[color.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the pawn that may be captured en passant this ply.
    #[inline]
    pub fn en_passant_pawn(&self) -> Option<Piece> {
        self.en_passant_pawn
    }

    /// Returns the square an en passant capture would land on.
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_pawn.and_then(|pawn| {
            pawn.square()
                .offset(8 * pawn.color().opposite_direction())
        })
    }

    /// Returns true if `color` has castled at some point in this line.
    #[inline]
    pub fn has_castled(&self, color: Color) -> bool {
        self.castled[color.index()]
    }

    /// Index of this position in the move history that produced it.
    #[inline]
    pub fn ply(&self) -> usize {
        self.ply
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns the Zobrist key of this position.
    #[inline]
    pub fn zobrist_hash(&self) -> u64 {
        self.hash
    }

    /// Castling availability derived from the king and rook first-move flags.
    pub fn castling_rights(&self) -> CastlingRights {
        castling_rights(&self.board)
    }

    /// Renders the board as an 8x8 grid, eighth rank first.
    ///
    /// White pieces are upper-case, Black lower-case, empty squares `-`.
    /// Squares are separated by a single space and every row ends with a
    /// newline.
    pub fn to_display_string(&self) -> String {
        let mut out = String::with_capacity(128);
        for row in 0..8 {
            for column in 0..8 {
                if column > 0 {
                    out.push(' ');
                }
                out.push(self.board[row * 8 + column].map_or('-', Piece::to_char));
            }
            out.push('\n');
        }
        out
    }

    /// Returns the legality view for one side.
    pub fn player(&self, color: Color) -> Player<'_> {
        Player::new(self, color)
    }

    /// Returns the legality view for the side to move.
    pub fn current_player(&self) -> Player<'_> {
        Player::new(self, self.side_to_move)
    }

    /// Returns the position after `mv`.
    ///
    /// This does not check legality; use [`Player::make_move`] for that.
    #[inline]
    pub fn apply_move(&self, mv: Move) -> Position {
        mv.execute(self)
    }

    /// Returns true when the side to move is checkmated or stalemated.
    pub fn is_end_game(&self) -> bool {
        let player = self.current_player();
        player.is_in_check_mate() || player.is_in_stalemate()
    }

    /// Returns true when either side's king is attacked.
    pub fn is_threatened_board_immediate(&self) -> bool {
        Color::ALL
            .iter()
            .any(|&color| self.player(color).is_in_check())
    }

    /// Returns true if `mv` is legal here and leaves the opponent in check.
    pub fn king_threat(&self, mv: Move) -> bool {
        let transition = self.current_player().make_move(mv);
        transition.status().is_done() && transition.to_position().current_player().is_in_check()
    }

    /// Assembles a position from parts that are already known to be valid.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        board: [Option<Piece>; 64],
        side_to_move: Color,
        en_passant_pawn: Option<Piece>,
        castled: [bool; 2],
        halfmove_clock: u32,
        fullmove_number: u32,
        ply: usize,
        kings: [Piece; 2],
    ) -> Position {
        let hash = compute_hash(&board, side_to_move, en_passant_pawn);
        Position {
            board,
            side_to_move,
            en_passant_pawn,
            castled,
            halfmove_clock,
            fullmove_number,
            ply,
            kings,
            hash,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

/// Incremental assembly of a [`Position`].
///
/// Setters can be called in any order; [`build`](Self::build) runs the
/// structural checks.
#[derive(Debug, Clone)]
pub struct PositionBuilder {
    board: [Option<Piece>; 64],
    side_to_move: Color,
    en_passant_pawn: Option<Piece>,
    castled: [bool; 2],
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Default for PositionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionBuilder {
    /// Creates an empty board with White to move.
    pub fn new() -> Self {
        PositionBuilder {
            board: [None; 64],
            side_to_move: Color::White,
            en_passant_pawn: None,
            castled: [false; 2],
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Places a piece on its square, replacing whatever stood there.
    pub fn set_piece(&mut self, piece: Piece) -> &mut Self {
        self.board[piece.square().index() as usize] = Some(piece);
        self
    }

    pub fn remove_piece(&mut self, square: Square) -> &mut Self {
        self.board[square.index() as usize] = None;
        self
    }

    pub fn set_side_to_move(&mut self, color: Color) -> &mut Self {
        self.side_to_move = color;
        self
    }

    pub fn set_en_passant_pawn(&mut self, pawn: Option<Piece>) -> &mut Self {
        self.en_passant_pawn = pawn;
        self
    }

    pub fn set_castled(&mut self, color: Color, castled: bool) -> &mut Self {
        self.castled[color.index()] = castled;
        self
    }

    pub fn set_halfmove_clock(&mut self, clock: u32) -> &mut Self {
        self.halfmove_clock = clock;
        self
    }

    pub fn set_fullmove_number(&mut self, number: u32) -> &mut Self {
        self.fullmove_number = number;
        self
    }

    /// Validates and builds the position.
    ///
    /// Fails when a side does not have exactly one king or has more than 16
    /// pieces, when the en passant
    /// pawn is not an enemy pawn standing on the board, or when the side that
    /// is not to move is already in check.
    pub fn build(&self) -> Result<Position, PositionError> {
        let mut kings: [Option<Piece>; 2] = [None; 2];
        let mut counts = [0usize; 2];
        for piece in self.board.iter().flatten() {
            counts[piece.color().index()] += 1;
            if counts[piece.color().index()] > MAX_PIECES_PER_SIDE {
                return Err(PositionError::TooManyPieces(piece.color()));
            }
            if piece.kind() != PieceKind::King {
                continue;
            }
            let slot = &mut kings[piece.color().index()];
            if slot.is_some() {
                return Err(PositionError::TooManyKings(piece.color()));
            }
            *slot = Some(*piece);
        }
        let white_king = kings[0].ok_or(PositionError::MissingKing(Color::White))?;
        let black_king = kings[1].ok_or(PositionError::MissingKing(Color::Black))?;

        if let Some(pawn) = self.en_passant_pawn {
            let on_board = self.board[pawn.square().index() as usize] == Some(pawn);
            if !on_board
                || pawn.kind() != PieceKind::Pawn
                || pawn.color() == self.side_to_move
            {
                return Err(PositionError::InvalidEnPassant(format!(
                    "{} is not a capturable {} pawn",
                    pawn,
                    self.side_to_move.opposite()
                )));
            }
        }

        let position = Position::assemble(
            self.board,
            self.side_to_move,
            self.en_passant_pawn,
            self.castled,
            self.halfmove_clock,
            self.fullmove_number,
            0,
            [white_king, black_king],
        );

        let idle = self.side_to_move.opposite();
        if attacked_squares(&position, self.side_to_move).contains(position.king(idle).square()) {
            return Err(PositionError::NonMoverInCheck(idle));
        }

        Ok(position)
    }
}

const MAX_PIECES_PER_SIDE: usize = 16;

#[inline]
pub(crate) const fn king_home(color: Color) -> Square {
    match color {
        Color::White => Square::E1,
        Color::Black => Square::E8,
    }
}

/// Home squares of the (king-side, queen-side) rooks.
#[inline]
pub(crate) const fn rook_homes(color: Color) -> (Square, Square) {
    match color {
        Color::White => (Square::H1, Square::A1),
        Color::Black => (Square::H8, Square::A8),
    }
}

fn unmoved(board: &[Option<Piece>; 64], square: Square, kind: PieceKind, color: Color) -> bool {
    matches!(
        board[square.index() as usize],
        Some(p) if p.kind() == kind && p.color() == color && p.is_first_move()
    )
}

fn castling_rights(board: &[Option<Piece>; 64]) -> CastlingRights {
    let side = |color: Color, rook: Square| {
        unmoved(board, king_home(color), PieceKind::King, color)
            && unmoved(board, rook, PieceKind::Rook, color)
    };
    CastlingRights {
        white_king_side: side(Color::White, Square::H1),
        white_queen_side: side(Color::White, Square::A1),
        black_king_side: side(Color::Black, Square::H8),
        black_queen_side: side(Color::Black, Square::A8),
    }
}

fn compute_hash(
    board: &[Option<Piece>; 64],
    side_to_move: Color,
    en_passant_pawn: Option<Piece>,
) -> u64 {
    let mut hash = 0u64;
    for piece in board.iter().flatten() {
        hash ^= ZOBRIST.piece_key(piece.kind(), piece.color(), piece.square());
    }
    if side_to_move == Color::Black {
        hash ^= ZOBRIST.black_to_move_key();
    }
    let rights = castling_rights(board);
    for color in Color::ALL {
        if rights.king_side(color) {
            hash ^= ZOBRIST.castling_key(color, true);
        }
        if rights.queen_side(color) {
            hash ^= ZOBRIST.castling_key(color, false);
        }
    }
    if let Some(pawn) = en_passant_pawn {
        hash ^= ZOBRIST.en_passant_key(pawn.square().column());
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn standard_fen_roundtrip() {
        let pos = Position::standard();
        assert_eq!(pos.to_fen(), FenParser::STARTPOS);
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.all_pieces().count(), 32);
        assert_eq!(pos.ply(), 0);
    }

    #[test]
    fn custom_fen_roundtrip() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn piece_at() {
        let pos = Position::standard();
        let king = pos.piece_at(Square::E1).unwrap();
        assert_eq!(king.kind(), PieceKind::King);
        assert_eq!(king.color(), Color::White);
        assert_eq!(pos.king(Color::Black).square(), Square::E8);
        assert_eq!(pos.piece_at(sq("e4")), None);
    }

    #[test]
    fn active_pieces_split_by_side() {
        let pos = Position::standard();
        assert_eq!(pos.active_pieces(Color::White).count(), 16);
        assert!(pos
            .active_pieces(Color::Black)
            .all(|p| p.color() == Color::Black));
    }

    #[test]
    fn castling_rights_follow_first_move_flags() {
        let fen = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w Kq - 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert!(pos.piece_at(Square::H1).unwrap().is_first_move());
        assert!(!pos.piece_at(Square::A1).unwrap().is_first_move());
        assert!(pos.piece_at(Square::A8).unwrap().is_first_move());
        assert!(!pos.piece_at(Square::H8).unwrap().is_first_move());
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn no_castling_rights() {
        let fen = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w - - 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert!(!pos.king(Color::White).is_first_move());
        assert_eq!(pos.castling_rights(), CastlingRights::default());
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn en_passant_target_resolves_to_pawn() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let pos = Position::from_fen(fen).unwrap();
        let pawn = pos.en_passant_pawn().unwrap();
        assert_eq!(pawn.square(), sq("e4"));
        assert_eq!(pawn.color(), Color::White);
        assert_eq!(pos.en_passant_target(), Some(sq("e3")));
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn en_passant_without_pawn_is_rejected() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq e3 0 1";
        assert!(matches!(
            Position::from_fen(fen),
            Err(PositionError::InvalidEnPassant(_))
        ));
    }

    #[test]
    fn king_count_is_validated() {
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(PositionError::MissingKing(Color::Black))
        );
        assert_eq!(
            Position::from_fen("k7/8/8/8/8/8/8/8 w - - 0 1"),
            Err(PositionError::MissingKing(Color::White))
        );
        assert_eq!(
            Position::from_fen("kk6/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(PositionError::TooManyKings(Color::Black))
        );
    }

    #[test]
    fn piece_count_is_bounded() {
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/PPPPPPPP/PPPPPPPP/QK6 w - - 0 1"),
            Err(PositionError::TooManyPieces(Color::White))
        );
        let full = Position::from_fen("4k3/8/8/8/8/PPPPPPPP/PPPPPPP1/1K6 w - - 0 1");
        assert!(full.is_ok());
    }

    #[test]
    fn side_not_to_move_cannot_be_in_check() {
        // White rook attacks the black king with White to move.
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4RK2 w - - 0 1"),
            Err(PositionError::NonMoverInCheck(Color::Black))
        );
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4RK2 b - - 0 1").is_ok());
    }

    #[test]
    fn invalid_fen_is_reported() {
        assert!(matches!(
            Position::from_fen("not a fen"),
            Err(PositionError::Fen(_))
        ));
    }

    #[test]
    fn builder_assembles_position() {
        let mut builder = Position::builder();
        builder
            .set_piece(Piece::new(PieceKind::King, Color::White, Square::E1))
            .set_piece(Piece::new(PieceKind::King, Color::Black, Square::E8))
            .set_piece(Piece::new(PieceKind::Queen, Color::White, sq("d4")))
            .set_side_to_move(Color::Black);
        let pos = builder.build().unwrap();
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.piece_at(sq("d4")).unwrap().kind(), PieceKind::Queen);

        builder.remove_piece(Square::E8);
        assert_eq!(builder.build(), Err(PositionError::MissingKing(Color::Black)));
    }

    #[test]
    fn display_string_grid() {
        let pos = Position::standard();
        let grid = pos.to_display_string();
        let rows: Vec<&str> = grid.lines().collect();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0], "r n b q k b n r");
        assert_eq!(rows[3], "- - - - - - - -");
        assert_eq!(rows[7], "R N B Q K B N R");
    }

    #[test]
    fn hash_distinguishes_side_and_rights() {
        let a = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let b = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
        let c = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Qkq - 0 1").unwrap();
        assert_ne!(a.zobrist_hash(), b.zobrist_hash());
        assert_ne!(a.zobrist_hash(), c.zobrist_hash());
        assert_eq!(
            a.zobrist_hash(),
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 5 9")
                .unwrap()
                .zobrist_hash()
        );
    }
}
