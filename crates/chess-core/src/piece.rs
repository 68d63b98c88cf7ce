//! Chess piece representation.

use crate::{Color, Square};
use std::fmt;

/// The six kinds of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// Returns the index of this piece kind (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Fixed material value used by evaluation and move ordering.
    #[inline]
    pub const fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 300,
            PieceKind::Bishop => 350,
            PieceKind::Rook => 500,
            PieceKind::Queen => 1100,
            PieceKind::King => 10000,
        }
    }

    /// Returns the upper-case letter used in algebraic notation.
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Returns the FEN character for this kind with the given color.
    pub const fn to_fen_char(self, color: Color) -> char {
        match color {
            Color::White => self.letter(),
            Color::Black => self.letter().to_ascii_lowercase(),
        }
    }

    /// Parses a FEN character into a piece kind and color.
    pub const fn from_fen_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((kind, color))
    }

    /// Parses an upper-case notation letter ('N', 'B', ...).
    pub const fn from_letter(c: char) -> Option<PieceKind> {
        match c {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Returns true if this piece is a sliding piece (bishop, rook, or queen).
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// A piece standing on a square.
///
/// Pieces are plain values: two pieces are equal when kind, color, square
/// and first-move flag all match. Moving a piece produces a new value at the
/// destination rather than mutating the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    square: Square,
    first_move: bool,
}

impl Piece {
    /// Creates a piece that has not moved yet.
    #[inline]
    pub const fn new(kind: PieceKind, color: Color, square: Square) -> Self {
        Piece {
            kind,
            color,
            square,
            first_move: true,
        }
    }

    /// Creates a piece with an explicit first-move flag.
    #[inline]
    pub const fn with_first_move(
        kind: PieceKind,
        color: Color,
        square: Square,
        first_move: bool,
    ) -> Self {
        Piece {
            kind,
            color,
            square,
            first_move,
        }
    }

    #[inline]
    pub const fn kind(self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub const fn color(self) -> Color {
        self.color
    }

    #[inline]
    pub const fn square(self) -> Square {
        self.square
    }

    /// Returns true if the piece has never moved.
    #[inline]
    pub const fn is_first_move(self) -> bool {
        self.first_move
    }

    /// Returns the value of this piece's kind.
    #[inline]
    pub const fn value(self) -> i32 {
        self.kind.value()
    }

    /// Returns the piece as it stands after moving to `destination`.
    #[inline]
    pub const fn moved_to(self, destination: Square) -> Self {
        Piece {
            kind: self.kind,
            color: self.color,
            square: destination,
            first_move: false,
        }
    }

    /// Returns the piece a pawn becomes on promotion (always a queen).
    #[inline]
    pub const fn promoted(self) -> Self {
        Piece {
            kind: PieceKind::Queen,
            color: self.color,
            square: self.square,
            first_move: false,
        }
    }

    /// Returns the display character (upper-case for White).
    #[inline]
    pub const fn to_char(self) -> char {
        self.kind.to_fen_char(self.color)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.to_char(), self.square)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_to_fen() {
        assert_eq!(PieceKind::Pawn.to_fen_char(Color::White), 'P');
        assert_eq!(PieceKind::Pawn.to_fen_char(Color::Black), 'p');
        assert_eq!(PieceKind::King.to_fen_char(Color::White), 'K');
        assert_eq!(PieceKind::Knight.to_fen_char(Color::Black), 'n');
    }

    #[test]
    fn kind_from_fen() {
        assert_eq!(
            PieceKind::from_fen_char('P'),
            Some((PieceKind::Pawn, Color::White))
        );
        assert_eq!(
            PieceKind::from_fen_char('k'),
            Some((PieceKind::King, Color::Black))
        );
        assert_eq!(PieceKind::from_fen_char('x'), None);
    }

    #[test]
    fn kind_values() {
        assert_eq!(PieceKind::Pawn.value(), 100);
        assert_eq!(PieceKind::Knight.value(), 300);
        assert_eq!(PieceKind::Bishop.value(), 350);
        assert_eq!(PieceKind::Rook.value(), 500);
        assert_eq!(PieceKind::Queen.value(), 1100);
        assert_eq!(PieceKind::King.value(), 10000);
    }

    #[test]
    fn is_slider() {
        assert!(!PieceKind::Pawn.is_slider());
        assert!(!PieceKind::Knight.is_slider());
        assert!(PieceKind::Bishop.is_slider());
        assert!(PieceKind::Rook.is_slider());
        assert!(PieceKind::Queen.is_slider());
        assert!(!PieceKind::King.is_slider());
    }

    #[test]
    fn piece_equality_is_positional() {
        let a = Piece::new(PieceKind::Rook, Color::White, Square::H1);
        let b = Piece::new(PieceKind::Rook, Color::White, Square::H1);
        assert_eq!(a, b);
        assert_ne!(a, a.moved_to(Square::H1));
        assert_ne!(a, Piece::new(PieceKind::Rook, Color::Black, Square::H1));
    }

    #[test]
    fn moving_produces_new_value() {
        let pawn = Piece::new(PieceKind::Pawn, Color::White, Square::E1);
        let moved = pawn.moved_to(Square::E8);
        assert!(pawn.is_first_move());
        assert!(!moved.is_first_move());
        assert_eq!(moved.square(), Square::E8);
        assert_eq!(moved.promoted().kind(), PieceKind::Queen);
        assert_eq!(moved.promoted().square(), Square::E8);
    }
}
