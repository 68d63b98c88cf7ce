//! Side (alliance) representation.

use crate::tables::TABLES;
use crate::Square;

/// Represents the two sides in chess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Both sides, White first.
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// Returns the opposite color.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Returns the index (0 for White, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the sign of the square-index delta for a pawn advance.
    ///
    /// Square 0 is a8, so White pawns move toward lower indices (-1) and
    /// Black pawns toward higher indices (+1).
    #[inline]
    pub const fn direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Returns the negated [`direction`](Self::direction).
    #[inline]
    pub const fn opposite_direction(self) -> i8 {
        -self.direction()
    }

    /// Returns true if a pawn of this color promotes on `square`.
    #[inline]
    pub fn is_promotion_square(self, square: Square) -> bool {
        match self {
            Color::White => TABLES.is_in_row(square, 0),
            Color::Black => TABLES.is_in_row(square, 7),
        }
    }

    /// Returns true if `square` is on the starting row of this color's pawns.
    #[inline]
    pub fn is_pawn_start_square(self, square: Square) -> bool {
        match self {
            Color::White => TABLES.is_in_row(square, 6),
            Color::Black => TABLES.is_in_row(square, 1),
        }
    }

    #[inline]
    pub const fn is_white(self) -> bool {
        matches!(self, Color::White)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}
