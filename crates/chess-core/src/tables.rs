//! Read-only board lookup tables.
//!
//! Column and row membership masks guard the move generator against file
//! wraparound (a +9 step from the h-file must not land on the a-file of the
//! next row). The tables are built at compile time and never mutated.

use crate::Square;

/// Algebraic names, indexed by square.
const ALGEBRAIC_NOTATION: [&str; 64] = [
    "a8", "b8", "c8", "d8", "e8", "f8", "g8", "h8", //
    "a7", "b7", "c7", "d7", "e7", "f7", "g7", "h7", //
    "a6", "b6", "c6", "d6", "e6", "f6", "g6", "h6", //
    "a5", "b5", "c5", "d5", "e5", "f5", "g5", "h5", //
    "a4", "b4", "c4", "d4", "e4", "f4", "g4", "h4", //
    "a3", "b3", "c3", "d3", "e3", "f3", "g3", "h3", //
    "a2", "b2", "c2", "d2", "e2", "f2", "g2", "h2", //
    "a1", "b1", "c1", "d1", "e1", "f1", "g1", "h1",
];

/// Precomputed column/row membership and notation tables.
pub struct BoardTables {
    /// `columns[c][sq]` is true when `sq` lies in column `c` (0 = a-file).
    columns: [[bool; 64]; 8],
    /// `rows[r][sq]` is true when `sq` lies in row `r` (0 = eighth rank).
    rows: [[bool; 64]; 8],
    algebraic: [&'static str; 64],
}

impl BoardTables {
    const fn new() -> Self {
        let mut columns = [[false; 64]; 8];
        let mut rows = [[false; 64]; 8];

        let mut sq = 0;
        while sq < 64 {
            columns[sq % 8][sq] = true;
            rows[sq / 8][sq] = true;
            sq += 1;
        }

        BoardTables {
            columns,
            rows,
            algebraic: ALGEBRAIC_NOTATION,
        }
    }

    /// Returns true if `square` is in `column` (0 = a-file, 7 = h-file).
    #[inline]
    pub const fn is_in_column(&self, square: Square, column: usize) -> bool {
        self.columns[column][square.index() as usize]
    }

    /// Returns true if `square` is in `row` (0 = eighth rank, 7 = first rank).
    #[inline]
    pub const fn is_in_row(&self, square: Square, row: usize) -> bool {
        self.rows[row][square.index() as usize]
    }

    #[inline]
    pub const fn first_column(&self, square: Square) -> bool {
        self.is_in_column(square, 0)
    }

    #[inline]
    pub const fn second_column(&self, square: Square) -> bool {
        self.is_in_column(square, 1)
    }

    #[inline]
    pub const fn seventh_column(&self, square: Square) -> bool {
        self.is_in_column(square, 6)
    }

    #[inline]
    pub const fn eighth_column(&self, square: Square) -> bool {
        self.is_in_column(square, 7)
    }

    /// Returns the algebraic name of a square ("a8" for square 0).
    #[inline]
    pub const fn algebraic(&self, square: Square) -> &'static str {
        self.algebraic[square.index() as usize]
    }

    /// Resolves an algebraic name back to its square.
    pub fn coordinate_at_position(&self, name: &str) -> Option<Square> {
        self.algebraic
            .iter()
            .position(|n| *n == name)
            .and_then(|i| Square::from_index(i as u8))
    }

    /// Returns the algebraic name of the square at `coordinate`, if on the board.
    pub fn position_at_coordinate(&self, coordinate: u8) -> Option<&'static str> {
        Square::from_index(coordinate).map(|sq| self.algebraic(sq))
    }
}

/// Process-wide board tables.
pub static TABLES: BoardTables = BoardTables::new();
