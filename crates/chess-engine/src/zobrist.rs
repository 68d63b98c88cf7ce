//! Zobrist keys for position identification.
//!
//! A position key XORs together random numbers for:
//! - Each piece kind/color on each square (6 × 2 × 64 values)
//! - Side to move
//! - Castling availability (4 values), derived from king/rook first-move flags
//! - File of the pawn that may be captured en passant (8 values)
//!
//! Moves record the key of the position they were generated from, which is
//! what makes two moves from different positions compare unequal.

use chess_core::{Color, PieceKind, Square};

/// Zobrist hash keys.
///
/// Generated using a fixed seed for reproducibility.
pub struct ZobristKeys {
    /// Keys for pieces: [kind][color][square]
    pieces: [[[u64; 64]; 2]; 6],
    /// Key for black to move (XOR when black to move).
    black_to_move: u64,
    /// Keys for castling availability: white king/queen side, black king/queen side.
    castling: [u64; 4],
    /// Keys for en passant file.
    en_passant: [u64; 8],
}

impl ZobristKeys {
    /// Initializes Zobrist keys using a simple PRNG.
    pub const fn new() -> Self {
        // xorshift64, usable in const context
        const fn next_random(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E3779B97F4A7C15u64;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];

        let mut kind = 0;
        while kind < 6 {
            let mut color = 0;
            while color < 2 {
                let mut square = 0;
                while square < 64 {
                    state = next_random(state);
                    pieces[kind][color][square] = state;
                    square += 1;
                }
                color += 1;
            }
            kind += 1;
        }

        state = next_random(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = next_random(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = next_random(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    /// Returns the key for a piece kind of `color` on `square`.
    #[inline]
    pub const fn piece_key(&self, kind: PieceKind, color: Color, square: Square) -> u64 {
        self.pieces[kind.index()][color.index()][square.index() as usize]
    }

    #[inline]
    pub const fn black_to_move_key(&self) -> u64 {
        self.black_to_move
    }

    /// Returns the key for a castling availability bit.
    #[inline]
    pub const fn castling_key(&self, color: Color, king_side: bool) -> u64 {
        let offset = if king_side { 0 } else { 1 };
        self.castling[color.index() * 2 + offset]
    }

    /// Returns the key for an en passant file (0-7).
    #[inline]
    pub const fn en_passant_key(&self, column: u8) -> u64 {
        self.en_passant[column as usize]
    }
}

/// Global Zobrist keys (initialized at compile time).
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();
