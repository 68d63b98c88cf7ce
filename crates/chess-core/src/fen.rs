//! FEN (Forsyth-Edwards Notation) parsing.
//!
//! This is the text side of position loading only. The engine turns a
//! [`FenParser`] record into a validated position.

use crate::{Color, PieceKind, Rank, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// Castling availability as written in the FEN castling field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights {
    pub white_king_side: bool,
    pub white_queen_side: bool,
    pub black_king_side: bool,
    pub black_queen_side: bool,
}

impl CastlingRights {
    /// Returns the king-side right for `color`.
    pub const fn king_side(self, color: Color) -> bool {
        match color {
            Color::White => self.white_king_side,
            Color::Black => self.black_king_side,
        }
    }

    /// Returns the queen-side right for `color`.
    pub const fn queen_side(self, color: Color) -> bool {
        match color {
            Color::White => self.white_queen_side,
            Color::Black => self.black_queen_side,
        }
    }

    /// Renders the rights as a FEN field ("KQkq", "-").
    pub fn to_fen_field(self) -> String {
        let mut field = String::new();
        if self.white_king_side {
            field.push('K');
        }
        if self.white_queen_side {
            field.push('Q');
        }
        if self.black_king_side {
            field.push('k');
        }
        if self.black_queen_side {
            field.push('q');
        }
        if field.is_empty() {
            field.push('-');
        }
        field
    }
}

/// Parsed FEN data.
///
/// Holds the typed FEN components. Structural validation (king count,
/// en-passant consistency) happens when the engine builds a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Every placed piece with its square.
    pub placement: Vec<(Square, PieceKind, Color)>,
    /// Side to move.
    pub active_color: Color,
    /// Castling availability.
    pub castling: CastlingRights,
    /// En passant target square (the square behind the pawn that jumped).
    pub en_passant: Option<Square>,
    /// Halfmove clock (for 50-move rule)
    pub halfmove_clock: u32,
    /// Fullmove number
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    ///
    /// The halfmove clock and fullmove number may be omitted, in which case
    /// they default to 0 and 1.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() != 6 && parts.len() != 4 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let placement = Self::parse_piece_placement(parts[0])?;

        let active_color = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = Self::parse_castling(parts[2])?;
        let en_passant = Self::parse_en_passant(parts[3], active_color)?;

        let (halfmove_clock, fullmove_number) = if parts.len() == 6 {
            let halfmove = parts[4]
                .parse::<u32>()
                .map_err(|_| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;
            let fullmove = parts[5]
                .parse::<u32>()
                .map_err(|_| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;
            (halfmove, fullmove)
        } else {
            (0, 1)
        };

        Ok(FenParser {
            placement,
            active_color,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_piece_placement(placement: &str) -> Result<Vec<(Square, PieceKind, Color)>, FenError> {
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                rows.len()
            )));
        }

        let mut pieces = Vec::with_capacity(32);
        // FEN lists the eighth rank first, which is row 0 of the board.
        for (row, text) in rows.iter().enumerate() {
            let mut column = 0u32;
            for c in text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    column += skip;
                } else if let Some((kind, color)) = PieceKind::from_fen_char(c) {
                    if column < 8 {
                        let index = (row as u32 * 8 + column) as u8;
                        if let Some(square) = Square::from_index(index) {
                            pieces.push((square, kind, color));
                        }
                    }
                    column += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        8 - row
                    )));
                }
            }
            if column != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    8 - row,
                    column
                )));
            }
        }

        Ok(pieces)
    }

    fn parse_castling(castling: &str) -> Result<CastlingRights, FenError> {
        let mut rights = CastlingRights::default();
        if castling == "-" {
            return Ok(rights);
        }

        for c in castling.chars() {
            match c {
                'K' => rights.white_king_side = true,
                'Q' => rights.white_queen_side = true,
                'k' => rights.black_king_side = true,
                'q' => rights.black_queen_side = true,
                _ => {
                    return Err(FenError::InvalidCastlingRights(format!(
                        "invalid character '{}'",
                        c
                    )))
                }
            }
        }

        Ok(rights)
    }

    /// The target lies behind a pawn of the side that just moved: rank 3
    /// with Black to move, rank 6 with White to move.
    fn parse_en_passant(ep: &str, active_color: Color) -> Result<Option<Square>, FenError> {
        if ep == "-" {
            return Ok(None);
        }

        let expected = match active_color {
            Color::White => Rank::R6,
            Color::Black => Rank::R3,
        };
        match Square::from_algebraic(ep) {
            Some(sq) if sq.rank() == expected => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(ep.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_startpos() {
        let fen = FenParser::parse(FenParser::STARTPOS).unwrap();
        assert_eq!(fen.active_color, Color::White);
        assert_eq!(fen.placement.len(), 32);
        assert_eq!(fen.castling.to_fen_field(), "KQkq");
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
    }

    #[test]
    fn placement_uses_a8_as_square_zero() {
        let fen = FenParser::parse(FenParser::STARTPOS).unwrap();
        assert!(fen
            .placement
            .contains(&(Square::A8, PieceKind::Rook, Color::Black)));
        assert!(fen
            .placement
            .contains(&(Square::E1, PieceKind::King, Color::White)));
    }

    #[test]
    fn parse_en_passant_target() {
        let fen =
            FenParser::parse("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        assert_eq!(fen.en_passant, Square::from_algebraic("e3"));
        assert_eq!(fen.active_color, Color::Black);
    }

    #[test]
    fn en_passant_rank_must_match_side_to_move() {
        // e6 is only a target after a black jump, so White must be to move.
        assert!(matches!(
            FenParser::parse("4k3/4P3/8/8/8/8/8/4K3 b - e6 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            FenParser::parse("4k3/8/8/8/4P3/8/8/4K3 w - e3 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        let fen = FenParser::parse("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(fen.en_passant, Square::from_algebraic("d6"));
    }

    #[test]
    fn short_form_defaults_clocks() {
        let fen = FenParser::parse("8/8/8/8/8/8/8/4K2k w - -").unwrap();
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(fen.castling, CastlingRights::default());
    }

    #[test]
    fn invalid_fens() {
        assert_eq!(
            FenParser::parse("8/8/8 w - - 0 1").unwrap_err(),
            FenError::InvalidPiecePlacement("expected 8 ranks, got 3".to_string())
        );
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/4K2k x - - 0 1"),
            Err(FenError::InvalidActiveColor(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/4K2k w X - 0 1"),
            Err(FenError::InvalidCastlingRights(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/4K2k w - e4 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/4K2k w - - x 1"),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
        assert!(matches!(
            FenParser::parse("9/8/8/8/8/8/8/4K2k w - - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert_eq!(
            FenParser::parse("8/8/8/8/8/8/8/4K2k w"),
            Err(FenError::InvalidPartCount(2))
        );
    }
}
