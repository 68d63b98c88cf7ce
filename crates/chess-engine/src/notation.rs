//! Short algebraic notation.
//!
//! Rendering follows the board-side conventions of this engine: pieces are
//! disambiguated by origin file first, then rank, then both; promotions are
//! always to a queen (`=Q`); a trailing `+` or `#` marks check or mate.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"

use chess_core::{File, PieceKind, Rank, Square};
use thiserror::Error;

use crate::{Move, MoveKind, Position};

/// Error type for notation parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty move text")]
    Empty,

    #[error("invalid move text: {0}")]
    InvalidFormat(String),

    #[error("no legal move matches: {0}")]
    NoMatchingMove(String),

    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// Renders a move in short algebraic notation.
///
/// `position` is the position the move was generated in. Check and mate
/// suffixes are only added for moves that are actually playable.
pub fn move_to_san(position: &Position, mv: Move) -> String {
    let mut san = String::new();

    match mv.kind() {
        MoveKind::Null => return "--".to_string(),
        MoveKind::KingSideCastle => san.push_str("O-O"),
        MoveKind::QueenSideCastle => san.push_str("O-O-O"),
        _ => {
            let piece = mv.moved_piece();
            let from = mv.origin_square();
            if piece.kind() == PieceKind::Pawn {
                if mv.is_capture() {
                    san.push(from.file().to_char());
                }
            } else {
                san.push(piece.kind().letter());
                san.push_str(&disambiguation(position, mv));
            }
            if mv.is_capture() {
                san.push('x');
            }
            san.push_str(mv.destination().to_algebraic());
            if mv.is_promotion() {
                san.push_str("=Q");
            }
        }
    }

    san.push_str(check_suffix(position, mv));
    san
}

/// Parses short algebraic notation into the matching playable move.
///
/// Check markers are ignored. Promotions may be written with or without
/// `=Q`; any other promotion piece is rejected.
pub fn san_to_move(position: &Position, san: &str) -> Result<Move, NotationError> {
    let san = san.trim();
    if san.is_empty() {
        return Err(NotationError::Empty);
    }
    let text = san.trim_end_matches(['+', '#']);

    let candidates = position.current_player().verified_moves();

    if text == "O-O" || text == "0-0" {
        return find_one(&candidates, san, |m| m.kind() == MoveKind::KingSideCastle);
    }
    if text == "O-O-O" || text == "0-0-0" {
        return find_one(&candidates, san, |m| m.kind() == MoveKind::QueenSideCastle);
    }

    let parsed = parse_components(text)?;
    find_one(&candidates, san, |m| {
        m.moved_piece().kind() == parsed.kind
            && !m.is_castle()
            && m.destination() == parsed.destination
            && parsed.from_file.map_or(true, |f| m.origin_square().file() == f)
            && parsed.from_rank.map_or(true, |r| m.origin_square().rank() == r)
            && (!parsed.is_capture || m.is_capture())
    })
}

/// Parsed components of a move text.
#[derive(Debug)]
struct ParsedSan {
    kind: PieceKind,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    destination: Square,
    is_capture: bool,
}

fn parse_components(text: &str) -> Result<ParsedSan, NotationError> {
    let invalid = || NotationError::InvalidFormat(text.to_string());

    let mut rest = text;
    let kind = match rest.chars().next() {
        Some(c) if c.is_ascii_uppercase() => {
            rest = &rest[1..];
            PieceKind::from_letter(c).ok_or_else(invalid)?
        }
        _ => PieceKind::Pawn,
    };

    if let Some((body, promotion)) = rest.split_once('=') {
        if promotion != "Q" {
            return Err(invalid());
        }
        rest = body;
    }

    let is_capture = rest.contains('x');
    let chars: Vec<char> = rest.chars().filter(|&c| c != 'x').collect();
    if chars.len() < 2 || chars.len() > 4 {
        return Err(invalid());
    }

    let (prefix, target) = chars.split_at(chars.len() - 2);
    let destination = match (File::from_char(target[0]), Rank::from_char(target[1])) {
        (Some(f), Some(r)) if target[0].is_ascii_lowercase() => Square::new(f, r),
        _ => return Err(invalid()),
    };

    let mut from_file = None;
    let mut from_rank = None;
    for &c in prefix {
        if c.is_ascii_lowercase() && from_file.is_none() && from_rank.is_none() {
            from_file = Some(File::from_char(c).ok_or_else(invalid)?);
        } else if from_rank.is_none() {
            from_rank = Some(Rank::from_char(c).ok_or_else(invalid)?);
        } else {
            return Err(invalid());
        }
    }

    Ok(ParsedSan {
        kind,
        from_file,
        from_rank,
        destination,
        is_capture,
    })
}

fn find_one<F>(candidates: &[Move], san: &str, matches: F) -> Result<Move, NotationError>
where
    F: Fn(&Move) -> bool,
{
    let mut found = candidates.iter().filter(|m| matches(m));
    match (found.next(), found.next()) {
        (Some(&mv), None) => Ok(mv),
        (None, _) => Err(NotationError::NoMatchingMove(san.to_string())),
        (Some(_), Some(_)) => Err(NotationError::AmbiguousMove(san.to_string())),
    }
}

fn disambiguation(position: &Position, mv: Move) -> String {
    let from = mv.origin_square();
    let rivals: Vec<Square> = position
        .current_player()
        .verified_moves()
        .into_iter()
        .filter(|other| {
            other.moved_piece().kind() == mv.moved_piece().kind()
                && other.destination() == mv.destination()
                && other.origin_square() != from
        })
        .map(|other| other.origin_square())
        .collect();

    if rivals.is_empty() {
        return String::new();
    }
    if rivals.iter().all(|sq| sq.file() != from.file()) {
        return from.file().to_char().to_string();
    }
    if rivals.iter().all(|sq| sq.rank() != from.rank()) {
        return from.rank().to_char().to_string();
    }
    from.to_algebraic().to_string()
}

fn check_suffix(position: &Position, mv: Move) -> &'static str {
    let transition = position.current_player().make_move(mv);
    if !transition.status().is_done() {
        return "";
    }
    let opponent = transition.to_position().current_player();
    if opponent.is_in_check_mate() {
        "#"
    } else if opponent.is_in_check() {
        "+"
    } else {
        ""
    }
}
