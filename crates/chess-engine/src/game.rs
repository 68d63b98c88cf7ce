//! Game management with caller-owned move history.
//!
//! Positions do not own their ancestry. [`Game`] keeps the played moves in a
//! list, and a position's [`ply`](Position::ply) is its index into that list,
//! which is all that history traversal and undo need.

use chess_core::{Color, TABLES};
use thiserror::Error;

use crate::notation::{move_to_san, san_to_move, NotationError};
use crate::{Move, MoveFactory, MoveStatus, Position, PositionError};

/// A recorded move in game history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMove {
    /// The move in internal format.
    pub mv: Move,
    /// Algebraic notation for the move.
    pub san: String,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Stalemate,
}

impl GameResult {
    /// Returns the winner, if any.
    pub fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Stalemate => None,
        }
    }
}

/// Error type for game operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("move leaves the king in check: {0}")]
    LeavesKingInCheck(String),

    #[error("invalid move text: {0}")]
    InvalidSan(#[from] NotationError),

    #[error("game has already ended")]
    GameAlreadyOver,
}

/// A chess game with history tracking.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    start_pos: Position,
    moves: Vec<GameMove>,
    result: Option<GameResult>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::standard())
    }

    /// Creates a game from a custom starting position.
    pub fn from_position(position: Position) -> Self {
        let mut game = Game {
            position: position.clone(),
            start_pos: position,
            moves: Vec::new(),
            result: None,
        };
        game.check_game_end();
        game
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn start_position(&self) -> &Position {
        &self.start_pos
    }

    /// Returns the playable moves in the current position.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.position.current_player().verified_moves()
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.position.current_player().is_in_check()
    }

    #[inline]
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    #[inline]
    pub fn move_history(&self) -> &[GameMove] {
        &self.moves
    }

    /// Returns the number of half-moves (plies) played.
    #[inline]
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Plays a move through the legality filter.
    pub fn make_move(&mut self, mv: Move) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }

        let san = move_to_san(&self.position, mv);
        let transition = self.position.current_player().make_move(mv);
        match transition.status() {
            MoveStatus::Done => {}
            MoveStatus::IllegalMove => return Err(GameError::IllegalMove(mv.to_string())),
            MoveStatus::LeavesPlayerInCheck => {
                return Err(GameError::LeavesKingInCheck(mv.to_string()))
            }
        }

        self.position = transition.into_position();
        self.moves.push(GameMove { mv, san });
        self.check_game_end();
        Ok(())
    }

    /// Plays a move given in algebraic notation.
    pub fn make_move_san(&mut self, san: &str) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }
        let mv = san_to_move(&self.position, san)?;
        self.make_move(mv)
    }

    /// Plays the move between two squares named like "e2" and "e4".
    pub fn make_move_coordinates(&mut self, from: &str, to: &str) -> Result<(), GameError> {
        let illegal = || GameError::IllegalMove(format!("{}{}", from, to));
        let from_sq = TABLES.coordinate_at_position(from).ok_or_else(illegal)?;
        let to_sq = TABLES.coordinate_at_position(to).ok_or_else(illegal)?;
        let mv = MoveFactory::create_move(&self.position, from_sq, to_sq);
        if mv.is_null() {
            return Err(illegal());
        }
        self.make_move(mv)
    }

    /// Takes back the last move, returning it.
    pub fn undo(&mut self) -> Option<Move> {
        let last = self.moves.pop()?;
        self.position = last.mv.undo(&self.position);
        self.result = None;
        Some(last.mv)
    }

    /// Returns up to `n` moves leading to the current position, newest first.
    pub fn last_n_moves(&self, n: usize) -> Vec<Move> {
        let mut history = Vec::with_capacity(n.min(self.moves.len()));
        let mut ply = self.position.ply();
        while ply > 0 && history.len() < n {
            match self.moves.get(ply - 1) {
                Some(entry) => history.push(entry.mv),
                None => break,
            }
            ply -= 1;
        }
        history
    }

    fn check_game_end(&mut self) {
        let player = self.position.current_player();
        self.result = if player.is_in_check_mate() {
            Some(match player.color() {
                Color::White => GameResult::BlackWins,
                Color::Black => GameResult::WhiteWins,
            })
        } else if player.is_in_stalemate() {
            Some(GameResult::Stalemate)
        } else {
            None
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game() {
        let game = Game::new();
        assert_eq!(game.ply_count(), 0);
        assert!(!game.is_game_over());
        assert_eq!(game.legal_moves().len(), 20);
        assert!(game.last_n_moves(5).is_empty());
    }

    #[test]
    fn play_moves_by_san() {
        let mut game = Game::new();
        game.make_move_san("e4").unwrap();
        game.make_move_san("e5").unwrap();
        game.make_move_san("Nf3").unwrap();
        assert_eq!(game.ply_count(), 3);
        assert_eq!(
            game.to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );
        let sans: Vec<&str> = game.move_history().iter().map(|m| m.san.as_str()).collect();
        assert_eq!(sans, vec!["e4", "e5", "Nf3"]);
    }

    #[test]
    fn fools_mate_ends_game() {
        let mut game = Game::new();
        for san in ["f3", "e5", "g4", "Qh4#"] {
            game.make_move_san(san).unwrap();
        }
        assert_eq!(game.result(), Some(GameResult::BlackWins));
        assert_eq!(game.move_history()[3].san, "Qh4#");
        assert_eq!(game.make_move_san("a3"), Err(GameError::GameAlreadyOver));
    }

    #[test]
    fn illegal_moves_are_rejected() {
        let mut game = Game::new();
        assert!(matches!(
            game.make_move_coordinates("e2", "e5"),
            Err(GameError::IllegalMove(_))
        ));
        assert!(matches!(
            game.make_move_coordinates("z9", "e5"),
            Err(GameError::IllegalMove(_))
        ));
        assert!(matches!(
            game.make_move_san("Ke2"),
            Err(GameError::InvalidSan(_))
        ));
        assert_eq!(game.ply_count(), 0);
    }

    #[test]
    fn pinned_move_reports_check() {
        let mut game = Game::from_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        let mv = MoveFactory::create_move(
            game.position(),
            chess_core::Square::from_algebraic("e2").unwrap(),
            chess_core::Square::from_algebraic("d3").unwrap(),
        );
        assert!(matches!(
            game.make_move(mv),
            Err(GameError::LeavesKingInCheck(_))
        ));
    }

    #[test]
    fn undo_and_history() {
        let mut game = Game::new();
        game.make_move_coordinates("e2", "e4").unwrap();
        game.make_move_coordinates("d7", "d5").unwrap();
        game.make_move_coordinates("e4", "d5").unwrap();

        let last = game.last_n_moves(2);
        assert_eq!(last.len(), 2);
        assert_eq!(last[0].to_string(), "e4d5");
        assert_eq!(last[1].to_string(), "d7d5");
        assert_eq!(game.last_n_moves(10).len(), 3);

        let undone = game.undo().unwrap();
        assert_eq!(undone.to_string(), "e4d5");
        assert_eq!(
            game.to_fen(),
            "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2"
        );
        game.undo();
        game.undo();
        assert_eq!(game.position(), game.start_position());
        assert_eq!(game.undo(), None);
    }

    #[test]
    fn stalemate_is_detected_at_start() {
        let game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(game.result(), Some(GameResult::Stalemate));
        assert_eq!(GameResult::Stalemate.winner(), None);
    }
}
