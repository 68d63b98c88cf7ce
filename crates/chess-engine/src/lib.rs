//! Chess rules engine.
//!
//! This crate provides:
//! - [`Position`] - immutable board snapshot, built from FEN or a [`PositionBuilder`]
//! - [`Move`] - tagged move values that derive successor positions and undo them
//! - Pseudo-legal move generation per piece kind ([`movegen`])
//! - [`Player`] - legal moves, check, checkmate and stalemate for one side
//! - [`Game`] - move history owned by the caller, with undo
//! - Short algebraic notation ([`notation`])
//!
//! # Architecture
//!
//! A position is a 64-entry mailbox of optional pieces, square 0 being a8.
//! Moves never mutate a position: [`Move::execute`] returns a new one, and a
//! rejected move leaves every existing value untouched. Bitboards are only
//! used as square sets for attack maps.
//!
//! # Example
//!
//! ```
//! use chess_engine::{Game, MoveFactory, Position};
//! use chess_core::Square;
//!
//! let position = Position::standard();
//! let player = position.current_player();
//! println!("Legal moves from starting position: {}", player.legal_moves().len());
//!
//! let e2 = Square::from_algebraic("e2").unwrap();
//! let e4 = Square::from_algebraic("e4").unwrap();
//! let transition = player.make_move(MoveFactory::create_move(&position, e2, e4));
//! assert!(transition.status().is_done());
//!
//! let mut game = Game::new();
//! game.make_move_san("e4").unwrap();
//! game.make_move_san("e5").unwrap();
//! println!("Position after 1.e4 e5: {}", game.to_fen());
//! ```

mod bitboard;
mod game;
mod mov;
pub mod movegen;
pub mod notation;
mod player;
mod position;
mod zobrist;

pub use bitboard::Bitboard;
pub use game::{Game, GameError, GameMove, GameResult};
pub use mov::{CastleRook, Move, MoveFactory, MoveKind, MoveStatus, MoveTransition};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{attacked_squares, piece_moves, pseudo_legal_moves, MoveList};
pub use notation::{move_to_san, san_to_move, NotationError};
pub use player::Player;
pub use position::{Position, PositionBuilder, PositionError};
