//! Core types for chess.
//!
//! This crate provides the fundamental value types used across the engine:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`BoardTables`] with the read-only column/row/notation lookup tables
//! - FEN parsing

mod color;
mod fen;
mod piece;
mod square;
mod tables;

pub use color::Color;
pub use fen::{CastlingRights, FenError, FenParser};
pub use piece::{Piece, PieceKind};
pub use square::{File, Rank, Square};
pub use tables::{BoardTables, TABLES};
