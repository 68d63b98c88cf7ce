//! Game-tree search over [`chess_engine`] positions.
//!
//! This crate provides:
//! - [`BoardEvaluator`] and the heuristic [`StandardEvaluator`]
//! - [`MoveStrategy`] with two implementations, [`Minimax`] and [`AlphaBeta`]
//! - MVV-LVA move ordering ([`ordering`])
//! - [`SearchLimits`] for time budgets and cancellation
//! - [`OpeningBook`], the injected lookup consulted before searching
//! - [`SearchConfig`], loaded from TOML
//!
//! Scores are always from White's point of view: White maximizes, Black
//! minimizes.
//!
//! # Example
//!
//! ```
//! use chess_engine::Position;
//! use chess_search::{AlphaBeta, MoveStrategy};
//!
//! let mut strategy = AlphaBeta::new(2);
//! let outcome = strategy.search(&Position::standard());
//! assert!(outcome.best_move.is_some());
//! ```

mod alpha_beta;
mod config;
mod evaluator;
pub mod king_safety;
mod minimax;
pub mod ordering;
pub mod pawn_structure;
mod strategy;

pub use alpha_beta::AlphaBeta;
pub use config::{ConfigError, SearchConfig, StrategyKind};
pub use evaluator::{BoardEvaluator, StandardEvaluator};
pub use minimax::Minimax;
pub use strategy::{MoveStrategy, OpeningBook, SearchLimits, SearchOutcome};
