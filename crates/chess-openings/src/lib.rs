//! Opening book lookup.
//!
//! This crate stores weighted candidate moves per board layout, loads and
//! saves them as JSON, and ships a small built-in book. Positions are keyed
//! by their display grid; candidates are short algebraic notation resolved
//! against the position when suggested.

pub mod builtin;
pub mod database;
pub mod opening;

pub use builtin::builtin_database;
pub use database::{position_key, BookError, MoveDatabase};
pub use opening::{BookEntry, BookMove};
