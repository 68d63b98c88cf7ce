//! Opening book storage and lookup.

use std::collections::HashMap;
use std::path::Path;

use chess_engine::{san_to_move, Move, Position};
use rand::seq::IndexedRandom;
use rand::Rng;
use thiserror::Error;

use crate::opening::{BookEntry, BookMove};

/// Errors that can occur when loading or saving an opening book.
#[derive(Debug, Error)]
pub enum BookError {
    /// Failed to read or write the book file.
    #[error("failed to access opening book: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The same board appears twice in a book file.
    #[error("duplicate board in opening book: {0}")]
    DuplicateBoard(String),
}

/// Key under which a position is stored: its display grid with all
/// whitespace removed.
///
/// Side to move, castling rights and en passant are not part of the key.
pub fn position_key(position: &Position) -> String {
    position
        .to_display_string()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// A move database that maps positions to weighted candidate moves.
#[derive(Debug, Clone, Default)]
pub struct MoveDatabase {
    /// Maps position keys to candidate moves.
    positions: HashMap<String, Vec<BookMove>>,
}

impl MoveDatabase {
    /// Creates a new empty move database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the database is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the number of positions in the database.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Adds a position with its candidate moves, replacing any earlier entry.
    pub fn add_position(&mut self, position_key: impl Into<String>, moves: Vec<BookMove>) {
        self.positions.insert(position_key.into(), moves);
    }

    /// Looks up candidate moves for a position key.
    #[must_use]
    pub fn lookup(&self, position_key: &str) -> Option<&[BookMove]> {
        self.positions.get(position_key).map(|v| v.as_slice())
    }

    /// Selects a random candidate, weighted by the candidates' weights.
    pub fn select_move<R: Rng>(
        &self,
        position_key: &str,
        rng: &mut R,
    ) -> Option<&BookMove> {
        let moves = self.lookup(position_key)?;
        if moves.is_empty() {
            return None;
        }

        let total_weight: u32 = moves.iter().map(|m| m.weight).sum();
        if total_weight == 0 {
            // If all weights are zero, select uniformly
            return moves.choose(rng);
        }

        let mut choice = rng.random_range(0..total_weight);
        for mv in moves {
            if choice < mv.weight {
                return Some(mv);
            }
            choice -= mv.weight;
        }

        moves.last()
    }

    /// Suggests a move for `position`.
    ///
    /// The selected notation is resolved against the position's playable
    /// moves; a candidate that does not resolve yields None.
    pub fn suggest<R: Rng>(&self, position: &Position, rng: &mut R) -> Option<Move> {
        let candidate = self.select_move(&position_key(position), rng)?;
        san_to_move(position, &candidate.san).ok()
    }

    /// Parses a book from a JSON array of [`BookEntry`] values.
    pub fn from_json(json: &str) -> Result<Self, BookError> {
        let entries: Vec<BookEntry> = serde_json::from_str(json)?;
        let mut db = Self::new();
        for entry in entries {
            if db.positions.contains_key(&entry.board) {
                return Err(BookError::DuplicateBoard(entry.board));
            }
            db.add_position(entry.board, entry.moves);
        }
        Ok(db)
    }

    /// Loads a JSON book from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serializes the book as pretty-printed JSON, entries sorted by key.
    pub fn to_json(&self) -> Result<String, BookError> {
        let mut entries: Vec<BookEntry> = self
            .positions
            .iter()
            .map(|(board, moves)| BookEntry {
                board: board.clone(),
                name: None,
                moves: moves.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.board.cmp(&b.board));
        Ok(serde_json::to_string_pretty(&entries)?)
    }

    /// Writes the book to disk as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BookError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
