//! Book entry types.

use serde::{Deserialize, Serialize};

/// A candidate move from the opening book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMove {
    /// The move in short algebraic notation (e.g., "Nf3").
    pub san: String,
    /// Weight/frequency of this move (higher = more common).
    pub weight: u32,
}

/// All candidate moves recorded for one board layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    /// The position key, see [`position_key`](crate::position_key).
    pub board: String,
    /// Optional opening name, for display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub moves: Vec<BookMove>,
}

impl BookMove {
    /// Creates a new book move with the given notation and weight.
    #[must_use]
    pub fn new(san: impl Into<String>, weight: u32) -> Self {
        Self {
            san: san.into(),
            weight,
        }
    }
}
