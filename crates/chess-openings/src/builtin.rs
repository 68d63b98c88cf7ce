//! Built-in opening book data.
//!
//! Each line is the sequence of moves leading to a book position, followed
//! by the candidates recorded for that position. Keys are computed by
//! replaying the line from the standard start.

use chess_engine::Game;

use crate::database::{position_key, MoveDatabase};
use crate::opening::BookMove;

/// (moves played from the start, candidate replies with weights)
type BookLine = (&'static [&'static str], &'static [(&'static str, u32)]);

const BUILTIN_LINES: &[BookLine] = &[
    // Starting position - most common first moves
    (&[], &[("e4", 100), ("d4", 90), ("c4", 40), ("Nf3", 30)]),
    // After 1.e4
    (
        &["e4"],
        &[("e5", 80), ("c5", 70), ("e6", 40), ("c6", 30), ("d5", 20)],
    ),
    // After 1.d4
    (&["d4"], &[("d5", 80), ("Nf6", 70), ("e6", 30), ("f5", 10)]),
    // After 1.c4
    (&["c4"], &[("e5", 50), ("Nf6", 50), ("c5", 30)]),
    // After 1.Nf3
    (&["Nf3"], &[("d5", 60), ("Nf6", 60), ("c5", 20)]),
    // Open Game
    (&["e4", "e5"], &[("Nf3", 90), ("Bc4", 30), ("Nc3", 20)]),
    (&["e4", "e5", "Nf3"], &[("Nc6", 90), ("Nf6", 30), ("d6", 10)]),
    // Italian and Ruy Lopez
    (&["e4", "e5", "Nf3", "Nc6"], &[("Bb5", 80), ("Bc4", 70), ("d4", 30)]),
    (&["e4", "e5", "Nf3", "Nc6", "Bc4"], &[("Bc5", 70), ("Nf6", 60)]),
    (&["e4", "e5", "Nf3", "Nc6", "Bb5"], &[("a6", 90), ("Nf6", 50)]),
    // Sicilian
    (&["e4", "c5"], &[("Nf3", 90), ("Nc3", 30), ("c3", 20)]),
    (&["e4", "c5", "Nf3"], &[("d6", 70), ("Nc6", 60), ("e6", 50)]),
    // French and Caro-Kann
    (&["e4", "e6"], &[("d4", 100)]),
    (&["e4", "e6", "d4"], &[("d5", 100)]),
    (&["e4", "c6"], &[("d4", 100)]),
    (&["e4", "c6", "d4"], &[("d5", 100)]),
    // Queen's Gambit
    (&["d4", "d5"], &[("c4", 90), ("Nf3", 40), ("Bf4", 30)]),
    (&["d4", "d5", "c4"], &[("e6", 70), ("c6", 60), ("dxc4", 30)]),
    // Indian defenses
    (&["d4", "Nf6"], &[("c4", 90), ("Nf3", 50), ("Bf4", 20)]),
    (&["d4", "Nf6", "c4"], &[("e6", 70), ("g6", 60), ("c5", 20)]),
];

/// Creates the built-in opening database.
///
/// Lines that fail to replay are skipped.
#[must_use]
pub fn builtin_database() -> MoveDatabase {
    let mut db = MoveDatabase::new();
    for (line, candidates) in BUILTIN_LINES {
        let mut game = Game::new();
        if line.iter().any(|san| game.make_move_san(san).is_err()) {
            continue;
        }
        let moves = candidates
            .iter()
            .map(|&(san, weight)| BookMove::new(san, weight))
            .collect();
        db.add_position(position_key(game.position()), moves);
    }
    db
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_engine::san_to_move;

    #[test]
    fn test_every_line_replays() {
        let db = builtin_database();
        assert_eq!(db.len(), BUILTIN_LINES.len());
    }

    #[test]
    fn test_every_candidate_is_playable() {
        for (line, candidates) in BUILTIN_LINES {
            let mut game = Game::new();
            for san in line.iter() {
                game.make_move_san(san).unwrap();
            }
            for (san, _) in candidates.iter() {
                assert!(
                    san_to_move(game.position(), san).is_ok(),
                    "{} after {:?}",
                    san,
                    line
                );
            }
        }
    }

    #[test]
    fn test_start_position_has_candidates() {
        let db = builtin_database();
        let key = position_key(&chess_engine::Position::standard());
        let moves = db.lookup(&key).unwrap();
        assert_eq!(moves[0].san, "e4");
    }
}
