//! Interactive text game against the engine.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chess_core::Color;
use chess_engine::{Game, GameResult, Position};
use chess_openings::MoveDatabase;
use chess_search::SearchConfig;

use crate::worker::spawn_search;

const HELP: &str = "Enter a move as SAN (Nf3, exd5, O-O) or coordinates (e2e4).\n\
Other commands: moves, undo, fen, help, quit";

/// Plays on stdin/stdout until the game ends or the user quits.
pub fn run(
    position: Position,
    human: Color,
    config: &SearchConfig,
    book: Option<Arc<MoveDatabase>>,
) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_with_io(position, human, config, book, stdin.lock(), stdout.lock())
}

pub fn run_with_io<R: BufRead, W: Write>(
    position: Position,
    human: Color,
    config: &SearchConfig,
    book: Option<Arc<MoveDatabase>>,
    input: R,
    mut out: W,
) -> Result<()> {
    let mut game = Game::from_position(position);
    let mut lines = input.lines();
    writeln!(out, "{}", HELP)?;

    loop {
        writeln!(out, "\n{}", game.position())?;
        if let Some(result) = game.result() {
            writeln!(out, "{}", describe(result))?;
            return Ok(());
        }
        if game.is_check() {
            writeln!(out, "{} is in check", game.position().side_to_move())?;
        }

        if game.position().side_to_move() != human {
            let outcome = spawn_search(game.position().clone(), config, book.clone()).wait()?;
            let mv = outcome
                .best_move
                .ok_or_else(|| anyhow!("engine found no move in a live game"))?;
            game.make_move(mv)?;
            let san = game
                .move_history()
                .last()
                .map_or_else(|| mv.to_string(), |m| m.san.clone());
            let source = if outcome.from_book { " (book)" } else { "" };
            writeln!(out, "Engine plays {}{}", san, source)?;
            continue;
        }

        write!(out, "{} to move> ", human)?;
        out.flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        let text = line.trim();

        match text {
            "" => {}
            "quit" | "exit" => return Ok(()),
            "help" => writeln!(out, "{}", HELP)?,
            "fen" => writeln!(out, "{}", game.to_fen())?,
            "moves" => {
                let moves: Vec<String> = game
                    .legal_moves()
                    .into_iter()
                    .map(|mv| chess_engine::move_to_san(game.position(), mv))
                    .collect();
                writeln!(out, "{}", moves.join(" "))?;
            }
            "undo" => {
                // Take back the engine's reply as well as our own move.
                game.undo();
                if game.position().side_to_move() != human {
                    game.undo();
                }
            }
            _ => {
                if let Err(e) = play_human_move(&mut game, text) {
                    writeln!(out, "{}", e)?;
                }
            }
        }
    }
}

fn play_human_move(game: &mut Game, text: &str) -> Result<()> {
    let san_error = match game.make_move_san(text) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };
    let is_coordinates = text.len() == 4 && text.is_ascii();
    if is_coordinates {
        game.make_move_coordinates(&text[..2], &text[2..])?;
        return Ok(());
    }
    Err(san_error.into())
}

fn describe(result: GameResult) -> &'static str {
    match result {
        GameResult::WhiteWins => "Checkmate. 1-0",
        GameResult::BlackWins => "Checkmate. 0-1",
        GameResult::Stalemate => "Stalemate. 1/2-1/2",
    }
}
