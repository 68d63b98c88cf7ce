//! Chess command-line host.
//!
//! Subcommands:
//! - `play`: a text game against the engine
//! - `search`: one search from a FEN position
//! - `perft`: move generator node counts

mod play;
mod worker;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chess_engine::{perft, perft_divide, Position};
use chess_openings::{builtin_database, MoveDatabase};
use chess_search::{SearchConfig, StrategyKind};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess")]
#[command(about = "Chess engine with minimax and alpha-beta search")]
struct Cli {
    /// Search configuration file
    #[arg(long, global = true, default_value = "chess.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game against the engine
    Play {
        /// Side you play
        #[arg(long, value_enum, default_value = "white")]
        side: Side,
        /// Starting position in FEN (defaults to the standard start)
        #[arg(long)]
        fen: Option<String>,
        #[command(flatten)]
        search: SearchOverrides,
    },
    /// Search one position and print the chosen move
    Search {
        /// Position in FEN (defaults to the standard start)
        #[arg(long)]
        fen: Option<String>,
        #[command(flatten)]
        search: SearchOverrides,
    },
    /// Count leaf nodes of the legal move tree
    Perft {
        /// Depth in plies
        #[arg(short, long, default_value = "3")]
        depth: u32,
        /// Position in FEN (defaults to the standard start)
        #[arg(long)]
        fen: Option<String>,
        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    White,
    Black,
}

/// Command-line overrides for the configuration file.
#[derive(Args)]
struct SearchOverrides {
    /// Search depth in plies
    #[arg(short, long)]
    depth: Option<u32>,
    /// Search algorithm
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    /// Time budget per search in milliseconds
    #[arg(long)]
    max_time_ms: Option<u64>,
    /// Never consult the opening book
    #[arg(long)]
    no_book: bool,
    /// JSON opening book (defaults to the built-in book)
    #[arg(long)]
    book: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Minimax,
    AlphaBeta,
}

impl SearchOverrides {
    fn apply(&self, config: &mut SearchConfig) {
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = match strategy {
                StrategyArg::Minimax => StrategyKind::Minimax,
                StrategyArg::AlphaBeta => StrategyKind::AlphaBeta,
            };
        }
        if self.max_time_ms.is_some() {
            config.max_time_ms = self.max_time_ms;
        }
        if self.no_book {
            config.use_book = false;
        }
        if self.book.is_some() {
            config.book_path = self.book.clone();
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play { side, fen, search } => {
            let config = load_config(&cli.config, &search)?;
            let book = load_book(&config)?;
            let position = parse_position(fen.as_deref())?;
            let human = match side {
                Side::White => chess_core::Color::White,
                Side::Black => chess_core::Color::Black,
            };
            play::run(position, human, &config, book)
        }
        Commands::Search { fen, search } => {
            let config = load_config(&cli.config, &search)?;
            let book = load_book(&config)?;
            let position = parse_position(fen.as_deref())?;
            run_search(position, &config, book)
        }
        Commands::Perft { depth, fen, divide } => {
            let position = parse_position(fen.as_deref())?;
            run_perft(&position, depth, divide);
            Ok(())
        }
    }
}

fn load_config(path: &Path, overrides: &SearchOverrides) -> Result<SearchConfig> {
    let mut config = SearchConfig::load(path)
        .with_context(|| format!("loading config {}", path.display()))?;
    overrides.apply(&mut config);
    config.validate()?;
    tracing::debug!(?config, "search configuration");
    Ok(config)
}

fn load_book(config: &SearchConfig) -> Result<Option<Arc<MoveDatabase>>> {
    if !config.use_book {
        return Ok(None);
    }
    let book = match &config.book_path {
        Some(path) => MoveDatabase::load(path)
            .with_context(|| format!("loading opening book {}", path.display()))?,
        None => builtin_database(),
    };
    tracing::info!("Opening book: {} positions", book.len());
    Ok(Some(Arc::new(book)))
}

fn parse_position(fen: Option<&str>) -> Result<Position> {
    match fen {
        Some(fen) => Position::from_fen(fen).with_context(|| format!("invalid FEN: {}", fen)),
        None => Ok(Position::standard()),
    }
}

fn run_search(
    position: Position,
    config: &SearchConfig,
    book: Option<Arc<MoveDatabase>>,
) -> Result<()> {
    println!("{}", position);
    let outcome = worker::spawn_search(position, config, book).wait()?;
    match outcome.best_move {
        Some(mv) => {
            let score = outcome
                .score
                .map_or_else(|| "book".to_string(), |s| s.to_string());
            println!(
                "bestmove {} score {} depth {} boards {} time {}ms",
                mv,
                score,
                outcome.depth,
                outcome.boards_evaluated,
                outcome.elapsed.as_millis()
            );
        }
        None => println!("bestmove (none)"),
    }
    Ok(())
}

fn run_perft(position: &Position, depth: u32, divide: bool) {
    let start = Instant::now();
    let nodes = if divide {
        let results = perft_divide(position, depth);
        for (mv, count) in &results {
            println!("{}: {}", mv, count);
        }
        results.iter().map(|(_, count)| count).sum::<u64>()
    } else {
        perft(position, depth)
    };
    let elapsed = start.elapsed();
    println!("Nodes: {}", nodes);
    println!("Time: {:.3}s", elapsed.as_secs_f64());
    if elapsed.as_secs_f64() > 0.0 {
        println!("NPS: {:.0}", nodes as f64 / elapsed.as_secs_f64());
    }
}
