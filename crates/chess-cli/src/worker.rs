//! Background search.
//!
//! Searches block for as long as they take, so they run on their own thread
//! and report back over a channel. The caller keeps a stop flag it can set
//! to cut the search short.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Result};
use chess_engine::Position;
use chess_openings::MoveDatabase;
use chess_search::{MoveStrategy, SearchConfig, SearchOutcome};

/// A search running on a worker thread.
pub struct SearchHandle {
    receiver: Receiver<SearchOutcome>,
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl SearchHandle {
    /// Asks the search to return its best move so far.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Blocks until the worker reports.
    pub fn wait(self) -> Result<SearchOutcome> {
        let outcome = self
            .receiver
            .recv()
            .map_err(|_| anyhow!("search worker exited without reporting"))?;
        self.thread
            .join()
            .map_err(|_| anyhow!("search worker panicked"))?;
        Ok(outcome)
    }
}

/// Starts searching `position` with the strategy described by `config`.
///
/// When `book` is given, it is consulted first.
pub fn spawn_search(
    position: Position,
    config: &SearchConfig,
    book: Option<Arc<MoveDatabase>>,
) -> SearchHandle {
    let (sender, receiver) = mpsc::channel();
    let stop = Arc::new(AtomicBool::new(false));
    let limits = config.limits().with_stop_flag(Arc::clone(&stop));
    let mut strategy = config.build_strategy(limits);

    let thread = thread::spawn(move || {
        let outcome = match book {
            Some(book) => {
                let mut rng = rand::rng();
                let mut lookup = |p: &Position| book.suggest(p, &mut rng);
                strategy.search_with_book(&position, &mut lookup)
            }
            None => strategy.search(&position),
        };
        // The receiver may have been dropped; nobody is waiting then.
        let _ = sender.send(outcome);
    });

    SearchHandle {
        receiver,
        stop,
        thread,
    }
}
