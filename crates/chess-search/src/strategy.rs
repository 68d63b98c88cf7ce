//! The search interface shared by every strategy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chess_engine::{Move, Position};
use tracing::{debug, trace, warn};

/// Source of externally suggested moves, consulted before searching.
///
/// Suggestions are never trusted: each one is replayed through
/// [`Player::make_move`](chess_engine::Player::make_move) and dropped unless
/// the transition is done.
pub trait OpeningBook {
    fn lookup(&mut self, position: &Position) -> Option<Move>;
}

impl<F> OpeningBook for F
where
    F: FnMut(&Position) -> Option<Move>,
{
    fn lookup(&mut self, position: &Position) -> Option<Move> {
        self(position)
    }
}

/// Optional time budget and stop flag for a search.
///
/// Both are checked before every move at every level, except while the first
/// playable root move is searched. A subtree cut short is discarded whole, so
/// an aborted search returns the best of the root moves it finished.
#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    max_time: Option<Duration>,
    stop: Option<Arc<AtomicBool>>,
}

impl SearchLimits {
    /// No budget: searches run to their full depth.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_max_time(mut self, max_time: Duration) -> Self {
        self.max_time = Some(max_time);
        self
    }

    /// Aborts the search once `stop` is set.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn max_time(&self) -> Option<Duration> {
        self.max_time
    }

    pub(crate) fn start(&self) -> SearchClock {
        let started = Instant::now();
        SearchClock {
            started,
            deadline: self.max_time.map(|t| started + t),
            stop: self.stop.clone(),
        }
    }
}

/// A running search's view of its limits.
pub(crate) struct SearchClock {
    started: Instant,
    deadline: Option<Instant>,
    stop: Option<Arc<AtomicBool>>,
}

impl SearchClock {
    pub(crate) fn expired(&self) -> bool {
        if let Some(stop) = &self.stop {
            if stop.load(Ordering::Relaxed) {
                return true;
            }
        }
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// What a search produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// None when the side to move has no playable move.
    pub best_move: Option<Move>,
    /// Score of `best_move` from White's point of view. None for book moves
    /// and when there is no move.
    pub score: Option<i32>,
    pub depth: u32,
    pub boards_evaluated: u64,
    pub elapsed: Duration,
    pub from_book: bool,
    /// The time budget or stop flag cut the search short.
    pub aborted: bool,
}

impl SearchOutcome {
    pub(crate) fn searched(
        strategy: &'static str,
        depth: u32,
        best: Option<(Move, i32)>,
        boards_evaluated: u64,
        clock: &SearchClock,
        aborted: bool,
    ) -> Self {
        let elapsed = clock.elapsed();
        if aborted {
            debug!(strategy, depth, "search limit reached, returning best finished move");
        }
        debug!(
            strategy,
            depth,
            boards_evaluated,
            elapsed_ms = elapsed.as_millis() as u64,
            best = %best.map_or_else(|| "none".to_string(), |(mv, _)| mv.to_string()),
            "search complete"
        );
        SearchOutcome {
            best_move: best.map(|(mv, _)| mv),
            score: best.map(|(_, score)| score),
            depth,
            boards_evaluated,
            elapsed,
            from_book: false,
            aborted,
        }
    }

    fn from_book(mv: Move, depth: u32) -> Self {
        SearchOutcome {
            best_move: Some(mv),
            score: None,
            depth,
            boards_evaluated: 0,
            elapsed: Duration::ZERO,
            from_book: true,
            aborted: false,
        }
    }
}

/// A way of choosing a move for the side to move.
pub trait MoveStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Configured search depth in plies.
    fn depth(&self) -> u32;

    /// Searches `position` and reports the chosen move.
    fn search(&mut self, position: &Position) -> SearchOutcome;

    /// Leaf evaluations performed by the most recent search.
    fn boards_evaluated(&self) -> u64;

    /// Chooses a move, or None if the side to move has none.
    fn execute(&mut self, position: &Position) -> Option<Move> {
        self.search(position).best_move
    }

    /// Asks `book` first and falls back to [`search`](Self::search) when it
    /// has no suggestion or suggests a move that cannot be played.
    fn search_with_book(
        &mut self,
        position: &Position,
        book: &mut dyn OpeningBook,
    ) -> SearchOutcome {
        if let Some(mv) = book.lookup(position) {
            let transition = position.current_player().make_move(mv);
            if transition.status().is_done() {
                trace!(strategy = self.name(), book_move = %mv, "book hit");
                return SearchOutcome::from_book(mv, self.depth());
            }
            warn!(
                strategy = self.name(),
                book_move = %mv,
                status = ?transition.status(),
                "rejected book move"
            );
        }
        self.search(position)
    }
}

impl<S: MoveStrategy + ?Sized> MoveStrategy for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn depth(&self) -> u32 {
        (**self).depth()
    }

    fn search(&mut self, position: &Position) -> SearchOutcome {
        (**self).search(position)
    }

    fn boards_evaluated(&self) -> u64 {
        (**self).boards_evaluated()
    }
}

/// True if `value` beats `best` for the side choosing. Equal values never
/// do, so the first of several equally good moves is kept.
pub(crate) fn improves(maximizing: bool, value: i32, best: i32) -> bool {
    if maximizing {
        value > best
    } else {
        value < best
    }
}
