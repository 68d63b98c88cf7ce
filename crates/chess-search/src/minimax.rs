//! Plain minimax.

use chess_engine::{Move, Player, Position};

use crate::strategy::{improves, SearchClock};
use crate::{BoardEvaluator, MoveStrategy, SearchLimits, SearchOutcome, StandardEvaluator};

/// Exhaustive minimax to a fixed depth. White maximizes, Black minimizes.
#[derive(Debug, Clone)]
pub struct Minimax<E = StandardEvaluator> {
    evaluator: E,
    depth: u32,
    limits: SearchLimits,
    boards_evaluated: u64,
}

impl Minimax<StandardEvaluator> {
    pub fn new(depth: u32) -> Self {
        Self::with_evaluator(StandardEvaluator, depth)
    }
}

impl<E: BoardEvaluator> Minimax<E> {
    pub fn with_evaluator(evaluator: E, depth: u32) -> Self {
        Minimax {
            evaluator,
            depth,
            limits: SearchLimits::none(),
            boards_evaluated: 0,
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    fn evaluate(&mut self, position: &Position, depth: u32) -> i32 {
        self.boards_evaluated += 1;
        self.evaluator.evaluate(position, depth)
    }

    /// Value of `position` searched `depth` plies deep, or None when `clock`
    /// expired before every reply was searched.
    fn value(
        &mut self,
        position: &Position,
        depth: u32,
        clock: Option<&SearchClock>,
    ) -> Option<i32> {
        let player = position.current_player();
        if depth == 0 || is_terminal(&player) {
            return Some(self.evaluate(position, depth));
        }

        let maximizing = player.color().is_white();
        let mut best: Option<i32> = None;
        for &mv in player.legal_moves() {
            if clock.is_some_and(SearchClock::expired) {
                return None;
            }
            let transition = player.make_move(mv);
            if !transition.status().is_done() {
                continue;
            }
            let value = self.value(transition.to_position(), depth - 1, clock)?;
            if best.map_or(true, |b| improves(maximizing, value, b)) {
                best = Some(value);
            }
        }
        match best {
            Some(value) => Some(value),
            None => Some(self.evaluate(position, depth)),
        }
    }
}

impl<E: BoardEvaluator> MoveStrategy for Minimax<E> {
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn depth(&self) -> u32 {
        self.depth
    }

    fn search(&mut self, position: &Position) -> SearchOutcome {
        self.boards_evaluated = 0;
        let clock = self.limits.start();
        let player = position.current_player();
        let maximizing = player.color().is_white();
        let child_depth = self.depth.saturating_sub(1);

        let mut best: Option<(Move, i32)> = None;
        let mut aborted = false;
        for &mv in player.legal_moves() {
            if best.is_some() && clock.expired() {
                aborted = true;
                break;
            }
            let transition = player.make_move(mv);
            if !transition.status().is_done() {
                continue;
            }
            // The first playable move ignores the limits, so there is always
            // a fully searched move to fall back on.
            let limit = best.is_some().then_some(&clock);
            let Some(value) = self.value(transition.to_position(), child_depth, limit) else {
                aborted = true;
                break;
            };
            if best.map_or(true, |(_, b)| improves(maximizing, value, b)) {
                best = Some((mv, value));
            }
        }

        SearchOutcome::searched(
            self.name(),
            self.depth,
            best,
            self.boards_evaluated,
            &clock,
            aborted,
        )
    }

    fn boards_evaluated(&self) -> u64 {
        self.boards_evaluated
    }
}

/// Checkmate or stalemate for the side to move.
pub(crate) fn is_terminal(player: &Player<'_>) -> bool {
    player.is_in_check_mate() || player.is_in_stalemate()
}
