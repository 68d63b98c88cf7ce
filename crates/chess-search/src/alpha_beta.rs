//! Minimax with alpha-beta pruning and MVV-LVA move ordering.

use chess_engine::{Move, Position};

use crate::minimax::is_terminal;
use crate::ordering::sort_moves;
use crate::strategy::{improves, SearchClock};
use crate::{BoardEvaluator, MoveStrategy, SearchLimits, SearchOutcome, StandardEvaluator};

/// Alpha-beta search. Reaches the same root score as [`Minimax`](crate::Minimax)
/// at equal depth while evaluating fewer boards.
#[derive(Debug, Clone)]
pub struct AlphaBeta<E = StandardEvaluator> {
    evaluator: E,
    depth: u32,
    limits: SearchLimits,
    boards_evaluated: u64,
    cutoffs: u64,
}

impl AlphaBeta<StandardEvaluator> {
    pub fn new(depth: u32) -> Self {
        Self::with_evaluator(StandardEvaluator, depth)
    }
}

impl<E: BoardEvaluator> AlphaBeta<E> {
    pub fn with_evaluator(evaluator: E, depth: u32) -> Self {
        AlphaBeta {
            evaluator,
            depth,
            limits: SearchLimits::none(),
            boards_evaluated: 0,
            cutoffs: 0,
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Branches pruned during the most recent search.
    pub fn cutoffs(&self) -> u64 {
        self.cutoffs
    }

    fn evaluate(&mut self, position: &Position, depth: u32) -> i32 {
        self.boards_evaluated += 1;
        self.evaluator.evaluate(position, depth)
    }

    /// Fail-soft alpha-beta. A result inside `(alpha, beta)` is exact; one at
    /// or beyond a bound is only a bound. None when `clock` expired before
    /// the node was finished.
    fn value(
        &mut self,
        position: &Position,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        clock: Option<&SearchClock>,
    ) -> Option<i32> {
        let player = position.current_player();
        if depth == 0 || is_terminal(&player) {
            return Some(self.evaluate(position, depth));
        }

        let maximizing = player.color().is_white();
        let mut best: Option<i32> = None;
        for mv in sort_moves(player.legal_moves()) {
            if clock.is_some_and(SearchClock::expired) {
                return None;
            }
            let transition = player.make_move(mv);
            if !transition.status().is_done() {
                continue;
            }
            let value = self.value(transition.to_position(), depth - 1, alpha, beta, clock)?;
            if best.map_or(true, |b| improves(maximizing, value, b)) {
                best = Some(value);
            }
            if maximizing {
                alpha = alpha.max(value);
            } else {
                beta = beta.min(value);
            }
            if alpha >= beta {
                self.cutoffs += 1;
                break;
            }
        }
        match best {
            Some(value) => Some(value),
            None => Some(self.evaluate(position, depth)),
        }
    }
}

impl<E: BoardEvaluator> MoveStrategy for AlphaBeta<E> {
    fn name(&self) -> &'static str {
        "alpha_beta"
    }

    fn depth(&self) -> u32 {
        self.depth
    }

    fn search(&mut self, position: &Position) -> SearchOutcome {
        self.boards_evaluated = 0;
        self.cutoffs = 0;
        let clock = self.limits.start();
        let player = position.current_player();
        let maximizing = player.color().is_white();
        let child_depth = self.depth.saturating_sub(1);

        let mut best: Option<(Move, i32)> = None;
        let mut aborted = false;
        for mv in sort_moves(player.legal_moves()) {
            if best.is_some() && clock.expired() {
                aborted = true;
                break;
            }
            let transition = player.make_move(mv);
            if !transition.status().is_done() {
                continue;
            }
            // Only moves strictly better than the current best matter, so the
            // best score so far is the window's own bound.
            let (alpha, beta) = match (best, maximizing) {
                (Some((_, b)), true) => (b, i32::MAX),
                (Some((_, b)), false) => (i32::MIN, b),
                (None, _) => (i32::MIN, i32::MAX),
            };
            // The first playable move ignores the limits, so there is always
            // a fully searched move to fall back on.
            let limit = best.is_some().then_some(&clock);
            let Some(value) = self.value(transition.to_position(), child_depth, alpha, beta, limit)
            else {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Minimax;

    #[test]
    fn matches_minimax_score_with_fewer_boards() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3";
        let position = Position::from_fen(fen).unwrap();

        let mut minimax = Minimax::new(2);
        let mut alpha_beta = AlphaBeta::new(2);
        let slow = minimax.search(&position);
        let fast = alpha_beta.search(&position);

        assert_eq!(slow.score, fast.score);
        assert!(fast.boards_evaluated < slow.boards_evaluated);
        assert!(alpha_beta.cutoffs() > 0);
    }

    #[test]
    fn finds_back_rank_mate() {
        let position = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        for depth in 1..=3 {
            let mv = AlphaBeta::new(depth).execute(&position).unwrap();
            assert_eq!(mv.to_string(), "a1a8", "depth {}", depth);
        }
    }
}
