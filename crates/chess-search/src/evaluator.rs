//! Static position evaluation.

use chess_core::Color;
use chess_engine::{Player, Position};

use crate::king_safety::king_safety_score;
use crate::pawn_structure::pawn_structure_score;

const CHECK_BONUS: i32 = 10;
const CHECK_MATE_BONUS: i32 = 1000;
const DEPTH_BONUS: i32 = 100;
const CASTLE_BONUS: i32 = 60;
const ATTACK_MULTIPLIER: i32 = 1;
const MOBILITY_MULTIPLIER: i32 = 5;

/// Scores a position from White's point of view.
///
/// `depth` is the remaining search depth at the node being scored, so a
/// mate found with more depth left (i.e. sooner) can be rewarded more.
pub trait BoardEvaluator {
    fn evaluate(&self, position: &Position, depth: u32) -> i32;
}

impl<T: BoardEvaluator + ?Sized> BoardEvaluator for &T {
    fn evaluate(&self, position: &Position, depth: u32) -> i32 {
        (**self).evaluate(position, depth)
    }
}

/// Material, mobility, check and mate, castling, capture opportunities,
/// pawn structure and king tropism, summed per side.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEvaluator;

impl StandardEvaluator {
    pub fn new() -> Self {
        StandardEvaluator
    }

    fn score_player(
        &self,
        position: &Position,
        player: &Player<'_>,
        opponent: &Player<'_>,
        depth: u32,
    ) -> i32 {
        let color = player.color();
        material(player)
            + mobility(player, opponent)
            + check(opponent)
            + checkmate(opponent, depth)
            + castled(player)
            + attacks(player)
            + pawn_structure_score(position, color)
            + king_safety_score(position, color)
    }
}

impl BoardEvaluator for StandardEvaluator {
    fn evaluate(&self, position: &Position, depth: u32) -> i32 {
        let white = position.player(Color::White);
        let black = position.player(Color::Black);
        self.score_player(position, &white, &black, depth)
            - self.score_player(position, &black, &white, depth)
    }
}

fn material(player: &Player<'_>) -> i32 {
    player.active_pieces().map(|p| p.value()).sum()
}

/// Zero when the opponent has no moves at all; such a node is terminal and
/// already scored by the mate terms.
fn mobility(player: &Player<'_>, opponent: &Player<'_>) -> i32 {
    let own = player.legal_moves().len() as i32;
    let theirs = opponent.legal_moves().len() as i32;
    if theirs == 0 {
        return 0;
    }
    MOBILITY_MULTIPLIER * (own * 10 / theirs)
}

fn check(opponent: &Player<'_>) -> i32 {
    if opponent.is_in_check() {
        CHECK_BONUS
    } else {
        0
    }
}

fn checkmate(opponent: &Player<'_>, depth: u32) -> i32 {
    if opponent.is_in_check_mate() {
        CHECK_MATE_BONUS + depth_bonus(depth)
    } else {
        0
    }
}

fn depth_bonus(depth: u32) -> i32 {
    if depth == 0 {
        1
    } else {
        DEPTH_BONUS * depth as i32
    }
}

fn castled(player: &Player<'_>) -> i32 {
    if player.is_castled() {
        CASTLE_BONUS
    } else {
        0
    }
}

/// Captures whose attacker is worth no more than its victim.
fn attacks(player: &Player<'_>) -> i32 {
    let count = player
        .legal_moves()
        .iter()
        .filter_map(|mv| mv.captured_piece().map(|victim| (mv.moved_piece(), victim)))
        .filter(|(attacker, victim)| attacker.value() <= victim.value())
        .count() as i32;
    count * ATTACK_MULTIPLIER
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_engine::Game;

    #[test]
    fn start_position_is_balanced() {
        let position = Position::standard();
        assert_eq!(StandardEvaluator.evaluate(&position, 0), 0);
        assert_eq!(StandardEvaluator.evaluate(&position, 3), 0);
    }

    #[test]
    fn extra_material_favors_its_owner() {
        let white_up = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let black_up = Position::from_fen("r3k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(StandardEvaluator.evaluate(&white_up, 0) > 400);
        assert!(StandardEvaluator.evaluate(&black_up, 0) < -400);
    }

    #[test]
    fn mate_bonus_scales_with_depth() {
        let mut game = Game::new();
        for san in ["f3", "e5", "g4", "Qh4"] {
            game.make_move_san(san).unwrap();
        }
        let position = game.position();
        let shallow = StandardEvaluator.evaluate(position, 0);
        let deep = StandardEvaluator.evaluate(position, 2);
        assert!(shallow < -CHECK_MATE_BONUS);
        assert_eq!(shallow - deep, DEPTH_BONUS * 2 - 1);
    }

    #[test]
    fn castling_earns_a_bonus() {
        let mut game = Game::new();
        for san in ["e4", "e5", "Nf3", "Nf6", "Bc4", "Bc5"] {
            game.make_move_san(san).unwrap();
        }
        let before = game.position().player(Color::White);
        assert_eq!(castled(&before), 0);
        game.make_move_san("O-O").unwrap();
        let after = game.position().player(Color::White);
        assert_eq!(castled(&after), CASTLE_BONUS);
    }

    #[test]
    fn mobility_is_a_move_count_ratio() {
        // Five king moves for White against three for Black.
        let position = Position::from_fen("7k/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let white = position.player(Color::White);
        let black = position.player(Color::Black);
        assert_eq!(mobility(&white, &black), 5 * (5 * 10 / 3));
    }

    #[test]
    fn even_trades_count_as_attacks() {
        // Rook a1 can take the rook a8, the king cannot take anything.
        let position = Position::from_fen("r3k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let white = position.player(Color::White);
        assert_eq!(attacks(&white), 1);
    }
}
