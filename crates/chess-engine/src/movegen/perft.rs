//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator
//! together with the legality filter.

use crate::Position;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let player = position.current_player();
    let mut nodes = 0u64;
    for &mv in player.legal_moves() {
        let transition = player.make_move(mv);
        if !transition.status().is_done() {
            continue;
        }
        nodes += if depth == 1 {
            1
        } else {
            perft(transition.to_position(), depth - 1)
        };
    }
    nodes
}

/// Perft with divide - node count below each root move, sorted by move.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(String, u64)> {
    let player = position.current_player();
    let mut results: Vec<(String, u64)> = player
        .verified_moves()
        .into_iter()
        .map(|mv| {
            let next = mv.execute(position);
            let nodes = if depth > 1 { perft(&next, depth - 1) } else { 1 };
            (mv.to_coordinates(), nodes)
        })
        .collect();

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    #[test]
    fn perft_standard_depth_1() {
        assert_eq!(perft(&Position::standard(), 1), 20);
    }

    #[test]
    fn perft_standard_depth_2() {
        assert_eq!(perft(&Position::standard(), 2), 400);
    }

    #[test]
    fn perft_standard_depth_3() {
        assert_eq!(perft(&Position::standard(), 3), 8902);
    }

    #[test]
    #[ignore]
    fn perft_standard_depth_4() {
        assert_eq!(perft(&Position::standard(), 4), 197281);
    }

    // Kiwipete: castling, en passant and pins. No promotions before depth 4,
    // so the queen-only promotion rule does not change these counts.
    #[test]
    fn perft_kiwipete_depth_1() {
        let position = Position::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft(&position, 1), 48);
    }

    #[test]
    fn perft_kiwipete_depth_2() {
        let position = Position::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft(&position, 2), 2039);
    }

    #[test]
    #[ignore]
    fn perft_kiwipete_depth_3() {
        let position = Position::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft(&position, 3), 97862);
    }

    #[test]
    fn perft_position3_depth_1() {
        let position = Position::from_fen(POSITION_3).unwrap();
        assert_eq!(perft(&position, 1), 14);
    }

    #[test]
    fn perft_position3_depth_2() {
        let position = Position::from_fen(POSITION_3).unwrap();
        assert_eq!(perft(&position, 2), 191);
    }

    #[test]
    fn perft_position3_depth_3() {
        let position = Position::from_fen(POSITION_3).unwrap();
        assert_eq!(perft(&position, 3), 2812);
    }

    #[test]
    fn perft_divide_sums_to_perft() {
        let position = Position::standard();
        let results = perft_divide(&position, 2);
        assert_eq!(results.len(), 20);
        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 400);
        assert_eq!(results[0].0, "a2a3");
    }
}
