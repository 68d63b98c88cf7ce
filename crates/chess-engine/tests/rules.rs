//! Rule scenarios played through the public API.

use chess_core::{Color, PieceKind, Square};
use chess_engine::{Game, GameResult, MoveFactory, MoveKind, MoveStatus, Position};

fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

fn play(sans: &[&str]) -> Game {
    let mut game = Game::new();
    for san in sans {
        game.make_move_san(san)
            .unwrap_or_else(|e| panic!("{} rejected: {}", san, e));
    }
    game
}

#[test]
fn standard_start() {
    let pos = Position::standard();
    assert_eq!(pos.side_to_move(), Color::White);
    for color in Color::ALL {
        let player = pos.player(color);
        assert_eq!(player.legal_moves().len(), 20);
        assert!(!player.is_in_check());
    }
}

#[test]
fn fools_mate() {
    let game = play(&["f3", "e5", "g4", "Qh4"]);
    let player = game.position().current_player();
    assert_eq!(player.color(), Color::White);
    assert!(player.is_in_check());
    assert!(player.is_in_check_mate());
    assert!(!player.is_in_stalemate());
    assert!(player.verified_moves().is_empty());
    assert_eq!(game.result(), Some(GameResult::BlackWins));
    assert!(game.position().is_end_game());
}

#[test]
fn en_passant_is_available_for_one_ply_only() {
    let game = play(&["e4", "a6", "e5", "d5"]);
    let pos = game.position();
    let jumped = pos.en_passant_pawn().unwrap();
    assert_eq!(jumped.square(), sq("d5"));
    assert_eq!(jumped.color(), Color::Black);
    assert_eq!(pos.en_passant_target(), Some(sq("d6")));

    let capture = MoveFactory::create_move(pos, sq("e5"), sq("d6"));
    assert_eq!(capture.kind(), MoveKind::EnPassant);
    let transition = pos.current_player().make_move(capture);
    assert_eq!(transition.status(), MoveStatus::Done);
    let after = transition.to_position();
    assert_eq!(after.piece_at(sq("d5")), None);
    assert_eq!(after.piece_at(sq("d6")).unwrap().kind(), PieceKind::Pawn);

    let late = play(&["e4", "a6", "e5", "d5", "Nf3", "Nf6"]);
    assert!(late.position().en_passant_pawn().is_none());
    assert!(MoveFactory::create_move(late.position(), sq("e5"), sq("d6")).is_null());
}

#[test]
fn en_passant_requires_adjacent_pawn() {
    let game = play(&["e4", "a6", "e5", "b5"]);
    assert!(game.position().en_passant_pawn().is_some());
    assert!(game
        .legal_moves()
        .iter()
        .all(|m| m.kind() != MoveKind::EnPassant));
}

#[test]
fn castling_conditions() {
    let open = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    assert!(!MoveFactory::create_move(&open, Square::E1, Square::G1).is_null());

    let occupied = Position::from_fen("r3k2r/8/8/8/8/8/8/R3KB1R w KQkq - 0 1").unwrap();
    assert!(MoveFactory::create_move(&occupied, Square::E1, Square::G1).is_null());

    let attacked = Position::from_fen("r3k2r/8/8/8/8/8/6p1/R3K2R w KQkq - 0 1").unwrap();
    assert!(MoveFactory::create_move(&attacked, Square::E1, Square::G1).is_null());
    assert!(!MoveFactory::create_move(&attacked, Square::E1, Square::C1).is_null());

    // King walks out and back: the flag is gone for good.
    let mut game = Game::from_position(open);
    for (from, to) in [("e1", "e2"), ("a8", "b8"), ("e2", "e1"), ("b8", "a8")] {
        game.make_move_coordinates(from, to).unwrap();
    }
    assert!(MoveFactory::create_move(game.position(), Square::E1, Square::G1).is_null());
    assert!(!game.position().current_player().is_king_side_castle_capable());

    // A rook that moved loses only its own side.
    let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    for (from, to) in [("h1", "h2"), ("a8", "b8"), ("h2", "h1"), ("b8", "a8")] {
        game.make_move_coordinates(from, to).unwrap();
    }
    let player = game.position().current_player();
    assert!(!player.is_king_side_castle_capable());
    assert!(player.is_queen_side_castle_capable());
}

#[test]
fn castling_through_the_game() {
    let mut game = Game::new();
    for san in ["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "O-O"] {
        game.make_move_san(san).unwrap();
    }
    let pos = game.position();
    assert!(pos.has_castled(Color::White));
    assert_eq!(pos.king(Color::White).square(), Square::G1);
    assert_eq!(pos.piece_at(Square::F1).unwrap().kind(), PieceKind::Rook);
    assert_eq!(game.move_history().last().unwrap().san, "O-O");
    assert!(pos.to_fen().contains(" kq "));
}

#[test]
fn rejected_move_leaves_position_untouched() {
    let pos = Position::from_fen("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1").unwrap();
    let before = pos.clone();
    let player = pos.current_player();
    let into_check = MoveFactory::create_move(&pos, Square::E1, sq("e2"));
    assert!(!into_check.is_null());
    let transition = player.make_move(into_check);
    assert_eq!(transition.status(), MoveStatus::LeavesPlayerInCheck);
    assert_eq!(transition.to_position(), &before);
    assert_eq!(pos, before);
}
