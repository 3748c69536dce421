use super::*;

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

#[test]
fn startpos_is_in_progress() {
    assert_eq!(classify(&Position::startpos()), GameResult::InProgress);
    assert!(!GameResult::InProgress.is_terminal());
}

#[test]
fn checkmate_winner_is_the_side_that_moved() {
    let mated = pos("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
    assert_eq!(
        classify(&mated),
        GameResult::Checkmate {
            winner: Color::Black
        }
    );
}

#[test]
fn checkmate_outranks_fifty_move_claim() {
    // Back-rank mate delivered on the hundredth quiet half-move.
    let mated = pos("3R2k1/5ppp/8/8/8/8/8/K7 b - - 100 90");
    assert!(mated.can_claim_fifty_moves());
    assert_eq!(
        classify(&mated),
        GameResult::Checkmate {
            winner: Color::White
        }
    );
}

#[test]
fn stalemate_outranks_insufficient_material() {
    let stale = pos("7k/5K2/6B1/8/8/8/8/8 b - - 0 1");
    assert_eq!(classify(&stale), GameResult::Stalemate);
}

#[test]
fn bare_kings_are_insufficient() {
    assert_eq!(
        classify(&pos("8/8/4k3/8/8/4K3/8/8 w - - 0 1")),
        GameResult::InsufficientMaterial
    );
}

#[test]
fn fifty_move_rule() {
    assert_eq!(
        classify(&pos("8/8/8/4k3/8/4K3/8/7R w - - 100 80")),
        GameResult::FiftyMoveDraw
    );
}

#[test]
fn threefold_repetition() {
    let mut p = Position::startpos();
    for _ in 0..2 {
        for txt in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            p.push(txt.parse().unwrap()).unwrap();
        }
    }
    assert_eq!(classify(&p), GameResult::ThreefoldRepetition);
}

#[test]
fn classification_is_idempotent() {
    let p = pos("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
    assert_eq!(classify(&p), classify(&p));
    let q = Position::startpos();
    assert_eq!(classify(&q), classify(&q));
}

#[test]
fn display_gives_terminal_reason() {
    let result = GameResult::Checkmate {
        winner: Color::White,
    };
    assert_eq!(result.to_string(), "Checkmate! White wins");
    assert_eq!(GameResult::Stalemate.to_string(), "Draw by stalemate");
}
