use super::*;

#[test]
fn random_engine_returns_legal_move() {
    let mut engine = RandomEngine::new();
    let pos = Position::startpos();

    let mv = engine.best_move(&pos, SearchBudget::depth(1)).unwrap();

    assert!(pos.legal_moves().contains(&mv));
}

#[test]
fn seeded_engines_agree() {
    let pos = Position::startpos();
    let a = RandomEngine::seeded(7).best_move(&pos, SearchBudget::default()).unwrap();
    let b = RandomEngine::seeded(7).best_move(&pos, SearchBudget::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn random_engine_handles_checkmate() {
    let mut engine = RandomEngine::new();
    let pos =
        Position::from_fen("r1bqkbnr/pppp1Qpp/2n5/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 1")
            .unwrap();

    let result = engine.best_move(&pos, SearchBudget::depth(1));

    assert!(matches!(result, Err(EngineError::NoMove)));
}

#[test]
fn random_engine_handles_stalemate() {
    let mut engine = RandomEngine::new();
    let pos = Position::from_fen("k7/8/1Q6/8/8/8/8/1K6 b - - 0 1").unwrap();

    let result = engine.best_move(&pos, SearchBudget::depth(1));

    assert!(matches!(result, Err(EngineError::NoMove)));
}
