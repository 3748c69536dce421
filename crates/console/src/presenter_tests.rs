use super::*;
use game_core::Position;
use std::sync::Arc;

fn mv(txt: &str) -> Move {
    txt.parse().unwrap()
}

#[test]
fn white_at_bottom_draws_rank_eight_first() {
    let mirror = BoardMirror::from_position(&Position::startpos());
    let text = render_board(&mirror, BoardOrientation::WhiteAtBottom, None);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "8  r  n  b  q  k  b  n  r ");
    assert_eq!(lines[7], "1  R  N  B  Q  K  B  N  R ");
    assert_eq!(lines[8], "   a  b  c  d  e  f  g  h ");
}

#[test]
fn black_at_bottom_mirrors_files_and_ranks() {
    let mirror = BoardMirror::from_position(&Position::startpos());
    let text = render_board(&mirror, BoardOrientation::BlackAtBottom, None);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "1  R  N  B  K  Q  B  N  R ");
    assert_eq!(lines[8], "   h  g  f  e  d  c  b  a ");
}

#[test]
fn last_move_squares_are_bracketed() {
    let mut pos = Position::startpos();
    pos.push(mv("e2e4")).unwrap();
    let mirror = BoardMirror::from_position(&pos);
    let text = render_board(&mirror, BoardOrientation::WhiteAtBottom, Some(mv("e2e4")));
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[4], "4  .  .  .  . [P] .  .  . ");
    assert_eq!(lines[6], "2  P  P  P  P [.] P  P  P ");
}

#[test]
fn hints_follow_candidate_updates() {
    let presenter = ConsolePresenter::new(BoardOrientation::WhiteAtBottom, Color::White);
    let e2: Square = "e2".parse().unwrap();
    let targets: BTreeSet<Square> = ["e3", "e4"].iter().map(|s| s.parse().unwrap()).collect();

    presenter.on_candidate_targets_changed(e2, &targets);
    assert_eq!(presenter.targets.lock().unwrap()[&e2], targets);

    presenter.on_candidate_targets_changed(e2, &BTreeSet::new());
    assert!(presenter.targets.lock().unwrap().is_empty());
}

#[test]
fn preselected_piece_skips_the_prompt() {
    let presenter = ConsolePresenter::new(BoardOrientation::WhiteAtBottom, Color::White);
    presenter.preselect_promotion(Some(PieceKind::Rook));

    assert_eq!(
        presenter.prompt_promotion_choice(Color::White),
        Some(PieceKind::Rook)
    );
    assert!(!presenter.is_prompting());
}

#[test]
fn prompt_reads_the_answer_line() {
    let presenter = Arc::new(ConsolePresenter::new(
        BoardOrientation::WhiteAtBottom,
        Color::White,
    ));
    let asker = Arc::clone(&presenter);
    let prompt = std::thread::spawn(move || asker.prompt_promotion_choice(Color::White));

    while !presenter.is_prompting() {
        std::thread::yield_now();
    }
    presenter.answer_promotion("n".into());

    assert_eq!(prompt.join().unwrap(), Some(PieceKind::Knight));
}

#[test]
fn king_or_closed_input_dismisses_the_prompt() {
    let presenter = Arc::new(ConsolePresenter::new(
        BoardOrientation::WhiteAtBottom,
        Color::Black,
    ));
    let asker = Arc::clone(&presenter);
    let prompt = std::thread::spawn(move || asker.prompt_promotion_choice(Color::Black));
    while !presenter.is_prompting() {
        std::thread::yield_now();
    }
    presenter.answer_promotion("k".into());
    assert_eq!(prompt.join().unwrap(), None);

    presenter.close_input();
    assert_eq!(presenter.prompt_promotion_choice(Color::Black), None);
}

#[test]
fn flip_redraws_the_last_board_from_the_other_side() {
    let presenter = ConsolePresenter::new(BoardOrientation::WhiteAtBottom, Color::White);
    assert_eq!(presenter.redraw(), None);

    let mut pos = Position::startpos();
    pos.push(mv("e2e4")).unwrap();
    let mirror = BoardMirror::from_position(&pos);
    presenter.on_move_applied(mv("e2e4"), &mirror);

    assert_eq!(presenter.flip(), BoardOrientation::BlackAtBottom);
    let flipped = presenter.redraw().unwrap();
    assert_eq!(
        flipped,
        render_board(&mirror, BoardOrientation::BlackAtBottom, Some(mv("e2e4")))
    );
    assert!(flipped.starts_with("1  R  N  B  K  Q  B  N  R "));

    assert_eq!(presenter.flip(), BoardOrientation::WhiteAtBottom);
    assert_eq!(presenter.orientation(), BoardOrientation::WhiteAtBottom);
}

#[test]
fn quick_answers_reach_the_prompt() {
    let presenter = Arc::new(ConsolePresenter::new(
        BoardOrientation::WhiteAtBottom,
        Color::White,
    ));
    for (line, expected) in [("q", PieceKind::Queen), ("b", PieceKind::Bishop), ("r", PieceKind::Rook)] {
        let asker = Arc::clone(&presenter);
        let prompt = std::thread::spawn(move || asker.prompt_promotion_choice(Color::White));
        // Answer the instant the prompt is visible to the input task.
        while !presenter.is_prompting() {
            std::thread::yield_now();
        }
        presenter.answer_promotion(line.into());
        assert_eq!(prompt.join().unwrap(), Some(expected));
        assert!(!presenter.is_prompting());
    }
}
