use super::*;

#[test]
fn square_coordinates_use_a1_as_zero() {
    let e4: Square = "e4".parse().unwrap();
    assert_eq!(e4.index(), 28);
    assert_eq!(e4.file(), 4);
    assert_eq!(e4.rank(), 3);
    assert_eq!(e4.to_string(), "e4");
    assert_eq!(Square::at(7, 7).unwrap().to_string(), "h8");
}

#[test]
fn square_rejects_off_board_input() {
    assert!(Square::new(64).is_none());
    assert!(Square::at(8, 0).is_none());
    assert!("i1".parse::<Square>().is_err());
    assert!("a9".parse::<Square>().is_err());
    assert!("a".parse::<Square>().is_err());
}

#[test]
fn offset_rank_stays_on_board() {
    let e5: Square = "e5".parse().unwrap();
    assert_eq!(e5.offset_rank(-1).unwrap().to_string(), "e4");
    assert_eq!(e5.offset_rank(1).unwrap().to_string(), "e6");
    let a8: Square = "a8".parse().unwrap();
    assert!(a8.offset_rank(1).is_none());
}

#[test]
fn move_requires_distinct_squares() {
    let e2: Square = "e2".parse().unwrap();
    assert!(Move::new(e2, e2).is_none());
    assert!("e2e2".parse::<Move>().is_err());
}

#[test]
fn move_parses_promotion_suffix() {
    let mv: Move = "e7e8q".parse().unwrap();
    assert_eq!(mv.promotion, Some(PieceKind::Queen));
    assert_eq!(mv.to_string(), "e7e8q");

    assert!("e7e8k".parse::<Move>().is_err());
    assert!("e7e8x".parse::<Move>().is_err());
}

#[test]
fn piece_fen_char_follows_color() {
    assert_eq!(Piece::new(Color::White, PieceKind::Knight).fen_char(), 'N');
    assert_eq!(Piece::new(Color::Black, PieceKind::Queen).fen_char(), 'q');
}

#[test]
fn color_other_flips() {
    assert_eq!(Color::White.other(), Color::Black);
    assert_eq!(Color::Black.other().idx(), 0);
}
