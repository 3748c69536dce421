//! Authoritative game state.
//!
//! `Position` owns a cozy-chess board and answers every rules question by
//! asking it. The only additions on top of the board are the bookkeeping
//! cozy-chess leaves to callers: the played move list (for UCI `position`
//! commands) and the board history (for repetition claims).

use std::fmt::Write as _;

use cozy_chess::{BitBoard, Board};
use thiserror::Error;

use crate::types::{Color, Move, Piece, PieceKind, Square};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("invalid FEN: {0}")]
    Fen(String),
    #[error("illegal move {0}")]
    IllegalMove(Move),
}

#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
    /// FEN the game started from; `None` means the standard start position.
    start_fen: Option<String>,
    moves: Vec<Move>,
    /// Every board reached before the current one, oldest first.
    history: Vec<Board>,
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Position {
    pub fn startpos() -> Self {
        Self {
            board: Board::default(),
            start_fen: None,
            moves: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let fen = fen.trim();
        let board = Board::from_fen(fen, false)
            .map_err(|e| PositionError::Fen(format!("{fen} ({e:?})")))?;
        Ok(Self {
            board,
            start_fen: Some(fen.to_string()),
            moves: Vec::new(),
            history: Vec::new(),
        })
    }

    pub fn side_to_move(&self) -> Color {
        from_cozy_color(self.board.side_to_move())
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        let csq = to_cozy_square(sq);
        let kind = self.board.piece_on(csq)?;
        let color = self.board.color_on(csq)?;
        Some(Piece::new(from_cozy_color(color), from_cozy_piece(kind)))
    }

    /// Occupied squares and their pieces, a1 first.
    pub fn placement(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Moves played since the start position, in order.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.board.generate_moves(|piece_moves| {
            for mv in piece_moves {
                moves.push(self.from_cozy_move(mv));
            }
            false
        });
        moves
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.legal_moves().contains(&mv)
    }

    /// Plays `mv`, updating side to move, rights, counters and history.
    pub fn push(&mut self, mv: Move) -> Result<(), PositionError> {
        let cmv = self.to_cozy_move(mv);
        if !self.board.is_legal(cmv) {
            return Err(PositionError::IllegalMove(mv));
        }
        self.history.push(self.board.clone());
        self.board.play_unchecked(cmv);
        self.moves.push(mv);
        Ok(())
    }

    pub fn is_en_passant(&self, mv: Move) -> bool {
        matches!(self.piece_at(mv.from), Some(p) if p.kind == PieceKind::Pawn)
            && mv.from.file() != mv.to.file()
            && self.piece_at(mv.to).is_none()
    }

    pub fn is_castling(&self, mv: Move) -> bool {
        matches!(self.piece_at(mv.from), Some(p) if p.kind == PieceKind::King)
            && mv.from.rank() == mv.to.rank()
            && mv.from.file().abs_diff(mv.to.file()) == 2
    }

    pub fn is_kingside_castling(&self, mv: Move) -> bool {
        self.is_castling(mv) && mv.to.file() > mv.from.file()
    }

    pub fn is_check(&self) -> bool {
        !self.board.checkers().is_empty()
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check() && !self.has_legal_moves()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && !self.has_legal_moves()
    }

    /// Neither side can possibly deliver mate.
    pub fn is_insufficient_material(&self) -> bool {
        self.has_insufficient_material(Color::White) && self.has_insufficient_material(Color::Black)
    }

    /// The fifty-move rule already holds in this position. A claim that only
    /// the next move would complete does not count, so the game ends as soon
    /// as the rule is met and never on an announced move.
    pub fn can_claim_fifty_moves(&self) -> bool {
        self.board.halfmove_clock() >= 100
    }

    /// The current position has occurred three times. As with the fifty-move
    /// rule, a repetition the next move would complete is not counted.
    pub fn can_claim_threefold_repetition(&self) -> bool {
        let earlier = self
            .history
            .iter()
            .filter(|b| b.same_position(&self.board))
            .count();
        earlier + 1 >= 3
    }

    /// Matches UCI text against the legal moves, so only playable moves parse.
    pub fn parse_uci_move(&self, txt: &str) -> Option<Move> {
        let mv: Move = txt.trim().parse().ok()?;
        self.is_legal(mv).then_some(mv)
    }

    /// The UCI `position` command reproducing this game.
    pub fn uci_position_command(&self) -> String {
        let mut cmd = match &self.start_fen {
            Some(fen) => format!("position fen {fen}"),
            None => "position startpos".to_string(),
        };
        if !self.moves.is_empty() {
            cmd.push_str(" moves");
            for mv in &self.moves {
                let _ = write!(cmd, " {mv}");
            }
        }
        cmd
    }

    fn has_legal_moves(&self) -> bool {
        self.board.generate_moves(|piece_moves| !piece_moves.is_empty())
    }

    fn has_insufficient_material(&self, color: Color) -> bool {
        let board = &self.board;
        let ours = board.colors(to_cozy_color(color));
        let theirs = board.colors(to_cozy_color(color.other()));
        let pawns = board.pieces(cozy_chess::Piece::Pawn);
        let knights = board.pieces(cozy_chess::Piece::Knight);
        let bishops = board.pieces(cozy_chess::Piece::Bishop);
        let rooks = board.pieces(cozy_chess::Piece::Rook);
        let queens = board.pieces(cozy_chess::Piece::Queen);
        let kings = board.pieces(cozy_chess::Piece::King);

        if !(ours & (pawns | rooks | queens)).is_empty() {
            return false;
        }
        if !(ours & knights).is_empty() {
            // A lone knight can only mate with help from enemy pieces other than a queen.
            return ours.len() <= 2 && (theirs & !kings & !queens).is_empty();
        }
        if !(ours & bishops).is_empty() {
            return bishops_share_color(bishops) && pawns.is_empty() && knights.is_empty();
        }
        true
    }

    fn to_cozy_move(&self, mv: Move) -> cozy_chess::Move {
        let to = if self.is_castling(mv) {
            // cozy-chess encodes castling as the king capturing its own rook.
            let rook_file = if mv.to.file() > mv.from.file() { 7 } else { 0 };
            Square::from_index(mv.from.rank() * 8 + rook_file)
        } else {
            mv.to
        };
        cozy_chess::Move {
            from: to_cozy_square(mv.from),
            to: to_cozy_square(to),
            promotion: mv.promotion.map(to_cozy_piece),
        }
    }

    fn from_cozy_move(&self, mv: cozy_chess::Move) -> Move {
        let from = from_cozy_square(mv.from);
        let mut to = from_cozy_square(mv.to);
        let is_king = self.board.piece_on(mv.from) == Some(cozy_chess::Piece::King);
        if is_king && self.board.color_on(mv.to) == Some(self.board.side_to_move()) {
            let file = if to.file() > from.file() { 6 } else { 2 };
            to = Square::from_index(from.rank() * 8 + file);
        }
        Move {
            from,
            to,
            promotion: mv.promotion.map(from_cozy_piece),
        }
    }
}

fn bishops_share_color(bishops: BitBoard) -> bool {
    let mut parities = bishops
        .into_iter()
        .map(|sq| (sq.file() as usize + sq.rank() as usize) % 2);
    match parities.next() {
        Some(first) => parities.all(|p| p == first),
        None => true,
    }
}

fn to_cozy_square(sq: Square) -> cozy_chess::Square {
    cozy_chess::Square::index(sq.index() as usize)
}

fn from_cozy_square(sq: cozy_chess::Square) -> Square {
    Square::from_index(sq as u8)
}

fn to_cozy_color(color: Color) -> cozy_chess::Color {
    match color {
        Color::White => cozy_chess::Color::White,
        Color::Black => cozy_chess::Color::Black,
    }
}

fn from_cozy_color(color: cozy_chess::Color) -> Color {
    match color {
        cozy_chess::Color::White => Color::White,
        cozy_chess::Color::Black => Color::Black,
    }
}

fn to_cozy_piece(kind: PieceKind) -> cozy_chess::Piece {
    match kind {
        PieceKind::Pawn => cozy_chess::Piece::Pawn,
        PieceKind::Knight => cozy_chess::Piece::Knight,
        PieceKind::Bishop => cozy_chess::Piece::Bishop,
        PieceKind::Rook => cozy_chess::Piece::Rook,
        PieceKind::Queen => cozy_chess::Piece::Queen,
        PieceKind::King => cozy_chess::Piece::King,
    }
}

fn from_cozy_piece(piece: cozy_chess::Piece) -> PieceKind {
    match piece {
        cozy_chess::Piece::Pawn => PieceKind::Pawn,
        cozy_chess::Piece::Knight => PieceKind::Knight,
        cozy_chess::Piece::Bishop => PieceKind::Bishop,
        cozy_chess::Piece::Rook => PieceKind::Rook,
        cozy_chess::Piece::Queen => PieceKind::Queen,
        cozy_chess::Piece::King => PieceKind::King,
    }
}

#[cfg(test)]
#[path = "position_tests.rs"]
mod position_tests;
