//! The presentation boundary: everything the game loop tells (or asks) the user.

use std::collections::BTreeSet;

use crate::mirror::BoardMirror;
use crate::types::{Color, Move, PieceKind, Square};

/// Receives game events and answers promotion prompts.
///
/// Called from the coordinator task and from source workers, so
/// implementations must be shareable across threads.
pub trait Presenter: Send + Sync {
    /// A move was applied; `mirror` already shows the new placement.
    fn on_move_applied(&self, mv: Move, mirror: &BoardMirror);

    /// The game is over (or was aborted); `reason` is human-readable.
    fn on_game_ended(&self, reason: &str);

    /// `origin` may now move to `targets`. An empty set clears the origin.
    fn on_candidate_targets_changed(&self, origin: Square, targets: &BTreeSet<Square>);

    /// Blocks until the user picks a promotion piece; `None` if dismissed.
    fn prompt_promotion_choice(&self, color: Color) -> Option<PieceKind>;
}

/// Which side is drawn at the bottom of the display.
///
/// Only presenters use this; the mirror always stores squares canonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardOrientation {
    #[default]
    WhiteAtBottom,
    BlackAtBottom,
}

impl BoardOrientation {
    /// Orientation that puts `color` at the bottom.
    pub fn for_side(color: Color) -> Self {
        match color {
            Color::White => BoardOrientation::WhiteAtBottom,
            Color::Black => BoardOrientation::BlackAtBottom,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            BoardOrientation::WhiteAtBottom => BoardOrientation::BlackAtBottom,
            BoardOrientation::BlackAtBottom => BoardOrientation::WhiteAtBottom,
        }
    }

    /// Display `(row, column)` of `sq`; row 0 is the top line.
    pub fn to_display(self, sq: Square) -> (u8, u8) {
        match self {
            BoardOrientation::WhiteAtBottom => (7 - sq.rank(), sq.file()),
            BoardOrientation::BlackAtBottom => (sq.rank(), 7 - sq.file()),
        }
    }

    /// Inverse of [`BoardOrientation::to_display`].
    pub fn from_display(self, row: u8, col: u8) -> Option<Square> {
        if row > 7 || col > 7 {
            return None;
        }
        match self {
            BoardOrientation::WhiteAtBottom => Square::at(col, 7 - row),
            BoardOrientation::BlackAtBottom => Square::at(7 - col, row),
        }
    }
}
