//! Derived piece-placement grid kept in lock-step with [`Position`].

use std::fmt;

use crate::position::Position;
use crate::types::{Piece, Square};

/// 8×8 grid of pieces in canonical orientation (`[rank][file]`, rank 0 = White's first rank).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardMirror {
    grid: [[Option<Piece>; 8]; 8],
}

impl BoardMirror {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_position(pos: &Position) -> Self {
        let mut mirror = Self::empty();
        for (sq, piece) in pos.placement() {
            mirror.place(sq, piece);
        }
        mirror
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.grid[sq.rank() as usize][sq.file() as usize]
    }

    /// Puts `piece` on `sq`, returning whatever stood there.
    pub fn place(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        self.slot(sq).replace(piece)
    }

    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.slot(sq).take()
    }

    /// Moves the entry on `from` to `to`. Returns the moved piece, or `None`
    /// (leaving the grid untouched) when `from` is empty.
    pub fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.remove(from)?;
        self.place(to, piece);
        Some(piece)
    }

    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// True when every square agrees with the position's placement.
    pub fn matches(&self, pos: &Position) -> bool {
        *self == Self::from_position(pos)
    }

    fn slot(&mut self, sq: Square) -> &mut Option<Piece> {
        &mut self.grid[sq.rank() as usize][sq.file() as usize]
    }
}

impl fmt::Display for BoardMirror {
    /// Placement field of a FEN string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            let mut empty = 0;
            for piece in self.grid[rank] {
                match piece {
                    Some(p) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{}", p.fen_char())?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank > 0 {
                write!(f, "/")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "mirror_tests.rs"]
mod mirror_tests;
