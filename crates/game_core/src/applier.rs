//! Applies a legal move to the position and its mirror as one step.

use thiserror::Error;
use tracing::debug;

use crate::mirror::BoardMirror;
use crate::position::Position;
use crate::types::{Color, Move, Piece, PieceKind, Square};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("move {0} is not legal in the current position")]
    Illegal(Move),
    #[error("mirror has no piece on {0}")]
    MissingPiece(Square),
}

/// How the mirror changed beyond the mover's own relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Quiet,
    Capture(Piece),
    EnPassant { captured: Square },
    Castle { rook_from: Square, rook_to: Square },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    pub mv: Move,
    pub piece: Piece,
    pub kind: MoveKind,
    pub promoted_to: Option<Piece>,
}

/// Applies `mv` to `position` and `mirror`.
///
/// The mirror is updated square by square (capture, relocation, en-passant
/// victim, promotion, castling rook) and the move is then pushed into the
/// position. Both are edited as copies and written back only when every step
/// succeeded, so on error neither argument has changed.
pub fn apply(
    mv: Move,
    position: &mut Position,
    mirror: &mut BoardMirror,
) -> Result<AppliedMove, ApplyError> {
    if !position.is_legal(mv) {
        return Err(ApplyError::Illegal(mv));
    }

    let mut next_mirror = *mirror;
    let mut kind = MoveKind::Quiet;

    if let Some(captured) = next_mirror.remove(mv.to) {
        kind = MoveKind::Capture(captured);
    }

    let piece = next_mirror
        .relocate(mv.from, mv.to)
        .ok_or(ApplyError::MissingPiece(mv.from))?;

    if position.is_en_passant(mv) {
        // The victim sits one rank behind the destination, seen from the mover.
        let behind = match piece.color {
            Color::White => -1,
            Color::Black => 1,
        };
        let captured = mv
            .to
            .offset_rank(behind)
            .ok_or(ApplyError::MissingPiece(mv.to))?;
        next_mirror
            .remove(captured)
            .ok_or(ApplyError::MissingPiece(captured))?;
        kind = MoveKind::EnPassant { captured };
    }

    let promoted_to = mv.promotion.map(|promo| {
        let promoted = Piece::new(piece.color, promo);
        next_mirror.remove(mv.to);
        next_mirror.place(mv.to, promoted);
        promoted
    });

    if position.is_castling(mv) {
        let rank = mv.from.rank();
        let (corner, beside_king) = if position.is_kingside_castling(mv) {
            (7, mv.to.file() - 1)
        } else {
            (0, mv.to.file() + 1)
        };
        let rook_from = Square::at(corner, rank).ok_or(ApplyError::MissingPiece(mv.from))?;
        let rook_to = Square::at(beside_king, rank).ok_or(ApplyError::MissingPiece(mv.from))?;
        match next_mirror.relocate(rook_from, rook_to) {
            Some(rook) if rook.kind == PieceKind::Rook => {}
            _ => return Err(ApplyError::MissingPiece(rook_from)),
        }
        kind = MoveKind::Castle { rook_from, rook_to };
    }

    let mut next_position = position.clone();
    next_position
        .push(mv)
        .map_err(|_| ApplyError::Illegal(mv))?;

    debug_assert!(next_mirror.matches(&next_position), "mirror diverged after {mv}");
    *position = next_position;
    *mirror = next_mirror;

    debug!(%mv, ?kind, "applied move");
    Ok(AppliedMove {
        mv,
        piece,
        kind,
        promoted_to,
    })
}

#[cfg(test)]
#[path = "applier_tests.rs"]
mod applier_tests;
