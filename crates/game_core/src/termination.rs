//! Maps the position's rules state to a game result.

use std::fmt;

use crate::position::Position;
use crate::types::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    InProgress,
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    FiftyMoveDraw,
    ThreefoldRepetition,
}

impl GameResult {
    pub fn is_terminal(self) -> bool {
        self != GameResult::InProgress
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::InProgress => write!(f, "Game in progress"),
            GameResult::Checkmate { winner } => write!(f, "Checkmate! {winner} wins"),
            GameResult::Stalemate => write!(f, "Draw by stalemate"),
            GameResult::InsufficientMaterial => write!(f, "Draw by insufficient material"),
            GameResult::FiftyMoveDraw => write!(f, "Draw by the fifty-move rule"),
            GameResult::ThreefoldRepetition => write!(f, "Draw by threefold repetition"),
        }
    }
}

/// Classifies `pos`. The first matching condition wins, in the order
/// checkmate, stalemate, insufficient material, fifty moves, repetition.
pub fn classify(pos: &Position) -> GameResult {
    if pos.is_checkmate() {
        GameResult::Checkmate {
            winner: pos.side_to_move().other(),
        }
    } else if pos.is_stalemate() {
        GameResult::Stalemate
    } else if pos.is_insufficient_material() {
        GameResult::InsufficientMaterial
    } else if pos.can_claim_fifty_moves() {
        GameResult::FiftyMoveDraw
    } else if pos.can_claim_threefold_repetition() {
        GameResult::ThreefoldRepetition
    } else {
        GameResult::InProgress
    }
}

#[cfg(test)]
#[path = "termination_tests.rs"]
mod termination_tests;
