//! Random Move Engine
//!
//! Picks uniformly among the legal moves. Used when no engine executable is
//! configured, and as a cheap opponent in tests.

use game_core::{Engine, EngineError, Move, Position, SearchBudget};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[cfg(test)]
mod lib_tests;

/// An engine that plays random legal moves. It ignores the search budget.
#[derive(Debug, Clone)]
pub struct RandomEngine {
    rng: StdRng,
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomEngine {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic engine for reproducible games.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Engine for RandomEngine {
    fn best_move(&mut self, pos: &Position, _budget: SearchBudget) -> Result<Move, EngineError> {
        pos.legal_moves()
            .choose(&mut self.rng)
            .copied()
            .ok_or(EngineError::NoMove)
    }

    fn name(&self) -> &str {
        "Random v1.0"
    }
}
