pub mod applier;
pub mod budget;
pub mod coordinator;
pub mod engine_source;
pub mod interactive;
pub mod mirror;
pub mod position;
pub mod presenter;
pub mod source;
pub mod termination;
pub mod types;

pub use applier::{apply, AppliedMove, ApplyError, MoveKind};
pub use budget::SearchBudget;
pub use coordinator::{CoordinatorError, MoveProduced, TurnCoordinator};
pub use engine_source::EngineSource;
pub use interactive::{CandidateTargets, InteractiveSource, Selection, SelectionHandle};
pub use mirror::BoardMirror;
pub use position::{Position, PositionError};
pub use presenter::{BoardOrientation, Presenter};
pub use source::{MoveSource, PendingMove, SourceError};
pub use termination::{classify, GameResult};
pub use types::*;

// =============================================================================
// Engine trait: implemented by every automated opponent (UCI process, random)
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine `{path}`: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("engine i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine protocol error: {0}")]
    Protocol(String),
    #[error("engine returned no move")]
    NoMove,
    #[error("engine unavailable: {0}")]
    Unavailable(String),
}

/// An automated move chooser.
///
/// `best_move` may block for as long as the search takes; callers run it on
/// a dedicated worker.
pub trait Engine: Send {
    /// Pick a move for the side to move in `pos` within `budget`.
    ///
    /// The returned move must be legal in `pos`; the coordinator discards
    /// anything else.
    fn best_move(&mut self, pos: &Position, budget: SearchBudget) -> Result<Move, EngineError>;

    /// Name used in logs and game-over messages
    fn name(&self) -> &str;

    /// Reset internal state for a new game
    fn new_game(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}
