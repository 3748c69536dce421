//! Move sources: actors that produce exactly one move per activation.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::position::Position;
use crate::types::Move;
use crate::EngineError;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("engine failure: {0}")]
    Engine(#[from] EngineError),
    #[error("input channel closed")]
    InputClosed,
    #[error("move source worker stopped without a move")]
    Disconnected,
}

/// Resolves once the activated source has produced its move.
pub type PendingMove = oneshot::Receiver<Result<Move, SourceError>>;

/// An actor that plays one side of the game.
///
/// A source is created once and activated once per turn. `activate` must
/// return immediately; the move is produced by a worker the source spawns
/// and delivered through the returned [`PendingMove`]. Sources only ever see
/// a snapshot of the position and never mutate the game.
pub trait MoveSource: Send {
    fn name(&self) -> &str;

    fn activate(&mut self, position: &Position) -> PendingMove;
}
