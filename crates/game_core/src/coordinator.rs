//! Turn coordination: activate the moving source, apply its move, check for
//! the end of the game, swap roles.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::applier::{self, ApplyError};
use crate::mirror::BoardMirror;
use crate::position::Position;
use crate::presenter::Presenter;
use crate::source::{MoveSource, SourceError};
use crate::termination::{self, GameResult};
use crate::types::{Color, Move};

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("{side} move source failed: {source}")]
    Source {
        side: Color,
        #[source]
        source: SourceError,
    },
    #[error(transparent)]
    Apply(#[from] ApplyError),
    #[error("coordinator inbox closed")]
    InboxClosed,
}

/// A worker's answer for one activation.
#[derive(Debug)]
pub struct MoveProduced {
    pub activation: u64,
    pub outcome: Result<Move, SourceError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Awaiting,
    Finished(GameResult),
    Aborted,
}

/// Owns the game and alternates two move sources over it.
///
/// Sources are stored by the color they play and `moving` names the one
/// whose turn it is. Only the moving source is ever activated, and
/// produced moves are handled one at a time, so the position has a single
/// writer.
pub struct TurnCoordinator {
    position: Position,
    mirror: BoardMirror,
    sources: [Box<dyn MoveSource>; 2],
    moving: Color,
    presenter: Arc<dyn Presenter>,
    activation: u64,
    state: State,
    outbox: mpsc::UnboundedSender<MoveProduced>,
    inbox: mpsc::UnboundedReceiver<MoveProduced>,
}

impl TurnCoordinator {
    pub fn new(
        position: Position,
        white: Box<dyn MoveSource>,
        black: Box<dyn MoveSource>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        let (outbox, inbox) = mpsc::unbounded_channel();
        Self {
            mirror: BoardMirror::from_position(&position),
            moving: position.side_to_move(),
            position,
            sources: [white, black],
            presenter,
            activation: 0,
            state: State::Idle,
            outbox,
            inbox,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn mirror(&self) -> &BoardMirror {
        &self.mirror
    }

    /// Color of the source whose turn it is.
    pub fn moving(&self) -> Color {
        self.moving
    }

    /// Number of activations issued so far.
    pub fn activations(&self) -> u64 {
        self.activation
    }

    /// The final result once the game has ended.
    pub fn result(&self) -> Option<GameResult> {
        match self.state {
            State::Finished(result) => Some(result),
            _ => None,
        }
    }

    /// Activates the moving source and returns without waiting for its move.
    ///
    /// Does nothing once the game has ended. Must be called within a tokio
    /// runtime.
    pub fn start(&mut self) {
        if matches!(self.state, State::Finished(_) | State::Aborted) {
            return;
        }

        self.activation += 1;
        let activation = self.activation;
        let source = &mut self.sources[self.moving.idx()];
        debug!(activation, side = %self.moving, source = source.name(), "activating");
        let pending = source.activate(&self.position);
        self.state = State::Awaiting;

        let outbox = self.outbox.clone();
        tokio::spawn(async move {
            let outcome = pending.await.unwrap_or(Err(SourceError::Disconnected));
            let _ = outbox.send(MoveProduced {
                activation,
                outcome,
            });
        });
    }

    /// Handles one produced move.
    ///
    /// Returns the final result when this move ended the game.
    pub fn on_move_produced(
        &mut self,
        produced: MoveProduced,
    ) -> Result<Option<GameResult>, CoordinatorError> {
        if self.state != State::Awaiting || produced.activation != self.activation {
            warn!(
                activation = produced.activation,
                current = self.activation,
                "ignoring move from inactive source"
            );
            return Ok(self.result());
        }

        let mv = match produced.outcome {
            Ok(mv) => mv,
            Err(source) => {
                error!(side = %self.moving, error = %source, "move source failed");
                self.state = State::Aborted;
                self.presenter.on_game_ended(&source.to_string());
                return Err(CoordinatorError::Source {
                    side: self.moving,
                    source,
                });
            }
        };

        if !self.position.is_legal(mv) {
            warn!(%mv, side = %self.moving, "illegal move produced, asking again");
            self.start();
            return Ok(None);
        }

        if let Err(e) = applier::apply(mv, &mut self.position, &mut self.mirror) {
            error!(%mv, error = %e, "failed to apply move");
            self.state = State::Aborted;
            self.presenter.on_game_ended(&e.to_string());
            return Err(e.into());
        }
        self.presenter.on_move_applied(mv, &self.mirror);

        let result = termination::classify(&self.position);
        if result.is_terminal() {
            info!(%result, moves = self.position.moves().len(), "game over");
            self.state = State::Finished(result);
            self.presenter.on_game_ended(&result.to_string());
            return Ok(Some(result));
        }

        self.moving = self.moving.other();
        self.start();
        Ok(None)
    }

    /// Plays the game to the end.
    pub async fn run(&mut self) -> Result<GameResult, CoordinatorError> {
        if let Some(result) = self.result() {
            return Ok(result);
        }
        // A game loaded from a finished position never activates anyone.
        let result = termination::classify(&self.position);
        if result.is_terminal() {
            self.state = State::Finished(result);
            self.presenter.on_game_ended(&result.to_string());
            return Ok(result);
        }

        if self.state == State::Idle {
            self.start();
        }
        while let Some(produced) = self.inbox.recv().await {
            if let Some(result) = self.on_move_produced(produced)? {
                return Ok(result);
            }
        }
        Err(CoordinatorError::InboxClosed)
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod coordinator_tests;
