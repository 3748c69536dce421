//! Human-driven move source.
//!
//! On activation the source groups the legal moves by origin square and
//! publishes each origin's destinations to the presenter. The input layer
//! reports `(from, to)` picks through a [`SelectionHandle`]; the worker looks
//! each pick up in the candidate map, asks for a promotion piece when needed,
//! and delivers the first pick that resolves to a legal move.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::position::Position;
use crate::presenter::Presenter;
use crate::source::{MoveSource, PendingMove, SourceError};
use crate::types::{Move, Square};

/// A `(from, to)` pick made by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub from: Square,
    pub to: Square,
}

/// Sending half of the selection channel, held by the input layer.
#[derive(Debug, Clone)]
pub struct SelectionHandle {
    tx: mpsc::UnboundedSender<Selection>,
}

impl SelectionHandle {
    /// Reports a pick. Returns false once the source is gone.
    pub fn select(&self, from: Square, to: Square) -> bool {
        self.tx.send(Selection { from, to }).is_ok()
    }
}

/// Legal moves of the side to move, grouped by origin square.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateTargets {
    by_origin: BTreeMap<Square, Vec<Move>>,
}

impl CandidateTargets {
    pub fn from_moves(moves: impl IntoIterator<Item = Move>) -> Self {
        let mut by_origin: BTreeMap<Square, Vec<Move>> = BTreeMap::new();
        for mv in moves {
            by_origin.entry(mv.from).or_default().push(mv);
        }
        Self { by_origin }
    }

    pub fn is_empty(&self) -> bool {
        self.by_origin.is_empty()
    }

    pub fn origins(&self) -> impl Iterator<Item = Square> + '_ {
        self.by_origin.keys().copied()
    }

    pub fn targets(&self, origin: Square) -> BTreeSet<Square> {
        self.by_origin
            .get(&origin)
            .map(|moves| moves.iter().map(|m| m.to).collect())
            .unwrap_or_default()
    }

    /// Candidate moves for a pick; several when the pick is a promotion.
    pub fn matching(&self, from: Square, to: Square) -> Vec<Move> {
        self.by_origin
            .get(&from)
            .map(|moves| moves.iter().filter(|m| m.to == to).copied().collect())
            .unwrap_or_default()
    }
}

pub struct InteractiveSource {
    presenter: Arc<dyn Presenter>,
    selections: Arc<Mutex<mpsc::UnboundedReceiver<Selection>>>,
    candidates: Arc<Mutex<CandidateTargets>>,
}

impl InteractiveSource {
    pub fn new(presenter: Arc<dyn Presenter>) -> (Self, SelectionHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let source = Self {
            presenter,
            selections: Arc::new(Mutex::new(rx)),
            candidates: Arc::new(Mutex::new(CandidateTargets::default())),
        };
        (source, SelectionHandle { tx })
    }

    /// The currently published candidate map (empty while idle).
    pub fn candidate_targets(&self) -> CandidateTargets {
        self.candidates
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

impl MoveSource for InteractiveSource {
    fn name(&self) -> &str {
        "human"
    }

    fn activate(&mut self, position: &Position) -> PendingMove {
        // Picks made while this side was idle do not count.
        if let Ok(mut inbox) = self.selections.try_lock() {
            while inbox.try_recv().is_ok() {}
        }

        let (tx, rx) = oneshot::channel();
        let worker = Worker {
            position: position.clone(),
            presenter: Arc::clone(&self.presenter),
            selections: Arc::clone(&self.selections),
            candidates: Arc::clone(&self.candidates),
        };
        tokio::task::spawn_blocking(move || {
            let _ = tx.send(worker.run());
        });
        rx
    }
}

struct Worker {
    position: Position,
    presenter: Arc<dyn Presenter>,
    selections: Arc<Mutex<mpsc::UnboundedReceiver<Selection>>>,
    candidates: Arc<Mutex<CandidateTargets>>,
}

impl Worker {
    fn run(self) -> Result<Move, SourceError> {
        let mut inbox = self
            .selections
            .lock()
            .map_err(|_| SourceError::Disconnected)?;

        let candidates = CandidateTargets::from_moves(self.position.legal_moves());
        self.publish(candidates.clone())?;
        let color = self.position.side_to_move();
        debug!(%color, origins = candidates.origins().count(), "awaiting selection");

        loop {
            let Some(pick) = inbox.blocking_recv() else {
                self.publish(CandidateTargets::default())?;
                return Err(SourceError::InputClosed);
            };

            let matching = candidates.matching(pick.from, pick.to);
            let mv = match matching.as_slice() {
                [] => {
                    debug!(from = %pick.from, to = %pick.to, "not a candidate, ignoring");
                    continue;
                }
                [only] if only.promotion.is_none() => *only,
                _ => match self.presenter.prompt_promotion_choice(color) {
                    None => {
                        info!(from = %pick.from, to = %pick.to, "promotion dismissed");
                        continue;
                    }
                    Some(kind) => match matching.iter().find(|m| m.promotion == Some(kind)) {
                        Some(mv) => *mv,
                        None => {
                            warn!(?kind, "cannot promote to that piece");
                            continue;
                        }
                    },
                },
            };

            self.publish(CandidateTargets::default())?;
            return Ok(mv);
        }
    }

    /// Replaces the shared map and tells the presenter which origins changed.
    fn publish(&self, next: CandidateTargets) -> Result<(), SourceError> {
        let mut current = self
            .candidates
            .lock()
            .map_err(|_| SourceError::Disconnected)?;
        let empty = BTreeSet::new();
        for origin in current.origins() {
            if next.targets(origin).is_empty() {
                self.presenter.on_candidate_targets_changed(origin, &empty);
            }
        }
        for origin in next.origins() {
            self.presenter
                .on_candidate_targets_changed(origin, &next.targets(origin));
        }
        *current = next;
        Ok(())
    }
}

#[cfg(test)]
#[path = "interactive_tests.rs"]
mod interactive_tests;
